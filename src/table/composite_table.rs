// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::iter::FusedIterator;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::table::EMPTY_KEY;

/// Outcome of [`CompositeTable::search`].
#[derive(Debug, PartialEq, Eq)]
pub enum Probe {
    /// The key is stored in the given slot.
    Found(Slot),
    /// The probe reached an empty slot (or wrapped the table) without meeting the key.
    NotFound,
}

impl Probe {
    /// Returns true if the probe located the key.
    pub fn is_found(&self) -> bool {
        matches!(self, Probe::Found(_))
    }
}

/// Position of an occupied entry, handed out by [`CompositeTable::search`] and
/// [`CompositeTable::insert`].
///
/// A slot can only be produced by the table and is consumed by [`CompositeTable::remove`],
/// so an index never has to be trusted blindly.
#[derive(Debug, PartialEq, Eq)]
pub struct Slot {
    index: usize,
}

impl Slot {
    /// Raw index of the slot in the backing arrays.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Open-addressing hash table from composite numbers to the primes that strike them.
#[derive(Debug, Clone)]
pub struct CompositeTable {
    mask: usize,
    keys: Vec<u64>,
    values: Vec<u64>,
    len: usize,
}

impl CompositeTable {
    /// Create a table able to hold `capacity_hint` entries.
    ///
    /// The capacity is `capacity_hint` rounded up to the next power of two (a hint of zero
    /// gives a single slot) and stays fixed for the lifetime of the table.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AllocationFailure`] if the backing arrays cannot be reserved.
    pub fn new(capacity_hint: usize) -> Result<Self, Error> {
        let size = capacity_hint
            .max(1)
            .checked_next_power_of_two()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::AllocationFailure,
                    "capacity hint has no power of two in range",
                )
                .with_context("capacity_hint", capacity_hint)
            })?;
        let keys = allocate_slots(size)?;
        let values = allocate_slots(size)?;
        Ok(Self {
            mask: size - 1,
            keys,
            values,
            len: 0,
        })
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the slot holding `key`.
    ///
    /// Probing starts at the ideal slot `key & mask` and walks forward until it meets the
    /// key or an empty slot. Key `0` is never stored and is always reported as not found.
    pub fn search(&self, key: u64) -> Probe {
        if key == EMPTY_KEY {
            return Probe::NotFound;
        }
        let mut index = self.ideal_index(key);
        for _ in 0..self.keys.len() {
            match self.keys[index] {
                EMPTY_KEY => return Probe::NotFound,
                k if k == key => return Probe::Found(Slot { index }),
                _ => index = self.next_index(index),
            }
        }
        Probe::NotFound
    }

    pub fn contains(&self, key: u64) -> bool {
        self.search(key).is_found()
    }

    /// Store `value` under `key` in the first free slot at or after the ideal slot.
    ///
    /// The caller must not insert a key that is already present; this is only checked in
    /// debug builds.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidPrecondition`] if `key` is `0`.
    /// * [`ErrorKind::CapacityExceeded`] if every slot is already occupied.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<Slot, Error> {
        if key == EMPTY_KEY {
            return Err(Error::new(
                ErrorKind::InvalidPrecondition,
                "key 0 is reserved for empty slots",
            )
            .with_context("value", value));
        }
        if self.len == self.keys.len() {
            return Err(
                Error::new(ErrorKind::CapacityExceeded, "composite table is full")
                    .with_context("capacity", self.keys.len())
                    .with_context("key", key)
                    .with_context("value", value),
            );
        }
        debug_assert!(!self.contains(key), "key {key} is already tracked");

        let index = self.place(key, value);
        self.len += 1;
        Ok(Slot { index })
    }

    /// Value stored in an occupied slot.
    pub fn value(&self, slot: &Slot) -> u64 {
        self.values[slot.index]
    }

    /// Key stored in an occupied slot.
    pub fn key(&self, slot: &Slot) -> u64 {
        self.keys[slot.index]
    }

    /// Remove the entry in `slot` and return its `(key, value)` pair.
    ///
    /// Every entry in the run of occupied slots following the removed one is cleared and
    /// inserted again, which may shift it back towards its ideal slot.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPrecondition`] if the slot is out of range or no longer
    /// occupied, e.g. because the entry was already removed through another slot.
    pub fn remove(&mut self, slot: Slot) -> Result<(u64, u64), Error> {
        let index = slot.index;
        let key = self.keys.get(index).copied().unwrap_or(EMPTY_KEY);
        if key == EMPTY_KEY {
            return Err(Error::new(
                ErrorKind::InvalidPrecondition,
                "cannot remove an empty slot",
            )
            .with_context("index", index)
            .with_context("capacity", self.keys.len()));
        }
        let value = self.values[index];
        self.keys[index] = EMPTY_KEY;
        self.len -= 1;

        let mut next = self.next_index(index);
        for _ in 1..self.keys.len() {
            let moved = std::mem::replace(&mut self.keys[next], EMPTY_KEY);
            if moved == EMPTY_KEY {
                break;
            }
            self.place(moved, self.values[next]);
            next = self.next_index(next);
        }
        Ok((key, value))
    }

    /// Number of steps between the ideal slot of the entry and the slot holding it.
    pub fn probe_distance(&self, slot: &Slot) -> usize {
        slot.index.wrapping_sub(self.ideal_index(self.keys[slot.index])) & self.mask
    }

    /// Check that every entry can be reached from its ideal slot through occupied slots only,
    /// and that the occupancy counter matches the slots in use.
    pub fn is_cluster_consistent(&self) -> bool {
        let mut occupied = 0;
        for (index, &key) in self.keys.iter().enumerate() {
            if key == EMPTY_KEY {
                continue;
            }
            occupied += 1;
            let mut probe = self.ideal_index(key);
            while probe != index {
                if self.keys[probe] == EMPTY_KEY {
                    return false;
                }
                probe = self.next_index(probe);
            }
        }
        occupied == self.len
    }

    /// Iterate over the occupied `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            table: self,
            index: 0,
        }
    }

    fn place(&mut self, key: u64, value: u64) -> usize {
        let mut index = self.ideal_index(key);
        while self.keys[index] != EMPTY_KEY {
            index = self.next_index(index);
        }
        self.keys[index] = key;
        self.values[index] = value;
        index
    }

    #[inline]
    fn ideal_index(&self, key: u64) -> usize {
        (key & self.mask as u64) as usize
    }

    #[inline]
    fn next_index(&self, index: usize) -> usize {
        (index + 1) & self.mask
    }
}

/// Iterator over the occupied entries of a [`CompositeTable`].
pub struct Entries<'a> {
    table: &'a CompositeTable,
    index: usize,
}

impl Iterator for Entries<'_> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.keys.len() {
            let index = self.index;
            self.index += 1;
            let key = self.table.keys[index];
            if key != EMPTY_KEY {
                return Some((key, self.table.values[index]));
            }
        }
        None
    }
}

impl FusedIterator for Entries<'_> {}

fn allocate_slots(size: usize) -> Result<Vec<u64>, Error> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(size).map_err(|err| {
        Error::new(
            ErrorKind::AllocationFailure,
            "failed to allocate composite table",
        )
        .with_context("slots", size)
        .set_source(err)
    })?;
    slots.resize(size, EMPTY_KEY);
    Ok(slots)
}
