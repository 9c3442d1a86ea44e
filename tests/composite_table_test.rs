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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::le;
use hashsieve::error::ErrorKind;
use hashsieve::table::CompositeTable;
use hashsieve::table::Probe;
use hashsieve::table::Slot;

fn slot_of(table: &CompositeTable, key: u64) -> Slot {
    match table.search(key) {
        Probe::Found(slot) => slot,
        Probe::NotFound => panic!("key {key} should be present"),
    }
}

/// Deterministic linear congruential generator for scrambled keys.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_insert_then_search() {
    let mut table = CompositeTable::new(64).unwrap();
    for (key, value) in [(9, 3), (25, 5), (49, 7), (121, 11), (73, 73), (137, 137)] {
        let inserted = table.insert(key, value).unwrap();
        let slot = slot_of(&table, key);
        assert_that!(slot.index(), eq(inserted.index()));
        assert_that!(table.value(&slot), eq(value));
        assert_that!(table.key(&slot), eq(key));
    }
    assert_that!(table.len(), eq(6));
}

#[test]
fn test_remove_leaves_other_entry() {
    let mut table = CompositeTable::new(16).unwrap();
    table.insert(9, 3).unwrap();
    table.insert(25, 5).unwrap();

    let slot = slot_of(&table, 9);
    assert_that!(table.remove(slot).unwrap(), eq((9, 3)));

    assert_eq!(table.search(9), Probe::NotFound);
    assert_that!(table.value(&slot_of(&table, 25)), eq(5));
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![(25, 5)]);
}

#[test]
fn test_remove_keeps_colliding_run_reachable() {
    let mut table = CompositeTable::new(16).unwrap();
    // Every key lands on ideal slot 9.
    let keys = [9, 25, 41, 57, 73];
    for key in keys {
        table.insert(key, key).unwrap();
    }
    // 10 and 11 are pushed behind the run.
    table.insert(10, 5).unwrap();
    table.insert(11, 11).unwrap();

    let slot = slot_of(&table, 25);
    table.remove(slot).unwrap();

    assert!(!table.contains(25));
    for key in [9, 41, 57, 73, 10, 11] {
        assert!(table.contains(key), "lost key {key}");
    }
    assert!(table.is_cluster_consistent());
}

#[test]
fn test_random_operations_preserve_cluster_invariant() {
    let mut table = CompositeTable::new(128).unwrap();
    let mut live = Vec::new();
    let mut rng = Lcg(42);

    for round in 0..2_000 {
        let should_insert = live.is_empty() || (live.len() < 96 && rng.next() % 3 != 0);
        if should_insert {
            let key = rng.next() | 1;
            if table.contains(key) {
                continue;
            }
            table.insert(key, round).unwrap();
            live.push((key, round));
        } else {
            let victim = (rng.next() as usize) % live.len();
            let (key, value) = live.swap_remove(victim);
            let slot = slot_of(&table, key);
            assert_that!(table.remove(slot).unwrap(), eq((key, value)));
            assert!(!table.contains(key));
        }

        assert!(table.is_cluster_consistent(), "broken after round {round}");
        assert_that!(table.len(), eq(live.len()));
    }

    for (key, value) in live {
        let slot = slot_of(&table, key);
        assert_that!(table.value(&slot), eq(value));
        assert_that!(table.probe_distance(&slot), le(table.capacity() - 1));
    }
}

#[test]
fn test_insert_into_full_table() {
    let mut table = CompositeTable::new(4).unwrap();
    for key in [9, 15, 21, 27] {
        table.insert(key, 3).unwrap();
    }
    let err = table.insert(33, 3).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::CapacityExceeded));
    assert_that!(err.message(), contains_substring("full"));
    assert_that!(err.context_value("capacity"), eq(Some("4")));
    assert_that!(table.len(), eq(4));
}

#[test]
fn test_insert_zero_key() {
    let mut table = CompositeTable::new(4).unwrap();
    let err = table.insert(0, 7).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidPrecondition));
    assert!(table.is_empty());
}

#[test]
fn test_remove_through_stale_slot() {
    let mut table = CompositeTable::new(8).unwrap();
    let stale = table.insert(49, 7).unwrap();
    table.remove(slot_of(&table, 49)).unwrap();

    let err = table.remove(stale).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidPrecondition));
    assert_that!(err.message(), contains_substring("cannot remove an empty slot"));
}

#[test]
fn test_absurd_capacity_fails_to_allocate() {
    let err = CompositeTable::new(usize::MAX).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::AllocationFailure));

    let err = CompositeTable::new(1 << (usize::BITS - 2)).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::AllocationFailure));
}
