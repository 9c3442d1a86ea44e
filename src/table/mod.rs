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

//! Fixed-capacity open-addressing table of pending composites.
//!
//! Each entry maps a composite number to the prime that will strike it next. The table
//! uses linear probing from the ideal slot `key & mask`, reserves key `0` as the empty
//! marker, and never resizes: its capacity is chosen once from the expected number of
//! simultaneously tracked primes.
//!
//! Deletion follows the rehash-on-delete strategy: the removed slot is cleared and every
//! entry in the contiguous run after it is taken out and inserted again, so no gap ever
//! separates a key from its ideal slot.
//!
//! # Usage
//!
//! ```rust
//! # use hashsieve::table::CompositeTable;
//! # use hashsieve::table::Probe;
//! let mut table = CompositeTable::new(16).unwrap();
//! table.insert(9, 3).unwrap();
//! table.insert(25, 5).unwrap();
//!
//! let Probe::Found(slot) = table.search(9) else {
//!     unreachable!("9 was just inserted")
//! };
//! assert_eq!(table.value(&slot), 3);
//! assert_eq!(table.remove(slot).unwrap(), (9, 3));
//!
//! assert!(!table.contains(9));
//! assert!(table.contains(25));
//! ```

mod composite_table;

pub use self::composite_table::CompositeTable;
pub use self::composite_table::Entries;
pub use self::composite_table::Probe;
pub use self::composite_table::Slot;

/// Key value that marks an empty slot. Real composites are always at least 9.
pub const EMPTY_KEY: u64 = 0;
