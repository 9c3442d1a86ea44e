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

//! # hashsieve
//!
//! Enumerate every prime below a bound N while holding memory proportional to π(√N).
//!
//! The crate has two parts:
//!
//! * [`table`]: a fixed-capacity open-addressing table mapping pending composites to the
//!   primes that strike them, with linear probing and rehash-on-delete.
//! * [`sieve`]: an incremental sieve of Eratosthenes that walks the odd candidates and
//!   classifies each one with a single table lookup.
//!
//! ```rust
//! use hashsieve::sieve::count_primes_below;
//!
//! assert_eq!(count_primes_below(1_000).unwrap(), 168);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod sieve;
pub mod table;
