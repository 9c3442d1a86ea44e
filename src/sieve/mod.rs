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

//! Incremental sieve of Eratosthenes backed by a sparse composite table.
//!
//! A classical sieve keeps one bit per candidate up to the bound N. This sieve instead keeps,
//! for every prime p with p² < N found so far, only the next odd multiple of p that has not
//! been visited yet. Those pending composites live in a [`CompositeTable`] keyed by the
//! composite, so memory is proportional to π(√N) rather than to N.
//!
//! Odd candidates are visited in increasing order. A candidate that is a key of the table is
//! composite: its prime is moved on to the next odd multiple not already claimed by another
//! prime. A candidate that is not a key is prime, and starts tracking its own square when that
//! square is below the bound.
//!
//! # Usage
//!
//! ```rust
//! # use hashsieve::sieve::Sieve;
//! let primes = Sieve::new(20)
//!     .unwrap()
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19]);
//! ```
//!
//! # Output stream
//!
//! ```rust
//! # use hashsieve::sieve::Sieve;
//! # use hashsieve::sieve::write_primes;
//! let mut sieve = Sieve::builder().bound(30).build().unwrap();
//! let mut out = Vec::new();
//! let written = write_primes(&mut sieve, &mut out).unwrap();
//! assert_eq!(written, 10);
//! assert_eq!(out, b"2 3 5 7 11 13 17 19 23 29");
//! ```
//!
//! [`CompositeTable`]: crate::table::CompositeTable

mod driver;
mod emit;

pub use self::driver::Sieve;
pub use self::driver::SieveBuilder;
pub use self::driver::SieveStats;
pub use self::emit::count_primes_below;
pub use self::emit::primes_below;
pub use self::emit::write_primes;

/// Default exclusive upper bound of the enumeration.
pub const DEFAULT_BOUND: u64 = 1_000_000_000;
/// Largest accepted bound. Keeps every tracked composite representable in a `u64`.
pub const MAX_BOUND: u64 = 1 << 62;
/// Default maximum load of the composite table.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Rosser and Schoenfeld: π(x) < 1.25506 x / ln x for every x > 1.
const PRIME_COUNT_COEFFICIENT: f64 = 1.25506;

/// Upper bound on the number of primes less than or equal to `x`.
pub fn prime_count_upper_bound(x: u64) -> usize {
    if x < 2 {
        return 0;
    }
    let x = x as f64;
    (PRIME_COUNT_COEFFICIENT * x / x.ln()).ceil() as usize
}

/// Number of table slots to request so that `entries` occupy at most `load_factor` of them.
pub(crate) fn capacity_hint(entries: usize, load_factor: f64) -> usize {
    (entries as f64 / load_factor).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_PRIMES: [u64; 25] = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97,
    ];

    #[test]
    fn test_prime_count_upper_bound_holds() {
        for x in 0..100u64 {
            let actual = SMALL_PRIMES.iter().filter(|&&p| p <= x).count();
            assert!(
                prime_count_upper_bound(x) >= actual,
                "bound too small at x={x}"
            );
        }
        // π(31622) = 3401
        assert!(prime_count_upper_bound(31_622) >= 3401);
        assert!(prime_count_upper_bound(31_622) < 2 * 3401);
    }

    #[test]
    fn test_capacity_hint() {
        assert_eq!(capacity_hint(0, DEFAULT_LOAD_FACTOR), 0);
        assert_eq!(capacity_hint(3, DEFAULT_LOAD_FACTOR), 6);
        assert_eq!(capacity_hint(3, 1.0), 3);
        assert_eq!(capacity_hint(10, 0.75), 14);
    }
}
