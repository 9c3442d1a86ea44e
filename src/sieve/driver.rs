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

use tracing::debug;
use tracing::trace;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::sieve::DEFAULT_BOUND;
use crate::sieve::DEFAULT_LOAD_FACTOR;
use crate::sieve::MAX_BOUND;
use crate::sieve::capacity_hint;
use crate::sieve::prime_count_upper_bound;
use crate::table::CompositeTable;
use crate::table::Probe;
use crate::table::Slot;

/// Counters collected while sieving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SieveStats {
    /// Exclusive upper bound of the run.
    pub bound: u64,
    /// Number of slots in the composite table.
    pub table_capacity: usize,
    /// Primes produced so far, including 2.
    pub primes_emitted: u64,
    /// Largest number of entries the table held at once.
    pub peak_occupancy: usize,
    /// Times a prime's next multiple was already tracked by a smaller prime and got skipped.
    pub collisions_skipped: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Odd,
    Done,
}

/// Enumerates every prime below a bound in increasing order.
///
/// The sieve yields `Result<u64, Error>` items and is fused: once it returns `None` or an
/// error, every later call returns `None`.
#[derive(Debug)]
pub struct Sieve {
    table: CompositeTable,
    bound: u64,
    sqrt_limit: u64,
    candidate: u64,
    state: State,
    stats: SieveStats,
}

impl Sieve {
    /// Create a sieve for the primes below `bound` with the default load factor.
    pub fn new(bound: u64) -> Result<Self, Error> {
        Self::builder().bound(bound).build()
    }

    /// Create a builder to configure a sieve.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hashsieve::sieve::Sieve;
    /// let sieve = Sieve::builder().bound(1_000).load_factor(0.25).build().unwrap();
    /// assert_eq!(sieve.bound(), 1_000);
    /// ```
    pub fn builder() -> SieveBuilder {
        SieveBuilder::default()
    }

    /// Exclusive upper bound of the enumeration.
    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Largest candidate whose square is still below the bound.
    pub fn sqrt_limit(&self) -> u64 {
        self.sqrt_limit
    }

    pub fn stats(&self) -> SieveStats {
        self.stats
    }

    /// The table of pending composites, keyed by composite with the striking prime as value.
    pub fn table(&self) -> &CompositeTable {
        &self.table
    }

    /// Produce the next prime, or `None` once every prime below the bound was produced.
    ///
    /// # Errors
    ///
    /// Propagates table errors. With a table sized by [`SieveBuilder::build`] none of them
    /// can occur.
    pub fn try_next(&mut self) -> Result<Option<u64>, Error> {
        match self.state {
            State::Done => return Ok(None),
            State::Start => {
                self.state = State::Odd;
                if self.bound > 2 {
                    self.stats.primes_emitted += 1;
                    return Ok(Some(2));
                }
            }
            State::Odd => {}
        }

        match self.next_odd_prime() {
            Ok(Some(prime)) => Ok(Some(prime)),
            Ok(None) => {
                self.finish();
                Ok(None)
            }
            Err(err) => {
                self.state = State::Done;
                Err(err)
            }
        }
    }

    fn next_odd_prime(&mut self) -> Result<Option<u64>, Error> {
        while self.candidate < self.bound {
            let n = self.candidate;
            self.candidate += 2;
            match self.table.search(n) {
                Probe::Found(slot) => self.advance(n, slot)?,
                Probe::NotFound => {
                    if n <= self.sqrt_limit {
                        self.table.insert(n * n, n)?;
                        self.stats.peak_occupancy =
                            self.stats.peak_occupancy.max(self.table.len());
                    }
                    self.stats.primes_emitted += 1;
                    return Ok(Some(n));
                }
            }
        }
        Ok(None)
    }

    /// Move the prime striking `composite` on to its next odd multiple that no other prime
    /// is already tracking.
    fn advance(&mut self, composite: u64, slot: Slot) -> Result<(), Error> {
        let (_, prime) = self.table.remove(slot)?;
        let step = prime * 2;
        let mut next = composite + step;
        while self.table.contains(next) {
            trace!(prime, composite = next, "multiple already tracked");
            self.stats.collisions_skipped += 1;
            next += step;
        }
        self.table.insert(next, prime)?;
        Ok(())
    }

    fn finish(&mut self) {
        self.state = State::Done;
        debug!(
            bound = self.stats.bound,
            primes = self.stats.primes_emitted,
            table_capacity = self.stats.table_capacity,
            peak_occupancy = self.stats.peak_occupancy,
            collisions_skipped = self.stats.collisions_skipped,
            "sieve finished"
        );
    }
}

impl Iterator for Sieve {
    type Item = Result<u64, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

impl FusedIterator for Sieve {}

/// Builder for [`Sieve`].
#[derive(Debug, Clone)]
pub struct SieveBuilder {
    bound: u64,
    load_factor: f64,
}

impl Default for SieveBuilder {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl SieveBuilder {
    /// Set the exclusive upper bound. Must not exceed [`MAX_BOUND`].
    pub fn bound(mut self, bound: u64) -> Self {
        self.bound = bound;
        self
    }

    /// Set the maximum load of the composite table, in (0.0, 1.0].
    ///
    /// Lower values trade memory for shorter probe runs.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Validate the configuration and allocate the composite table.
    ///
    /// The table is sized from an upper bound on the number of primes p with p² < bound,
    /// divided by the load factor, so it can never fill up during the run.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::ConfigInvalid`] if the bound or load factor is out of range.
    /// * [`ErrorKind::AllocationFailure`] if the table cannot be allocated.
    pub fn build(self) -> Result<Sieve, Error> {
        if self.bound > MAX_BOUND {
            return Err(Error::new(ErrorKind::ConfigInvalid, "bound is too large")
                .with_context("bound", self.bound)
                .with_context("max_bound", MAX_BOUND));
        }
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "load factor must be in (0.0, 1.0]",
            )
            .with_context("load_factor", self.load_factor));
        }

        let sqrt_limit = self.bound.saturating_sub(1).isqrt();
        let tracked_primes = prime_count_upper_bound(sqrt_limit);
        let table = CompositeTable::new(capacity_hint(tracked_primes, self.load_factor))?;
        debug!(
            bound = self.bound,
            sqrt_limit,
            tracked_primes,
            capacity = table.capacity(),
            "sized composite table"
        );

        let stats = SieveStats {
            bound: self.bound,
            table_capacity: table.capacity(),
            ..SieveStats::default()
        };
        Ok(Sieve {
            table,
            bound: self.bound,
            sqrt_limit,
            candidate: 3,
            state: State::Start,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_limit_excludes_square_of_bound() {
        assert_eq!(Sieve::new(0).unwrap().sqrt_limit(), 0);
        assert_eq!(Sieve::new(9).unwrap().sqrt_limit(), 2);
        assert_eq!(Sieve::new(10).unwrap().sqrt_limit(), 3);
        assert_eq!(Sieve::new(1_000_000_000).unwrap().sqrt_limit(), 31_622);
    }

    #[test]
    fn test_table_tracks_one_entry_per_small_prime() {
        let mut sieve = Sieve::new(100).unwrap();
        // Stop right after 11 was produced: 3, 5 and 7 have squares below 100.
        while sieve.try_next().unwrap() != Some(11) {}
        let mut values = sieve.table().iter().map(|(_, p)| p).collect::<Vec<_>>();
        values.sort_unstable();
        assert_eq!(values, vec![3, 5, 7]);
        for (composite, prime) in sieve.table().iter() {
            assert!(composite > 11);
            assert_eq!(composite % prime, 0);
            assert_eq!(composite % 2, 1);
        }
    }

    #[test]
    fn test_fused_after_completion() {
        let mut sieve = Sieve::new(3).unwrap();
        assert_eq!(sieve.try_next().unwrap(), Some(2));
        assert_eq!(sieve.try_next().unwrap(), None);
        assert_eq!(sieve.try_next().unwrap(), None);
        assert_eq!(sieve.state, State::Done);
    }

    #[test]
    fn test_collisions_are_skipped() {
        let mut sieve = Sieve::new(100).unwrap();
        while sieve.try_next().unwrap().is_some() {}
        let stats = sieve.stats();
        // At 39 the next multiple of 3 is 45, which 5 already tracks.
        assert!(stats.collisions_skipped > 0);
        assert_eq!(stats.primes_emitted, 25);
        assert_eq!(stats.peak_occupancy, 3);
    }
}
