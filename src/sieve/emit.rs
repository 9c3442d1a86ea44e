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

use std::io;
use std::io::Write;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::sieve::Sieve;

/// Write the remaining primes of `sieve` to `writer` as ASCII decimals separated by single
/// spaces, with no trailing separator or newline. Returns the number of primes written.
///
/// The writer is flushed before returning. Callers writing to a terminal or file should wrap
/// it in a [`io::BufWriter`].
pub fn write_primes<W: Write>(sieve: &mut Sieve, mut writer: W) -> Result<u64, Error> {
    let mut written = 0u64;
    for prime in sieve {
        let prime = prime?;
        let res = if written == 0 {
            write!(writer, "{prime}")
        } else {
            write!(writer, " {prime}")
        };
        res.map_err(|err| output_failed(err, written))?;
        written += 1;
    }
    writer.flush().map_err(|err| output_failed(err, written))?;
    Ok(written)
}

/// Collect every prime below `bound` in increasing order.
///
/// # Examples
///
/// ```
/// # use hashsieve::sieve::primes_below;
/// assert_eq!(primes_below(12).unwrap(), vec![2, 3, 5, 7, 11]);
/// assert!(primes_below(2).unwrap().is_empty());
/// ```
pub fn primes_below(bound: u64) -> Result<Vec<u64>, Error> {
    Sieve::new(bound)?.collect()
}

/// Count the primes below `bound`.
pub fn count_primes_below(bound: u64) -> Result<u64, Error> {
    let mut sieve = Sieve::new(bound)?;
    while sieve.try_next()?.is_some() {}
    Ok(sieve.stats().primes_emitted)
}

fn output_failed(err: io::Error, written: u64) -> Error {
    Error::new(ErrorKind::OutputFailed, "failed to write primes")
        .with_context("written", written)
        .set_source(err)
}
