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

//! Print every prime below a bound to stdout.
//!
//! With no arguments the primes below one billion are written as a single line of
//! space-separated decimals.

use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use hashsieve::error::Error;
use hashsieve::error::ErrorKind;
use hashsieve::sieve::DEFAULT_BOUND;
use hashsieve::sieve::DEFAULT_LOAD_FACTOR;
use hashsieve::sieve::Sieve;
use hashsieve::sieve::write_primes;
use tracing::Level;
use tracing::error;
use tracing::info;

/// Enumerate primes with a sparse composite table.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Exclusive upper bound of the enumerated primes.
    #[arg(long, default_value_t = DEFAULT_BOUND)]
    bound: u64,

    /// Maximum load of the composite table, in (0.0, 1.0].
    #[arg(long, default_value_t = DEFAULT_LOAD_FACTOR)]
    load_factor: f64,

    /// Print only the number of primes.
    #[arg(long)]
    count: bool,

    /// Log sizing and statistics to stderr. Repeat for per-collision tracing.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("hashsieve: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &CliArgs) -> Result<(), Error> {
    let mut sieve = Sieve::builder()
        .bound(args.bound)
        .load_factor(args.load_factor)
        .build()?;

    let mut stdout = io::stdout().lock();
    if args.count {
        while sieve.try_next()?.is_some() {}
        writeln!(stdout, "{}", sieve.stats().primes_emitted).map_err(|err| {
            Error::new(ErrorKind::OutputFailed, "failed to write prime count").set_source(err)
        })?;
    } else {
        write_primes(&mut sieve, BufWriter::new(stdout))?;
    }

    let stats = sieve.stats();
    info!(
        bound = stats.bound,
        primes = stats.primes_emitted,
        table_capacity = stats.table_capacity,
        peak_occupancy = stats.peak_occupancy,
        "done"
    );
    Ok(())
}
