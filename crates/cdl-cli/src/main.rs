// Dweve CDL - netCDF Common Data Language compiler
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CDL Command Line Interface

use cdl_cli::cli::Commands;
use clap::{ArgAction, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// cdlc - netCDF CDL compiler
///
/// # Examples
///
/// ```bash
/// # Validate a CDL file
/// cdlc validate example.cdl
///
/// # Validate with the CDF-5 type set and a custom ushort fill
/// cdlc validate example.cdl --variant cdf5 --fill ushort=65534
///
/// # Canonical form
/// cdlc format example.cdl --output formatted.cdl
///
/// # Convert to JSON
/// cdlc to-json example.cdl --compact
/// ```
#[derive(Parser)]
#[command(name = "cdlc")]
#[command(author, version, about = "cdlc - netCDF CDL compiler", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cdl_core=warn")),
        1 => EnvFilter::new("cdl_core=debug,cdl_cli=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
