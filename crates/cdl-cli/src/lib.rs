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

//! `cdlc`, the CDL command-line tool.
//!
//! # Commands
//!
//! - **validate**: compile a CDL file and report the first error or a summary
//! - **inspect**: print the group tree with dimensions, variables and attributes
//! - **format**: write the canonical form, or `--check` that a file is canonical
//! - **to-json**: render the dataset as JSON
//! - **ops**: stream the dataset operations as JSON lines
//!
//! Every command accepts `--variant`, repeated `--fill KIND=VALUE` and
//! `--no-groups`. `-v` raises the log level; `RUST_LOG` overrides it.
//!
//! # Examples
//!
//! ```no_run
//! use cdl_cli::commands::{to_json, validate, ParseSettings};
//!
//! # fn main() -> Result<(), cdl_cli::error::CliError> {
//! validate("example.cdl", &ParseSettings::default())?;
//! to_json("example.cdl", Some("example.json"), false, true, &ParseSettings::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! Input files larger than 1 GB are rejected before they are read
//! (configurable via `CDLC_MAX_FILE_SIZE`).

pub mod cli;
pub mod commands;
pub mod error;
