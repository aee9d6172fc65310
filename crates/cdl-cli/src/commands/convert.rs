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

//! Conversion commands - JSON rendering and sink operation streams

use super::{load, read_file, write_output, ParseSettings};
use crate::error::CliError;
use cdl_core::parse_into;
use cdl_json::{JsonLinesSink, ToJsonConfig};
use std::io::{self, BufWriter};

/// Convert a CDL file to JSON.
///
/// # Arguments
///
/// * `file` - Path to the CDL file
/// * `output` - Optional output file path. If `None`, writes to stdout
/// * `compact` - Single-line JSON instead of pretty printing
/// * `include_data` - Include variable data
pub fn to_json(
    file: &str,
    output: Option<&str>,
    compact: bool,
    include_data: bool,
    settings: &ParseSettings,
) -> Result<(), CliError> {
    let (_, ds) = load(file, settings)?;
    let config = ToJsonConfig {
        compact,
        include_data,
    };
    let mut json = cdl_json::to_json(&ds, &config)?;
    json.push('\n');
    write_output(&json, output)
}

/// Stream the sink operations a CDL file produces as JSON lines.
///
/// Lines are written to stdout while the file compiles; on a compile
/// error the lines for everything before it have already been written.
pub fn ops(file: &str, settings: &ParseSettings) -> Result<(), CliError> {
    let options = settings.options()?;
    let content = read_file(file)?;

    let stdout = io::stdout();
    let mut sink = JsonLinesSink::new(BufWriter::new(stdout.lock()));
    let result = parse_into(&content, &options, &mut sink);
    let lines = sink.lines_written();
    // Flush whatever was emitted before a failure.
    sink.into_inner()
        .into_inner()
        .map_err(|e| CliError::io_error("<stdout>", e.into_error()))?;

    result.map_err(|e| CliError::compile(file, &e))?;
    tracing::debug!(lines, "operations streamed");
    Ok(())
}
