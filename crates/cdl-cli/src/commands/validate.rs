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

//! Validate command - CDL syntax and semantic validation

use super::{read_file, ParseSettings};
use crate::error::CliError;
use colored::Colorize;
use cdl_core::parse;

/// Validate a CDL file.
///
/// Compiles the file with the given settings and prints a summary of what
/// it declares. Nothing is written anywhere else.
///
/// # Errors
///
/// Returns `Err` if the settings are invalid, the file cannot be read, or
/// the compiler rejects the document. The error carries the line and
/// column of the first problem.
///
/// # Examples
///
/// ```no_run
/// use cdl_cli::commands::{validate, ParseSettings};
///
/// # fn main() -> Result<(), cdl_cli::error::CliError> {
/// validate("example.cdl", &ParseSettings::default())?;
///
/// let cdf5 = ParseSettings {
///     variant: Some("cdf5".to_string()),
///     fills: vec!["ushort=65534".to_string()],
///     no_groups: false,
/// };
/// validate("unsigned.cdl", &cdf5)?;
/// # Ok(())
/// # }
/// ```
pub fn validate(file: &str, settings: &ParseSettings) -> Result<(), CliError> {
    let options = settings.options()?;
    let content = read_file(file)?;

    match parse(&content, &options) {
        Ok(ds) => {
            let groups: Vec<_> = ds.walk().into_iter().map(|id| ds.group(id)).collect();
            let dimensions: usize = groups.iter().map(|g| g.dimensions.len()).sum();
            let variables: usize = groups.iter().map(|g| g.variables.len()).sum();
            let attributes: usize = groups
                .iter()
                .map(|g| {
                    g.attributes.len()
                        + g.variables.iter().map(|v| v.attributes.len()).sum::<usize>()
                })
                .sum();

            println!("{} {}", "✓".green().bold(), file);
            println!("  Dataset: {}", ds.name);
            println!("  Variant: {}", ds.variant);
            println!("  Groups: {}", groups.len());
            println!("  Dimensions: {}", dimensions);
            println!("  Variables: {}", variables);
            println!("  Attributes: {}", attributes);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), file);
            Err(CliError::compile(file, &e))
        }
    }
}
