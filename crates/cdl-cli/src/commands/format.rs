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

//! Format command - canonical CDL output

use super::{load, write_output, ParseSettings};
use crate::error::CliError;
use cdl_c14n::{canonicalize_with_config, CanonicalConfig};

/// Format a CDL file to canonical form.
///
/// With `check`, nothing is written: the command fails with
/// [`CliError::NotCanonical`] unless the file already matches its
/// canonical form (line endings aside).
///
/// # Examples
///
/// ```no_run
/// use cdl_cli::commands::{format, ParseSettings};
///
/// # fn main() -> Result<(), cdl_cli::error::CliError> {
/// // Format to stdout
/// format("input.cdl", None, false, &ParseSettings::default())?;
///
/// // Check if file is already canonical
/// if format("input.cdl", None, true, &ParseSettings::default()).is_ok() {
///     println!("File is already canonical");
/// }
/// # Ok(())
/// # }
/// ```
pub fn format(
    file: &str,
    output: Option<&str>,
    check: bool,
    settings: &ParseSettings,
) -> Result<(), CliError> {
    let (content, ds) = load(file, settings)?;

    let canonical = canonicalize_with_config(&ds, &CanonicalConfig::default())
        .map_err(|e| CliError::canonicalization(e.message))?;

    if check {
        let normalized_original = content.replace("\r\n", "\n");
        if canonical != normalized_original {
            return Err(CliError::NotCanonical(file.into()));
        }
        println!("File is in canonical form");
        Ok(())
    } else {
        write_output(&canonical, output)
    }
}
