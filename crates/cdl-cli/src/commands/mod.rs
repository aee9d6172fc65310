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

//! CLI command implementations

mod convert;
mod format;
mod inspect;
mod validate;

pub use convert::{ops, to_json};
pub use format::format;
pub use inspect::inspect;
pub use validate::validate;

use crate::error::CliError;
use clap::Args;
use cdl_core::lex::{parse_numeric, SourcePos};
use cdl_core::literal::{evaluate, Evaluated, Literal};
use cdl_core::{parse, Dataset, FormatVariant, ParseOptions, TypeKind, Value};
use std::fs;
use std::io::{self, Write};
use tracing::debug;

/// Default maximum file size to prevent OOM attacks (1 GB)
/// Can be overridden via CDLC_MAX_FILE_SIZE environment variable
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Parser settings shared by every command that reads CDL.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseSettings {
    /// Format variant: classic, cdf5 or netcdf4
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<String>,

    /// Override the default fill value of a type (repeatable)
    #[arg(long = "fill", value_name = "KIND=VALUE")]
    pub fills: Vec<String>,

    /// Reject nested groups even in the netcdf4 variant
    #[arg(long)]
    pub no_groups: bool,
}

impl ParseSettings {
    /// Build parser options from the command-line spelling.
    pub fn options(&self) -> Result<ParseOptions, CliError> {
        let variant = match &self.variant {
            Some(v) => v.parse::<FormatVariant>().map_err(CliError::invalid_input)?,
            None => FormatVariant::default(),
        };
        let mut builder = ParseOptions::builder()
            .variant(variant)
            .allow_groups(!self.no_groups);
        for spec in &self.fills {
            let (kind, value) = parse_fill(spec)?;
            builder = builder.fill_value(kind, value);
        }
        Ok(builder.build())
    }
}

/// Parse a `KIND=VALUE` default fill override.
///
/// Numeric values take any CDL constant spelling (`0xFFFE`, `65534US`,
/// `-1.5e3`); `char` takes a single character and `string` any text.
pub fn parse_fill(spec: &str) -> Result<(TypeKind, Value), CliError> {
    let (kind, text) = spec
        .split_once('=')
        .ok_or_else(|| CliError::invalid_input(format!("fill '{}' is not KIND=VALUE", spec)))?;
    let kind: TypeKind = kind.trim().parse().map_err(CliError::invalid_input)?;
    let text = text.trim();
    let value = match kind {
        TypeKind::String => Value::Str(text.to_string()),
        TypeKind::Char => match text.as_bytes() {
            [b] => Value::Char(*b),
            _ => {
                return Err(CliError::invalid_input(format!(
                    "char fill '{}' must be a single byte",
                    text
                )))
            }
        },
        _ => {
            let literal = parse_numeric(text).map_err(|e| {
                CliError::invalid_input(format!("fill value '{}' for {}: {}", text, kind, e))
            })?;
            match evaluate(&Literal::Numeric(literal), kind, SourcePos::default()) {
                Ok(Evaluated::Value(v)) => v,
                Ok(_) => {
                    return Err(CliError::invalid_input(format!(
                        "fill value '{}' is not a {} constant",
                        text, kind
                    )))
                }
                Err(e) => {
                    return Err(CliError::invalid_input(format!(
                        "fill value '{}' for {}: {}",
                        text, kind, e.message
                    )))
                }
            }
        }
    };
    Ok((kind, value))
}

/// Read and compile a CDL file.
pub fn load(file: &str, settings: &ParseSettings) -> Result<(String, Dataset), CliError> {
    let options = settings.options()?;
    let content = read_file(file)?;
    let ds = parse(&content, &options).map_err(|e| CliError::compile(file, &e))?;
    Ok((content, ds))
}

/// Get the maximum file size from environment or use default.
fn get_max_file_size() -> u64 {
    std::env::var("CDLC_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a file from disk with size validation.
///
/// Files larger than the configured maximum are rejected before any
/// memory is allocated for them.
///
/// # Errors
///
/// Returns `Err` if:
/// - The file metadata cannot be accessed
/// - The file size exceeds the maximum allowed size (configurable via `CDLC_MAX_FILE_SIZE`)
/// - The file cannot be read or is not valid UTF-8
pub fn read_file(path: &str) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    debug!(path, bytes = metadata.len(), "reading input");
    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Write content to a file or stdout.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fill_numeric_spellings() {
        assert_eq!(parse_fill("ushort=65534").unwrap(), (TypeKind::UShort, Value::UShort(65534)));
        assert_eq!(parse_fill("ushort=0xFFFE").unwrap().1, Value::UShort(65534));
        assert_eq!(parse_fill("UShort = 65534US").unwrap().1, Value::UShort(65534));
        assert_eq!(parse_fill("double=-1.5e3").unwrap().1, Value::Double(-1500.0));
    }

    #[test]
    fn test_parse_fill_text_kinds() {
        assert_eq!(parse_fill("char=x").unwrap().1, Value::Char(b'x'));
        assert_eq!(parse_fill("string=n/a").unwrap().1, Value::Str("n/a".to_string()));
        assert!(parse_fill("char=xy").is_err());
        assert!(parse_fill("char=é").is_err());
    }

    #[test]
    fn test_parse_fill_rejects_bad_input() {
        assert!(parse_fill("ushort").is_err());
        assert!(parse_fill("quad=1").is_err());
        assert!(parse_fill("ubyte=256").is_err());
        assert!(parse_fill("int=abc").is_err());
    }

    #[test]
    fn test_settings_options() {
        let settings = ParseSettings {
            variant: Some("cdf5".to_string()),
            fills: vec!["ushort=1".to_string()],
            no_groups: true,
        };
        let options = settings.options().unwrap();
        assert_eq!(options.variant, FormatVariant::Classic64);
        assert!(!options.allow_groups);
        assert_eq!(options.fill_overrides.get(&TypeKind::UShort), Some(&Value::UShort(1)));
    }

    #[test]
    fn test_unknown_variant() {
        let settings = ParseSettings {
            variant: Some("hdf9".to_string()),
            ..ParseSettings::default()
        };
        assert!(matches!(settings.options(), Err(CliError::InvalidInput(_))));
    }
}
