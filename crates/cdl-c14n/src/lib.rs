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

//! Canonical CDL output.
//!
//! Writes a [`Dataset`] back to CDL text in the layout `ncdump` uses:
//! sections in grammar order, four-space indentation, one declaration per
//! line and long value lists wrapped. The output is deterministic and
//! re-parses to an equal dataset under the same [`ParseOptions`].
//!
//! - Attribute kinds survive through constant suffixes (`1s`, `2.5f`,
//!   `7ULL`); `string` attributes use a typed declaration.
//! - Names that need it are backslash-escaped; names no identifier can
//!   carry (such as `a/b`) are reported as errors instead of being
//!   written incorrectly.
//! - Data values equal to a declared `_FillValue` are written as `_`.
//!
//! # Examples
//!
//! ```
//! use cdl_c14n::{canonicalize, canonicalize_with_config, CanonicalConfig};
//! use cdl_core::{parse, ParseOptions};
//!
//! let ds = parse(
//!     "netcdf t { dimensions: n=2; variables: short v(n); v:scale=0.5f; data: v=1,2; }",
//!     &ParseOptions::default(),
//! )?;
//! let text = canonicalize(&ds)?;
//! assert!(text.contains("v:scale = 0.5f ;"));
//! assert_eq!(parse(&text, &ParseOptions::default())?, ds);
//!
//! let config = CanonicalConfig::new().with_data(false);
//! assert!(!canonicalize_with_config(&ds, &config)?.contains("data:"));
//! # Ok::<(), cdl_core::CdlError>(())
//! ```

mod config;
mod writer;

pub use config::{CanonicalConfig, CanonicalConfigBuilder};
pub use writer::{escape_identifier, CanonicalWriter};

use cdl_core::{parse, CdlResult, Dataset, ParseOptions};

/// Canonicalize a dataset with the default configuration.
///
/// # Errors
///
/// Returns a `Syntax` error when a dataset, group, dimension, variable or
/// attribute name cannot be expressed as a CDL identifier.
pub fn canonicalize(ds: &Dataset) -> CdlResult<String> {
    canonicalize_with_config(ds, &CanonicalConfig::default())
}

/// Canonicalize a dataset with custom configuration.
pub fn canonicalize_with_config(ds: &Dataset, config: &CanonicalConfig) -> CdlResult<String> {
    let mut writer = CanonicalWriter::new(config.clone());
    writer.write_dataset(ds)
}

/// Parse CDL text and write it back in canonical form.
///
/// Running this on its own output is a no-op.
pub fn format_source(
    input: &str,
    options: &ParseOptions,
    config: &CanonicalConfig,
) -> CdlResult<String> {
    let ds = parse(input, options)?;
    canonicalize_with_config(&ds, config)
}
