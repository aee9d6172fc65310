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

//! CDL JSON Conversion
//!
//! Renders parsed netCDF datasets as JSON.
//!
//! # Features
//!
//! - **Dataset view**: groups, dimensions, variables, attributes and data as
//!   a nested JSON document ([`to_json`], [`to_json_value`])
//! - **Model dump**: the dataset model serialized field for field through
//!   its `serde` implementation ([`to_json_model`])
//! - **JSON lines**: a [`streaming::JsonLinesSink`] that writes one line per
//!   sink operation while the parser runs
//!
//! # Examples
//!
//! ```rust
//! use cdl_core::{parse, ParseOptions};
//! use cdl_json::dataset_to_json;
//!
//! let ds = parse(
//!     "netcdf d { dimensions: n = 2 ; variables: int v(n) ; data: v = 1, 2 ; }",
//!     &ParseOptions::default(),
//! ).unwrap();
//! let json: serde_json::Value = serde_json::from_str(&dataset_to_json(&ds).unwrap()).unwrap();
//! assert_eq!(json["root"]["variables"][0]["data"], serde_json::json!([1, 2]));
//! ```

mod to_json;
pub mod streaming;

pub use streaming::JsonLinesSink;
pub use to_json::{to_json, to_json_value, value_to_json, values_to_json, ToJsonConfig};

use cdl_core::Dataset;
use thiserror::Error;

/// Errors from JSON conversion.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convert a dataset to pretty-printed JSON with default settings
pub fn dataset_to_json(ds: &Dataset) -> Result<String, JsonError> {
    Ok(to_json(ds, &ToJsonConfig::default())?)
}

/// Serialize the dataset model itself, including the group arena.
///
/// Non-finite floats become `null`.
pub fn to_json_model(ds: &Dataset) -> Result<String, JsonError> {
    Ok(serde_json::to_string(ds)?)
}
