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

//! Compiler front-end for the netCDF Common Data Language (CDL).
//!
//! This crate turns CDL text into a [`Dataset`]: named dimensions, typed
//! variables, attributes and data values, optionally arranged in nested
//! groups. Three format variants are supported and selected up front:
//!
//! - [`FormatVariant::Classic`]: the six classic types, no groups.
//! - [`FormatVariant::Classic64`]: adds unsigned and 64-bit integers.
//! - [`FormatVariant::Hierarchical`]: adds `string` and `group:` blocks.
//!
//! # Pipeline
//!
//! - [`lex`] produces tokens with 1-based source positions.
//! - The parser recognises declarations and dispatches each one to the
//!   variant's [`grammar::ProductionTable`].
//! - [`literal`] evaluates constants against their target kind.
//! - [`builder::DatasetBuilder`] maintains the scope stack, enforces
//!   shapes and forwards every operation to a [`DatasetSink`].
//!
//! # Examples
//!
//! ```
//! use cdl_core::{parse, FormatVariant, ParseOptions, TypeKind, Value};
//!
//! let src = r#"
//! netcdf example {
//! dimensions:
//!     n = 5 ;
//! variables:
//!     ushort v(n) ;
//! data:
//!     v = 0x3456, _, 65535US, 65530US, _ ;
//! }
//! "#;
//!
//! let opts = ParseOptions::builder()
//!     .variant(FormatVariant::Classic64)
//!     .fill_value(TypeKind::UShort, Value::UShort(65534))
//!     .build();
//! let ds = parse(src, &opts).unwrap();
//! let data = ds.root().variable("v").unwrap().data.clone().unwrap();
//! assert_eq!(data[1], Value::UShort(65534));
//! ```

pub mod builder;
mod dataset;
mod error;
pub mod grammar;
pub mod lex;
mod limits;
pub mod literal;
mod parser;
pub mod sink;
mod types;
mod value;

/// Name of the per-variable attribute that overrides its fill value.
pub use builder::FILL_VALUE_ATTRIBUTE;
pub use dataset::{
    upsert_attribute, Attribute, Dataset, DimRef, Dimension, DimensionSize, Group, GroupId,
    Variable,
};
pub use error::{CdlError, CdlErrorKind, CdlResult};
pub use limits::Limits;
/// Entry points: [`parse`] builds a [`Dataset`], [`parse_into`] also
/// streams every declaration to a [`DatasetSink`].
pub use parser::{parse, parse_into, ParseOptions, ParseOptionsBuilder};
pub use sink::{replay, AttributeOwner, DatasetSink, NullSink, RecordingSink, SinkError, SinkOp};
pub use types::{FormatVariant, NumericRange, TypeKind, TypeRegistry};
/// Values and the helpers that move char data between bytes, text and
/// [`Value::Char`] lists.
pub use value::{bytes_of, chars_of, text_of, Value};
