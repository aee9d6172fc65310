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

//! Canonical CDL fixtures.
//!
//! - **documents**: valid CDL covering each format variant
//! - **errors**: invalid CDL paired with the error kind it must raise
//! - **builders**: fluent construction of CDL source text

pub mod builders;
mod documents;
pub mod errors;

pub use documents::*;

use cdl_core::{parse, CdlResult, Dataset, FormatVariant, ParseOptions, TypeKind, Value};

/// A named CDL document and the options it is meant to be parsed with.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: &'static str,
    pub variant: FormatVariant,
    pub source: &'static str,
    /// Default fill overrides the fixture expects.
    pub fill_overrides: Vec<(TypeKind, Value)>,
}

impl Fixture {
    pub fn new(name: &'static str, variant: FormatVariant, source: &'static str) -> Self {
        Self {
            name,
            variant,
            source,
            fill_overrides: Vec::new(),
        }
    }

    pub fn with_fill(mut self, kind: TypeKind, value: Value) -> Self {
        self.fill_overrides.push((kind, value));
        self
    }

    /// Parse options matching the fixture.
    pub fn options(&self) -> ParseOptions {
        self.fill_overrides
            .iter()
            .fold(
                ParseOptions::builder().variant(self.variant),
                |b, (kind, value)| b.fill_value(*kind, value.clone()),
            )
            .build()
    }

    pub fn parse(&self) -> CdlResult<Dataset> {
        parse(self.source, &self.options())
    }
}

/// Returns every valid fixture.
///
/// Useful for running the same test across all fixtures.
pub fn all() -> Vec<Fixture> {
    vec![
        empty(),
        basics(),
        fill_values(),
        charvars(),
        escapes(),
        cdf5_constants(),
        ushort_fill(),
        strings(),
        groups(),
    ]
}
