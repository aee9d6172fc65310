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

//! Canonicalization configuration.
//!
//! This module defines the options controlling canonical CDL layout.

/// Configuration for canonical output format.
///
/// # Examples
///
/// ```
/// use cdl_c14n::CanonicalConfig;
///
/// let config = CanonicalConfig::default();
/// assert_eq!(config.indent_width, 4);
/// assert!(config.include_data);
///
/// let compact = CanonicalConfig::new()
///     .with_values_per_line(0)
///     .with_fill_placeholders(false);
/// assert_eq!(compact.values_per_line, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CanonicalConfig {
    /// Spaces per indentation level.
    ///
    /// Default: `4`
    pub indent_width: usize,

    /// Values written per line in data and attribute lists; `0` keeps each
    /// list on one line.
    ///
    /// Default: `8`
    pub values_per_line: usize,

    /// Emit the `data:` section.
    ///
    /// Default: `true`
    pub include_data: bool,

    /// Write `_` for data values equal to the variable's declared
    /// `_FillValue`.
    ///
    /// Values equal only to a kind's default fill are always written
    /// literally, so the output does not depend on fill overrides.
    ///
    /// Default: `true`
    pub fill_placeholders: bool,

    /// Declare attribute kinds explicitly (`short v:a = 1 ;`) where the
    /// format variant allows it, instead of suffixing constants
    /// (`v:a = 1s ;`). `string` attributes are always declared.
    ///
    /// Default: `false`
    pub typed_attributes: bool,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            values_per_line: 8,
            include_data: true,
            fill_placeholders: true,
            typed_attributes: false,
        }
    }
}

impl CanonicalConfig {
    /// Create a new configuration with all default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing a `CanonicalConfig`.
    pub fn builder() -> CanonicalConfigBuilder {
        CanonicalConfigBuilder::new()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_values_per_line(mut self, n: usize) -> Self {
        self.values_per_line = n;
        self
    }

    pub fn with_data(mut self, include: bool) -> Self {
        self.include_data = include;
        self
    }

    pub fn with_fill_placeholders(mut self, enabled: bool) -> Self {
        self.fill_placeholders = enabled;
        self
    }

    pub fn with_typed_attributes(mut self, enabled: bool) -> Self {
        self.typed_attributes = enabled;
        self
    }
}

/// Builder for constructing a `CanonicalConfig` with a chainable API.
///
/// # Examples
///
/// ```
/// use cdl_c14n::CanonicalConfig;
///
/// let config = CanonicalConfig::builder()
///     .indent_width(2)
///     .typed_attributes(true)
///     .build();
/// assert_eq!(config.indent_width, 2);
/// assert!(config.typed_attributes);
///
/// assert_eq!(CanonicalConfig::builder().build(), CanonicalConfig::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CanonicalConfigBuilder {
    config: CanonicalConfig,
}

impl CanonicalConfigBuilder {
    /// Create a new builder with default configuration values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.config.indent_width = width;
        self
    }

    pub fn values_per_line(mut self, n: usize) -> Self {
        self.config.values_per_line = n;
        self
    }

    pub fn include_data(mut self, include: bool) -> Self {
        self.config.include_data = include;
        self
    }

    pub fn fill_placeholders(mut self, enabled: bool) -> Self {
        self.config.fill_placeholders = enabled;
        self
    }

    pub fn typed_attributes(mut self, enabled: bool) -> Self {
        self.config.typed_attributes = enabled;
        self
    }

    pub fn build(self) -> CanonicalConfig {
        self.config
    }
}
