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

//! Security limits for CDL parsing.

/// Configurable limits for parser security.
///
/// These limits protect against denial-of-service attacks and memory exhaustion
/// by bounding the resources consumed during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input size in bytes (default: 1GB).
    pub max_input_size: usize,
    /// Maximum group nesting depth (default: 64).
    pub max_group_depth: usize,
    /// Maximum number of values in a single value list (default: 100M).
    ///
    /// Applies to attribute value lists and to the laid-out extent of a
    /// data assignment, counted after char strings are padded out to their
    /// row length.
    pub max_list_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1GB
            max_group_depth: 64,
            max_list_length: 100_000_000, // 100M
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_input_size: usize::MAX,
            max_group_depth: usize::MAX,
            max_list_length: usize::MAX,
        }
    }
}
