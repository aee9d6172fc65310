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

//! Shared CDL fixtures and test utilities.
//!
//! This crate provides canonical CDL documents, invalid samples with the
//! error kind each must raise, a fluent source builder and counting
//! helpers, so the parser, writer, JSON and CLI crates test against the
//! same inputs.
//!
//! # Quick Start
//!
//! ```rust
//! use cdl_test::{count_values, fixtures, SourceBuilder};
//!
//! // Parse every canonical fixture
//! for fixture in fixtures::all() {
//!     let ds = fixture.parse().unwrap();
//!     assert_eq!(ds.variant, fixture.variant);
//! }
//!
//! // Build a document on the fly
//! let src = SourceBuilder::new("demo")
//!     .dimension("x", 3)
//!     .variable("int", "v", &["x"])
//!     .data("v", "1, 2, 3")
//!     .build();
//! let ds = cdl_core::parse(&src, &Default::default()).unwrap();
//! assert_eq!(count_values(&ds), 3);
//! ```

/// Canonical CDL fixtures.
pub mod fixtures;

/// Counting helpers for parsed datasets.
pub mod counts;

pub use counts::{count_attributes, count_values, count_variables};
pub use fixtures::builders::SourceBuilder;
pub use fixtures::Fixture;

/// Type alias for a list of fixtures.
pub type FixtureList = Vec<Fixture>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fixtures_parse() {
        for fixture in fixtures::all() {
            let ds = fixture
                .parse()
                .unwrap_or_else(|e| panic!("fixture {} failed: {}", fixture.name, e));
            assert_eq!(ds.variant, fixture.variant, "fixture {}", fixture.name);
        }
    }

    #[test]
    fn test_fixture_names_unique() {
        let mut names: Vec<_> = fixtures::all().iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), fixtures::all().len());
    }

    #[test]
    fn test_basics_counts() {
        let ds = fixtures::basics().parse().unwrap();
        assert_eq!(count_variables(&ds), 2);
        assert_eq!(count_attributes(&ds), 6);
        assert_eq!(count_values(&ds), 7);
    }
}
