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

//! Builder pattern for CDL source text.
//!
//! Sections are emitted in grammar order regardless of the order the
//! builder methods are called in.

/// Fluent builder for CDL documents.
///
/// # Examples
///
/// ```
/// use cdl_test::SourceBuilder;
///
/// let src = SourceBuilder::new("demo")
///     .unlimited("t")
///     .variable("float", "v", &["t"])
///     .attribute("v", "units", "\"K\"")
///     .global("title", "\"demo\"")
///     .data("v", "1, 2")
///     .build();
/// assert!(src.starts_with("netcdf demo {"));
/// assert!(src.contains("v:units = \"K\" ;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    name: String,
    dimensions: Vec<String>,
    declarations: Vec<String>,
    data: Vec<String>,
}

impl SourceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fixed-size dimension.
    pub fn dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.push(format!("{} = {}", name, len));
        self
    }

    /// Unlimited dimension.
    pub fn unlimited(mut self, name: &str) -> Self {
        self.dimensions.push(format!("{} = UNLIMITED", name));
        self
    }

    /// Variable of CDL type `kind` over `dims` (empty for a scalar).
    pub fn variable(mut self, kind: &str, name: &str, dims: &[&str]) -> Self {
        let decl = if dims.is_empty() {
            format!("{} {}", kind, name)
        } else {
            format!("{} {}({})", kind, name, dims.join(", "))
        };
        self.declarations.push(decl);
        self
    }

    /// Variable attribute; `values` is CDL constant text.
    pub fn attribute(mut self, variable: &str, name: &str, values: &str) -> Self {
        self.declarations
            .push(format!("{}:{} = {}", variable, name, values));
        self
    }

    /// Global attribute; `values` is CDL constant text.
    pub fn global(mut self, name: &str, values: &str) -> Self {
        self.declarations.push(format!(":{} = {}", name, values));
        self
    }

    /// Data assignment; `values` is CDL constant text.
    pub fn data(mut self, variable: &str, values: &str) -> Self {
        self.data.push(format!("{} = {}", variable, values));
        self
    }

    pub fn build(self) -> String {
        let mut out = format!("netcdf {} {{\n", self.name);
        let sections = [
            ("dimensions", &self.dimensions),
            ("variables", &self.declarations),
            ("data", &self.data),
        ];
        for (header, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            out.push_str(header);
            out.push_str(":\n");
            for line in lines {
                out.push_str("    ");
                out.push_str(line);
                out.push_str(" ;\n");
            }
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        assert_eq!(SourceBuilder::new("e").build(), "netcdf e {\n}\n");
    }

    #[test]
    fn test_sections_in_grammar_order() {
        let src = SourceBuilder::new("o")
            .data("v", "1")
            .variable("int", "v", &[])
            .dimension("x", 1)
            .build();
        let dims = src.find("dimensions:").unwrap();
        let vars = src.find("variables:").unwrap();
        let data = src.find("data:").unwrap();
        assert!(dims < vars && vars < data);
    }
}
