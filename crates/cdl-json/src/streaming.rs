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

//! Streaming JSON-lines output of sink operations
//!
//! [`JsonLinesSink`] writes one compact JSON object per dataset operation,
//! newline-terminated, as the parser emits it. Nothing is buffered beyond
//! the writer itself, so the output grows with the document instead of
//! waiting for the parse to finish.
//!
//! # Examples
//!
//! ```rust
//! use cdl_core::{parse_into, ParseOptions};
//! use cdl_json::streaming::JsonLinesSink;
//!
//! let mut sink = JsonLinesSink::new(Vec::new());
//! parse_into("netcdf d { dimensions: n = 2 ; }", &ParseOptions::default(), &mut sink).unwrap();
//! assert_eq!(sink.lines_written(), 3);
//!
//! let out = String::from_utf8(sink.into_inner()).unwrap();
//! let first = out.lines().next().unwrap();
//! assert_eq!(first, r#"{"name":"d","op":"begin_dataset","variant":"classic"}"#);
//! ```

use crate::to_json::values_to_json;
use cdl_core::{AttributeOwner, DatasetSink, FormatVariant, SinkError, TypeKind, Value};
use serde_json::{json, Value as JsonValue};
use std::io::Write;

/// Dataset sink that writes each operation as a JSON line.
///
/// Objects carry an `"op"` field naming the operation
/// (`begin_dataset`, `create_dimension`, `create_variable`,
/// `set_attribute`, `write_values`, `begin_group`, `end_group`,
/// `finalize`) plus its arguments.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a new sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of operations written so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: JsonValue) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &value).map_err(std::io::Error::from)?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> DatasetSink for JsonLinesSink<W> {
    fn begin_dataset(&mut self, name: &str, variant: FormatVariant) -> Result<(), SinkError> {
        self.emit(json!({ "op": "begin_dataset", "name": name, "variant": variant.as_str() }))
    }

    fn create_dimension(&mut self, name: &str, len: Option<usize>) -> Result<(), SinkError> {
        self.emit(json!({ "op": "create_dimension", "name": name, "length": len }))
    }

    fn create_variable(&mut self, name: &str, kind: TypeKind, dims: &[String]) -> Result<(), SinkError> {
        self.emit(json!({
            "op": "create_variable",
            "name": name,
            "type": kind.to_string(),
            "dimensions": dims,
        }))
    }

    fn set_attribute(
        &mut self,
        owner: AttributeOwner<'_>,
        name: &str,
        kind: TypeKind,
        values: &[Value],
    ) -> Result<(), SinkError> {
        let variable = match owner {
            AttributeOwner::Group => JsonValue::Null,
            AttributeOwner::Variable(v) => JsonValue::String(v.to_string()),
        };
        self.emit(json!({
            "op": "set_attribute",
            "variable": variable,
            "name": name,
            "type": kind.to_string(),
            "value": values_to_json(values),
        }))
    }

    fn write_values(&mut self, variable: &str, values: &[Value]) -> Result<(), SinkError> {
        self.emit(json!({
            "op": "write_values",
            "variable": variable,
            "count": values.len(),
            "values": values_to_json(values),
        }))
    }

    fn begin_group(&mut self, name: &str) -> Result<(), SinkError> {
        self.emit(json!({ "op": "begin_group", "name": name }))
    }

    fn end_group(&mut self) -> Result<(), SinkError> {
        self.emit(json!({ "op": "end_group" }))
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.emit(json!({ "op": "finalize" }))?;
        self.writer.flush()?;
        Ok(())
    }
}
