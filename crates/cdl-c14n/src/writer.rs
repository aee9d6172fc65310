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

//! Canonical CDL writer.
//!
//! Groups are written depth-first in declaration order. Within a group
//! the sections follow the grammar: dimensions, variables (each followed
//! by its attributes, then the group attributes), data, nested groups.

use std::fmt::Write;

use crate::config::CanonicalConfig;
use cdl_core::{
    Attribute, CdlError, CdlErrorKind, CdlResult, Dataset, FormatVariant, GroupId, TypeKind,
    TypeRegistry, Value, Variable,
};

/// Initial buffer capacity for output string.
const INITIAL_OUTPUT_BUFFER_CAPACITY: usize = 4096;

/// Line number used for errors without a source location.
const ERROR_LINE_UNKNOWN: usize = 0;

/// Maximum group nesting written before giving up.
const MAX_NESTING_DEPTH: usize = 1000;

/// Punctuation an identifier may carry after a backslash.
const ESCAPABLE: &str = " !\"#$%&'()*,:;<=>?[\\]^`{|}~";

/// Section keywords that swallow a directly following `:`.
const SECTION_WORDS: [&str; 6] = [
    "dimensions",
    "variables",
    "data",
    "DIMENSIONS",
    "VARIABLES",
    "DATA",
];

/// Writer for canonical CDL output.
pub struct CanonicalWriter {
    config: CanonicalConfig,
    registry: TypeRegistry,
    output: String,
}

impl CanonicalWriter {
    /// Creates a new canonical writer with the given configuration.
    pub fn new(config: CanonicalConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(FormatVariant::default()),
            output: String::with_capacity(INITIAL_OUTPUT_BUFFER_CAPACITY),
        }
    }

    /// Writes a dataset to canonical CDL text.
    pub fn write_dataset(&mut self, ds: &Dataset) -> CdlResult<String> {
        self.registry = TypeRegistry::new(ds.variant);
        let name = self.header_name(&ds.name)?;
        writeln!(self.output, "netcdf {} {{", name).map_err(write_error)?;
        self.write_group(ds, GroupId::ROOT, 0)?;
        writeln!(self.output, "}}").map_err(write_error)?;
        Ok(std::mem::take(&mut self.output))
    }

    fn write_group(&mut self, ds: &Dataset, id: GroupId, depth: usize) -> CdlResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CdlError::security(
                format!("Maximum nesting depth of {} exceeded", MAX_NESTING_DEPTH),
                ERROR_LINE_UNKNOWN,
            ));
        }
        let group = ds.group(id);
        let base = self.indent(depth);
        let inner = self.indent(depth + 1);
        let attr_indent = self.indent(depth + 2);

        if !group.dimensions.is_empty() {
            writeln!(self.output, "{}dimensions:", base).map_err(write_error)?;
            for dim in &group.dimensions {
                let name = self.name(&dim.name)?;
                if dim.is_unlimited() {
                    writeln!(
                        self.output,
                        "{}{} = UNLIMITED ; // ({} currently)",
                        inner,
                        name,
                        dim.len()
                    )
                } else {
                    writeln!(self.output, "{}{} = {} ;", inner, name, dim.len())
                }
                .map_err(write_error)?;
            }
        }

        if !group.variables.is_empty() || !group.attributes.is_empty() {
            writeln!(self.output, "{}variables:", base).map_err(write_error)?;
            for var in &group.variables {
                let dims = ds
                    .dimension_names(id, var)
                    .iter()
                    .map(|d| self.dimension_ref(d))
                    .collect::<CdlResult<Vec<_>>>()?;
                let name = self.name(&var.name)?;
                if dims.is_empty() {
                    writeln!(self.output, "{}{} {} ;", inner, var.kind, name)
                } else {
                    writeln!(self.output, "{}{} {}({}) ;", inner, var.kind, name, dims.join(", "))
                }
                .map_err(write_error)?;
                for attr in &var.attributes {
                    self.write_attribute(Some(&var.name), attr, &attr_indent)?;
                }
            }
            if !group.attributes.is_empty() {
                let label = if id == GroupId::ROOT { "global" } else { "group" };
                writeln!(self.output, "\n{}// {} attributes:", inner, label).map_err(write_error)?;
                for attr in &group.attributes {
                    self.write_attribute(None, attr, &attr_indent)?;
                }
            }
        }

        let with_data: Vec<&Variable> = group
            .variables
            .iter()
            .filter(|v| v.data.is_some())
            .collect();
        if self.config.include_data && !with_data.is_empty() {
            writeln!(self.output, "{}data:", base).map_err(write_error)?;
            for var in with_data {
                self.write_data(ds, var, &inner, &attr_indent)?;
            }
        }

        for child in &group.children {
            let child_name = self.header_name(&ds.group(*child).name)?;
            writeln!(self.output, "\n{}group: {} {{", base, child_name).map_err(write_error)?;
            self.write_group(ds, *child, depth + 1)?;
            writeln!(self.output, "{}}} // group {}", base, child_name).map_err(write_error)?;
        }
        Ok(())
    }

    fn write_attribute(&mut self, owner: Option<&str>, attr: &Attribute, indent: &str) -> CdlResult<()> {
        let owner = match owner {
            Some(var) => {
                let escaped = self.name(var)?;
                if SECTION_WORDS.contains(&var) {
                    format!("{} ", escaped)
                } else {
                    escaped
                }
            }
            None => String::new(),
        };
        let name = self.attribute_name(&attr.name)?;
        let declared = attr.kind == TypeKind::String
            || (self.config.typed_attributes && self.registry.variant() != FormatVariant::Classic);

        let items: Vec<String> = if attr.kind == TypeKind::Char {
            vec![quote_chars(&attr.values)]
        } else {
            attr.values
                .iter()
                .map(|v| attribute_constant(v, !declared))
                .collect()
        };
        let values = self.wrap(&items, indent);

        if declared {
            writeln!(self.output, "{}{} {}:{} = {} ;", indent, attr.kind, owner, name, values)
        } else {
            writeln!(self.output, "{}{}:{} = {} ;", indent, owner, name, values)
        }
        .map_err(write_error)
    }

    fn write_data(&mut self, ds: &Dataset, var: &Variable, indent: &str, cont: &str) -> CdlResult<()> {
        let Some(data) = var.data.as_deref() else {
            return Ok(());
        };
        let items: Vec<String> = if var.kind == TypeKind::Char {
            char_rows(ds, var, data)
        } else {
            let fill = var.fill_value.as_ref().filter(|_| self.config.fill_placeholders);
            data.iter()
                .map(|v| match fill {
                    Some(f) if f == v => "_".to_string(),
                    _ => data_constant(v),
                })
                .collect()
        };
        let name = self.name(&var.name)?;
        let values = self.wrap(&items, cont);
        writeln!(self.output, "{}{} = {} ;", indent, name, values).map_err(write_error)
    }

    /// Join items with `, `, breaking lines every `values_per_line` items.
    fn wrap(&self, items: &[String], cont: &str) -> String {
        let per_line = self.config.values_per_line;
        if per_line == 0 || items.len() <= per_line {
            return items.join(", ");
        }
        items
            .chunks(per_line)
            .map(|chunk| chunk.join(", "))
            .collect::<Vec<_>>()
            .join(&format!(",\n{}", cont))
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.config.indent_width)
    }

    // ==================== Names ====================

    /// Escape a dimension, variable or attribute name as an identifier.
    fn name(&self, name: &str) -> CdlResult<String> {
        if self.is_reserved(name) || self.registry.resolve(name).is_some() {
            return Err(unwritable(name, "it is a reserved word"));
        }
        escape_identifier(name)
    }

    /// Attribute names may reuse type keywords and `unlimited`.
    fn attribute_name(&self, name: &str) -> CdlResult<String> {
        if self.is_reserved(name) {
            return Err(unwritable(name, "it is a reserved word"));
        }
        if self.registry.resolve(name).is_some() || name.eq_ignore_ascii_case("unlimited") {
            return Ok(name.to_string());
        }
        escape_identifier(name)
    }

    /// Dataset and group names sit in a header, which ends at whitespace.
    fn header_name(&self, name: &str) -> CdlResult<String> {
        if name.chars().any(|c| c.is_whitespace() || c == '{') || name.contains("//") {
            return Err(unwritable(name, "a header name cannot hold whitespace, '{' or '//'"));
        }
        self.name(name)
    }

    fn dimension_ref(&self, reference: &str) -> CdlResult<String> {
        match reference.strip_prefix('/') {
            Some(path) => {
                let segments = path
                    .split('/')
                    .map(|s| self.name(s))
                    .collect::<CdlResult<Vec<_>>>()?;
                Ok(format!("/{}", segments.join("/")))
            }
            None => self.name(reference),
        }
    }

    fn is_reserved(&self, name: &str) -> bool {
        name == "_"
            || name.eq_ignore_ascii_case("unlimited")
            || matches!(name, "netcdf" | "NETCDF" | "netCDF")
            || matches!(
                name.strip_suffix(['f', 'F']).unwrap_or(name),
                "NaN" | "nan" | "Infinity" | "infinity"
            )
    }
}

fn write_error(e: std::fmt::Error) -> CdlError {
    CdlError::new(CdlErrorKind::Syntax, format!("Write error: {}", e), ERROR_LINE_UNKNOWN)
}

fn unwritable(name: &str, reason: &str) -> CdlError {
    CdlError::new(
        CdlErrorKind::Syntax,
        format!("name '{}' cannot be written as CDL: {}", name.escape_default(), reason),
        ERROR_LINE_UNKNOWN,
    )
}

/// Backslash-escape `name` so the lexer reads it back unchanged.
pub fn escape_identifier(name: &str) -> CdlResult<String> {
    let mut out = String::with_capacity(name.len() + 2);
    for (i, c) in name.chars().enumerate() {
        let plain = if i == 0 {
            c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
        } else {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-') || !c.is_ascii()
        };
        if plain {
            out.push(c);
        } else if (i == 0 && c.is_ascii_digit()) || (i > 0 && ESCAPABLE.contains(c)) {
            out.push('\\');
            out.push(c);
        } else {
            return Err(unwritable(name, "it holds a character identifiers cannot carry"));
        }
    }
    if out.is_empty() {
        return Err(unwritable(name, "it is empty"));
    }
    Ok(out)
}

// ==================== Constants ====================

/// A constant whose lexical form alone determines `value`'s kind.
fn attribute_constant(value: &Value, suffixed: bool) -> String {
    let text = data_constant(value);
    if !suffixed {
        return text;
    }
    let suffix = match value {
        Value::Byte(_) => "b",
        Value::Short(_) => "s",
        Value::UByte(_) => "UB",
        Value::UShort(_) => "US",
        Value::UInt(_) => "U",
        Value::Int64(_) => "LL",
        Value::UInt64(_) => "ULL",
        Value::Float(_) => "f",
        _ => "",
    };
    format!("{}{}", text, suffix)
}

/// A constant in the plain form used when the target kind is known.
fn data_constant(value: &Value) -> String {
    match value {
        Value::Float(v) => float_text(*v),
        Value::Double(v) => float_text(*v),
        Value::Char(_) => quote_chars(std::slice::from_ref(value)),
        Value::Str(s) => quote_str(s),
        other => other.to_string(),
    }
}

fn float_text<T>(v: T) -> String
where
    T: std::fmt::Display + std::fmt::LowerExp + Into<f64> + Copy,
{
    let x: f64 = v.into();
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = x.abs();
    if abs != 0.0 && !(1e-5..1e16).contains(&abs) {
        return format!("{:e}", v);
    }
    let text = v.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    push_quoted_text(&mut out, s);
    out.push('"');
    out
}

/// Quote char bytes. Valid UTF-8 is written as text; any other byte
/// becomes `\xHH`.
fn quote_chars(values: &[Value]) -> String {
    let bytes: Vec<u8> = values
        .iter()
        .filter_map(|v| match v {
            Value::Char(b) => Some(*b),
            _ => None,
        })
        .collect();
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    let mut rest = bytes.as_slice();
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                push_quoted_text(&mut out, text);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                push_quoted_text(&mut out, std::str::from_utf8(valid).unwrap_or_default());
                let bad = e.error_len().unwrap_or(after.len());
                for b in &after[..bad] {
                    let _ = write!(out, "\\x{:02x}", b);
                }
                rest = &after[bad..];
            }
        }
    }
    out.push('"');
    out
}

/// Escape text for a CDL string body. Control characters are written
/// as the `\xHH` bytes of their UTF-8 encoding.
fn push_quoted_text(out: &mut String, text: &str) {
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                for b in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(out, "\\x{:02x}", b);
                }
            }
            c => out.push(c),
        }
    }
}

/// Char data as one quoted string per row of the last dimension, with
/// trailing NUL padding dropped.
fn char_rows(ds: &Dataset, var: &Variable, data: &[Value]) -> Vec<String> {
    let row_len = match var.dims.last() {
        Some(last) if !ds.dimension(*last).is_unlimited() => ds.dimension(*last).len(),
        _ => 0,
    };
    if row_len == 0 {
        return vec![quote_chars(data)];
    }
    data.chunks(row_len)
        .map(|row| {
            let end = row
                .iter()
                .rposition(|v| *v != Value::Char(0))
                .map_or(0, |i| i + 1);
            quote_chars(&row[..end])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("tas").unwrap(), "tas");
        assert_eq!(escape_identifier("a-b.c@d+e").unwrap(), "a-b.c@d+e");
        assert_eq!(escape_identifier("fw:n").unwrap(), "fw\\:n");
        assert_eq!(escape_identifier("1st").unwrap(), "\\1st");
        assert_eq!(escape_identifier("año").unwrap(), "año");
        assert!(escape_identifier("a/b").is_err());
        assert!(escape_identifier("-x").is_err());
        assert!(escape_identifier("").is_err());
    }

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(1.0f64), "1.0");
        assert_eq!(float_text(0.5f32), "0.5");
        assert_eq!(float_text(-1.0e30f32), "-1e30");
        assert_eq!(float_text(1.5e-7f64), "1.5e-7");
        assert_eq!(float_text(f64::NAN), "NaN");
        assert_eq!(float_text(f32::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_attribute_suffixes() {
        assert_eq!(attribute_constant(&Value::Byte(-3), true), "-3b");
        assert_eq!(attribute_constant(&Value::UInt64(7), true), "7ULL");
        assert_eq!(attribute_constant(&Value::Float(2.0), true), "2.0f");
        assert_eq!(attribute_constant(&Value::Float(f32::NAN), true), "NaNf");
        assert_eq!(attribute_constant(&Value::Double(2.0), true), "2.0");
        assert_eq!(attribute_constant(&Value::Short(4), false), "4");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_str("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote_str("\u{1}x"), r#""\x01x""#);
        assert_eq!(quote_str("ǐ\tǒ"), "\"ǐ\\tǒ\"");
        let chars = [Value::Char(b'A'), Value::Char(0), Value::Char(0xE9)];
        assert_eq!(quote_chars(&chars), r#""A\x00\xe9""#);
    }

    #[test]
    fn test_quoting_keeps_utf8_text() {
        assert_eq!(quote_chars(&cdl_core::chars_of("café Ʒ")), "\"café Ʒ\"");
        assert_eq!(quote_chars(&cdl_core::chars_of("Ã©")), "\"Ã©\"");
        assert_eq!(quote_chars(&cdl_core::chars_of([b'a', 0xC3, b'b'])), r#""a\xc3b""#);
        assert_eq!(quote_str("\u{85}"), r#""\xc2\x85""#);
    }
}
