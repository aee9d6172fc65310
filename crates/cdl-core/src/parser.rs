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

//! Recursive-descent CDL parser.
//!
//! The parser pulls tokens from the [`Lexer`] on demand and hands every
//! recognised declaration straight to the variant's production table;
//! there is no intermediate syntax tree.
//!
//! ```text
//! dataset  := "netcdf NAME" "{" body "}"
//! body     := ["dimensions:" dim-decl*] ["variables:" (var-decl | att-decl)*]
//!             ["data:" data-decl*] group*
//! group    := "group: NAME" "{" body "}"
//! ```

use crate::builder::{DatasetBuilder, DimName};
use crate::dataset::Dataset;
use crate::error::{CdlError, CdlResult};
use crate::grammar::{AttributeDecl, DataDecl, DimensionDecl, ProductionTable, VariableDecl};
use crate::lex::{Lexer, SourcePos, Token, TokenKind};
use crate::limits::Limits;
use crate::literal::Literal;
use crate::sink::{DatasetSink, NullSink};
use crate::types::{FormatVariant, TypeKind, TypeRegistry};
use crate::value::Value;
use std::collections::HashMap;
use tracing::debug;

/// Parsing options.
///
/// # Examples
///
/// ```
/// use cdl_core::{FormatVariant, ParseOptions, TypeKind, Value};
///
/// let opts = ParseOptions::builder()
///     .variant(FormatVariant::Classic64)
///     .fill_value(TypeKind::UShort, Value::UShort(65534))
///     .max_list_length(1_000)
///     .build();
/// assert_eq!(opts.variant, FormatVariant::Classic64);
/// assert!(opts.allow_groups);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Format variant, fixed for the whole parse.
    pub variant: FormatVariant,
    /// Replacement default fill values, per kind.
    pub fill_overrides: HashMap<TypeKind, Value>,
    /// Accept `group:` blocks in the hierarchical variant.
    pub allow_groups: bool,
    /// Security limits.
    pub limits: Limits,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            variant: FormatVariant::default(),
            fill_overrides: HashMap::new(),
            allow_groups: true,
            limits: Limits::default(),
        }
    }
}

impl ParseOptions {
    /// Create a builder for parse options.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the format variant (default: classic).
    pub fn variant(mut self, variant: FormatVariant) -> Self {
        self.options.variant = variant;
        self
    }

    /// Replace the default fill value of `kind`.
    ///
    /// The value must be of kind `kind`; a mismatch is reported when
    /// parsing starts.
    pub fn fill_value(mut self, kind: TypeKind, value: Value) -> Self {
        self.options.fill_overrides.insert(kind, value);
        self
    }

    /// Accept or reject `group:` blocks (default: accept).
    pub fn allow_groups(mut self, allow: bool) -> Self {
        self.options.allow_groups = allow;
        self
    }

    /// Replace all security limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.options.limits = limits;
        self
    }

    /// Set the maximum input size in bytes.
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.options.limits.max_input_size = size;
        self
    }

    /// Set the maximum group nesting depth.
    pub fn max_group_depth(mut self, depth: usize) -> Self {
        self.options.limits.max_group_depth = depth;
        self
    }

    /// Set the maximum number of values in one list.
    pub fn max_list_length(mut self, len: usize) -> Self {
        self.options.limits.max_list_length = len;
        self
    }

    /// Build the options.
    pub fn build(self) -> ParseOptions {
        self.options
    }
}

/// Parse a CDL document into a [`Dataset`], discarding sink operations.
///
/// # Examples
///
/// ```
/// use cdl_core::{parse, ParseOptions};
///
/// let ds = parse(
///     "netcdf tiny { dimensions: x = 2 ; variables: int v(x) ; data: v = 1, 2 ; }",
///     &ParseOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(ds.name, "tiny");
/// assert_eq!(ds.root().variables[0].data.as_ref().map(Vec::len), Some(2));
/// ```
pub fn parse(input: &str, options: &ParseOptions) -> CdlResult<Dataset> {
    parse_into(input, options, &mut NullSink)
}

/// Parse a CDL document, forwarding every operation to `sink` as it is
/// recognised.
///
/// On error the sink has seen the operations up to the failing
/// declaration; rolling them back is the sink's concern.
pub fn parse_into(input: &str, options: &ParseOptions, sink: &mut dyn DatasetSink) -> CdlResult<Dataset> {
    if input.len() > options.limits.max_input_size {
        return Err(CdlError::security(
            format!(
                "input size {} bytes exceeds maximum {} bytes",
                input.len(),
                options.limits.max_input_size
            ),
            0,
        ));
    }

    let registry = TypeRegistry::with_fill_overrides(options.variant, &options.fill_overrides)?;
    let table = ProductionTable::for_variant(options.variant, options.allow_groups);
    let mut lexer = Lexer::new(input, options.variant);

    let (name, pos) = dataset_header(&mut lexer)?;
    debug!(dataset = %name, variant = %options.variant, "parse start");
    let builder = DatasetBuilder::new(&name, registry, options.limits.clone(), sink, pos)?;

    let mut parser = Parser {
        lexer,
        table,
        builder,
        max_list_length: options.limits.max_list_length,
    };
    parser.expect(TokenKind::LBrace)?;
    parser.body()?;
    let close = parser.expect(TokenKind::RBrace)?;
    parser.expect_end()?;
    parser.builder.finish(close)
}

fn dataset_header(lexer: &mut Lexer<'_>) -> CdlResult<(String, SourcePos)> {
    match lexer.next_token() {
        Some(Ok(Token {
            kind: TokenKind::DatasetHeader(name),
            pos,
            ..
        })) => Ok((name, pos)),
        Some(Ok(tok)) => match &tok.kind {
            TokenKind::Ident(word) if word.eq_ignore_ascii_case("netcdf") => {
                Err(CdlError::lexical("a netCDF name is required", tok.pos))
            }
            other => Err(CdlError::syntax(
                format!("expected 'netcdf NAME {{', found {}", other.describe()),
                tok.pos,
            )),
        },
        Some(Err(e)) => Err(e),
        None => Err(CdlError::syntax("empty input", SourcePos::start())),
    }
}

struct Parser<'src, 's> {
    lexer: Lexer<'src>,
    table: ProductionTable,
    builder: DatasetBuilder<'s>,
    max_list_length: usize,
}

impl<'src, 's> Parser<'src, 's> {
    // ==================== Token helpers ====================

    fn next(&mut self) -> CdlResult<Token<'src>> {
        match self.lexer.next_token() {
            Some(tok) => tok,
            None => Err(CdlError::syntax(
                "unexpected end of input",
                self.lexer.end_position(),
            )),
        }
    }

    fn peek(&mut self) -> CdlResult<Option<&TokenKind>> {
        match self.lexer.peek() {
            Some(Ok(tok)) => Ok(Some(&tok.kind)),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(None),
        }
    }

    fn peek_is(&mut self, kind: &TokenKind) -> CdlResult<bool> {
        Ok(self.peek()? == Some(kind))
    }

    fn expect(&mut self, kind: TokenKind) -> CdlResult<SourcePos> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(tok.pos)
        } else {
            Err(unexpected(&tok, &format!("'{}'", kind)))
        }
    }

    fn expect_end(&mut self) -> CdlResult<()> {
        match self.lexer.next_token() {
            None => Ok(()),
            Some(Ok(tok)) => Err(unexpected(&tok, "end of input")),
            Some(Err(e)) => Err(e),
        }
    }

    fn expect_ident(&mut self, what: &str) -> CdlResult<(String, SourcePos)> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((name, tok.pos)),
            _ => Err(unexpected(&tok, what)),
        }
    }

    /// Attribute names may reuse keywords: `:unlimited`, `x:int`.
    fn expect_attribute_name(&mut self) -> CdlResult<(String, SourcePos)> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((name, tok.pos)),
            TokenKind::Type(_) | TokenKind::Unlimited => Ok((tok.text.to_string(), tok.pos)),
            _ => Err(unexpected(&tok, "attribute name")),
        }
    }

    // ==================== Structure ====================

    fn body(&mut self) -> CdlResult<()> {
        if self.peek_is(&TokenKind::Dimensions)? {
            self.next()?;
            self.dimensions()?;
        }
        if self.peek_is(&TokenKind::Variables)? {
            self.next()?;
            self.variables()?;
        }
        if self.peek_is(&TokenKind::Data)? {
            self.next()?;
            self.data()?;
        }
        while let Some(TokenKind::GroupHeader(_)) = self.peek()? {
            self.group()?;
        }
        Ok(())
    }

    fn group(&mut self) -> CdlResult<()> {
        let tok = self.next()?;
        let TokenKind::GroupHeader(name) = tok.kind else {
            return Err(unexpected(&tok, "group header"));
        };
        if !self.table.groups {
            let reason = if self.table.variant.has_groups() {
                "group nesting is disabled"
            } else {
                "groups require the netcdf4 format variant"
            };
            return Err(CdlError::syntax(format!("group '{}': {}", name, reason), tok.pos));
        }
        self.expect(TokenKind::LBrace)?;
        self.builder.enter_group(&name, tok.pos)?;
        self.body()?;
        let close = self.expect(TokenKind::RBrace)?;
        self.builder.exit_group(close)
    }

    // ==================== Sections ====================

    fn dimensions(&mut self) -> CdlResult<()> {
        while let Some(TokenKind::Ident(_)) = self.peek()? {
            loop {
                let (name, pos) = self.expect_ident("dimension name")?;
                self.expect(TokenKind::Equals)?;
                let tok = self.next()?;
                let size = match tok.kind {
                    TokenKind::Number(lit) => Some(lit),
                    TokenKind::Unlimited => None,
                    _ => return Err(unexpected(&tok, "dimension size or 'unlimited'")),
                };
                let decl = DimensionDecl { name, size, pos };
                (self.table.dimension)(&mut self.builder, &decl)?;

                if self.peek_is(&TokenKind::Comma)? {
                    self.next()?;
                } else {
                    self.expect(TokenKind::Semicolon)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn variables(&mut self) -> CdlResult<()> {
        loop {
            match self.peek()? {
                Some(TokenKind::Type(_)) => {
                    let tok = self.next()?;
                    let TokenKind::Type(kind) = tok.kind else {
                        return Err(unexpected(&tok, "type"));
                    };
                    if self.peek_is(&TokenKind::Colon)? {
                        self.typed_attribute_allowed(tok.pos)?;
                        self.next()?;
                        self.attribute(Some(kind), None, tok.pos)?;
                        continue;
                    }
                    let (name, pos) = self.expect_ident("variable name")?;
                    if self.peek_is(&TokenKind::Colon)? {
                        self.typed_attribute_allowed(tok.pos)?;
                        self.next()?;
                        self.attribute(Some(kind), Some(name), tok.pos)?;
                    } else {
                        self.variable_list(kind, name, pos)?;
                    }
                }
                Some(TokenKind::Ident(_)) => {
                    let (target, pos) = self.expect_ident("variable name")?;
                    self.expect(TokenKind::Colon)?;
                    self.attribute(None, Some(target), pos)?;
                }
                Some(TokenKind::Colon) => {
                    let pos = self.expect(TokenKind::Colon)?;
                    self.attribute(None, None, pos)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn typed_attribute_allowed(&self, pos: SourcePos) -> CdlResult<()> {
        if self.table.typed_attributes {
            Ok(())
        } else {
            Err(CdlError::syntax(
                format!(
                    "typed attributes are not available in the {} format variant",
                    self.table.variant
                ),
                pos,
            ))
        }
    }

    /// `name [(dims)] {, name [(dims)]} ;` with `kind` and the first name
    /// already consumed.
    fn variable_list(&mut self, kind: TypeKind, first: String, first_pos: SourcePos) -> CdlResult<()> {
        let (mut name, mut pos) = (first, first_pos);
        loop {
            let mut dims = Vec::new();
            if self.peek_is(&TokenKind::LParen)? {
                self.next()?;
                if !self.peek_is(&TokenKind::RParen)? {
                    loop {
                        let tok = self.next()?;
                        let dim = match tok.kind {
                            TokenKind::Ident(n) => DimName::Bare(n),
                            TokenKind::Path(p) => DimName::Path(p),
                            _ => return Err(unexpected(&tok, "dimension name")),
                        };
                        dims.push((dim, tok.pos));
                        if self.peek_is(&TokenKind::Comma)? {
                            self.next()?;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
            }

            let decl = VariableDecl {
                kind,
                name,
                dims,
                pos,
            };
            (self.table.variable)(&mut self.builder, &decl)?;

            if self.peek_is(&TokenKind::Comma)? {
                self.next()?;
                (name, pos) = self.expect_ident("variable name")?;
            } else {
                self.expect(TokenKind::Semicolon)?;
                return Ok(());
            }
        }
    }

    /// `name = values ;` with the target and colon already consumed.
    fn attribute(&mut self, kind: Option<TypeKind>, target: Option<String>, pos: SourcePos) -> CdlResult<()> {
        let (name, _) = self.expect_attribute_name()?;
        self.expect(TokenKind::Equals)?;
        let values = self.value_list()?;
        self.expect(TokenKind::Semicolon)?;
        let decl = AttributeDecl {
            kind,
            target,
            name,
            values,
            pos,
        };
        (self.table.attribute)(&mut self.builder, &decl)
    }

    fn data(&mut self) -> CdlResult<()> {
        while let Some(TokenKind::Ident(_)) = self.peek()? {
            let (name, pos) = self.expect_ident("variable name")?;
            self.expect(TokenKind::Equals)?;
            let values = self.value_list()?;
            self.expect(TokenKind::Semicolon)?;
            let decl = DataDecl { name, values, pos };
            (self.table.data)(&mut self.builder, &decl)?;
        }
        Ok(())
    }

    fn value_list(&mut self) -> CdlResult<Vec<(Literal, SourcePos)>> {
        let mut values = Vec::new();
        loop {
            let tok = self.next()?;
            let literal = Literal::from_token(&tok.kind).ok_or_else(|| unexpected(&tok, "constant"))?;
            if values.len() == self.max_list_length {
                return Err(CdlError::security(
                    format!("value list exceeds maximum of {} elements", self.max_list_length),
                    tok.pos.line(),
                )
                .with_column(tok.pos.column()));
            }
            values.push((literal, tok.pos));
            if self.peek_is(&TokenKind::Comma)? {
                self.next()?;
            } else {
                return Ok(values);
            }
        }
    }
}

fn unexpected(tok: &Token<'_>, expected: &str) -> CdlError {
    CdlError::syntax(
        format!("expected {}, found {}", expected, tok.kind.describe()),
        tok.pos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CdlErrorKind;
    use crate::sink::{RecordingSink, SinkOp};

    fn classic(src: &str) -> CdlResult<Dataset> {
        parse(src, &ParseOptions::default())
    }

    fn nc4(src: &str) -> CdlResult<Dataset> {
        parse(
            src,
            &ParseOptions::builder()
                .variant(FormatVariant::Hierarchical)
                .build(),
        )
    }

    fn cdf5(src: &str) -> CdlResult<Dataset> {
        parse(
            src,
            &ParseOptions::builder().variant(FormatVariant::Classic64).build(),
        )
    }

    fn data_of(ds: &Dataset, var: &str) -> Vec<Value> {
        ds.root().variable(var).unwrap().data.clone().unwrap()
    }

    // ==================== Structure ====================

    #[test]
    fn test_minimal_dataset() {
        let ds = classic("netcdf empty { }").unwrap();
        assert_eq!(ds.name, "empty");
        assert!(ds.root().dimensions.is_empty());
    }

    #[test]
    fn test_header_without_name() {
        let err = classic("netcdf { }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Lexical);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classic("").unwrap_err().kind, CdlErrorKind::Syntax);
        assert_eq!(classic("  // nothing\n").unwrap_err().kind, CdlErrorKind::Syntax);
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = classic("netcdf a { dimensions: x = 1 ;").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Syntax);
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = classic("netcdf a { } x").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Syntax);
    }

    #[test]
    fn test_sections_out_of_order() {
        let err = classic("netcdf a { variables: int v ; dimensions: x = 1 ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Syntax);
    }

    // ==================== Dimensions ====================

    #[test]
    fn test_dimension_list() {
        let ds = classic("netcdf a { dimensions: x = 2, y = 3 ; t = UNLIMITED ; }").unwrap();
        let dims = &ds.root().dimensions;
        assert_eq!(dims.len(), 3);
        assert_eq!(dims[1].len(), 3);
        assert!(dims[2].is_unlimited());
    }

    #[test]
    fn test_duplicate_dimension() {
        let err = classic("netcdf a { dimensions: x = 2 ; x = 3 ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::DuplicateName);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_second_unlimited_in_classic() {
        let err = classic("netcdf a { dimensions: t = unlimited ; u = unlimited ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Shape);
        assert!(nc4("netcdf a { dimensions: t = unlimited ; u = unlimited ; }").is_ok());
    }

    #[test]
    fn test_bad_dimension_size() {
        assert_eq!(
            classic("netcdf a { dimensions: x = 0 ; }").unwrap_err().kind,
            CdlErrorKind::Range
        );
        assert_eq!(
            classic("netcdf a { dimensions: x = -4 ; }").unwrap_err().kind,
            CdlErrorKind::Range
        );
    }

    // ==================== Variables ====================

    #[test]
    fn test_variable_list_sharing_type() {
        let ds = classic("netcdf a { dimensions: x = 2 ; variables: float p(x), q, r(x, x) ; }").unwrap();
        let vars = &ds.root().variables;
        assert_eq!(vars.len(), 3);
        assert!(vars.iter().all(|v| v.kind == TypeKind::Float));
        assert!(vars[1].is_scalar());
        assert_eq!(vars[2].dims.len(), 2);
    }

    #[test]
    fn test_unknown_dimension() {
        let err = classic("netcdf a { variables: int v(nope) ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::UnknownIdentifier);
    }

    #[test]
    fn test_duplicate_variable() {
        let err = classic("netcdf a { variables: int v ; double v ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::DuplicateName);
    }

    #[test]
    fn test_classic_unlimited_must_lead() {
        let src = "netcdf a { dimensions: x = 2 ; t = unlimited ; variables: int v(x, t) ; }";
        assert_eq!(classic(src).unwrap_err().kind, CdlErrorKind::Shape);
        assert!(nc4(src).is_ok());
    }

    // ==================== Attributes ====================

    #[test]
    fn test_global_and_variable_attributes() {
        let ds = classic(
            r#"netcdf a {
                variables:
                    int v ;
                        v:units = "m", "/s" ;
                        v:valid = 1, 2 ;
                    :title = "demo" ;
            }"#,
        )
        .unwrap();
        let v = ds.root().variable("v").unwrap();
        assert_eq!(v.attribute("units").unwrap().text().as_deref(), Some("m/s"));
        assert_eq!(
            v.attribute("valid").unwrap().values,
            vec![Value::Int(1), Value::Int(2)]
        );
        assert_eq!(ds.root().attribute("title").unwrap().text().as_deref(), Some("demo"));
    }

    #[test]
    fn test_attribute_redeclaration_replaces() {
        let ds = classic("netcdf a { variables: :x = 1 ; :x = 2.5 ; }").unwrap();
        let attrs = &ds.root().attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].kind, TypeKind::Double);
    }

    #[test]
    fn test_attribute_on_unknown_variable() {
        let err = classic("netcdf a { variables: nope:units = \"m\" ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::UnknownIdentifier);
    }

    #[test]
    fn test_typed_attributes_by_variant() {
        let src = "netcdf a { variables: int v ; short v:s = 1 ; double :g = 2 ; }";
        assert_eq!(classic(src).unwrap_err().kind, CdlErrorKind::Syntax);
        let ds = cdf5(src).unwrap();
        assert_eq!(
            ds.root().variable("v").unwrap().attribute("s").unwrap().values,
            vec![Value::Short(1)]
        );
        assert_eq!(ds.root().attribute("g").unwrap().values, vec![Value::Double(2.0)]);
    }

    #[test]
    fn test_typed_attribute_negative_into_unsigned() {
        let err = cdf5("netcdf a { variables: uint :u4att = -10 ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Range);
    }

    #[test]
    fn test_fill_value_attribute() {
        let ds = classic(
            "netcdf a { dimensions: x = 3 ; variables: short v(x) ; v:_FillValue = -1 ; data: v = 1, _ ; }",
        )
        .unwrap();
        let v = ds.root().variable("v").unwrap();
        assert_eq!(v.fill_value, Some(Value::Short(-1)));
        assert_eq!(
            v.data.clone().unwrap(),
            vec![Value::Short(1), Value::Short(-1), Value::Short(-1)]
        );
    }

    #[test]
    fn test_fill_value_rules() {
        let two = "netcdf a { variables: int v ; v:_FillValue = 1, 2 ; }";
        assert_eq!(classic(two).unwrap_err().kind, CdlErrorKind::Shape);
        let typed = "netcdf a { variables: int v ; short v:_FillValue = 1 ; }";
        assert_eq!(cdf5(typed).unwrap_err().kind, CdlErrorKind::TypeMismatch);
    }

    // ==================== Data ====================

    #[test]
    fn test_data_too_many_values() {
        let err = classic("netcdf a { dimensions: x = 2 ; variables: int v(x) ; data: v = 1, 2, 3 ; }")
            .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Shape);
    }

    #[test]
    fn test_data_padding_and_unlimited_growth() {
        let ds = classic(
            "netcdf a { dimensions: t = unlimited ; x = 2 ; variables: int v(t, x) ; data: v = 1, 2, 3 ; }",
        )
        .unwrap();
        assert_eq!(ds.root().dimensions[0].len(), 2);
        assert_eq!(
            data_of(&ds, "v"),
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(-2147483647)]
        );
    }

    #[test]
    fn test_data_unknown_variable() {
        let err = classic("netcdf a { data: v = 1 ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::UnknownIdentifier);
    }

    #[test]
    fn test_two_unlimited_dims_cannot_take_data() {
        let err = nc4(
            "netcdf a { dimensions: t = unlimited ; u = unlimited ; variables: int v(t, u) ; data: v = 1 ; }",
        )
        .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Shape);
    }

    #[test]
    fn test_char_data_rows() {
        let ds = classic(
            r#"netcdf a { dimensions: n = 2 ; len = 3 ; variables: char c(n, len) ; data: c = "ab", "xyz" ; }"#,
        )
        .unwrap();
        let bytes: Vec<u8> = data_of(&ds, "c")
            .into_iter()
            .map(|v| match v {
                Value::Char(b) => b,
                other => panic!("{:?}", other),
            })
            .collect();
        assert_eq!(bytes, b"ab\0xyz");
    }

    #[test]
    fn test_type_mismatch_in_data() {
        let err = classic("netcdf a { variables: int v ; data: v = 1.5 ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::TypeMismatch);
        let err = classic("netcdf a { variables: int v ; data: v = \"s\" ; }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::TypeMismatch);
    }

    // ==================== Groups ====================

    #[test]
    fn test_groups_rejected_outside_hierarchical() {
        let err = cdf5("netcdf a { group: g { } }").unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Syntax);
        let err = parse(
            "netcdf a { group: g { } }",
            &ParseOptions::builder()
                .variant(FormatVariant::Hierarchical)
                .allow_groups(false)
                .build(),
        )
        .unwrap_err();
        assert!(err.message.contains("disabled"));
    }

    #[test]
    fn test_nested_groups() {
        let ds = nc4("netcdf a { dimensions: t = 2 ; group: g { variables: int v(t) ; group: h { } } }").unwrap();
        assert_eq!(ds.group_count(), 3);
        let g = ds.child(crate::GroupId::ROOT, "g").unwrap();
        assert!(ds.child(g, "h").is_some());
    }

    #[test]
    fn test_group_depth_limit() {
        let err = parse(
            "netcdf a { group: g { group: h { } } }",
            &ParseOptions::builder()
                .variant(FormatVariant::Hierarchical)
                .max_group_depth(1)
                .build(),
        )
        .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Security);
    }

    // ==================== Limits and sink ====================

    #[test]
    fn test_input_size_limit() {
        let err = parse(
            "netcdf a { }",
            &ParseOptions::builder().max_input_size(4).build(),
        )
        .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Security);
    }

    #[test]
    fn test_list_length_limit() {
        let err = parse(
            "netcdf a { variables: :x = 1, 2, 3 ; }",
            &ParseOptions::builder().max_list_length(2).build(),
        )
        .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Security);
    }

    #[test]
    fn test_sink_sees_source_order() {
        let mut sink = RecordingSink::new();
        parse_into(
            "netcdf a { dimensions: x = 1 ; variables: int v(x) ; v:a = 1 ; data: v = 7 ; }",
            &ParseOptions::default(),
            &mut sink,
        )
        .unwrap();
        assert!(matches!(sink.ops.first(), Some(SinkOp::BeginDataset { .. })));
        assert!(matches!(sink.ops[1], SinkOp::CreateDimension { .. }));
        assert!(matches!(sink.ops[2], SinkOp::CreateVariable { .. }));
        assert!(matches!(sink.ops[3], SinkOp::SetAttribute { .. }));
        assert!(matches!(sink.ops[4], SinkOp::WriteValues { .. }));
        assert_eq!(sink.ops.last(), Some(&SinkOp::Finalize));
    }

    #[test]
    fn test_sink_rejection_aborts() {
        let mut sink = RecordingSink::rejecting_after(2);
        let err = parse_into(
            "netcdf a { dimensions: x = 1, y = 2, z = 3 ; }",
            &ParseOptions::default(),
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.kind, CdlErrorKind::Sink);
        assert_eq!(sink.ops.len(), 2);
    }

    #[test]
    fn test_error_positions_are_one_based() {
        let err = classic("netcdf a {\n  dimensions:\n    x = 2 ;\n    x = 3 ;\n}").unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.column, Some(5));
    }
}
