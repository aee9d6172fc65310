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

//! Lexical analysis for CDL.
//!
//! Scanning happens in two layers:
//!
//! - [`RawToken`] is a `logos` automaton over the raw text (headers,
//!   section markers, strings, numbers, identifiers, punctuation).
//! - [`Lexer`] wraps it for one [`FormatVariant`]: identifiers are
//!   classified into type keywords, `unlimited`, the fill placeholder `_`
//!   and the special floating values, numeric suffixes the variant lacks
//!   are rejected, and every token gets a 1-based source position.
//!
//! The lexer holds only scan-position state and produces tokens on demand.
//!
//! # Examples
//!
//! ```
//! use cdl_core::lex::{Lexer, TokenKind};
//! use cdl_core::{FormatVariant, TypeKind};
//!
//! let mut lexer = Lexer::new("ushort x ;", FormatVariant::Classic64);
//! let tok = lexer.next_token().unwrap().unwrap();
//! assert_eq!(tok.kind, TokenKind::Type(TypeKind::UShort));
//!
//! // The same keyword is a plain identifier in a classic document.
//! let mut lexer = Lexer::new("ushort", FormatVariant::Classic);
//! let tok = lexer.next_token().unwrap().unwrap();
//! assert_eq!(tok.kind, TokenKind::Ident("ushort".into()));
//! ```

mod error;
mod numbers;
mod span;
mod strings;
mod token;

pub use error::LexErrorKind;
pub use numbers::{parse_numeric, Number, NumericLiteral};
pub use span::{LineIndex, SourcePos};
pub use strings::{decode_escapes, deescapify};
pub use token::RawToken;

use crate::error::{CdlError, CdlResult};
use crate::types::{FormatVariant, TypeKind, TypeRegistry};
use logos::Logos;
use std::fmt;

/// A classified CDL token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `netcdf NAME`
    DatasetHeader(String),
    /// `group: NAME`
    GroupHeader(String),
    Dimensions,
    Variables,
    Data,
    /// A type keyword legal in the active variant.
    Type(TypeKind),
    /// `unlimited`, any case.
    Unlimited,
    /// The fill placeholder `_`.
    Fill,
    /// A de-escaped identifier.
    Ident(String),
    /// Segments of an absolute dimension path.
    Path(Vec<String>),
    Number(NumericLiteral),
    /// A decoded string constant, as bytes.
    Str(Vec<u8>),
    /// A decoded character constant.
    CharConst(u8),
    Equals,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Colon,
}

impl TokenKind {
    /// Short description used in syntax error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::DatasetHeader(n) => format!("header 'netcdf {}'", n),
            TokenKind::GroupHeader(n) => format!("group header 'group: {}'", n),
            TokenKind::Dimensions => "'dimensions:'".into(),
            TokenKind::Variables => "'variables:'".into(),
            TokenKind::Data => "'data:'".into(),
            TokenKind::Type(k) => format!("type '{}'", k),
            TokenKind::Unlimited => "'unlimited'".into(),
            TokenKind::Fill => "'_'".into(),
            TokenKind::Ident(n) => format!("identifier '{}'", n),
            TokenKind::Path(p) => format!("path '/{}'", p.join("/")),
            TokenKind::Number(_) => "numeric constant".into(),
            TokenKind::Str(_) => "string".into(),
            TokenKind::CharConst(_) => "character constant".into(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Equals => f.write_str("="),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            other => f.write_str(&other.describe()),
        }
    }
}

/// A token together with its source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The raw matched text.
    pub text: &'src str,
    pub pos: SourcePos,
}

/// Variant-aware CDL lexer with one token of lookahead.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, RawToken>,
    index: LineIndex<'src>,
    keywords: TypeRegistry,
    peeked: Option<Option<CdlResult<Token<'src>>>>,
    end: SourcePos,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, variant: FormatVariant) -> Self {
        let index = LineIndex::new(source);
        let end = index.position(source.len());
        Self {
            inner: RawToken::lexer(source),
            index,
            keywords: TypeRegistry::new(variant),
            peeked: None,
            end,
        }
    }

    pub fn variant(&self) -> FormatVariant {
        self.keywords.variant()
    }

    /// Position just past the last character of input.
    pub fn end_position(&self) -> SourcePos {
        self.end
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<CdlResult<Token<'src>>> {
        match self.peeked.take() {
            Some(tok) => tok,
            None => self.scan(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&CdlResult<Token<'src>>> {
        if self.peeked.is_none() {
            let tok = self.scan();
            self.peeked = Some(tok);
        }
        self.peeked.as_ref().and_then(Option::as_ref)
    }

    fn scan(&mut self) -> Option<CdlResult<Token<'src>>> {
        let raw = self.inner.next()?;
        let text = self.inner.slice();
        let pos = self.index.position(self.inner.span().start);
        Some(match raw {
            Ok(raw) => self.classify(raw, text, pos),
            Err(kind) => Err(lex_error(kind, text, pos)),
        })
    }

    fn classify(&self, raw: RawToken, text: &'src str, pos: SourcePos) -> CdlResult<Token<'src>> {
        let kind = match raw {
            RawToken::DatasetHeader(name) => TokenKind::DatasetHeader(name),
            RawToken::GroupHeader(name) => TokenKind::GroupHeader(name),
            RawToken::Dimensions => TokenKind::Dimensions,
            RawToken::Variables => TokenKind::Variables,
            RawToken::Data => TokenKind::Data,
            RawToken::Str(s) => TokenKind::Str(s),
            RawToken::UnterminatedStr => {
                return Err(lex_error(LexErrorKind::UnterminatedString, text, pos))
            }
            RawToken::CharConst(c) => TokenKind::CharConst(c),
            RawToken::Number(lit) => {
                if let Some(kind) = lit.suffix {
                    if !self.keywords.is_legal(kind) {
                        return Err(lex_error(
                            LexErrorKind::UnsupportedSuffix(text.to_string()),
                            text,
                            pos,
                        ));
                    }
                }
                TokenKind::Number(lit)
            }
            RawToken::Ident => self.classify_ident(text, pos)?,
            RawToken::Path => TokenKind::Path(
                text.split('/')
                    .filter(|s| !s.is_empty())
                    .map(deescapify)
                    .collect(),
            ),
            RawToken::Equals => TokenKind::Equals,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Colon => TokenKind::Colon,
        };
        Ok(Token { kind, text, pos })
    }

    fn classify_ident(&self, text: &str, pos: SourcePos) -> CdlResult<TokenKind> {
        if text == "_" {
            return Ok(TokenKind::Fill);
        }
        if let Some(kind) = self.keywords.resolve(text) {
            return Ok(TokenKind::Type(kind));
        }
        if text.eq_ignore_ascii_case("unlimited") {
            return Ok(TokenKind::Unlimited);
        }
        if is_special_float(text) {
            return parse_numeric(text)
                .map(TokenKind::Number)
                .map_err(|kind| lex_error(kind, text, pos));
        }
        Ok(TokenKind::Ident(deescapify(text)))
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = CdlResult<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_special_float(text: &str) -> bool {
    let word = text.strip_suffix(['f', 'F']).unwrap_or(text);
    matches!(word, "NaN" | "nan" | "Infinity" | "infinity")
}

/// Attach a position to a lexer failure.
fn lex_error(kind: LexErrorKind, text: &str, pos: SourcePos) -> CdlError {
    match kind {
        LexErrorKind::FloatOutOfRange(_) => CdlError::range(kind.to_string(), pos),
        LexErrorKind::UnexpectedCharacter => {
            let c = text.chars().next().unwrap_or('?');
            CdlError::lexical(format!("unexpected character '{}'", c.escape_default()), pos)
        }
        other => CdlError::lexical(other.to_string(), pos),
    }
}
