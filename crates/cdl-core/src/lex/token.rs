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

//! Raw token rules.
//!
//! [`RawToken`] is the `logos` automaton: longest match wins and ties go
//! to the earlier rule. It knows nothing about format variants; the
//! [`Lexer`](super::Lexer) wrapper classifies identifiers against the
//! type registry and rejects suffixes the variant lacks.

use super::error::LexErrorKind;
use super::numbers::{parse_numeric, NumericLiteral};
use super::strings::{decode_escapes, deescapify};
use logos::{Lexer as LogosLexer, Logos};

/// Raw lexical categories of CDL.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum RawToken {
    /// `netcdf NAME` up to (not including) the opening brace.
    #[regex(r"(netcdf|NETCDF|netCDF)[ \t]+[^{]*", |lex| header_name(lex, LexErrorKind::MissingDatasetName))]
    DatasetHeader(String),

    /// `group: NAME` up to (not including) the opening brace.
    #[regex(r"(group|GROUP):[ \t]+[^{]*", |lex| header_name(lex, LexErrorKind::MissingGroupName))]
    GroupHeader(String),

    #[token("dimensions:")]
    #[token("DIMENSIONS:")]
    Dimensions,

    #[token("variables:")]
    #[token("VARIABLES:")]
    Variables,

    #[token("data:")]
    #[token("DATA:")]
    Data,

    #[regex(r#""([^"\\]|\\(.|\n))*""#, quoted_string)]
    Str(Vec<u8>),

    #[regex(r#""([^"\\]|\\(.|\n))*"#, unterminated_string)]
    UnterminatedStr,

    #[regex(r"'([^'\\\n]|\\[^\n][0-9a-fA-F]?[0-9a-fA-F]?)'", char_constant)]
    CharConst(u8),

    #[regex(
        r"[+-]?([0-9]+([uU][bB]|[uU][sS]|[uU][lL][lL]|[uU]|[lL][lL]|[lL]|[sS]|[bB])?|0[xX][0-9a-fA-F]+([uU][sS]|[uU][lL][lL]|[uU]|[lL][lL]|[lL]|[sS])?|([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?[fFdDlL]?|[0-9]+[eE][+-]?[0-9]+[fFdDlL]?)|[+-](NaN|nan|Infinity|infinity)[fF]?",
        |lex| parse_numeric(lex.slice())
    )]
    Number(NumericLiteral),

    /// Identifier text, escapes still in place.
    #[regex(r##"([a-zA-Z_]|[^\x00-\x7F]|\\[0-9])([a-zA-Z0-9_.@+\-]|[^\x00-\x7F]|\\[ !"#$%&'()*,:;<=>?\[\\\]^`{|}~])*"##)]
    Ident,

    /// Absolute dimension path such as `/forecast/time`.
    #[regex(r##"(/([a-zA-Z_]|[^\x00-\x7F]|\\[0-9])([a-zA-Z0-9_.@+\-]|[^\x00-\x7F]|\\[ !"#$%&'()*,:;<=>?\[\\\]^`{|}~])*)+"##)]
    Path,

    #[token("=")]
    Equals,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
}

/// Second whitespace-separated word of a header, de-escaped. Comments
/// between the name and the brace are ignored.
fn header_name(
    lex: &mut LogosLexer<RawToken>,
    missing: LexErrorKind,
) -> Result<String, LexErrorKind> {
    let mut words = lex
        .slice()
        .lines()
        .flat_map(|line| line.split("//").next().unwrap_or("").split_whitespace())
        .skip(1);
    let name = words.next().ok_or(missing)?;
    if let Some(extra) = words.next() {
        return Err(LexErrorKind::TrailingHeaderText(extra.to_string()));
    }
    Ok(deescapify(name))
}

fn quoted_string(lex: &mut LogosLexer<RawToken>) -> Result<Vec<u8>, LexErrorKind> {
    let slice = lex.slice();
    decode_escapes(&slice[1..slice.len() - 1])
}

fn unterminated_string(_lex: &mut LogosLexer<RawToken>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

/// A character constant must decode to exactly one byte.
fn char_constant(lex: &mut LogosLexer<RawToken>) -> Result<u8, LexErrorKind> {
    let slice = lex.slice();
    match decode_escapes(&slice[1..slice.len() - 1])?.as_slice() {
        [b] => Ok(*b),
        _ => Err(LexErrorKind::InvalidCharConstant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::numbers::Number;
    use crate::TypeKind;

    fn raw(source: &str) -> Vec<Result<RawToken, LexErrorKind>> {
        RawToken::lexer(source).collect()
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            raw("netcdf simple {"),
            vec![
                Ok(RawToken::DatasetHeader("simple".into())),
                Ok(RawToken::LBrace)
            ]
        );
        assert_eq!(
            raw("group: forecast {"),
            vec![
                Ok(RawToken::GroupHeader("forecast".into())),
                Ok(RawToken::LBrace)
            ]
        );
    }

    #[test]
    fn test_missing_header_names() {
        assert_eq!(raw("group:  {")[0], Err(LexErrorKind::MissingGroupName));
        assert_eq!(raw("netcdf  {")[0], Err(LexErrorKind::MissingDatasetName));
        assert_eq!(
            raw("netcdf a b {")[0],
            Err(LexErrorKind::TrailingHeaderText("b".into()))
        );
    }

    #[test]
    fn test_header_with_comment() {
        assert_eq!(
            raw("netcdf a // the dataset
{")[0],
            Ok(RawToken::DatasetHeader("a".into()))
        );
    }

    #[test]
    fn test_sections_either_case() {
        assert_eq!(
            raw("dimensions: VARIABLES: data:"),
            vec![
                Ok(RawToken::Dimensions),
                Ok(RawToken::Variables),
                Ok(RawToken::Data)
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(raw(r#""a\tb""#), vec![Ok(RawToken::Str(b"a\tb".to_vec()))]);
        assert_eq!(raw(r#""""#), vec![Ok(RawToken::Str(Vec::new()))]);
        assert_eq!(raw(r#""é\xE9""#), vec![Ok(RawToken::Str(vec![0xC3, 0xA9, 0xE9]))]);
        assert_eq!(raw(r#""open"#), vec![Err(LexErrorKind::UnterminatedString)]);
    }

    #[test]
    fn test_char_constants() {
        assert_eq!(raw("'a'"), vec![Ok(RawToken::CharConst(b'a'))]);
        assert_eq!(raw(r"'\n'"), vec![Ok(RawToken::CharConst(b'\n'))]);
        assert_eq!(raw(r"'\012'"), vec![Ok(RawToken::CharConst(b'\n'))]);
        assert_eq!(raw(r"'\x1F'"), vec![Ok(RawToken::CharConst(0x1F))]);
        assert_eq!(raw(r"'\xE9'"), vec![Ok(RawToken::CharConst(0xE9))]);
        assert_eq!(raw(r"'\''"), vec![Ok(RawToken::CharConst(b'\''))]);
        assert_eq!(raw("'é'"), vec![Err(LexErrorKind::InvalidCharConstant)]);
    }

    #[test]
    fn test_unsigned_suffix_longest_match() {
        let tokens = raw("1U 2US 3UB 4ULL 5LL");
        let kinds: Vec<_> = tokens
            .into_iter()
            .map(|t| match t {
                Ok(RawToken::Number(lit)) => lit.suffix,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(TypeKind::UInt),
                Some(TypeKind::UShort),
                Some(TypeKind::UByte),
                Some(TypeKind::UInt64),
                Some(TypeKind::Int64),
            ]
        );
    }

    #[test]
    fn test_numbers_and_signs() {
        assert_eq!(
            raw("-1.5e3f"),
            vec![Ok(RawToken::Number(NumericLiteral {
                suffix: Some(TypeKind::Float),
                value: Number::Float(-1500.0),
            }))]
        );
        assert!(matches!(
            raw("-Infinity")[0],
            Ok(RawToken::Number(NumericLiteral { value: Number::Float(v), .. })) if v == f64::NEG_INFINITY
        ));
    }

    #[test]
    fn test_identifiers_and_paths() {
        let mut lex = RawToken::lexer(r"temp_2m x-y.z \5foo /grp/time");
        assert_eq!(lex.next(), Some(Ok(RawToken::Ident)));
        assert_eq!(lex.slice(), "temp_2m");
        assert_eq!(lex.next(), Some(Ok(RawToken::Ident)));
        assert_eq!(lex.slice(), "x-y.z");
        assert_eq!(lex.next(), Some(Ok(RawToken::Ident)));
        assert_eq!(lex.slice(), r"\5foo");
        assert_eq!(lex.next(), Some(Ok(RawToken::Path)));
        assert_eq!(lex.slice(), "/grp/time");
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_non_ascii_identifier() {
        let mut lex = RawToken::lexer("température");
        assert_eq!(lex.next(), Some(Ok(RawToken::Ident)));
        assert_eq!(lex.slice(), "température");
    }

    #[test]
    fn test_comments_and_punctuation() {
        assert_eq!(
            raw("x = 1 ; // trailing\n(,):{}"),
            vec![
                Ok(RawToken::Ident),
                Ok(RawToken::Equals),
                Ok(RawToken::Number(NumericLiteral {
                    suffix: None,
                    value: Number::Int(1),
                })),
                Ok(RawToken::Semicolon),
                Ok(RawToken::LParen),
                Ok(RawToken::Comma),
                Ok(RawToken::RParen),
                Ok(RawToken::Colon),
                Ok(RawToken::LBrace),
                Ok(RawToken::RBrace),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(raw("#"), vec![Err(LexErrorKind::UnexpectedCharacter)]);
    }
}
