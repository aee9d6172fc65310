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

//! Lexer-internal error type.
//!
//! Token callbacks report failures as a [`LexErrorKind`]; the [`Lexer`]
//! wrapper attaches the source position and converts it into a
//! [`CdlError`](crate::CdlError) of kind `Lexical` (or `Range` for
//! literals that overflow their suffix kind).
//!
//! [`Lexer`]: super::Lexer

use thiserror::Error;

/// What went wrong while scanning a single token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// No token rule matches the input at this position.
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,

    /// A `"` string runs to end of input without its closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// A character constant is not exactly one character long.
    #[error("invalid character constant")]
    InvalidCharConstant,

    /// A backslash escape is malformed or names an invalid code point.
    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),

    /// A `group:` header without a name.
    #[error("a group name is required")]
    MissingGroupName,

    /// A `netcdf` header without a dataset name.
    #[error("a netCDF name is required")]
    MissingDatasetName,

    /// A header name followed by stray words before the opening brace.
    #[error("unexpected text '{0}' after name in header")]
    TrailingHeaderText(String),

    /// An integer magnitude that does not fit in 128 bits.
    #[error("integer constant '{0}' is too large")]
    IntegerTooLarge(String),

    /// A leading-zero constant containing the digits 8 or 9.
    #[error("invalid octal constant '{0}'")]
    InvalidOctal(String),

    /// A floating constant too large for `double`.
    #[error("floating constant '{0}' is out of range")]
    FloatOutOfRange(String),

    /// A floating constant the number parser rejects.
    #[error("invalid floating constant '{0}'")]
    InvalidFloat(String),

    /// A suffixed constant whose kind the active format variant lacks.
    #[error("constant '{0}' uses a suffix not available in this format variant")]
    UnsupportedSuffix(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unexpected_character() {
        assert_eq!(LexErrorKind::default(), LexErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            LexErrorKind::InvalidOctal("09".into()).to_string(),
            "invalid octal constant '09'"
        );
        assert_eq!(
            LexErrorKind::MissingGroupName.to_string(),
            "a group name is required"
        );
    }
}
