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

//! Numeric constant decoding.
//!
//! A numeric token carries an optional width/signedness suffix and a
//! magnitude. Integers are decoded into `i128` so every legal suffix kind,
//! `uint64` included, fits before the range check; floating constants are
//! decoded into `f64`.
//!
//! | suffix | kind | notes |
//! |--------|------|-------|
//! | `B` | byte | decimal only |
//! | `UB` | ubyte | decimal only |
//! | `S` | short | |
//! | `US` | ushort | |
//! | `L` | int | |
//! | `U` | uint | |
//! | `LL` | int64 | |
//! | `ULL` | uint64 | |
//! | `f`, `F` | float | floating constants |
//! | `d`, `D`, `l`, `L`, none | double | floating constants |

use super::error::LexErrorKind;
use crate::types::TypeKind;

/// Decoded magnitude of a numeric constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i128),
    Float(f64),
}

/// A numeric constant as written in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericLiteral {
    /// Kind named by the suffix; `None` for an unsuffixed constant.
    pub suffix: Option<TypeKind>,
    pub value: Number,
}

impl NumericLiteral {
    pub fn is_floating(&self) -> bool {
        matches!(self.value, Number::Float(_))
    }
}

/// Decode the text of a numeric token.
///
/// # Examples
///
/// ```
/// use cdl_core::lex::{parse_numeric, Number};
/// use cdl_core::TypeKind;
///
/// let lit = parse_numeric("0xFFUS").unwrap();
/// assert_eq!(lit.suffix, Some(TypeKind::UShort));
/// assert_eq!(lit.value, Number::Int(255));
///
/// assert_eq!(parse_numeric("0377").unwrap().value, Number::Int(255));
/// assert_eq!(parse_numeric("-2.5f").unwrap().suffix, Some(TypeKind::Float));
/// ```
pub fn parse_numeric(text: &str) -> Result<NumericLiteral, LexErrorKind> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return parse_special(text, negative, body);
    }

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        let split = hex
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(hex.len());
        let (digits, suffix) = hex.split_at(split);
        let magnitude =
            u128::from_str_radix(digits, 16).map_err(|_| LexErrorKind::IntegerTooLarge(text.into()))?;
        return integer(text, negative, magnitude, suffix);
    }

    if body.contains(['.', 'e', 'E']) {
        return parse_floating(text, negative, body);
    }

    let split = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (digits, suffix) = body.split_at(split);
    let magnitude = if digits.len() > 1 && digits.starts_with('0') {
        if digits.contains(['8', '9']) {
            return Err(LexErrorKind::InvalidOctal(text.into()));
        }
        u128::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<u128>()
    }
    .map_err(|_| LexErrorKind::IntegerTooLarge(text.into()))?;
    integer(text, negative, magnitude, suffix)
}

fn integer(
    text: &str,
    negative: bool,
    magnitude: u128,
    suffix: &str,
) -> Result<NumericLiteral, LexErrorKind> {
    let suffix = match suffix.to_ascii_lowercase().as_str() {
        "" => None,
        "b" => Some(TypeKind::Byte),
        "ub" => Some(TypeKind::UByte),
        "s" => Some(TypeKind::Short),
        "us" => Some(TypeKind::UShort),
        "l" => Some(TypeKind::Int),
        "u" => Some(TypeKind::UInt),
        "ll" => Some(TypeKind::Int64),
        "ull" => Some(TypeKind::UInt64),
        _ => return Err(LexErrorKind::UnexpectedCharacter),
    };
    let signed = i128::try_from(magnitude).map_err(|_| LexErrorKind::IntegerTooLarge(text.into()))?;
    Ok(NumericLiteral {
        suffix,
        value: Number::Int(if negative { -signed } else { signed }),
    })
}

fn parse_floating(text: &str, negative: bool, body: &str) -> Result<NumericLiteral, LexErrorKind> {
    let (mantissa, suffix) = match body.chars().last() {
        Some('f' | 'F') => (&body[..body.len() - 1], Some(TypeKind::Float)),
        Some('d' | 'D' | 'l' | 'L') => (&body[..body.len() - 1], Some(TypeKind::Double)),
        _ => (body, None),
    };
    let v: f64 = mantissa
        .parse()
        .map_err(|_| LexErrorKind::InvalidFloat(text.into()))?;
    if v.is_infinite() {
        return Err(LexErrorKind::FloatOutOfRange(text.into()));
    }
    Ok(NumericLiteral {
        suffix,
        value: Number::Float(if negative { -v } else { v }),
    })
}

/// `NaN`, `Infinity` and their `f`-suffixed float spellings.
fn parse_special(text: &str, negative: bool, body: &str) -> Result<NumericLiteral, LexErrorKind> {
    let (word, suffix) = match body.strip_suffix(['f', 'F']) {
        Some(word) if word.eq_ignore_ascii_case("nan") || word.eq_ignore_ascii_case("infinity") => {
            (word, Some(TypeKind::Float))
        }
        _ => (body, None),
    };
    let v = if word.eq_ignore_ascii_case("nan") {
        f64::NAN
    } else if word.eq_ignore_ascii_case("infinity") {
        f64::INFINITY
    } else {
        return Err(LexErrorKind::InvalidFloat(text.into()));
    };
    Ok(NumericLiteral {
        suffix,
        value: Number::Float(if negative { -v } else { v }),
    })
}
