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

//! Literal evaluation: constant tokens to typed, range-checked values.
//!
//! A suffixed constant is first checked against its own suffix kind
//! (`256UB` fails even when assigned to an `int`), then converted into the
//! target kind. Unsuffixed constants only meet the target check.

use crate::error::{CdlError, CdlResult};
use crate::lex::{Number, NumericLiteral, SourcePos, TokenKind};
use crate::types::{FormatVariant, TypeKind};
use crate::value::Value;

/// A constant as it appears in a value list.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Numeric(NumericLiteral),
    /// Decoded string bytes.
    Str(Vec<u8>),
    Char(u8),
    /// The `_` placeholder.
    Fill,
}

impl Literal {
    /// Convert a constant token, or `None` for any other token.
    pub fn from_token(kind: &TokenKind) -> Option<Literal> {
        match kind {
            TokenKind::Number(n) => Some(Literal::Numeric(*n)),
            TokenKind::Str(s) => Some(Literal::Str(s.clone())),
            TokenKind::CharConst(c) => Some(Literal::Char(*c)),
            TokenKind::Fill => Some(Literal::Fill),
            _ => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Literal::Numeric(n) if n.is_floating() => "floating constant",
            Literal::Numeric(_) => "integer constant",
            Literal::Str(_) => "string",
            Literal::Char(_) => "character constant",
            Literal::Fill => "'_'",
        }
    }
}

/// Result of evaluating one literal against a target kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Value(Value),
    /// Bytes destined for a `char` target; the caller lays them out.
    Text(Vec<u8>),
    /// Resolve to the variable's fill value at assignment time.
    Fill,
}

/// Evaluate `literal` as a value of `target`.
///
/// # Examples
///
/// ```
/// use cdl_core::lex::parse_numeric;
/// use cdl_core::literal::{evaluate, Evaluated, Literal};
/// use cdl_core::lex::SourcePos;
/// use cdl_core::{CdlErrorKind, TypeKind, Value};
///
/// let ok = Literal::Numeric(parse_numeric("255UB").unwrap());
/// assert_eq!(
///     evaluate(&ok, TypeKind::UByte, SourcePos::start()).unwrap(),
///     Evaluated::Value(Value::UByte(255))
/// );
///
/// let too_big = Literal::Numeric(parse_numeric("256UB").unwrap());
/// let err = evaluate(&too_big, TypeKind::Int, SourcePos::start()).unwrap_err();
/// assert_eq!(err.kind, CdlErrorKind::Range);
/// ```
pub fn evaluate(literal: &Literal, target: TypeKind, pos: SourcePos) -> CdlResult<Evaluated> {
    match literal {
        Literal::Fill => Ok(Evaluated::Fill),
        Literal::Numeric(n) => evaluate_numeric(n, target, pos).map(Evaluated::Value),
        Literal::Str(s) => match target {
            TypeKind::Char => Ok(Evaluated::Text(s.clone())),
            TypeKind::String if s == b"_" => Ok(Evaluated::Fill),
            TypeKind::String => utf8(s.clone(), pos).map(|s| Evaluated::Value(Value::Str(s))),
            _ => Err(mismatch(literal, target, pos)),
        },
        Literal::Char(c) => match target {
            TypeKind::Char => Ok(Evaluated::Value(Value::Char(*c))),
            TypeKind::String => utf8(vec![*c], pos).map(|s| Evaluated::Value(Value::Str(s))),
            _ => Value::from_int(target, i128::from(*c))
                .map(Evaluated::Value)
                .ok_or_else(|| out_of_range(&c.to_string(), target, pos)),
        },
    }
}

/// `string` values hold text, so their bytes must be valid UTF-8.
fn utf8(bytes: Vec<u8>, pos: SourcePos) -> CdlResult<String> {
    String::from_utf8(bytes).map_err(|e| {
        CdlError::type_mismatch(
            format!(
                "string value is not valid UTF-8 after byte {}",
                e.utf8_error().valid_up_to()
            ),
            pos,
        )
    })
}

fn evaluate_numeric(n: &NumericLiteral, target: TypeKind, pos: SourcePos) -> CdlResult<Value> {
    if let Some(suffix) = n.suffix {
        let fits = match n.value {
            Number::Int(v) => suffix.range().contains_int(v),
            Number::Float(v) => suffix.range().contains_float(v),
        };
        if !fits {
            return Err(out_of_range(&number_text(n), suffix, pos));
        }
    }

    if target.is_text() {
        return Err(mismatch(&Literal::Numeric(*n), target, pos));
    }

    match n.value {
        Number::Int(v) => {
            Value::from_int(target, v).ok_or_else(|| out_of_range(&v.to_string(), target, pos))
        }
        Number::Float(_) if target.is_integer() => Err(mismatch(&Literal::Numeric(*n), target, pos)),
        Number::Float(v) => {
            Value::from_float(target, v).ok_or_else(|| out_of_range(&v.to_string(), target, pos))
        }
    }
}

/// Kind of an untyped attribute whose first value is `literal`.
///
/// Unsuffixed integers are `int`; beyond `int` range they widen to `int64`
/// (then `uint64`) when the variant has 64-bit kinds and to `double`
/// otherwise.
pub fn infer_kind(literal: &Literal, variant: FormatVariant, pos: SourcePos) -> CdlResult<TypeKind> {
    match literal {
        Literal::Numeric(NumericLiteral {
            suffix: Some(kind), ..
        }) => Ok(*kind),
        Literal::Numeric(NumericLiteral {
            value: Number::Float(_),
            ..
        }) => Ok(TypeKind::Double),
        Literal::Numeric(NumericLiteral {
            value: Number::Int(v),
            ..
        }) => Ok(widen_int(*v, variant)),
        Literal::Str(_) | Literal::Char(_) => Ok(TypeKind::Char),
        Literal::Fill => Err(CdlError::type_mismatch(
            "cannot infer an attribute type from '_'",
            pos,
        )),
    }
}

fn widen_int(v: i128, variant: FormatVariant) -> TypeKind {
    let candidates: &[TypeKind] = if variant.has_extended_integers() {
        &[TypeKind::Int, TypeKind::Int64, TypeKind::UInt64]
    } else {
        &[TypeKind::Int]
    };
    candidates
        .iter()
        .copied()
        .find(|k| k.range().contains_int(v))
        .unwrap_or(TypeKind::Double)
}

fn number_text(n: &NumericLiteral) -> String {
    let value = match n.value {
        Number::Int(v) => v.to_string(),
        Number::Float(v) => v.to_string(),
    };
    match n.suffix {
        Some(kind) => format!("{} ({})", value, kind),
        None => value,
    }
}

fn out_of_range(text: &str, kind: TypeKind, pos: SourcePos) -> CdlError {
    CdlError::range(
        format!(
            "constant {} is outside the {} range ({})",
            text,
            kind,
            kind.range()
        ),
        pos,
    )
}

fn mismatch(literal: &Literal, target: TypeKind, pos: SourcePos) -> CdlError {
    CdlError::type_mismatch(
        format!("cannot use a {} as a {} value", literal.describe(), target),
        pos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CdlErrorKind;
    use crate::lex::parse_numeric;

    fn num(text: &str) -> Literal {
        Literal::Numeric(parse_numeric(text).unwrap())
    }

    fn eval(lit: &Literal, target: TypeKind) -> CdlResult<Evaluated> {
        evaluate(lit, target, SourcePos::new(1, 1))
    }

    fn value(lit: &Literal, target: TypeKind) -> Value {
        match eval(lit, target).unwrap() {
            Evaluated::Value(v) => v,
            other => panic!("expected value, got {:?}", other),
        }
    }

    fn err_kind(lit: &Literal, target: TypeKind) -> CdlErrorKind {
        eval(lit, target).unwrap_err().kind
    }

    #[test]
    fn test_suffix_range_boundary() {
        assert_eq!(value(&num("255UB"), TypeKind::UByte), Value::UByte(255));
        assert_eq!(err_kind(&num("256UB"), TypeKind::UByte), CdlErrorKind::Range);
        assert_eq!(err_kind(&num("256UB"), TypeKind::Int), CdlErrorKind::Range);
        assert_eq!(err_kind(&num("-129b"), TypeKind::Short), CdlErrorKind::Range);
        assert_eq!(err_kind(&num("32768s"), TypeKind::Int), CdlErrorKind::Range);
    }

    #[test]
    fn test_target_range() {
        assert_eq!(value(&num("127"), TypeKind::Byte), Value::Byte(127));
        assert_eq!(err_kind(&num("128"), TypeKind::Byte), CdlErrorKind::Range);
        assert_eq!(err_kind(&num("-10"), TypeKind::UInt), CdlErrorKind::Range);
        assert_eq!(err_kind(&num("1e39"), TypeKind::Float), CdlErrorKind::Range);
    }

    #[test]
    fn test_encodings_agree() {
        for text in ["0xFF", "0377", "255"] {
            assert_eq!(value(&num(text), TypeKind::UByte), Value::UByte(255), "{}", text);
        }
    }

    #[test]
    fn test_type_mismatches() {
        assert_eq!(err_kind(&num("1.5"), TypeKind::Int), CdlErrorKind::TypeMismatch);
        assert_eq!(err_kind(&num("1"), TypeKind::Char), CdlErrorKind::TypeMismatch);
        assert_eq!(err_kind(&num("1"), TypeKind::String), CdlErrorKind::TypeMismatch);
        assert_eq!(
            err_kind(&Literal::Str(b"x".to_vec()), TypeKind::Double),
            CdlErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_integers_into_floating_kinds() {
        assert_eq!(value(&num("3"), TypeKind::Double), Value::Double(3.0));
        assert_eq!(value(&num("2.5"), TypeKind::Float), Value::Float(2.5));
        assert_eq!(value(&num("2.5f"), TypeKind::Double), Value::Double(2.5));
    }

    #[test]
    fn test_text_targets() {
        assert_eq!(
            eval(&Literal::Str(b"abc".to_vec()), TypeKind::Char).unwrap(),
            Evaluated::Text(b"abc".to_vec())
        );
        assert_eq!(
            value(&Literal::Str("abc é".into()), TypeKind::String),
            Value::Str("abc é".into())
        );
        assert_eq!(
            eval(&Literal::Str(b"_".to_vec()), TypeKind::String).unwrap(),
            Evaluated::Fill
        );
        assert_eq!(
            err_kind(&Literal::Str(vec![b'a', 0xE9]), TypeKind::String),
            CdlErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_char_constants() {
        assert_eq!(value(&Literal::Char(b'a'), TypeKind::Char), Value::Char(b'a'));
        assert_eq!(value(&Literal::Char(b'a'), TypeKind::Byte), Value::Byte(97));
        assert_eq!(value(&Literal::Char(0xE9), TypeKind::UByte), Value::UByte(0xE9));
        assert_eq!(err_kind(&Literal::Char(0xE9), TypeKind::Byte), CdlErrorKind::Range);
    }

    #[test]
    fn test_fill_placeholder() {
        assert_eq!(eval(&Literal::Fill, TypeKind::Int).unwrap(), Evaluated::Fill);
    }

    #[test]
    fn test_infer_kind() {
        let pos = SourcePos::start();
        let classic = FormatVariant::Classic;
        let cdf5 = FormatVariant::Classic64;
        assert_eq!(infer_kind(&num("1"), classic, pos).unwrap(), TypeKind::Int);
        assert_eq!(infer_kind(&num("3000000000"), classic, pos).unwrap(), TypeKind::Double);
        assert_eq!(infer_kind(&num("3000000000"), cdf5, pos).unwrap(), TypeKind::Int64);
        assert_eq!(
            infer_kind(&num("18446744073709551614"), cdf5, pos).unwrap(),
            TypeKind::UInt64
        );
        assert_eq!(infer_kind(&num("1.5"), classic, pos).unwrap(), TypeKind::Double);
        assert_eq!(infer_kind(&num("1.5f"), classic, pos).unwrap(), TypeKind::Float);
        assert_eq!(infer_kind(&num("7US"), cdf5, pos).unwrap(), TypeKind::UShort);
        assert_eq!(
            infer_kind(&Literal::Str(b"t".to_vec()), classic, pos).unwrap(),
            TypeKind::Char
        );
        assert!(infer_kind(&Literal::Fill, classic, pos).is_err());
    }
}
