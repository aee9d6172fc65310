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

//! Typed values stored in attributes and variable data.

use crate::types::TypeKind;
use std::fmt;

/// One element of an attribute or variable, tagged with its kind.
///
/// Character data is stored one byte per element; a char attribute such as
/// `:title = "abc"` holds three `Char` values. Use [`text_of`] to read such
/// a run back as text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Byte(i8),
    UByte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    /// A single byte of a char array.
    Char(u8),
    /// One element of a `string` variable or attribute.
    Str(String),
}

impl Value {
    /// The kind this value belongs to.
    pub fn kind(&self) -> TypeKind {
        match self {
            Value::Byte(_) => TypeKind::Byte,
            Value::UByte(_) => TypeKind::UByte,
            Value::Short(_) => TypeKind::Short,
            Value::UShort(_) => TypeKind::UShort,
            Value::Int(_) => TypeKind::Int,
            Value::UInt(_) => TypeKind::UInt,
            Value::Int64(_) => TypeKind::Int64,
            Value::UInt64(_) => TypeKind::UInt64,
            Value::Float(_) => TypeKind::Float,
            Value::Double(_) => TypeKind::Double,
            Value::Char(_) => TypeKind::Char,
            Value::Str(_) => TypeKind::String,
        }
    }

    /// Build a value of `kind` from an integer, or `None` when the integer is
    /// outside the kind's range or the kind is `string`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cdl_core::{TypeKind, Value};
    ///
    /// assert_eq!(Value::from_int(TypeKind::UByte, 255), Some(Value::UByte(255)));
    /// assert_eq!(Value::from_int(TypeKind::UByte, 256), None);
    /// assert_eq!(Value::from_int(TypeKind::Double, 3), Some(Value::Double(3.0)));
    /// ```
    pub fn from_int(kind: TypeKind, v: i128) -> Option<Value> {
        Some(match kind {
            TypeKind::Byte => Value::Byte(i8::try_from(v).ok()?),
            TypeKind::UByte => Value::UByte(u8::try_from(v).ok()?),
            TypeKind::Short => Value::Short(i16::try_from(v).ok()?),
            TypeKind::UShort => Value::UShort(u16::try_from(v).ok()?),
            TypeKind::Int => Value::Int(i32::try_from(v).ok()?),
            TypeKind::UInt => Value::UInt(u32::try_from(v).ok()?),
            TypeKind::Int64 => Value::Int64(i64::try_from(v).ok()?),
            TypeKind::UInt64 => Value::UInt64(u64::try_from(v).ok()?),
            TypeKind::Char => Value::Char(u8::try_from(v).ok()?),
            TypeKind::Float => {
                let f = v as f64;
                if f.abs() > f32::MAX as f64 {
                    return None;
                }
                Value::Float(f as f32)
            }
            TypeKind::Double => Value::Double(v as f64),
            TypeKind::String => return None,
        })
    }

    /// Build a floating value of `kind`, or `None` for a non-floating kind or
    /// a finite value beyond `float` range.
    pub fn from_float(kind: TypeKind, v: f64) -> Option<Value> {
        match kind {
            TypeKind::Double => Some(Value::Double(v)),
            TypeKind::Float if !v.is_finite() || v.abs() <= f32::MAX as f64 => {
                Some(Value::Float(v as f32))
            }
            _ => None,
        }
    }

    /// Integer content of an integer or char value.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::Byte(v) => Some(v.into()),
            Value::UByte(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::UShort(v) => Some(v.into()),
            Value::Int(v) => Some(v.into()),
            Value::UInt(v) => Some(v.into()),
            Value::Int64(v) => Some(v.into()),
            Value::UInt64(v) => Some(v.into()),
            Value::Char(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Numeric content widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v.into()),
            Value::Double(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}", v),
            Value::UByte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::UShort(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(b) => write!(f, "{}", std::ascii::escape_default(*b)),
            Value::Str(s) => write!(f, "{}", s.escape_default()),
        }
    }
}

/// Expand text into one `Char` value per byte.
///
/// Text is taken as its UTF-8 encoding; raw bytes pass through unchanged.
pub fn chars_of(text: impl AsRef<[u8]>) -> Vec<Value> {
    text.as_ref().iter().copied().map(Value::Char).collect()
}

/// The bytes of a run of `Char` values, or `None` if any value is not a
/// `Char`.
pub fn bytes_of(values: &[Value]) -> Option<Vec<u8>> {
    values
        .iter()
        .map(|v| match v {
            Value::Char(b) => Some(*b),
            _ => None,
        })
        .collect()
}

/// Read a run of `Char` values back as UTF-8 text.
///
/// Returns `None` if any value is not a `Char`. Byte sequences that are
/// not valid UTF-8 come back as U+FFFD; [`bytes_of`] gives the exact
/// bytes. Trailing NUL padding is kept.
pub fn text_of(values: &[Value]) -> Option<String> {
    bytes_of(values).map(|bytes| match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
