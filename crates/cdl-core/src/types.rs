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

//! Format variants and the per-variant type registry.
//!
//! A [`FormatVariant`] is fixed for the whole parse. It selects a
//! [`TypeRegistry`]: which type keywords are reserved, which numeric
//! suffixes are legal, and the default fill value of every kind.
//!
//! # Examples
//!
//! ```
//! use cdl_core::{FormatVariant, TypeKind, TypeRegistry, Value};
//!
//! let classic = TypeRegistry::new(FormatVariant::Classic);
//! assert_eq!(classic.resolve("REAL"), Some(TypeKind::Float));
//! assert_eq!(classic.resolve("uint64"), None);
//!
//! let cdf5 = TypeRegistry::new(FormatVariant::Classic64);
//! assert_eq!(cdf5.resolve("uint64"), Some(TypeKind::UInt64));
//! assert_eq!(cdf5.default_fill(TypeKind::UShort), Value::UShort(65535));
//! ```

use crate::error::{CdlError, CdlResult};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The on-disk format family a CDL document is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatVariant {
    /// Classic netCDF: byte, char, short, int, float, double.
    #[default]
    Classic,
    /// CDF-5: classic plus unsigned and 64-bit integer kinds.
    Classic64,
    /// NetCDF-4: CDF-5 kinds plus `string` and nested groups.
    Hierarchical,
}

impl FormatVariant {
    /// Unsigned and 64-bit kinds (and their literal suffixes) are available.
    pub fn has_extended_integers(self) -> bool {
        !matches!(self, FormatVariant::Classic)
    }

    /// `group:` blocks and the `string` kind are available.
    pub fn has_groups(self) -> bool {
        matches!(self, FormatVariant::Hierarchical)
    }

    /// Classic rules restrict unlimited dimensions to one per scope, in
    /// the leading position of a variable's shape.
    pub fn is_classic_family(self) -> bool {
        !matches!(self, FormatVariant::Hierarchical)
    }

    /// Short lowercase name used in configuration and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatVariant::Classic => "classic",
            FormatVariant::Classic64 => "cdf5",
            FormatVariant::Hierarchical => "netcdf4",
        }
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "cdl3" | "netcdf3" => Ok(FormatVariant::Classic),
            "cdf5" | "classic64" | "64bit-data" => Ok(FormatVariant::Classic64),
            "netcdf4" | "cdl4" | "hierarchical" => Ok(FormatVariant::Hierarchical),
            other => Err(format!("unknown format variant '{}'", other)),
        }
    }
}

/// The element type of an attribute or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// 8-bit signed integer, spelled `byte`.
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    /// One byte of text.
    Char,
    /// Variable-length text (Hierarchical only).
    String,
}

/// Legal value interval of a kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    /// Inclusive integer bounds.
    Integer { min: i128, max: i128 },
    /// Finite magnitudes up to `max`; NaN and infinities are always legal.
    Floating { max: f64 },
    /// Text kinds have no numeric range.
    Text,
}

impl NumericRange {
    /// Whether an integer magnitude lies inside the range.
    pub fn contains_int(&self, v: i128) -> bool {
        match *self {
            NumericRange::Integer { min, max } => (min..=max).contains(&v),
            NumericRange::Floating { max } => (v as f64).abs() <= max,
            NumericRange::Text => false,
        }
    }

    /// Whether a floating value lies inside the range.
    pub fn contains_float(&self, v: f64) -> bool {
        match *self {
            NumericRange::Floating { max } => !v.is_finite() || v.abs() <= max,
            NumericRange::Integer { min, max } => {
                v.is_finite() && v.fract() == 0.0 && v >= min as f64 && v <= max as f64
            }
            NumericRange::Text => false,
        }
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericRange::Integer { min, max } => write!(f, "{} -> {}", min, max),
            NumericRange::Floating { max } => write!(f, "-{:e} -> {:e}", max, max),
            NumericRange::Text => write!(f, "text"),
        }
    }
}

impl TypeKind {
    /// Every kind, in declaration order.
    pub const ALL: [TypeKind; 12] = [
        TypeKind::Byte,
        TypeKind::UByte,
        TypeKind::Short,
        TypeKind::UShort,
        TypeKind::Int,
        TypeKind::UInt,
        TypeKind::Int64,
        TypeKind::UInt64,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::Char,
        TypeKind::String,
    ];

    /// Canonical CDL keyword.
    pub fn cdl_name(self) -> &'static str {
        match self {
            TypeKind::Byte => "byte",
            TypeKind::UByte => "ubyte",
            TypeKind::Short => "short",
            TypeKind::UShort => "ushort",
            TypeKind::Int => "int",
            TypeKind::UInt => "uint",
            TypeKind::Int64 => "int64",
            TypeKind::UInt64 => "uint64",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::Char => "char",
            TypeKind::String => "string",
        }
    }

    /// Signed or unsigned integer of any width.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeKind::Byte
                | TypeKind::UByte
                | TypeKind::Short
                | TypeKind::UShort
                | TypeKind::Int
                | TypeKind::UInt
                | TypeKind::Int64
                | TypeKind::UInt64
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, TypeKind::Float | TypeKind::Double)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// `char` or `string`: kinds that accept string constants.
    pub fn is_text(self) -> bool {
        matches!(self, TypeKind::Char | TypeKind::String)
    }

    /// Legal values of this kind.
    pub fn range(self) -> NumericRange {
        let int = |min: i128, max: i128| NumericRange::Integer { min, max };
        match self {
            TypeKind::Byte => int(i8::MIN.into(), i8::MAX.into()),
            TypeKind::UByte => int(0, u8::MAX.into()),
            TypeKind::Short => int(i16::MIN.into(), i16::MAX.into()),
            TypeKind::UShort => int(0, u16::MAX.into()),
            TypeKind::Int => int(i32::MIN.into(), i32::MAX.into()),
            TypeKind::UInt => int(0, u32::MAX.into()),
            TypeKind::Int64 => int(i64::MIN.into(), i64::MAX.into()),
            TypeKind::UInt64 => int(0, u64::MAX.into()),
            TypeKind::Float => NumericRange::Floating {
                max: f32::MAX as f64,
            },
            TypeKind::Double => NumericRange::Floating { max: f64::MAX },
            TypeKind::Char | TypeKind::String => NumericRange::Text,
        }
    }

    /// The netcdf.h default fill value of this kind.
    pub fn default_fill(self) -> Value {
        match self {
            TypeKind::Byte => Value::Byte(-127),
            TypeKind::UByte => Value::UByte(255),
            TypeKind::Short => Value::Short(-32767),
            TypeKind::UShort => Value::UShort(65535),
            TypeKind::Int => Value::Int(-2147483647),
            TypeKind::UInt => Value::UInt(4294967295),
            TypeKind::Int64 => Value::Int64(-9223372036854775806),
            TypeKind::UInt64 => Value::UInt64(18446744073709551614),
            TypeKind::Float => Value::Float(9.969_209_968_386_869e36_f64 as f32),
            TypeKind::Double => Value::Double(9.969_209_968_386_869e36),
            TypeKind::Char => Value::Char(0),
            TypeKind::String => Value::Str(String::new()),
        }
    }

    /// Earliest format variant in which this kind exists.
    pub fn introduced_in(self) -> FormatVariant {
        match self {
            TypeKind::UByte
            | TypeKind::UShort
            | TypeKind::UInt
            | TypeKind::Int64
            | TypeKind::UInt64 => FormatVariant::Classic64,
            TypeKind::String => FormatVariant::Hierarchical,
            _ => FormatVariant::Classic,
        }
    }

    /// Whether this kind is legal in `variant`.
    pub fn is_legal_in(self, variant: FormatVariant) -> bool {
        match self.introduced_in() {
            FormatVariant::Classic => true,
            FormatVariant::Classic64 => variant.has_extended_integers(),
            FormatVariant::Hierarchical => variant.has_groups(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cdl_name())
    }
}

impl FromStr for TypeKind {
    type Err = String;

    /// Parses any keyword spelling, ignoring the variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        keyword_kind(&s.to_ascii_lowercase()).ok_or_else(|| format!("unknown type '{}'", s))
    }
}

/// Keyword spellings, including the classic aliases.
fn keyword_kind(lower: &str) -> Option<TypeKind> {
    Some(match lower {
        "byte" => TypeKind::Byte,
        "char" => TypeKind::Char,
        "short" => TypeKind::Short,
        "int" | "integer" | "long" => TypeKind::Int,
        "float" | "real" => TypeKind::Float,
        "double" => TypeKind::Double,
        "ubyte" => TypeKind::UByte,
        "ushort" => TypeKind::UShort,
        "uint" => TypeKind::UInt,
        "int64" => TypeKind::Int64,
        "uint64" => TypeKind::UInt64,
        "string" => TypeKind::String,
        _ => return None,
    })
}

/// Per-variant table of legal types and fill values.
///
/// Built once when a parser is constructed and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    variant: FormatVariant,
    legal: Vec<TypeKind>,
    fill_overrides: HashMap<TypeKind, Value>,
}

impl TypeRegistry {
    /// Registry with the netcdf.h default fills.
    pub fn new(variant: FormatVariant) -> Self {
        let legal = TypeKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_legal_in(variant))
            .collect();
        Self {
            variant,
            legal,
            fill_overrides: HashMap::new(),
        }
    }

    /// Registry whose default fills are replaced by `overrides`.
    ///
    /// Every override must hold a value of its own kind, and the kind must
    /// be legal in `variant`.
    pub fn with_fill_overrides(
        variant: FormatVariant,
        overrides: &HashMap<TypeKind, Value>,
    ) -> CdlResult<Self> {
        let mut registry = Self::new(variant);
        for (kind, value) in overrides {
            if !kind.is_legal_in(variant) {
                return Err(CdlError::type_mismatch(
                    format!("fill override for '{}' which {} does not support", kind, variant),
                    Default::default(),
                ));
            }
            if value.kind() != *kind {
                return Err(CdlError::type_mismatch(
                    format!(
                        "fill override for '{}' holds a '{}' value",
                        kind,
                        value.kind()
                    ),
                    Default::default(),
                ));
            }
            registry.fill_overrides.insert(*kind, value.clone());
        }
        Ok(registry)
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Resolve a (case-insensitive) type keyword.
    ///
    /// Keywords of kinds the variant lacks are not reserved and resolve to
    /// `None`, so `int64` is an ordinary identifier in a classic document.
    pub fn resolve(&self, keyword: &str) -> Option<TypeKind> {
        keyword_kind(&keyword.to_ascii_lowercase()).filter(|k| k.is_legal_in(self.variant))
    }

    /// Kinds legal in this variant, in declaration order.
    pub fn legal_types(&self) -> &[TypeKind] {
        &self.legal
    }

    /// Whether declarations of `kind` are accepted in this variant.
    pub fn is_legal(&self, kind: TypeKind) -> bool {
        kind.is_legal_in(self.variant)
    }

    /// Fill value used for `kind` when a variable declares no `_FillValue`.
    pub fn default_fill(&self, kind: TypeKind) -> Value {
        self.fill_overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_fill())
    }

    pub fn range(&self, kind: TypeKind) -> NumericRange {
        kind.range()
    }
}
