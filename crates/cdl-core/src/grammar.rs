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

//! Declaration handlers and the per-variant production table.
//!
//! The parser recognises a declaration and immediately calls the matching
//! handler from a [`ProductionTable`]. Variants differ only in which
//! handler occupies each slot; the shared rules are plain functions that
//! the variant-specific entries call.

use crate::builder::{DatasetBuilder, DimName, FILL_VALUE_ATTRIBUTE};
use crate::dataset::{Attribute, DimRef};
use crate::error::{CdlError, CdlResult};
use crate::lex::{Number, NumericLiteral, SourcePos};
use crate::literal::{evaluate, infer_kind, Evaluated, Literal};
use crate::types::{FormatVariant, TypeKind};
use crate::value::{chars_of, Value};

/// `name = size` or `name = unlimited`.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionDecl {
    pub name: String,
    /// `None` for `unlimited`.
    pub size: Option<NumericLiteral>,
    pub pos: SourcePos,
}

/// `type name(dim, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub kind: TypeKind,
    pub name: String,
    pub dims: Vec<(DimName, SourcePos)>,
    pub pos: SourcePos,
}

/// `[type] [target]:name = values`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    pub kind: Option<TypeKind>,
    /// `None` for a group (global) attribute.
    pub target: Option<String>,
    pub name: String,
    pub values: Vec<(Literal, SourcePos)>,
    pub pos: SourcePos,
}

/// `name = values` in a data section.
#[derive(Debug, Clone, PartialEq)]
pub struct DataDecl {
    pub name: String,
    pub values: Vec<(Literal, SourcePos)>,
    pub pos: SourcePos,
}

pub type DimensionHandler = fn(&mut DatasetBuilder<'_>, &DimensionDecl) -> CdlResult<()>;
pub type VariableHandler = fn(&mut DatasetBuilder<'_>, &VariableDecl) -> CdlResult<()>;
pub type AttributeHandler = fn(&mut DatasetBuilder<'_>, &AttributeDecl) -> CdlResult<()>;
pub type DataHandler = fn(&mut DatasetBuilder<'_>, &DataDecl) -> CdlResult<()>;

/// Handlers and grammar switches for one format variant.
#[derive(Clone, Copy)]
pub struct ProductionTable {
    pub variant: FormatVariant,
    pub dimension: DimensionHandler,
    pub variable: VariableHandler,
    pub attribute: AttributeHandler,
    pub data: DataHandler,
    /// `type var:att = ...` is accepted.
    pub typed_attributes: bool,
    /// `group:` blocks are accepted.
    pub groups: bool,
}

impl ProductionTable {
    pub fn for_variant(variant: FormatVariant, allow_groups: bool) -> Self {
        match variant {
            FormatVariant::Classic => Self {
                variant,
                dimension: classic_dimension,
                variable: classic_variable,
                attribute: define_attribute,
                data: assign_data,
                typed_attributes: false,
                groups: false,
            },
            FormatVariant::Classic64 => Self {
                variant,
                dimension: classic_dimension,
                variable: classic_variable,
                attribute: define_attribute,
                data: assign_data,
                typed_attributes: true,
                groups: false,
            },
            FormatVariant::Hierarchical => Self {
                variant,
                dimension: define_dimension,
                variable: define_variable,
                attribute: define_attribute,
                data: assign_data,
                typed_attributes: true,
                groups: allow_groups,
            },
        }
    }
}

impl std::fmt::Debug for ProductionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductionTable")
            .field("variant", &self.variant)
            .field("typed_attributes", &self.typed_attributes)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

/// Dimension rule shared by every variant: positive integral size or
/// unlimited, unique name in scope.
pub fn define_dimension(b: &mut DatasetBuilder<'_>, decl: &DimensionDecl) -> CdlResult<()> {
    let len = match decl.size {
        None => None,
        Some(lit) => Some(dimension_length(&lit, &decl.name, decl.pos)?),
    };
    b.define_dimension(&decl.name, len, decl.pos)
}

/// Classic variants allow one unlimited dimension per scope.
fn classic_dimension(b: &mut DatasetBuilder<'_>, decl: &DimensionDecl) -> CdlResult<()> {
    if decl.size.is_none() {
        let group = b.dataset().group(b.current_group());
        if let Some(existing) = group.dimensions.iter().find(|d| d.is_unlimited()) {
            return Err(CdlError::shape(
                format!(
                    "dimension '{}' cannot be unlimited: '{}' already is",
                    decl.name, existing.name
                ),
                decl.pos,
            ));
        }
    }
    define_dimension(b, decl)
}

fn dimension_length(lit: &NumericLiteral, name: &str, pos: SourcePos) -> CdlResult<usize> {
    let len = match lit.value {
        Number::Int(v) if v > 0 => usize::try_from(v).ok(),
        Number::Float(v) if v.is_finite() && v >= 1.0 && v.fract() == 0.0 && v <= usize::MAX as f64 => {
            Some(v as usize)
        }
        _ => None,
    };
    len.ok_or_else(|| {
        CdlError::range(
            format!("size of dimension '{}' must be a positive integer", name),
            pos,
        )
    })
}

fn resolve_dims(b: &DatasetBuilder<'_>, decl: &VariableDecl) -> CdlResult<Vec<DimRef>> {
    decl.dims
        .iter()
        .map(|(name, pos)| b.resolve_dimension(name, *pos))
        .collect()
}

/// Variable rule shared by every variant.
pub fn define_variable(b: &mut DatasetBuilder<'_>, decl: &VariableDecl) -> CdlResult<()> {
    let dims = resolve_dims(b, decl)?;
    b.define_variable(&decl.name, decl.kind, dims, decl.pos)
}

/// Classic variants store records along the leading dimension only.
fn classic_variable(b: &mut DatasetBuilder<'_>, decl: &VariableDecl) -> CdlResult<()> {
    let dims = resolve_dims(b, decl)?;
    for (i, r) in dims.iter().enumerate().skip(1) {
        if b.dataset().dimension(*r).is_unlimited() {
            return Err(CdlError::shape(
                format!(
                    "unlimited dimension '{}' must be the first dimension of '{}'",
                    b.dataset().dimension(*r).name,
                    decl.name
                ),
                decl.dims[i].1,
            ));
        }
    }
    b.define_variable(&decl.name, decl.kind, dims, decl.pos)
}

/// Attribute rule: explicit or inferred kind, char values concatenated,
/// `_FillValue` bound to its variable's kind.
///
/// `_` takes the owning variable's fill when the attribute has the
/// variable's kind, and the kind's default fill otherwise. An untyped
/// variable attribute that starts with `_` takes the variable's kind.
pub fn define_attribute(b: &mut DatasetBuilder<'_>, decl: &AttributeDecl) -> CdlResult<()> {
    let (first, first_pos) = decl
        .values
        .first()
        .ok_or_else(|| CdlError::syntax(format!("attribute '{}' has no values", decl.name), decl.pos))?;

    let owner = match &decl.target {
        Some(name) => {
            let var = b.variable(name, decl.pos)?;
            Some((var.kind, b.fill_value_of(var)))
        }
        None => None,
    };
    let is_fill_value = owner.is_some() && decl.name == FILL_VALUE_ATTRIBUTE;

    let kind = match (decl.kind, &owner) {
        (Some(declared), Some((var_kind, _))) if is_fill_value && declared != *var_kind => {
            return Err(CdlError::type_mismatch(
                format!(
                    "_FillValue declared as {} on a {} variable",
                    declared, var_kind
                ),
                decl.pos,
            ))
        }
        (Some(declared), _) => declared,
        (None, Some((var_kind, _))) if is_fill_value || *first == Literal::Fill => *var_kind,
        (None, _) => infer_kind(first, b.registry().variant(), *first_pos)?,
    };

    let fill = match &owner {
        Some((var_kind, var_fill)) if *var_kind == kind => var_fill.clone(),
        _ => b.registry().default_fill(kind),
    };
    let (values, placeholders) = attribute_values(kind, &fill, &decl.values)?;

    if is_fill_value && values.len() != 1 {
        return Err(CdlError::shape(
            format!("_FillValue must hold exactly one value, found {}", values.len()),
            decl.pos,
        ));
    }

    let follows_fill = matches!(&owner, Some((var_kind, _)) if *var_kind == kind) && !is_fill_value;
    let placeholders: &[usize] = if follows_fill { &placeholders } else { &[] };
    b.set_attribute_with_placeholders(
        decl.target.as_deref(),
        Attribute::new(decl.name.clone(), kind, values),
        placeholders,
        decl.pos,
    )
}

/// Evaluate attribute literals, returning the values and the slots that
/// came from `_`.
fn attribute_values(
    kind: TypeKind,
    fill: &Value,
    literals: &[(Literal, SourcePos)],
) -> CdlResult<(Vec<Value>, Vec<usize>)> {
    let mut bytes = Vec::new();
    let mut values = Vec::with_capacity(literals.len());
    let mut placeholders = Vec::new();
    for (lit, pos) in literals {
        match evaluate(lit, kind, *pos)? {
            Evaluated::Value(Value::Char(c)) => bytes.push(c),
            Evaluated::Value(v) => values.push(v),
            Evaluated::Text(s) => bytes.extend_from_slice(&s),
            Evaluated::Fill => match fill {
                Value::Char(c) => {
                    placeholders.push(bytes.len());
                    bytes.push(*c);
                }
                v => {
                    placeholders.push(values.len());
                    values.push(v.clone());
                }
            },
        }
    }
    if kind == TypeKind::Char {
        return Ok((chars_of(&bytes), placeholders));
    }
    Ok((values, placeholders))
}

/// Data rule: evaluate against the variable's kind, then let the builder
/// lay the values out.
pub fn assign_data(b: &mut DatasetBuilder<'_>, decl: &DataDecl) -> CdlResult<()> {
    let kind = b.variable(&decl.name, decl.pos)?.kind;
    let items = decl
        .values
        .iter()
        .map(|(lit, pos)| evaluate(lit, kind, *pos))
        .collect::<CdlResult<Vec<_>>>()?;
    b.write_data(&decl.name, items, decl.pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::parse_numeric;

    #[test]
    fn test_tables_per_variant() {
        let classic = ProductionTable::for_variant(FormatVariant::Classic, true);
        assert!(!classic.typed_attributes);
        assert!(!classic.groups);

        let cdf5 = ProductionTable::for_variant(FormatVariant::Classic64, true);
        assert!(cdf5.typed_attributes);
        assert!(!cdf5.groups);

        let nc4 = ProductionTable::for_variant(FormatVariant::Hierarchical, true);
        assert!(nc4.typed_attributes);
        assert!(nc4.groups);

        let flat = ProductionTable::for_variant(FormatVariant::Hierarchical, false);
        assert!(!flat.groups);
    }

    #[test]
    fn test_dimension_length() {
        let pos = SourcePos::start();
        let len = |t: &str| dimension_length(&parse_numeric(t).unwrap(), "d", pos);
        assert_eq!(len("5").unwrap(), 5);
        assert_eq!(len("0x10").unwrap(), 16);
        assert_eq!(len("3.0").unwrap(), 3);
        assert!(len("0").is_err());
        assert!(len("-2").is_err());
        assert!(len("2.5").is_err());
    }
}
