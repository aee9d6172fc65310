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

//! Dataset builder: the single writer of the in-memory tree.
//!
//! Every operation validates against the tree, mutates it and then
//! forwards the equivalent call to the sink before returning, so the sink
//! sees operations in source order. After the sink rejects an operation
//! the builder is poisoned and refuses all further work.

use crate::dataset::{upsert_attribute, Attribute, Dataset, DimRef, DimensionSize, Dimension, GroupId, Variable};
use crate::error::{CdlError, CdlResult};
use crate::lex::SourcePos;
use crate::limits::Limits;
use crate::literal::Evaluated;
use crate::sink::{AttributeOwner, DatasetSink, SinkError};
use crate::types::{TypeKind, TypeRegistry};
use crate::value::{chars_of, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Name of the attribute that overrides a variable's fill value.
pub const FILL_VALUE_ATTRIBUTE: &str = "_FillValue";

/// Accumulates declarations into a [`Dataset`] and mirrors them to a sink.
pub struct DatasetBuilder<'s> {
    dataset: Dataset,
    registry: TypeRegistry,
    limits: Limits,
    sink: &'s mut dyn DatasetSink,
    current: GroupId,
    poisoned: bool,
    /// Attribute slots written from a `_` placeholder, per variable, that
    /// follow the variable's `_FillValue`.
    placeholders: HashMap<(GroupId, String), Vec<(String, Vec<usize>)>>,
}

impl<'s> DatasetBuilder<'s> {
    /// Start a dataset and announce it to the sink.
    pub fn new(
        name: &str,
        registry: TypeRegistry,
        limits: Limits,
        sink: &'s mut dyn DatasetSink,
        pos: SourcePos,
    ) -> CdlResult<Self> {
        let mut builder = Self {
            dataset: Dataset::new(name, registry.variant()),
            registry,
            limits,
            sink,
            current: GroupId::ROOT,
            poisoned: false,
            placeholders: HashMap::new(),
        };
        let variant = builder.registry.variant();
        info!(dataset = name, variant = %variant, "begin dataset");
        builder.forward(pos, |sink| sink.begin_dataset(name, variant))?;
        Ok(builder)
    }

    /// The dataset built so far.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Kinds, ranges and default fills of the active variant.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Group that new declarations land in.
    pub fn current_group(&self) -> GroupId {
        self.current
    }

    /// Fill value of a variable: its `_FillValue` if declared, else the
    /// (possibly overridden) default of its kind.
    pub fn fill_value_of(&self, var: &Variable) -> Value {
        var.fill_value
            .clone()
            .unwrap_or_else(|| self.registry.default_fill(var.kind))
    }

    /// Look up a variable of the current group.
    pub fn variable(&self, name: &str, pos: SourcePos) -> CdlResult<&Variable> {
        self.dataset
            .group(self.current)
            .variable(name)
            .ok_or_else(|| self.scoped(CdlError::unknown_identifier(format!("variable '{}' is not declared", name), pos)))
    }

    /// Resolve a dimension reference by name (current scope, then
    /// ancestors) or by absolute path.
    pub fn resolve_dimension(&self, name: &DimName, pos: SourcePos) -> CdlResult<DimRef> {
        let found = match name {
            DimName::Bare(n) => self.dataset.find_dimension(self.current, n),
            DimName::Path(segments) => self.dataset.resolve_dimension_path(segments),
        };
        found.ok_or_else(|| {
            self.scoped(CdlError::unknown_identifier(
                format!("dimension '{}' is not declared in scope", name),
                pos,
            ))
        })
    }

    /// Declare a dimension in the current group. `len` is `None` for an
    /// unlimited dimension, which starts at length 0.
    ///
    /// # Errors
    ///
    /// `DuplicateName` if the group already has a dimension of that name,
    /// or `Sink` if the sink refuses it.
    pub fn define_dimension(&mut self, name: &str, len: Option<usize>, pos: SourcePos) -> CdlResult<()> {
        self.check_live(pos)?;
        let group = self.dataset.group(self.current);
        if group.dimension_index(name).is_some() {
            return Err(self.scoped(CdlError::duplicate_name(
                format!("dimension '{}' is already defined", name),
                pos,
            )));
        }
        let dim = match len {
            Some(n) => Dimension::fixed(name, n),
            None => Dimension::unlimited(name),
        };
        self.dataset.group_mut(self.current).dimensions.push(dim);
        debug!(dimension = name, len = ?len, "define dimension");
        self.forward(pos, |sink| sink.create_dimension(name, len))
    }

    /// Declare a variable in the current group over already resolved
    /// dimensions.
    ///
    /// The sink receives the dimensions as they would be written from the
    /// current group, so a shadowed ancestor dimension arrives as an
    /// absolute path.
    ///
    /// # Errors
    ///
    /// `DuplicateName` if the group already has a variable of that name.
    pub fn define_variable(
        &mut self,
        name: &str,
        kind: TypeKind,
        dims: Vec<DimRef>,
        pos: SourcePos,
    ) -> CdlResult<()> {
        self.check_live(pos)?;
        if self.dataset.group(self.current).variable_index(name).is_some() {
            return Err(self.scoped(CdlError::duplicate_name(
                format!("variable '{}' is already defined", name),
                pos,
            )));
        }
        let var = Variable::new(name, kind, dims);
        let dim_names = self.dataset.dimension_names(self.current, &var);
        self.dataset.group_mut(self.current).variables.push(var);
        debug!(variable = name, kind = %kind, dims = ?dim_names, "define variable");
        self.forward(pos, |sink| sink.create_variable(name, kind, &dim_names))
    }

    /// Attach (or replace) an attribute on the current group (`target`
    /// `None`) or one of its variables.
    ///
    /// A `_FillValue` on a variable also becomes that variable's fill.
    pub fn set_attribute(
        &mut self,
        target: Option<&str>,
        attr: Attribute,
        pos: SourcePos,
    ) -> CdlResult<()> {
        self.set_attribute_with_placeholders(target, attr, &[], pos)
    }

    /// Like [`set_attribute`](Self::set_attribute), remembering which
    /// value slots came from a `_` placeholder.
    ///
    /// On a variable attribute of the variable's own kind, those slots are
    /// rewritten (and the attribute re-sent to the sink) whenever a later
    /// `_FillValue` changes the variable's fill.
    pub fn set_attribute_with_placeholders(
        &mut self,
        target: Option<&str>,
        attr: Attribute,
        placeholders: &[usize],
        pos: SourcePos,
    ) -> CdlResult<()> {
        self.check_live(pos)?;
        self.check_list_length(attr.values.len(), pos)?;
        let replaced = match target {
            None => upsert_attribute(&mut self.dataset.group_mut(self.current).attributes, attr.clone()),
            Some(var_name) => {
                let index = self.variable_index(var_name, pos)?;
                let var = &mut self.dataset.group_mut(self.current).variables[index];
                if attr.name == FILL_VALUE_ATTRIBUTE {
                    var.fill_value = attr.values.first().cloned();
                }
                upsert_attribute(&mut var.attributes, attr.clone())
            }
        };
        let owner = match target {
            None => AttributeOwner::Group,
            Some(v) => AttributeOwner::Variable(v),
        };
        if replaced {
            warn!(owner = target.unwrap_or("(global)"), attribute = %attr.name, "attribute redeclared, replacing");
        } else {
            debug!(owner = target.unwrap_or("(global)"), attribute = %attr.name, kind = %attr.kind, "set attribute");
        }
        self.forward(pos, |sink| sink.set_attribute(owner, &attr.name, attr.kind, &attr.values))?;

        let Some(var_name) = target else {
            return Ok(());
        };
        if attr.name == FILL_VALUE_ATTRIBUTE {
            return self.refill_placeholders(var_name, pos);
        }
        let pending = self
            .placeholders
            .entry((self.current, var_name.to_string()))
            .or_default();
        pending.retain(|(name, _)| *name != attr.name);
        if !placeholders.is_empty() {
            pending.push((attr.name.clone(), placeholders.to_vec()));
        }
        Ok(())
    }

    fn refill_placeholders(&mut self, var_name: &str, pos: SourcePos) -> CdlResult<()> {
        let Some(pending) = self.placeholders.get(&(self.current, var_name.to_string())).cloned() else {
            return Ok(());
        };
        let index = self.variable_index(var_name, pos)?;
        for (attr_name, slots) in pending {
            let var = &mut self.dataset.group_mut(self.current).variables[index];
            let (Some(fill), kind) = (var.fill_value.clone(), var.kind) else {
                continue;
            };
            let Some(attr) = var.attributes.iter_mut().find(|a| a.name == attr_name) else {
                continue;
            };
            if attr.kind != kind {
                continue;
            }
            for slot in slots {
                if let Some(v) = attr.values.get_mut(slot) {
                    *v = fill.clone();
                }
            }
            let attr = attr.clone();
            debug!(owner = var_name, attribute = %attr.name, "placeholders follow _FillValue");
            self.forward(pos, |sink| {
                sink.set_attribute(AttributeOwner::Variable(var_name), &attr.name, attr.kind, &attr.values)
            })?;
        }
        Ok(())
    }

    /// Lay out evaluated data for a variable of the current group and
    /// store it.
    ///
    /// Fill placeholders resolve to the variable's fill value. Char data
    /// pads every string with NUL to a multiple of the last dimension's
    /// length. A short list is padded with fill to the full extent, or to
    /// the last complete record when the variable has an unlimited
    /// dimension, whose current length then grows to cover the data.
    pub fn write_data(&mut self, name: &str, items: Vec<Evaluated>, pos: SourcePos) -> CdlResult<()> {
        self.check_live(pos)?;
        let index = self.variable_index(name, pos)?;
        let var = &self.dataset.group(self.current).variables[index];
        let fill = self.fill_value_of(var);

        let unlimited: Vec<DimRef> = var
            .dims
            .iter()
            .copied()
            .filter(|d| self.dataset.dimension(*d).is_unlimited())
            .collect();
        if unlimited.len() > 1 {
            return Err(self.scoped(CdlError::shape(
                format!("variable '{}' has more than one unlimited dimension and cannot take data", name),
                pos,
            )));
        }
        let fixed = var
            .dims
            .iter()
            .map(|d| self.dataset.dimension(*d))
            .filter(|d| !d.is_unlimited())
            .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
            .ok_or_else(|| self.scoped(extent_overflow(name, pos)))?;
        self.check_list_length(fixed, pos)?;

        let row_len = match var.dims.last() {
            Some(last) if var.kind == TypeKind::Char => {
                let dim = self.dataset.dimension(*last);
                if dim.is_unlimited() {
                    1
                } else {
                    dim.len()
                }
            }
            _ => 1,
        };

        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Evaluated::Fill => values.push(fill.clone()),
                Evaluated::Value(v) => values.push(v),
                Evaluated::Text(text) => {
                    let mut chars = chars_of(&text);
                    let padded = if chars.is_empty() {
                        row_len
                    } else {
                        round_up(chars.len(), row_len).ok_or_else(|| extent_overflow(name, pos))?
                    };
                    self.check_list_length(values.len().saturating_add(padded), pos)?;
                    reserve(&mut chars, padded, name, pos)?;
                    chars.resize(padded, Value::Char(0));
                    values.extend(chars);
                }
            }
        }
        self.check_list_length(values.len(), pos)?;

        let kind = var.kind;
        let target_len = match unlimited.first() {
            None => {
                if values.len() > fixed {
                    return Err(self.scoped(CdlError::shape(
                        format!(
                            "{} values given for variable '{}' which holds {}",
                            values.len(),
                            name,
                            fixed
                        ),
                        pos,
                    )));
                }
                fixed
            }
            Some(record_dim) => {
                let target = round_up(values.len(), fixed).ok_or_else(|| extent_overflow(name, pos))?;
                let records = target / fixed.max(1);
                let dim = self.dataset.dimension_mut(*record_dim);
                if let DimensionSize::Unlimited { current } = &mut dim.size {
                    if records > *current {
                        debug!(dimension = %dim.name, records, "grow unlimited dimension");
                        *current = records;
                    }
                }
                target
            }
        };
        reserve(&mut values, target_len, name, pos)?;
        values.resize(target_len, fill);

        let var = &mut self.dataset.group_mut(self.current).variables[index];
        if var.data.is_some() {
            warn!(variable = name, "data reassigned, replacing earlier values");
        }
        var.data = Some(values);
        debug!(variable = name, kind = %kind, len = target_len, "write data");

        let data = self.dataset.group(self.current).variables[index]
            .data
            .as_deref()
            .unwrap_or_default();
        let sink = &mut *self.sink;
        let result = sink.write_values(name, data);
        self.absorb(result, pos)
    }

    /// Open a child group of the current group and make it current.
    pub fn enter_group(&mut self, name: &str, pos: SourcePos) -> CdlResult<()> {
        self.check_live(pos)?;
        if self.dataset.child(self.current, name).is_some() {
            return Err(self.scoped(CdlError::duplicate_name(
                format!("group '{}' is already defined", name),
                pos,
            )));
        }
        let depth = self.dataset.depth(self.current) + 1;
        if depth > self.limits.max_group_depth {
            return Err(CdlError::security(
                format!(
                    "group nesting depth {} exceeds maximum {}",
                    depth, self.limits.max_group_depth
                ),
                pos.line(),
            )
            .with_column(pos.column()));
        }
        self.current = self.dataset.add_group(self.current, name);
        debug!(group = %self.dataset.group_path(self.current), "enter group");
        self.forward(pos, |sink| sink.begin_group(name))
    }

    /// Close the current group and return to its parent.
    pub fn exit_group(&mut self, pos: SourcePos) -> CdlResult<()> {
        self.check_live(pos)?;
        let parent = self
            .dataset
            .group(self.current)
            .parent
            .ok_or_else(|| CdlError::syntax("'}' closes no open group", pos))?;
        debug!(group = %self.dataset.group_path(self.current), "exit group");
        self.current = parent;
        self.forward(pos, |sink| sink.end_group())
    }

    /// Finalize the sink and hand back the dataset.
    pub fn finish(mut self, pos: SourcePos) -> CdlResult<Dataset> {
        self.check_live(pos)?;
        self.forward(pos, |sink| sink.finalize())?;
        info!(
            dataset = %self.dataset.name,
            groups = self.dataset.group_count(),
            "dataset complete"
        );
        Ok(self.dataset)
    }

    fn variable_index(&self, name: &str, pos: SourcePos) -> CdlResult<usize> {
        self.dataset
            .group(self.current)
            .variable_index(name)
            .ok_or_else(|| self.scoped(CdlError::unknown_identifier(format!("variable '{}' is not declared", name), pos)))
    }

    fn check_list_length(&self, len: usize, pos: SourcePos) -> CdlResult<()> {
        if len > self.limits.max_list_length {
            return Err(CdlError::security(
                format!(
                    "value list of {} elements exceeds maximum {}",
                    len, self.limits.max_list_length
                ),
                pos.line(),
            )
            .with_column(pos.column()));
        }
        Ok(())
    }

    fn check_live(&self, pos: SourcePos) -> CdlResult<()> {
        if self.poisoned {
            return Err(CdlError::sink("sink already rejected an operation", pos));
        }
        Ok(())
    }

    fn forward(
        &mut self,
        pos: SourcePos,
        op: impl FnOnce(&mut dyn DatasetSink) -> Result<(), SinkError>,
    ) -> CdlResult<()> {
        let result = op(&mut *self.sink);
        self.absorb(result, pos)
    }

    fn absorb(&mut self, result: Result<(), SinkError>, pos: SourcePos) -> CdlResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                self.poisoned = true;
                Err(self.scoped(CdlError::sink(e.to_string(), pos)))
            }
        }
    }

    /// Add the current group as context when inside a nested group.
    fn scoped(&self, err: CdlError) -> CdlError {
        if self.current == GroupId::ROOT {
            err
        } else {
            err.with_context(format!("in group '{}'", self.dataset.group_path(self.current)))
        }
    }
}

/// Smallest multiple of `unit` that is at least `n`, or `None` on overflow.
/// A zero unit leaves `n` unchanged.
fn round_up(n: usize, unit: usize) -> Option<usize> {
    if unit == 0 {
        return Some(n);
    }
    (n / unit + usize::from(n % unit != 0)).checked_mul(unit)
}

/// Make room for `len` values or fail with a `SecurityError`.
fn reserve(values: &mut Vec<Value>, len: usize, name: &str, pos: SourcePos) -> CdlResult<()> {
    values
        .try_reserve(len.saturating_sub(values.len()))
        .map_err(|_| {
            CdlError::security(
                format!("variable '{}' needs {} values, more than can be allocated", name, len),
                pos.line(),
            )
            .with_column(pos.column())
        })
}

fn extent_overflow(name: &str, pos: SourcePos) -> CdlError {
    CdlError::shape(
        format!("extent of variable '{}' does not fit in memory addressing", name),
        pos,
    )
}

/// A dimension reference as written in a variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DimName {
    Bare(String),
    Path(Vec<String>),
}

impl std::fmt::Display for DimName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimName::Bare(n) => f.write_str(n),
            DimName::Path(p) => write!(f, "/{}", p.join("/")),
        }
    }
}
