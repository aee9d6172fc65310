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

//! The dataset sink interface.
//!
//! The compiler never performs I/O. Every declaration it accepts is
//! forwarded, in source order, to a [`DatasetSink`]; a storage backend,
//! a streaming encoder or a test recorder sits behind it.
//!
//! All methods have default implementations that accept the operation,
//! so a sink only overrides what it cares about.
//!
//! # Examples
//!
//! ```
//! use cdl_core::sink::{DatasetSink, SinkError};
//! use cdl_core::{parse_into, ParseOptions};
//!
//! #[derive(Default)]
//! struct CountDims(usize);
//!
//! impl DatasetSink for CountDims {
//!     fn create_dimension(&mut self, _name: &str, _len: Option<usize>) -> Result<(), SinkError> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut sink = CountDims::default();
//! parse_into("netcdf d { dimensions: a = 1, b = 2 ; }", &ParseOptions::default(), &mut sink).unwrap();
//! assert_eq!(sink.0, 2);
//! ```

use crate::dataset::{Dataset, GroupId};
use crate::types::{FormatVariant, TypeKind};
use crate::value::Value;
use thiserror::Error;

/// Failure reported by a sink. Aborts the parse.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the operation.
    #[error("{0}")]
    Rejected(String),

    /// The sink failed writing to its backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owner of an attribute as presented to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOwner<'a> {
    /// The current group (the dataset itself at top level).
    Group,
    /// A variable of the current group.
    Variable(&'a str),
}

/// Receiver of materialised dataset operations.
///
/// Calls arrive in a structurally valid order: `begin_dataset` first,
/// `finalize` last, every `begin_group` matched by an `end_group`, and
/// names always refer to entities already created in the current group
/// or an ancestor.
pub trait DatasetSink {
    /// First call of every parse, with the dataset name and the variant
    /// it is compiled for.
    fn begin_dataset(&mut self, _name: &str, _variant: FormatVariant) -> Result<(), SinkError> {
        Ok(())
    }

    /// `len` is `None` for an unlimited dimension.
    fn create_dimension(&mut self, _name: &str, _len: Option<usize>) -> Result<(), SinkError> {
        Ok(())
    }

    /// `dims` are written as they would appear in CDL from the current
    /// group: bare names, or absolute paths for dimensions a bare name
    /// would not reach.
    fn create_variable(
        &mut self,
        _name: &str,
        _kind: TypeKind,
        _dims: &[String],
    ) -> Result<(), SinkError> {
        Ok(())
    }

    /// Attach an attribute. A name may arrive more than once for the same
    /// owner; the last call wins. That happens on redeclaration and when a
    /// `_FillValue` rewrites earlier `_` slots of the variable's attributes.
    fn set_attribute(
        &mut self,
        _owner: AttributeOwner<'_>,
        _name: &str,
        _kind: TypeKind,
        _values: &[Value],
    ) -> Result<(), SinkError> {
        Ok(())
    }

    /// The complete, fill-padded data of a variable in row-major order.
    fn write_values(&mut self, _variable: &str, _values: &[Value]) -> Result<(), SinkError> {
        Ok(())
    }

    /// Enter a child group of the current group.
    fn begin_group(&mut self, _name: &str) -> Result<(), SinkError> {
        Ok(())
    }

    /// Return to the parent group.
    fn end_group(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Last call of a successful parse. Never sent after an error.
    fn finalize(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DatasetSink for NullSink {}

/// One recorded sink call, with owned arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOp {
    BeginDataset {
        name: String,
        variant: FormatVariant,
    },
    CreateDimension {
        name: String,
        len: Option<usize>,
    },
    CreateVariable {
        name: String,
        kind: TypeKind,
        dims: Vec<String>,
    },
    SetAttribute {
        /// `None` for a group attribute.
        variable: Option<String>,
        name: String,
        kind: TypeKind,
        values: Vec<Value>,
    },
    WriteValues {
        variable: String,
        values: Vec<Value>,
    },
    BeginGroup {
        name: String,
    },
    EndGroup,
    Finalize,
}

/// Sink that records every call, optionally rejecting after a number of
/// accepted operations.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Calls accepted so far, in arrival order.
    pub ops: Vec<SinkOp>,
    reject_after: Option<usize>,
}

impl RecordingSink {
    /// A sink that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` operations, then reject every further one.
    pub fn rejecting_after(n: usize) -> Self {
        Self {
            ops: Vec::new(),
            reject_after: Some(n),
        }
    }

    fn record(&mut self, op: SinkOp) -> Result<(), SinkError> {
        if self.reject_after.is_some_and(|n| self.ops.len() >= n) {
            return Err(SinkError::Rejected(format!("refusing {:?}", op)));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl DatasetSink for RecordingSink {
    fn begin_dataset(&mut self, name: &str, variant: FormatVariant) -> Result<(), SinkError> {
        self.record(SinkOp::BeginDataset {
            name: name.to_string(),
            variant,
        })
    }

    fn create_dimension(&mut self, name: &str, len: Option<usize>) -> Result<(), SinkError> {
        self.record(SinkOp::CreateDimension {
            name: name.to_string(),
            len,
        })
    }

    fn create_variable(&mut self, name: &str, kind: TypeKind, dims: &[String]) -> Result<(), SinkError> {
        self.record(SinkOp::CreateVariable {
            name: name.to_string(),
            kind,
            dims: dims.to_vec(),
        })
    }

    fn set_attribute(
        &mut self,
        owner: AttributeOwner<'_>,
        name: &str,
        kind: TypeKind,
        values: &[Value],
    ) -> Result<(), SinkError> {
        self.record(SinkOp::SetAttribute {
            variable: match owner {
                AttributeOwner::Group => None,
                AttributeOwner::Variable(v) => Some(v.to_string()),
            },
            name: name.to_string(),
            kind,
            values: values.to_vec(),
        })
    }

    fn write_values(&mut self, variable: &str, values: &[Value]) -> Result<(), SinkError> {
        self.record(SinkOp::WriteValues {
            variable: variable.to_string(),
            values: values.to_vec(),
        })
    }

    fn begin_group(&mut self, name: &str) -> Result<(), SinkError> {
        self.record(SinkOp::BeginGroup {
            name: name.to_string(),
        })
    }

    fn end_group(&mut self) -> Result<(), SinkError> {
        self.record(SinkOp::EndGroup)
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.record(SinkOp::Finalize)
    }
}

/// Re-emit a built dataset into `sink`.
///
/// Per group the order is dimensions, variables (each followed by its
/// attributes), group attributes, data, then child groups.
pub fn replay(dataset: &Dataset, sink: &mut dyn DatasetSink) -> Result<(), SinkError> {
    sink.begin_dataset(&dataset.name, dataset.variant)?;
    replay_group(dataset, GroupId::ROOT, sink)?;
    sink.finalize()
}

fn replay_group(dataset: &Dataset, id: GroupId, sink: &mut dyn DatasetSink) -> Result<(), SinkError> {
    let group = dataset.group(id);
    for dim in &group.dimensions {
        let len = if dim.is_unlimited() { None } else { Some(dim.len()) };
        sink.create_dimension(&dim.name, len)?;
    }
    for var in &group.variables {
        sink.create_variable(&var.name, var.kind, &dataset.dimension_names(id, var))?;
        for attr in &var.attributes {
            sink.set_attribute(
                AttributeOwner::Variable(&var.name),
                &attr.name,
                attr.kind,
                &attr.values,
            )?;
        }
    }
    for attr in &group.attributes {
        sink.set_attribute(AttributeOwner::Group, &attr.name, attr.kind, &attr.values)?;
    }
    for var in &group.variables {
        if let Some(data) = &var.data {
            sink.write_values(&var.name, data)?;
        }
    }
    for child in &group.children {
        sink.begin_group(&dataset.group(*child).name)?;
        replay_group(dataset, *child, sink)?;
        sink.end_group()?;
    }
    Ok(())
}
