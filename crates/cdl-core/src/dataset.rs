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

//! In-memory dataset model.
//!
//! Groups live in an arena owned by [`Dataset`] and are addressed by
//! [`GroupId`]; the root group is always id 0. Variables refer to their
//! dimensions through [`DimRef`] pairs, so a reference into an ancestor
//! scope stays valid without shared ownership.

use crate::types::{FormatVariant, TypeKind};
use crate::value::{text_of, Value};

/// Index of a group in its dataset's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(usize);

impl GroupId {
    /// The root group.
    pub const ROOT: GroupId = GroupId(0);

    /// Position in creation order, independent of [`Dataset::walk`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// Location of a dimension: owning group and position in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimRef {
    pub group: GroupId,
    pub index: usize,
}

/// Declared size of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionSize {
    Fixed(usize),
    /// Record dimension; `current` grows as data is written.
    Unlimited { current: usize },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub name: String,
    pub size: DimensionSize,
}

impl Dimension {
    pub fn fixed(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            size: DimensionSize::Fixed(len),
        }
    }

    /// A record dimension, empty until data is written along it.
    pub fn unlimited(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: DimensionSize::Unlimited { current: 0 },
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self.size, DimensionSize::Unlimited { .. })
    }

    /// Fixed size, or current length of an unlimited dimension.
    pub fn len(&self) -> usize {
        match self.size {
            DimensionSize::Fixed(n) => n,
            DimensionSize::Unlimited { current } => current,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed list of values attached to a group or variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub kind: TypeKind,
    pub values: Vec<Value>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: TypeKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Text of a `char` attribute.
    pub fn text(&self) -> Option<String> {
        if self.kind == TypeKind::Char {
            text_of(&self.values)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    pub name: String,
    pub kind: TypeKind,
    /// Shape, slowest-varying first; empty for a scalar.
    pub dims: Vec<DimRef>,
    pub attributes: Vec<Attribute>,
    /// Value of a declared `_FillValue`.
    pub fill_value: Option<Value>,
    /// Row-major data, `None` until a data assignment is seen.
    pub data: Option<Vec<Value>>,
}

impl Variable {
    pub fn new(name: impl Into<String>, kind: TypeKind, dims: Vec<DimRef>) -> Self {
        Self {
            name: name.into(),
            kind,
            dims,
            attributes: Vec::new(),
            fill_value: None,
            data: None,
        }
    }

    /// A variable with no dimensions holds exactly one value.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub name: String,
    pub parent: Option<GroupId>,
    /// Child groups in declaration order.
    pub children: Vec<GroupId>,
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub attributes: Vec<Attribute>,
}

impl Group {
    fn new(name: impl Into<String>, parent: Option<GroupId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            dimensions: Vec::new(),
            variables: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.name == name)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    /// Variable declared directly in this group. Ancestors are not searched.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Insert `attr`, replacing an attribute of the same name in place.
/// Returns `true` when an existing attribute was replaced.
pub fn upsert_attribute(list: &mut Vec<Attribute>, attr: Attribute) -> bool {
    match list.iter_mut().find(|a| a.name == attr.name) {
        Some(existing) => {
            *existing = attr;
            true
        }
        None => {
            list.push(attr);
            false
        }
    }
}

/// A compiled CDL document.
///
/// # Examples
///
/// ```
/// use cdl_core::{Dataset, Dimension, FormatVariant, GroupId};
///
/// let mut ds = Dataset::new("demo", FormatVariant::Hierarchical);
/// ds.group_mut(GroupId::ROOT).dimensions.push(Dimension::fixed("x", 3));
/// let child = ds.add_group(GroupId::ROOT, "inner");
///
/// // Lookup walks from the child up to the root.
/// let dim = ds.find_dimension(child, "x").unwrap();
/// assert_eq!(ds.dimension(dim).len(), 3);
/// assert_eq!(ds.group_path(child), "/inner");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    pub name: String,
    pub variant: FormatVariant,
    groups: Vec<Group>,
}

impl Dataset {
    /// An empty dataset holding only the root group.
    pub fn new(name: impl Into<String>, variant: FormatVariant) -> Self {
        Self {
            name: name.into(),
            variant,
            groups: vec![Group::new("/", None)],
        }
    }

    /// The top-level group, named after the dataset path `/`.
    pub fn root(&self) -> &Group {
        &self.groups[0]
    }

    /// # Panics
    ///
    /// If `id` was not issued by this dataset.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }

    /// Number of groups, root included.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Append a child group to `parent`.
    pub fn add_group(&mut self, parent: GroupId, name: impl Into<String>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group::new(name, Some(parent)));
        self.groups[parent.0].children.push(id);
        id
    }

    /// Child of `parent` named `name`.
    pub fn child(&self, parent: GroupId, name: &str) -> Option<GroupId> {
        self.group(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.group(*c).name == name)
    }

    /// Number of groups between `id` and the root.
    pub fn depth(&self, id: GroupId) -> usize {
        self.ancestors(id).count() - 1
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        std::iter::successors(Some(id), move |g| self.group(*g).parent)
    }

    /// Absolute path of a group; the root is `/`.
    pub fn group_path(&self, id: GroupId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter(|g| *g != GroupId::ROOT)
            .map(|g| self.group(g).name.as_str())
            .collect();
        if names.is_empty() {
            return "/".to_string();
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Groups in depth-first declaration order, root first.
    pub fn walk(&self) -> Vec<GroupId> {
        let mut out = Vec::with_capacity(self.groups.len());
        let mut stack = vec![GroupId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.group(id).children.iter().rev().copied());
        }
        out
    }

    /// The dimension a variable refers to, wherever it was declared.
    pub fn dimension(&self, r: DimRef) -> &Dimension {
        &self.groups[r.group.0].dimensions[r.index]
    }

    pub fn dimension_mut(&mut self, r: DimRef) -> &mut Dimension {
        &mut self.groups[r.group.0].dimensions[r.index]
    }

    /// Resolve a dimension name from `scope`, searching ancestors outward.
    pub fn find_dimension(&self, scope: GroupId, name: &str) -> Option<DimRef> {
        self.ancestors(scope).find_map(|g| {
            self.group(g)
                .dimension_index(name)
                .map(|index| DimRef { group: g, index })
        })
    }

    /// Resolve an absolute dimension path such as `["grp", "time"]`.
    pub fn resolve_dimension_path(&self, segments: &[String]) -> Option<DimRef> {
        let (dim, groups) = segments.split_last()?;
        let mut at = GroupId::ROOT;
        for name in groups {
            at = self.child(at, name)?;
        }
        self.group(at)
            .dimension_index(dim)
            .map(|index| DimRef { group: at, index })
    }

    /// Name of a dimension as written from `scope`: bare when name lookup
    /// from `scope` finds the same dimension, otherwise its absolute path.
    pub fn dimension_name_from(&self, scope: GroupId, r: DimRef) -> String {
        let dim = self.dimension(r);
        if self.find_dimension(scope, &dim.name) == Some(r) {
            return dim.name.clone();
        }
        match self.group_path(r.group).as_str() {
            "/" => format!("/{}", dim.name),
            path => format!("{}/{}", path, dim.name),
        }
    }

    /// Current lengths of a variable's dimensions.
    pub fn shape(&self, var: &Variable) -> Vec<usize> {
        var.dims.iter().map(|d| self.dimension(*d).len()).collect()
    }

    /// Names of a variable's dimensions as seen from its own group.
    pub fn dimension_names(&self, scope: GroupId, var: &Variable) -> Vec<String> {
        var.dims
            .iter()
            .map(|d| self.dimension_name_from(scope, *d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Dataset, GroupId, GroupId) {
        let mut ds = Dataset::new("s", FormatVariant::Hierarchical);
        ds.group_mut(GroupId::ROOT)
            .dimensions
            .push(Dimension::unlimited("time"));
        let a = ds.add_group(GroupId::ROOT, "a");
        let b = ds.add_group(GroupId::ROOT, "b");
        ds.group_mut(a).dimensions.push(Dimension::fixed("x", 4));
        (ds, a, b)
    }

    #[test]
    fn test_root_group() {
        let ds = Dataset::new("n", FormatVariant::Classic);
        assert_eq!(ds.group_count(), 1);
        assert_eq!(ds.root().parent, None);
        assert_eq!(ds.group_path(GroupId::ROOT), "/");
        assert_eq!(ds.depth(GroupId::ROOT), 0);
    }

    #[test]
    fn test_ancestor_lookup_not_sibling() {
        let (ds, a, b) = sample();
        assert!(ds.find_dimension(a, "time").is_some());
        assert!(ds.find_dimension(a, "x").is_some());
        assert!(ds.find_dimension(b, "x").is_none());
    }

    #[test]
    fn test_dimension_path_resolution() {
        let (ds, a, _) = sample();
        let r = ds
            .resolve_dimension_path(&["a".to_string(), "x".to_string()])
            .unwrap();
        assert_eq!(r.group, a);
        assert!(ds.resolve_dimension_path(&["b".to_string(), "x".to_string()]).is_none());
        assert!(ds.resolve_dimension_path(&["time".to_string()]).is_some());
    }

    #[test]
    fn test_dimension_name_from_scope() {
        let (ds, a, b) = sample();
        let x = ds.find_dimension(a, "x").unwrap();
        assert_eq!(ds.dimension_name_from(a, x), "x");
        assert_eq!(ds.dimension_name_from(b, x), "/a/x");
        let time = ds.find_dimension(b, "time").unwrap();
        assert_eq!(ds.dimension_name_from(b, time), "time");
    }

    #[test]
    fn test_walk_is_depth_first() {
        let (mut ds, a, b) = sample();
        let a1 = ds.add_group(a, "a1");
        assert_eq!(ds.walk(), vec![GroupId::ROOT, a, a1, b]);
        assert_eq!(ds.group_path(a1), "/a/a1");
        assert_eq!(ds.depth(a1), 2);
    }

    #[test]
    fn test_upsert_attribute_replaces() {
        let mut attrs = Vec::new();
        assert!(!upsert_attribute(
            &mut attrs,
            Attribute::new("a", TypeKind::Int, vec![Value::Int(1)])
        ));
        assert!(upsert_attribute(
            &mut attrs,
            Attribute::new("a", TypeKind::Double, vec![Value::Double(2.0)])
        ));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].kind, TypeKind::Double);
    }

    #[test]
    fn test_unlimited_len() {
        let mut d = Dimension::unlimited("t");
        assert!(d.is_unlimited());
        assert!(d.is_empty());
        d.size = DimensionSize::Unlimited { current: 3 };
        assert_eq!(d.len(), 3);
    }
}
