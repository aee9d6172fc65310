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

//! Counting helpers for parsed datasets.
//!
//! Every count covers the whole group tree.

use cdl_core::Dataset;

/// Count variables in every group.
pub fn count_variables(ds: &Dataset) -> usize {
    ds.walk()
        .into_iter()
        .map(|g| ds.group(g).variables.len())
        .sum()
}

/// Count attributes, global and per variable, in every group.
pub fn count_attributes(ds: &Dataset) -> usize {
    ds.walk()
        .into_iter()
        .map(|g| {
            let group = ds.group(g);
            group.attributes.len()
                + group
                    .variables
                    .iter()
                    .map(|v| v.attributes.len())
                    .sum::<usize>()
        })
        .sum()
}

/// Count stored data values, fill padding included.
pub fn count_values(ds: &Dataset) -> usize {
    ds.walk()
        .into_iter()
        .flat_map(|g| ds.group(g).variables.iter())
        .filter_map(|v| v.data.as_ref())
        .map(Vec::len)
        .sum()
}
