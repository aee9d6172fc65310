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

//! Dataset to JSON conversion

use cdl_core::{text_of, Attribute, Dataset, GroupId, TypeKind, Value, Variable};
use serde_json::{json, Map, Number, Value as JsonValue};

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct ToJsonConfig {
    /// Single-line output instead of pretty printing
    pub compact: bool,
    /// Include variable data (default: true)
    pub include_data: bool,
}

impl Default for ToJsonConfig {
    fn default() -> Self {
        Self {
            compact: false,
            include_data: true,
        }
    }
}

/// Convert a dataset to a JSON string
pub fn to_json(ds: &Dataset, config: &ToJsonConfig) -> Result<String, serde_json::Error> {
    let value = to_json_value(ds, config);
    if config.compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
}

/// Convert a dataset to a `serde_json::Value`
///
/// The root group is nested under `"root"`. Dimensions, variables and
/// child groups are arrays in declaration order; attributes are objects
/// keyed by name.
pub fn to_json_value(ds: &Dataset, config: &ToJsonConfig) -> JsonValue {
    json!({
        "name": ds.name,
        "variant": ds.variant.as_str(),
        "root": group_to_json(ds, GroupId::ROOT, config),
    })
}

fn group_to_json(ds: &Dataset, id: GroupId, config: &ToJsonConfig) -> JsonValue {
    let group = ds.group(id);

    let dimensions: Vec<JsonValue> = group
        .dimensions
        .iter()
        .map(|d| {
            json!({
                "name": d.name,
                "length": d.len(),
                "unlimited": d.is_unlimited(),
            })
        })
        .collect();

    let variables: Vec<JsonValue> = group
        .variables
        .iter()
        .map(|v| variable_to_json(ds, id, v, config))
        .collect();

    let children: Vec<JsonValue> = group
        .children
        .iter()
        .map(|c| group_to_json(ds, *c, config))
        .collect();

    let mut map = Map::with_capacity(6);
    map.insert("name".to_string(), JsonValue::String(group.name.clone()));
    map.insert("path".to_string(), JsonValue::String(ds.group_path(id)));
    map.insert("dimensions".to_string(), JsonValue::Array(dimensions));
    map.insert("variables".to_string(), JsonValue::Array(variables));
    map.insert("attributes".to_string(), attributes_to_json(&group.attributes));
    map.insert("groups".to_string(), JsonValue::Array(children));
    JsonValue::Object(map)
}

fn variable_to_json(ds: &Dataset, scope: GroupId, var: &Variable, config: &ToJsonConfig) -> JsonValue {
    let mut map = Map::with_capacity(6);
    map.insert("name".to_string(), JsonValue::String(var.name.clone()));
    map.insert("type".to_string(), JsonValue::String(var.kind.to_string()));
    map.insert("dimensions".to_string(), json!(ds.dimension_names(scope, var)));
    map.insert("shape".to_string(), json!(ds.shape(var)));
    map.insert("attributes".to_string(), attributes_to_json(&var.attributes));
    if config.include_data {
        let data = match &var.data {
            Some(values) if var.kind == TypeKind::Char => char_rows_to_json(ds, var, values),
            Some(values) => JsonValue::Array(values.iter().map(value_to_json).collect()),
            None => JsonValue::Null,
        };
        map.insert("data".to_string(), data);
    }
    JsonValue::Object(map)
}

/// Attributes as an object keyed by name.
fn attributes_to_json(attributes: &[Attribute]) -> JsonValue {
    let mut map = Map::with_capacity(attributes.len());
    for attr in attributes {
        map.insert(
            attr.name.clone(),
            json!({
                "type": attr.kind.to_string(),
                "value": values_to_json(&attr.values),
            }),
        );
    }
    JsonValue::Object(map)
}

/// Convert a value list; a run of chars becomes one string, read as
/// UTF-8 with invalid bytes replaced by U+FFFD.
pub fn values_to_json(values: &[Value]) -> JsonValue {
    if !values.is_empty() {
        if let Some(text) = text_of(values) {
            return JsonValue::String(text);
        }
    }
    JsonValue::Array(values.iter().map(value_to_json).collect())
}

/// Convert a single value.
///
/// Non-finite floats have no JSON number form and are written as the
/// strings `"NaN"`, `"Infinity"` and `"-Infinity"`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Byte(v) => JsonValue::from(*v),
        Value::UByte(v) => JsonValue::from(*v),
        Value::Short(v) => JsonValue::from(*v),
        Value::UShort(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::UInt(v) => JsonValue::from(*v),
        Value::Int64(v) => JsonValue::from(*v),
        Value::UInt64(v) => JsonValue::from(*v),
        Value::Float(v) => float_to_json(f64::from(*v)),
        Value::Double(v) => float_to_json(*v),
        Value::Char(_) => JsonValue::String(text_of(std::slice::from_ref(value)).unwrap_or_default()),
        Value::Str(s) => JsonValue::String(s.clone()),
    }
}

fn float_to_json(v: f64) -> JsonValue {
    match Number::from_f64(v) {
        Some(n) => JsonValue::Number(n),
        None if v.is_nan() => JsonValue::String("NaN".to_string()),
        None if v > 0.0 => JsonValue::String("Infinity".to_string()),
        None => JsonValue::String("-Infinity".to_string()),
    }
}

/// Char data as one string per row of the last fixed dimension, with
/// trailing NUL padding removed.
fn char_rows_to_json(ds: &Dataset, var: &Variable, values: &[Value]) -> JsonValue {
    let row_len = match var.dims.last() {
        Some(last) if !ds.dimension(*last).is_unlimited() => ds.dimension(*last).len(),
        _ => 0,
    };
    let rows: Vec<JsonValue> = if row_len == 0 {
        vec![JsonValue::String(trimmed_text(values))]
    } else {
        values
            .chunks(row_len)
            .map(|row| JsonValue::String(trimmed_text(row)))
            .collect()
    };
    JsonValue::Array(rows)
}

fn trimmed_text(values: &[Value]) -> String {
    let text = text_of(values).unwrap_or_default();
    text.trim_end_matches('\0').to_string()
}
