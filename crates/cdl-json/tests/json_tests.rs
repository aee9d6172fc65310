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

//! Integration tests for JSON rendering and the JSON-lines sink.

use cdl_core::{parse_into, Dataset, RecordingSink, SinkOp};
use cdl_json::{dataset_to_json, to_json, to_json_model, to_json_value, JsonLinesSink, ToJsonConfig};
use cdl_test::{count_attributes, count_variables, fixtures};
use serde_json::{json, Value as JsonValue};

fn view(fixture: &fixtures::Fixture) -> JsonValue {
    let ds = fixture.parse().unwrap();
    to_json_value(&ds, &ToJsonConfig::default())
}

fn op_name(op: &SinkOp) -> &'static str {
    match op {
        SinkOp::BeginDataset { .. } => "begin_dataset",
        SinkOp::CreateDimension { .. } => "create_dimension",
        SinkOp::CreateVariable { .. } => "create_variable",
        SinkOp::SetAttribute { .. } => "set_attribute",
        SinkOp::WriteValues { .. } => "write_values",
        SinkOp::BeginGroup { .. } => "begin_group",
        SinkOp::EndGroup => "end_group",
        SinkOp::Finalize => "finalize",
    }
}

#[test]
fn test_every_fixture_renders() {
    for fixture in fixtures::all() {
        let ds = fixture.parse().unwrap();
        let text = dataset_to_json(&ds).unwrap();
        let back: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back["name"], json!(ds.name), "{}", fixture.name);
    }
}

fn tally(group: &JsonValue) -> (usize, usize) {
    let vars = group["variables"].as_array().unwrap();
    let mut variables = vars.len();
    let mut attributes = group["attributes"].as_object().unwrap().len()
        + vars
            .iter()
            .map(|v| v["attributes"].as_object().unwrap().len())
            .sum::<usize>();
    for child in group["groups"].as_array().unwrap() {
        let (v, a) = tally(child);
        variables += v;
        attributes += a;
    }
    (variables, attributes)
}

#[test]
fn test_view_covers_whole_tree() {
    for fixture in fixtures::all() {
        let ds = fixture.parse().unwrap();
        let json = to_json_value(&ds, &ToJsonConfig::default());
        assert_eq!(
            tally(&json["root"]),
            (count_variables(&ds), count_attributes(&ds)),
            "{}",
            fixture.name
        );
    }
}

#[test]
fn test_basics_view() {
    let json = view(&fixtures::basics());
    let root = &json["root"];
    assert_eq!(json["variant"], json!("classic"));
    assert_eq!(root["path"], json!("/"));
    assert_eq!(
        root["dimensions"][3],
        json!({"name": "time", "length": 0, "unlimited": true})
    );
    let tas = &root["variables"][0];
    assert_eq!(tas["type"], json!("int"));
    assert_eq!(tas["dimensions"], json!(["lev", "lat", "lon"]));
    assert_eq!(tas["shape"], json!([1, 2, 3]));
    assert_eq!(tas["attributes"]["units"], json!({"type": "char", "value": "K"}));
    assert_eq!(tas["data"], json!([0, 1, 2, 3, 4, 5]));
    assert_eq!(root["attributes"]["Conventions"]["value"], json!("CF-1.5"));
}

#[test]
fn test_char_rows() {
    let json = view(&fixtures::charvars());
    let regions = json["root"]["variables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["name"] == "regions")
        .unwrap();
    assert_eq!(regions["data"], json!(["Europe", "Americas", "Asia"]));
}

#[test]
fn test_groups_nest() {
    let json = view(&fixtures::groups());
    let forecast = &json["root"]["groups"][0];
    assert_eq!(forecast["name"], json!("forecast"));
    assert_eq!(forecast["groups"][0]["path"], json!("/forecast/detail"));
    let obs = &json["root"]["groups"][1];
    assert_eq!(obs["variables"][0]["dimensions"], json!(["/forecast/member"]));
    assert_eq!(obs["variables"][0]["type"], json!("ubyte"));
}

#[test]
fn test_extended_integers_are_exact() {
    let json = view(&fixtures::cdf5_constants());
    let attrs = &json["root"]["attributes"];
    assert_eq!(attrs["uint64_attr"]["value"], json!([18446744073709551614u64]));
    assert_eq!(attrs["int64_attr"]["value"], json!([-9223372036854775806i64]));
}

#[test]
fn test_without_data() {
    let ds = fixtures::basics().parse().unwrap();
    let config = ToJsonConfig {
        include_data: false,
        ..ToJsonConfig::default()
    };
    let json = to_json_value(&ds, &config);
    assert!(json["root"]["variables"][0].get("data").is_none());
    assert!(to_json(&ds, &config).unwrap().contains('\n'));
}

#[test]
fn test_model_dump_round_trips() {
    for fixture in [fixtures::basics(), fixtures::cdf5_constants(), fixtures::groups()] {
        let ds = fixture.parse().unwrap();
        let text = to_json_model(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, ds, "{}", fixture.name);
    }
}

#[test]
fn test_json_lines_follow_sink_order() {
    for fixture in fixtures::all() {
        let mut recorder = RecordingSink::new();
        parse_into(fixture.source, &fixture.options(), &mut recorder).unwrap();

        let mut sink = JsonLinesSink::new(Vec::new());
        parse_into(fixture.source, &fixture.options(), &mut sink).unwrap();
        assert_eq!(sink.lines_written(), recorder.ops.len(), "{}", fixture.name);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let names: Vec<String> = out
            .lines()
            .map(|l| {
                let v: JsonValue = serde_json::from_str(l).unwrap();
                v["op"].as_str().unwrap().to_string()
            })
            .collect();
        let expected: Vec<&str> = recorder.ops.iter().map(op_name).collect();
        assert_eq!(names, expected, "{}", fixture.name);
    }
}

#[test]
fn test_json_lines_group_events() {
    let fixture = fixtures::groups();
    let mut sink = JsonLinesSink::new(Vec::new());
    parse_into(fixture.source, &fixture.options(), &mut sink).unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<JsonValue> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    let begins: Vec<&JsonValue> = lines
        .iter()
        .filter(|l| l["op"] == "begin_group")
        .map(|l| &l["name"])
        .collect();
    assert_eq!(begins, [&json!("forecast"), &json!("detail"), &json!("obs")]);
    assert_eq!(lines.iter().filter(|l| l["op"] == "end_group").count(), 3);
}
