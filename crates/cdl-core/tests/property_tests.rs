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

//! Property-based tests for literal evaluation and data layout.

use cdl_core::{parse, FormatVariant, GroupId, ParseOptions, TypeKind, Value};
use proptest::prelude::*;

fn cdf5() -> ParseOptions {
    ParseOptions::builder().variant(FormatVariant::Classic64).build()
}

fn root_data(src: &str, opts: &ParseOptions, var: &str) -> Vec<Value> {
    let ds = parse(src, opts).unwrap();
    ds.group(GroupId::ROOT)
        .variable(var)
        .and_then(|v| v.data.clone())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: a `UB` literal is accepted exactly when it fits in ubyte.
    #[test]
    fn prop_ubyte_suffix_range(v in 0u32..2000) {
        let src = format!("netcdf p {{ variables: :a = {}UB ; }}", v);
        let result = parse(&src, &cdf5());
        if v <= 255 {
            let ds = result.unwrap();
            prop_assert_eq!(
                ds.root().attribute("a").unwrap().values.clone(),
                vec![Value::UByte(v as u8)]
            );
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Property: hex, octal and decimal spellings decode identically.
    #[test]
    fn prop_encodings_agree(v in any::<u32>()) {
        let src = format!(
            "netcdf p {{ dimensions: n = 3 ; variables: uint v(n) ; data: v = 0x{:x}U, 0{:o}U, {}U ; }}",
            v, v, v
        );
        let data = root_data(&src, &cdf5(), "v");
        prop_assert_eq!(data, vec![Value::UInt(v); 3]);
    }

    /// Property: every short survives evaluation unchanged.
    #[test]
    fn prop_short_values(v in any::<i16>()) {
        let src = format!("netcdf p {{ variables: short s ; data: s = {} ; }}", v);
        let data = root_data(&src, &ParseOptions::default(), "s");
        prop_assert_eq!(data, vec![Value::Short(v)]);
    }

    /// Property: a short data list is padded with fill to the full extent.
    #[test]
    fn prop_fixed_padding(len in 1usize..40, given in 1usize..40) {
        prop_assume!(given <= len);
        let values: Vec<String> = (0..given).map(|i| i.to_string()).collect();
        let src = format!(
            "netcdf p {{ dimensions: x = {} ; variables: int v(x) ; data: v = {} ; }}",
            len,
            values.join(", ")
        );
        let data = root_data(&src, &ParseOptions::default(), "v");
        prop_assert_eq!(data.len(), len);
        for (i, value) in data.iter().enumerate() {
            if i < given {
                prop_assert_eq!(value, &Value::Int(i as i32));
            } else {
                prop_assert_eq!(value, &TypeKind::Int.default_fill());
            }
        }
    }

    /// Property: the unlimited dimension grows to cover whole records.
    #[test]
    fn prop_unlimited_growth(record in 1usize..8, given in 1usize..60) {
        let values = vec!["1"; given].join(", ");
        let src = format!(
            "netcdf p {{ dimensions: t = unlimited ; x = {} ; variables: byte v(t, x) ; data: v = {} ; }}",
            record, values
        );
        let ds = parse(&src, &ParseOptions::default()).unwrap();
        let records = (given + record - 1) / record;
        prop_assert_eq!(ds.root().dimensions[0].len(), records);
        let data = ds.root().variable("v").unwrap().data.clone().unwrap();
        prop_assert_eq!(data.len(), records * record);
    }

    /// Property: the parser returns (never panics) on arbitrary input.
    #[test]
    fn prop_arbitrary_input_does_not_panic(body in "\\PC{0,200}") {
        let src = format!("netcdf p {{ {} }}", body);
        let _ = parse(&src, &ParseOptions::default());
    }

    /// Property: char text is padded with NUL to a whole row.
    #[test]
    fn prop_char_row_padding(text in "[a-zA-Z0-9 ]{0,12}", row in 1usize..16) {
        prop_assume!(text.len() <= row);
        let src = format!(
            "netcdf p {{ dimensions: len = {} ; variables: char c(len) ; data: c = \"{}\" ; }}",
            row, text
        );
        let data = root_data(&src, &ParseOptions::default(), "c");
        prop_assert_eq!(data.len(), row);
        let bytes: Vec<Value> = text.bytes().map(Value::Char).collect();
        prop_assert_eq!(&data[..text.len()], &bytes[..]);
        prop_assert!(data[text.len()..].iter().all(|v| *v == Value::Char(0)));
    }
}
