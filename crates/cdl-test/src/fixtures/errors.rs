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

//! Error test fixtures.
//!
//! Invalid documents paired with the error kind the parser must report.

use cdl_core::{CdlErrorKind, FormatVariant};

/// One invalid document.
#[derive(Debug, Clone, Copy)]
pub struct InvalidSample {
    pub name: &'static str,
    pub variant: FormatVariant,
    pub source: &'static str,
    pub expected: CdlErrorKind,
}

const fn sample(
    name: &'static str,
    variant: FormatVariant,
    source: &'static str,
    expected: CdlErrorKind,
) -> InvalidSample {
    InvalidSample {
        name,
        variant,
        source,
        expected,
    }
}

/// Invalid CDL samples for parser error testing.
pub fn invalid_cdl_samples() -> Vec<InvalidSample> {
    use CdlErrorKind::*;
    use FormatVariant::*;

    vec![
        // Lexical
        sample("missing_dataset_name", Classic, "netcdf { }", Lexical),
        sample(
            "unterminated_string",
            Classic,
            "netcdf a { variables: :s = \"abc ; }",
            Lexical,
        ),
        sample("bad_escape", Classic, r#"netcdf a { variables: :s = "\q" ; }"#, Lexical),
        sample("bad_octal", Classic, "netcdf a { variables: :o = 089 ; }", Lexical),
        sample("suffix_not_in_variant", Classic, "netcdf a { variables: :u = 5UB ; }", Lexical),
        sample("stray_character", Classic, "netcdf a { variables: :x = 1 ? ; }", Lexical),
        // Syntax
        sample("empty", Classic, "", Syntax),
        sample("missing_semicolon", Classic, "netcdf a { dimensions: x = 1 }", Syntax),
        sample("missing_close", Classic, "netcdf a { dimensions: x = 1 ;", Syntax),
        sample("int64_in_classic", Classic, "netcdf a { variables: int64 v ; }", Syntax),
        sample(
            "typed_attribute_in_classic",
            Classic,
            "netcdf a { variables: int v ; short v:a = 1 ; }",
            Syntax,
        ),
        sample("group_in_classic", Classic64, "netcdf a { group: g { } }", Syntax),
        // Names
        sample(
            "duplicate_dimension",
            Classic,
            "netcdf a { dimensions: x = 1 ; x = 2 ; }",
            DuplicateName,
        ),
        sample(
            "duplicate_variable",
            Classic,
            "netcdf a { variables: int v ; float v ; }",
            DuplicateName,
        ),
        sample(
            "duplicate_group",
            Hierarchical,
            "netcdf a { group: g { } group: g { } }",
            DuplicateName,
        ),
        sample(
            "unknown_dimension",
            Classic,
            "netcdf a { variables: int v(x) ; }",
            UnknownIdentifier,
        ),
        sample(
            "unknown_data_variable",
            Classic,
            "netcdf a { data: v = 1 ; }",
            UnknownIdentifier,
        ),
        sample(
            "sibling_dimension",
            Hierarchical,
            "netcdf a { group: g { dimensions: d = 2 ; } group: h { variables: int v(d) ; } }",
            UnknownIdentifier,
        ),
        // Kinds and ranges
        sample(
            "ubyte_overflow",
            Classic64,
            "netcdf a { variables: :a = 256UB ; }",
            Range,
        ),
        sample(
            "byte_overflow",
            Classic,
            "netcdf a { variables: byte b ; data: b = 128 ; }",
            Range,
        ),
        sample(
            "uint64_octal_overflow",
            Classic64,
            "netcdf a { variables: :a = 0765432107654321076543ULL ; }",
            Range,
        ),
        sample(
            "negative_unsigned",
            Classic64,
            "netcdf a { variables: uint :u = -10 ; }",
            Range,
        ),
        sample("zero_dimension", Classic, "netcdf a { dimensions: x = 0 ; }", Range),
        sample(
            "float_into_int",
            Classic,
            "netcdf a { variables: int v ; data: v = 2.5 ; }",
            TypeMismatch,
        ),
        sample(
            "string_into_double",
            Classic,
            "netcdf a { variables: double v ; data: v = \"x\" ; }",
            TypeMismatch,
        ),
        // Shapes
        sample(
            "too_many_values",
            Classic,
            "netcdf a { dimensions: x = 2 ; variables: int v(x) ; data: v = 1, 2, 3 ; }",
            Shape,
        ),
        sample(
            "second_unlimited",
            Classic,
            "netcdf a { dimensions: t = unlimited ; u = unlimited ; }",
            Shape,
        ),
        sample(
            "fill_value_list",
            Classic,
            "netcdf a { variables: int v ; v:_FillValue = 1, 2 ; }",
            Shape,
        ),
        sample(
            "multibyte_char_constant",
            Classic,
            "netcdf a { variables: char c ; data: c = 'é' ; }",
            Lexical,
        ),
        sample(
            "string_not_utf8",
            Hierarchical,
            r#"netcdf a { variables: string :s = "\xE9" ; }"#,
            TypeMismatch,
        ),
        sample(
            "global_placeholder_untyped",
            Classic,
            "netcdf a { variables: :a = _ ; }",
            TypeMismatch,
        ),
    ]
}
