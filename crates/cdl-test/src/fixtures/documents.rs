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

//! Valid CDL documents.

use super::Fixture;
use cdl_core::{FormatVariant, TypeKind, Value};

/// The smallest valid document.
pub fn empty() -> Fixture {
    Fixture::new("empty", FormatVariant::Classic, "netcdf empty {\n}\n")
}

/// Dimensions, typed variables, attributes and data in the classic variant.
pub fn basics() -> Fixture {
    Fixture::new(
        "basics",
        FormatVariant::Classic,
        r#"netcdf basics {
dimensions:
    lev = 1 ;
    lat = 2 ;
    lon = 3 ;
    time = unlimited ;
variables:
    int tas(lev, lat, lon) ;
        tas:standard_name = "air_temperature" ;
        tas:units = "K" ;
        tas:radius = 6371000.0 ;
    double height(lev) ;
        height:standard_name = "height" ;
// global attributes
    :Conventions = "CF-1.5" ;
    :comment = "cdl compiler rocks!" ;
data:
    tas = 0, 1, 2, 3, 4, 5 ;
    height = 10.0 ;
}
"#,
    )
}

/// Declared `_FillValue`, `_` placeholders and short record data.
pub fn fill_values() -> Fixture {
    Fixture::new(
        "fill_values",
        FormatVariant::Classic,
        r#"netcdf fillvalues {
dimensions:
    lat = 2 ;
    lon = 2 ;
    time = unlimited ;
variables:
    int time(time) ;
        time:units = "days since 1970-01-01" ;
    float lat(lat) ;
        lat:standard_name = "latitude" ;
    float lon(lon) ;
        lon:standard_name = "longitude" ;
    float tas(time, lat, lon) ;
        tas:standard_name = "air_temperature" ;
        tas:_FillValue = -1.0e30f ;
// global attributes
    :comment = "fill value tests" ;
data:
    time = 0, 30, 60 ;
    lat = 0.0f, 10.0f ;
    lon = 0.0f, 20.0f ;
    // the last two values are missing and become fill
    tas = _, _, 3.0f, 4.0f, 5.0f, 6.0f, 7.0f, 8.0f, 9.0f, 10.0f ;
}
"#,
    )
}

/// Scalar and multi-dimensional char variables.
pub fn charvars() -> Fixture {
    Fixture::new(
        "charvars",
        FormatVariant::Classic,
        r#"netcdf charvars {
dimensions:
    nreg = 3 ;
    namelen = 10 ;
    rec = 2 ;
    code = 3 ;
    codelen = 4 ;
variables:
    char letter ;
    int regcodes(nreg) ;
        regcodes:long_name = "region codes" ;
    char regions(nreg, namelen) ;
        regions:long_name = "region names" ;
    char digits(namelen) ;
        digits:long_name = "decimal digits" ;
    int sampleid(rec) ;
        sampleid:long_name = "sample id" ;
    char dna_code(rec, code, codelen) ;
        dna_code:long_name = "DNA code" ;
// global attributes
    :comment = "a cast of unholy characters" ;
data:
    regcodes = 1, 2, 3 ;
    regions = "Europe", "Americas", "Asia" ;
    digits = "0123456789" ;
    letter = "X" ;
    sampleid = 1, 2 ;
    dna_code = "ACTG", "ACGG", "ATGC", "CTGA", "GCTA", "TGCA";
}
"#,
    )
}

/// Escaped identifiers, escape sequences and character constants.
pub fn escapes() -> Fixture {
    Fixture::new(
        "escapes",
        FormatVariant::Classic,
        r#"netcdf escapes {
dimensions:
    fw\:n = 4 ;
variables:
    byte b(fw\:n) ;
        b:note = "tab\there", "\x41\102" ;
    char c(fw\:n) ;
data:
    b = 'a', '\n', -128b, 0x7f ;
    c = 'x', '\'', '\\', '\0' ;
}
"#,
    )
}

/// Unsigned and 64-bit constants in the 64-bit classic variant.
pub fn cdf5_constants() -> Fixture {
    Fixture::new(
        "cdf5_constants",
        FormatVariant::Classic64,
        r#"netcdf cdf5_constants {
dimensions:
    dim1 = 5;
variables:
    ubyte var_ub(dim1);
        var_ub:_FillValue = 250ub;
    ushort var_us(dim1);
        var_us:_FillValue = 65534us;
    uint var_ui(dim1);
        var_ui:_FillValue = 1;
    int64 var_i8(dim1);
        var_i8:_FillValue = -1;
    uint64 var_ui8(dim1);
        var_ui8:_FillValue = 42;
    // global attributes
    :ubyte_attr = 255UB;
    :ushort_attr = 65535US;
    :uint_attr = 4294967295U;
    :int64_attr = -9223372036854775806LL;
    :uint64_attr = 18446744073709551614ULL;
data:
    var_ub = 250ub, 0x27, 255ub, 4, _;
    var_us = 0x3456, 65534us, 65535us, 65530us, _;
    var_ui = 0xfedcba98u, 4294967295U, 1, 07654321765u, _;  // hex, max, fill, octal
    var_ui8 = 0xfedcba9876543210ull, 18446744073709551615ULL, 01234567012345670123456ULL, 42, _;
    var_i8 = -9223372036854775807LL, 9223372036854775807LL, 0xfedcba987654321LL, 0777777777777777777777LL, -1;
}
"#,
    )
}

/// Five ushort values with the default ushort fill overridden to 65534.
pub fn ushort_fill() -> Fixture {
    Fixture::new(
        "ushort_fill",
        FormatVariant::Classic64,
        r#"netcdf ushort_fill {
dimensions:
    n = 5 ;
variables:
    ushort v(n) ;
data:
    v = 0x3456, 65534US, 65535US, 65530US, _ ;
}
"#,
    )
    .with_fill(TypeKind::UShort, Value::UShort(65534))
}

/// Variable-length strings in the hierarchical variant.
pub fn strings() -> Fixture {
    Fixture::new(
        "strings",
        FormatVariant::Hierarchical,
        r#"netcdf strings {
dimensions:
    dim1 = 5;
variables:
    string strvar(dim1);
        strvar:_FillValue = "؆";
    string strvar:stratt = "ǐ\tǒƯ";
// global attributes
    uint :u4att = 10;
    string :strattb = "A string attribute!";
data:
    strvar = "abc", "defg", "_", "def", "\nƷƬƫ";
}
"#,
    )
}

/// Nested groups with ancestor and absolute-path dimension references.
pub fn groups() -> Fixture {
    Fixture::new(
        "groups",
        FormatVariant::Hierarchical,
        r#"netcdf groups {
dimensions:
    time = unlimited ;
    x = 2 ;
variables:
    double time(time) ;
    :title = "nested groups" ;
data:
    time = 0.5, 1.5, 2.5 ;

group: forecast {
  dimensions:
    member = 3 ;
  variables:
    float t2m(time, member) ;
      t2m:units = "K" ;
    int64 ids(member) ;
    :source = "ensemble" ;
  data:
    ids = 1, 2, 3 ;

  group: detail {
    variables:
      short level(member, x) ;
    data:
      level = 1, 2, 3, 4, 5, 6 ;
  }
}

group: obs {
  variables:
    ubyte flags(/forecast/member) ;
  data:
    flags = 1, 0, 1 ;
}
}
"#,
    )
}
