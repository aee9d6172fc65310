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

//! Inspect command - dataset structure visualization

use super::{load, ParseSettings};
use crate::error::CliError;
use cdl_core::{text_of, Attribute, Dataset, GroupId, TypeKind, Value};
use colored::Colorize;

/// Values shown per attribute before the list is cut short.
const MAX_SHOWN_VALUES: usize = 8;

/// Inspect and visualize the structure of a CDL file.
///
/// Prints the group tree with each group's dimensions, variables (with
/// their attributes and data extent) and group attributes.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or does not compile.
///
/// # Examples
///
/// ```no_run
/// use cdl_cli::commands::{inspect, ParseSettings};
///
/// # fn main() -> Result<(), cdl_cli::error::CliError> {
/// inspect("example.cdl", &ParseSettings::default())?;
/// # Ok(())
/// # }
/// ```
pub fn inspect(file: &str, settings: &ParseSettings) -> Result<(), CliError> {
    let (_, ds) = load(file, settings)?;

    println!("{}", "netCDF Dataset".bold().underline());
    println!();
    println!("{}  {}", "Name:".cyan(), ds.name);
    println!("{}  {}", "Variant:".cyan(), ds.variant);
    println!();
    print_group(&ds, GroupId::ROOT, 0);

    Ok(())
}

fn print_group(ds: &Dataset, id: GroupId, indent: usize) {
    let group = ds.group(id);
    let prefix = "  ".repeat(indent);

    if id == GroupId::ROOT {
        println!("{}{}", prefix, "/".green().bold());
    } else {
        println!("{}group {}", prefix, group.name.green().bold());
    }

    if !group.dimensions.is_empty() {
        println!("{}  {}", prefix, "dimensions:".cyan());
        for dim in &group.dimensions {
            if dim.is_unlimited() {
                println!(
                    "{}    {} = UNLIMITED ({} currently)",
                    prefix,
                    dim.name.yellow(),
                    dim.len()
                );
            } else {
                println!("{}    {} = {}", prefix, dim.name.yellow(), dim.len());
            }
        }
    }

    if !group.variables.is_empty() {
        println!("{}  {}", prefix, "variables:".cyan());
        for var in &group.variables {
            let dims = ds.dimension_names(id, var);
            let shape = if dims.is_empty() {
                String::new()
            } else {
                format!("({})", dims.join(", "))
            };
            let extent = match &var.data {
                Some(values) => format!("[{} values]", values.len()).dimmed().to_string(),
                None => "[no data]".dimmed().to_string(),
            };
            println!(
                "{}    {} {}{} {}",
                prefix,
                var.kind.to_string().magenta(),
                var.name.yellow(),
                shape,
                extent
            );
            for attr in &var.attributes {
                println!("{}      {}", prefix, format_attribute(attr));
            }
        }
    }

    if !group.attributes.is_empty() {
        println!("{}  {}", prefix, "attributes:".cyan());
        for attr in &group.attributes {
            println!("{}    {}", prefix, format_attribute(attr));
        }
    }

    for child in &group.children {
        print_group(ds, *child, indent + 1);
    }
}

fn format_attribute(attr: &Attribute) -> String {
    let values = if attr.kind == TypeKind::Char {
        format!("{:?}", text_of(&attr.values).unwrap_or_default())
    } else {
        let shown: Vec<String> = attr
            .values
            .iter()
            .take(MAX_SHOWN_VALUES)
            .map(format_value)
            .collect();
        if attr.values.len() > MAX_SHOWN_VALUES {
            format!("{}, ... ({} values)", shown.join(", "), attr.values.len())
        } else {
            shown.join(", ")
        }
    };
    format!(
        "{}: {} {}",
        attr.name,
        values,
        format!("({})", attr.kind).dimmed()
    )
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
