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

//! Conversion commands.

use crate::commands::{self, ParseSettings};
use crate::error::CliError;
use clap::Subcommand;

/// Commands that render a compiled dataset in another format.
#[derive(Subcommand)]
pub enum ConversionCommands {
    /// Convert a CDL file to JSON
    ToJson {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,

        /// Leave variable data out
        #[arg(long)]
        no_data: bool,

        #[command(flatten)]
        settings: ParseSettings,
    },

    /// Stream the dataset operations as JSON lines
    ///
    /// Writes one JSON object per operation, in the order the compiler
    /// emits them.
    Ops {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        settings: ParseSettings,
    },
}

impl ConversionCommands {
    /// Execute the conversion command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            ConversionCommands::ToJson {
                file,
                output,
                compact,
                no_data,
                settings,
            } => commands::to_json(&file, output.as_deref(), compact, !no_data, &settings),
            ConversionCommands::Ops { file, settings } => commands::ops(&file, &settings),
        }
    }
}
