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

//! Core commands for validation, inspection and formatting.

use crate::commands::{self, ParseSettings};
use crate::error::CliError;
use clap::Subcommand;

/// Core CDL commands.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Validate a CDL file
    ///
    /// Compiles the file and reports the first error with its line and
    /// column, or a summary of the dataset.
    Validate {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        settings: ParseSettings,
    },

    /// Print the dataset structure as a tree
    Inspect {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        settings: ParseSettings,
    },

    /// Format a CDL file to canonical form
    Format {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Check only (exit 1 if not canonical)
        #[arg(short, long)]
        check: bool,

        #[command(flatten)]
        settings: ParseSettings,
    },
}

impl CoreCommands {
    /// Execute the core command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CoreCommands::Validate { file, settings } => commands::validate(&file, &settings),
            CoreCommands::Inspect { file, settings } => commands::inspect(&file, &settings),
            CoreCommands::Format {
                file,
                output,
                check,
                settings,
            } => commands::format(&file, output.as_deref(), check, &settings),
        }
    }
}
