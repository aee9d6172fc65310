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

//! Structured error types for the CDL CLI.
//!
//! All commands return `Result<T, CliError>`; `main` prints the error to
//! stderr and exits with status 1.

use cdl_core::CdlError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for `cdlc` operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read, write, or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// File size exceeds the configured limit (`CDLC_MAX_FILE_SIZE`).
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        path: PathBuf,
        actual: u64,
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// The CDL compiler rejected the input.
    ///
    /// Rendered as `file:line:column: Kind: message`.
    #[error("{path}:{location} {kind}: {message}{context}")]
    Compile {
        path: PathBuf,
        /// `line:column:`, `line:`, or empty when no position is known
        location: String,
        kind: String,
        message: String,
        /// `" (in group '/g')"` or empty
        context: String,
    },

    /// The dataset could not be written back as CDL.
    #[error("Canonicalization error: {0}")]
    Canonicalization(String),

    /// JSON serialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// File is not in canonical form.
    ///
    /// This is returned by the `format --check` command.
    #[error("File '{0}' is not in canonical form")]
    NotCanonical(PathBuf),

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Attach a compiler error to the file it came from.
    pub fn compile(path: impl Into<PathBuf>, err: &CdlError) -> Self {
        let location = match (err.line, err.column) {
            (0, _) => String::new(),
            (line, Some(column)) => format!("{}:{}:", line, column),
            (line, None) => format!("{}:", line),
        };
        Self::Compile {
            path: path.into(),
            location,
            kind: err.kind.to_string(),
            message: err.message.clone(),
            context: err
                .context
                .as_ref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default(),
        }
    }

    /// Create a canonicalization error.
    pub fn canonicalization(msg: impl Into<String>) -> Self {
        Self::Canonicalization(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

// Automatic conversion from serde_json::Error
impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}
