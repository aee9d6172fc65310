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

//! Error types for CDL parsing.

use crate::lex::SourcePos;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdlErrorKind {
    /// Malformed token, unterminated string, unnamed group.
    Lexical,
    /// Token sequence does not match any production.
    Syntax,
    /// Reference to an undeclared dimension or variable.
    UnknownIdentifier,
    /// Redeclaration of a dimension, variable or group in one scope.
    DuplicateName,
    /// Literal kind incompatible with the declared or target kind.
    TypeMismatch,
    /// Numeric literal outside its target kind's bounds.
    Range,
    /// Data assignment does not fit the variable's extent.
    Shape,
    /// The dataset sink rejected an operation.
    Sink,
    /// Resource limit exceeded.
    Security,
    /// I/O error (file operations in front-ends).
    IO,
}

impl fmt::Display for CdlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "LexicalError"),
            Self::Syntax => write!(f, "SyntaxError"),
            Self::UnknownIdentifier => write!(f, "UnknownIdentifierError"),
            Self::DuplicateName => write!(f, "DuplicateNameError"),
            Self::TypeMismatch => write!(f, "TypeMismatchError"),
            Self::Range => write!(f, "RangeError"),
            Self::Shape => write!(f, "ShapeError"),
            Self::Sink => write!(f, "SinkError"),
            Self::Security => write!(f, "SecurityError"),
            Self::IO => write!(f, "IOError"),
        }
    }
}

/// An error that occurred while compiling a CDL document.
///
/// Every error is fatal to the parse that produced it: the parser stops at
/// the first one and reports its source position.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind} at line {line}: {message}")]
pub struct CdlError {
    /// The kind of error.
    pub kind: CdlErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when unknown).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Additional context (e.g., "in group 'forecast'").
    pub context: Option<String>,
}

impl CdlError {
    /// Create a new error.
    pub fn new(kind: CdlErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            context: None,
        }
    }

    /// Create a new error positioned at `pos`.
    pub fn at(kind: CdlErrorKind, message: impl Into<String>, pos: SourcePos) -> Self {
        Self::new(kind, message, pos.line()).with_column(pos.column())
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Source position of the error, when one is known.
    pub fn position(&self) -> Option<SourcePos> {
        if self.line == 0 {
            return None;
        }
        Some(SourcePos::new(self.line, self.column.unwrap_or(1)))
    }

    // Convenience constructors for each error kind
    pub fn lexical(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::Lexical, message, pos)
    }

    pub fn syntax(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::Syntax, message, pos)
    }

    pub fn unknown_identifier(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::UnknownIdentifier, message, pos)
    }

    pub fn duplicate_name(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::DuplicateName, message, pos)
    }

    pub fn type_mismatch(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::TypeMismatch, message, pos)
    }

    pub fn range(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::Range, message, pos)
    }

    pub fn shape(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::Shape, message, pos)
    }

    pub fn sink(message: impl Into<String>, pos: SourcePos) -> Self {
        Self::at(CdlErrorKind::Sink, message, pos)
    }

    /// A resource limit was exceeded. Only the line is known.
    pub fn security(message: impl Into<String>, line: usize) -> Self {
        Self::new(CdlErrorKind::Security, message, line)
    }

    /// An I/O failure around the parse, such as reading the input file.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(CdlErrorKind::IO, message, 0)
    }
}

/// Result type for CDL operations.
pub type CdlResult<T> = Result<T, CdlError>;
