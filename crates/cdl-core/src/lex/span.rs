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

//! Source positions for CDL tokens and diagnostics.
//!
//! The lexer works on byte offsets; [`LineIndex`] turns those into the
//! 1-based line/column pairs that every [`CdlError`](crate::CdlError)
//! reports.
//!
//! # Examples
//!
//! ```
//! use cdl_core::lex::{LineIndex, SourcePos};
//!
//! let index = LineIndex::new("netcdf x {\ndimensions:\n n = 3 ;\n}");
//! assert_eq!(index.position(0), SourcePos::new(1, 1));
//! assert_eq!(index.position(12), SourcePos::new(2, 2));
//! ```

use std::fmt;

/// A position in source text (1-based line and column).
///
/// Columns count characters, not bytes, so a position inside a line with
/// non-ASCII identifiers still points at the right glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SourcePos {
    line: usize,
    column: usize,
}

impl SourcePos {
    /// Creates a new source position.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the first character of a document.
    #[inline]
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Returns the line number.
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number.
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Byte offset to line/column lookup table for one source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    /// Build the index by scanning `source` once for newlines.
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate a byte offset into a source position.
    ///
    /// Offsets past the end of input map to the position just after the
    /// last character.
    pub fn position(&self, offset: usize) -> SourcePos {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        SourcePos::new(line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_pos_accessors() {
        let pos = SourcePos::new(10, 25);
        assert_eq!(pos.line(), 10);
        assert_eq!(pos.column(), 25);
        assert_eq!(SourcePos::start(), SourcePos::new(1, 1));
    }

    #[test]
    fn test_source_pos_display() {
        assert_eq!(SourcePos::new(3, 7).to_string(), "line 3, column 7");
    }

    #[test]
    fn test_source_pos_ordering() {
        assert!(SourcePos::new(1, 9) < SourcePos::new(2, 1));
        assert!(SourcePos::new(2, 1) < SourcePos::new(2, 2));
    }

    #[test]
    fn test_line_index_first_line() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.position(0), SourcePos::new(1, 1));
        assert_eq!(index.position(2), SourcePos::new(1, 3));
    }

    #[test]
    fn test_line_index_after_newline() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(2), SourcePos::new(2, 1));
        assert_eq!(index.position(3), SourcePos::new(2, 2));
        assert_eq!(index.position(5), SourcePos::new(3, 1));
        assert_eq!(index.position(6), SourcePos::new(4, 1));
    }

    #[test]
    fn test_line_index_counts_chars_not_bytes() {
        let index = LineIndex::new("ƷƬ x");
        // 'x' is at byte 5 but is the fourth character
        assert_eq!(index.position(5), SourcePos::new(1, 4));
    }

    #[test]
    fn test_line_index_past_end() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.position(100), SourcePos::new(2, 1));
    }
}
