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

//! Escape handling for CDL strings, character constants and identifiers.
//!
//! String escapes are decoded exactly once, at lex time, into bytes.
//! Literal characters and `\u`/`\U` escapes contribute their UTF-8
//! encoding; octal and `\x` escapes contribute one raw byte each.

use super::error::LexErrorKind;

/// Decode the backslash escapes in the body of a quoted string.
///
/// `body` is the text between the quotes.
///
/// # Examples
///
/// ```
/// use cdl_core::lex::decode_escapes;
///
/// assert_eq!(decode_escapes(r"a\tb").unwrap(), b"a\tb");
/// assert_eq!(decode_escapes(r"\101\x42C").unwrap(), b"ABC");
/// assert_eq!(decode_escapes(r"\xE9").unwrap(), [0xE9]);
/// assert_eq!(decode_escapes("é").unwrap(), "é".as_bytes());
/// assert!(decode_escapes(r"\q").is_err());
/// ```
pub fn decode_escapes(body: &str) -> Result<Vec<u8>, LexErrorKind> {
    if !body.contains('\\') {
        return Ok(body.as_bytes().to_vec());
    }

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let Some(esc) = chars.next() else {
            return Err(LexErrorKind::InvalidEscape("\\".to_string()));
        };

        let byte = match esc {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            'b' => 0x08,
            'f' => 0x0C,
            'v' => 0x0B,
            'a' => 0x07,
            '\\' => b'\\',
            '"' => b'"',
            '\'' => b'\'',
            '?' => b'?',
            '0'..='7' => {
                let mut digits = String::from(esc);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                raw_byte(&digits, 8)?
            }
            'x' | 'X' => {
                let digits = take_hex(&mut chars, 2);
                if digits.is_empty() {
                    return Err(LexErrorKind::InvalidEscape(format!("\\{}", esc)));
                }
                raw_byte(&digits, 16)?
            }
            'u' | 'U' => {
                let width = if esc == 'u' { 4 } else { 8 };
                let c = code_point(&mut chars, esc, width)?;
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            other => return Err(LexErrorKind::InvalidEscape(format!("\\{}", other))),
        };
        out.push(byte);
    }

    Ok(out)
}

/// Remove identifier escapes: `\ ` becomes a space, `\5foo` becomes `5foo`.
///
/// # Examples
///
/// ```
/// use cdl_core::lex::deescapify;
///
/// assert_eq!(deescapify(r"\5foo"), "5foo");
/// assert_eq!(deescapify(r"a\ b"), "a b");
/// assert_eq!(deescapify("plain"), "plain");
/// ```
pub fn deescapify(name: &str) -> String {
    if !name.contains('\\') {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn take_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                digits.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

fn raw_byte(digits: &str, radix: u32) -> Result<u8, LexErrorKind> {
    let prefix = if radix == 16 { "\\x" } else { "\\" };
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| LexErrorKind::InvalidEscape(format!("{}{}", prefix, digits)))
}

fn code_point(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    marker: char,
    width: usize,
) -> Result<char, LexErrorKind> {
    let digits = take_hex(chars, width);
    if digits.len() != width {
        return Err(LexErrorKind::InvalidEscape(format!("\\{}{}", marker, digits)));
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| LexErrorKind::InvalidEscape(format!("\\{}{}", marker, digits)))
}
