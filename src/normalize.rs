//! Relaxed-JSON normalization
//!
//! Schema documents are authored in a JSON dialect that allows `//` and
//! `/* */` comments plus trailing commas. [`normalize`] rewrites such a
//! document into strict JSON text so a regular JSON parser can take over.
//! String contents are preserved byte for byte; comment markers inside a
//! string literal are content, not comments.

use thiserror::Error;

/// Errors from the normalization scanner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),

    #[error("unterminated block comment starting at byte {0}")]
    UnterminatedComment(usize),
}

/// Rewrite a relaxed-JSON document into strict JSON text
///
/// Comments are replaced by a single space (they can only occur where
/// whitespace is legal), then commas left dangling before a closing `}` or
/// `]` are dropped. Whether the result is valid JSON is still the parser's
/// call; normalization only removes the dialect extensions.
pub fn normalize(input: &str) -> Result<String, NormalizeError> {
    let stripped = strip_comments(input)?;
    strip_trailing_commas(&stripped)
}

/// Replace line and block comments outside string literals with a space
fn strip_comments(input: &str) -> Result<String, NormalizeError> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = scan_string(bytes, i)?,
            b'/' if matches!(bytes.get(i + 1), Some(b'/' | b'*')) => {
                out.push_str(&input[run_start..i]);
                if bytes[i + 1] == b'/' {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                } else {
                    let start = i;
                    i += 2;
                    loop {
                        if i + 1 >= bytes.len() {
                            return Err(NormalizeError::UnterminatedComment(start));
                        }
                        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                out.push(' ');
                run_start = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[run_start..]);
    Ok(out)
}

/// Drop commas whose next significant character closes an object or array
fn strip_trailing_commas(input: &str) -> Result<String, NormalizeError> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = scan_string(bytes, i)?,
            b',' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                if matches!(bytes.get(j), Some(b'}' | b']')) {
                    out.push_str(&input[run_start..i]);
                    run_start = i + 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[run_start..]);
    Ok(out)
}

/// Advance past a string literal, honoring backslash escapes
///
/// Returns the index just past the closing quote.
fn scan_string(bytes: &[u8], start: usize) -> Result<usize, NormalizeError> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(NormalizeError::UnterminatedString(start))
}
