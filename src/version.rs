//! Version range parsing
//!
//! Schema attributes describe protocol-version applicability as compact
//! string tokens: an exact version (`"3"`), an open-ended range (`"3+"`),
//! a closed range (`"0-4"`), or the sentinel `none`.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Error for a token that matches none of the range grammars
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid range: {token}")]
pub struct RangeError {
    /// The offending token, as given
    pub token: String,
}

/// Grammar form a range token matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeKind {
    /// A single version: begin == end
    Exact,
    /// Every version from begin upwards
    OpenEnded,
    /// begin through end, both inclusive
    Closed,
    /// The `none` sentinel, or an absent attribute: no constraint
    #[default]
    None,
}

/// A parsed version range
///
/// The original token is kept in `raw` so diagnostics and re-encoding
/// reproduce the document verbatim. An absent range attribute is the
/// `Default` value: kind `None` with an empty `raw`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    /// Original textual form, quotes stripped
    pub raw: String,
    /// Inclusive lower bound
    pub begin: u32,
    /// Inclusive upper bound; `None` means unbounded
    pub end: Option<u32>,
    /// Grammar form the token matched
    pub kind: RangeKind,
}

impl VersionRange {
    /// Parse a range token
    ///
    /// One surrounding double quote on either side is tolerated and
    /// stripped, since the token may arrive still quoted from the document.
    /// The grammars are tried in a fixed precedence order (open-ended,
    /// closed, exact, `none`) and must match the entire token. The forms
    /// are mutually exclusive today; the order is fixed so that grammar
    /// growth cannot introduce ambiguity.
    pub fn parse(token: &str) -> Result<Self, RangeError> {
        let stripped = token.strip_prefix('"').unwrap_or(token);
        let stripped = stripped.strip_suffix('"').unwrap_or(stripped);
        let malformed = || RangeError {
            token: token.to_string(),
        };

        if let Some(begin) = stripped.strip_suffix('+') {
            let begin = parse_version(begin).ok_or_else(malformed)?;
            return Ok(Self {
                raw: stripped.to_string(),
                begin,
                end: None,
                kind: RangeKind::OpenEnded,
            });
        }

        if let Some((begin, end)) = stripped.split_once('-') {
            // No ordering check: begin > end is a caller-level question,
            // not a grammar error.
            let begin = parse_version(begin).ok_or_else(malformed)?;
            let end = parse_version(end).ok_or_else(malformed)?;
            return Ok(Self {
                raw: stripped.to_string(),
                begin,
                end: Some(end),
                kind: RangeKind::Closed,
            });
        }

        if let Some(version) = parse_version(stripped) {
            return Ok(Self {
                raw: stripped.to_string(),
                begin: version,
                end: Some(version),
                kind: RangeKind::Exact,
            });
        }

        if stripped == "none" {
            return Ok(Self {
                raw: stripped.to_string(),
                ..Self::default()
            });
        }

        Err(malformed())
    }

    /// Whether this is the value an absent attribute takes
    pub fn is_unset(&self) -> bool {
        self.kind == RangeKind::None && self.raw.is_empty()
    }

    /// Whether the range constrains anything at all
    pub fn is_none(&self) -> bool {
        self.kind == RangeKind::None
    }
}

/// Parse one numeric component as a non-negative base-10 integer
///
/// Digit runs are validated before conversion; conversion can still fail
/// on overflow, which counts as a malformed token like any other.
fn parse_version(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
