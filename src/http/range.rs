//! `Range: bytes=first-last` parsing.
//!
//! Only the single closed form is accepted. Suffix (`bytes=-500`), open
//! (`bytes=500-`) and multi-range specifiers are rejected. Values are not
//! clamped to the file length; the backend decides what exists.

use thiserror::Error;

use crate::backend::ReadWindow;

/// Malformed or inverted range specifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid byte range {0}")]
pub struct RangeError(pub String);

/// An inclusive byte range with `last >= first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    first: u64,
    last: u64,
}

impl ByteRange {
    /// Parse a `Range` header value.
    pub fn parse(value: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError(value.to_string());

        let spec = value.trim().strip_prefix("bytes=").ok_or_else(invalid)?;
        let (first, last) = spec.split_once('-').ok_or_else(invalid)?;
        let first = parse_digits(first).ok_or_else(invalid)?;
        let last = parse_digits(last).ok_or_else(invalid)?;

        if last < first {
            return Err(invalid());
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of bytes covered, both ends inclusive.
    pub fn length(&self) -> u64 {
        (self.last - self.first).saturating_add(1)
    }

    /// The backend read window (`offset`, `length`) for this range.
    pub fn window(&self) -> ReadWindow {
        ReadWindow {
            offset: self.first,
            length: self.length(),
        }
    }

    /// `Content-Range` value for a resource of `total` bytes.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.first, self.last, total)
    }
}

// `u64::from_str` accepts a leading '+', which the header grammar does not.
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
