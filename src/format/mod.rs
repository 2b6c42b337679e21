// In: src/format/mod.rs

//! Defines all on-disk structures and constants for the tiny mapping format.
//! This is the single source of truth for the header grammar, the record
//! kinds, and the identifier escaping rules shared by the reader and writer.
//!
//! The grammar is record-ordered and tab-separated: a header line declares the
//! format version and the namespace columns (the first column is the file's
//! declared source namespace), followed by class records and their indented
//! member and comment records.

use crate::error::SymmapError;

pub mod reader;
pub mod writer;

//==================================================================================
// I. Format Constants
//==================================================================================

/// The magic token opening every tiny mapping file.
pub const HEADER_MAGIC: &str = "tiny";
/// Major format version this core reads and writes.
pub const FORMAT_MAJOR: u32 = 2;
/// Minor format version this core writes. Higher minors are read leniently.
pub const FORMAT_MINOR: u32 = 0;

/// Header property enabling backslash escapes in identifiers. Always set on
/// output so emitted tables are unambiguous regardless of identifier content.
pub const PROP_ESCAPED_NAMES: &str = "escaped-names";

//==================================================================================
// II. Identifier Escaping
//==================================================================================

/// Escapes an identifier or comment for emission under `escaped-names`.
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`]. Fails on a dangling backslash or an unknown escape.
pub(crate) fn unescape(raw: &str) -> Result<String, SymmapError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => {
                return Err(SymmapError::Format(format!(
                    "Unknown escape sequence '\\{}'",
                    other
                )))
            }
            None => {
                return Err(SymmapError::Format(
                    "Dangling backslash at end of token".to_string(),
                ))
            }
        }
    }
    Ok(out)
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_covers_all_sequences() {
        let raw = "a\\b\nc\rd\te\0f";
        let escaped = escape(raw);
        assert_eq!(escaped, "a\\\\b\\nc\\rd\\te\\0f");
        assert_eq!(unescape(&escaped).unwrap(), raw);
    }

    #[test]
    fn test_unescape_rejects_bad_sequences() {
        assert!(matches!(unescape("bad\\q"), Err(SymmapError::Format(_))));
        assert!(matches!(unescape("dangling\\"), Err(SymmapError::Format(_))));
    }

    #[test]
    fn test_plain_tokens_pass_through_unchanged() {
        assert_eq!(escape("net/example/ClassOne"), "net/example/ClassOne");
        assert_eq!(unescape("net/example/ClassOne").unwrap(), "net/example/ClassOne");
    }
}
