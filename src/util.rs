//! Text helpers shared by the importer and the query evaluator.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (e.g. from a `\ide` line)
/// 3. Falls back to Windows-1252 (common in older USFM projects)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// The encoding label declared by a USFM `\ide` line, if any.
///
/// Only the raw bytes are available at this point, so the line is located
/// before decoding; the label must be ASCII.
pub fn ide_encoding(bytes: &[u8]) -> Option<&str> {
    let mut offset = 0;
    while let Some(found) = memchr::memmem::find(&bytes[offset..], b"\\ide") {
        let start = offset + found + 4;
        offset = start;
        let rest = &bytes[start..];
        // `\ide` must be followed by whitespace, not a longer marker name.
        if !rest.first().is_some_and(|b| b.is_ascii_whitespace()) {
            continue;
        }
        let end = memchr::memchr2(b'\n', b'\\', rest).unwrap_or(rest.len());
        let label = std::str::from_utf8(&rest[..end]).ok()?.trim();
        return (!label.is_empty() && label.is_ascii()).then_some(label);
    }
    None
}

/// Collapse every whitespace run (including newlines) to a single space.
pub fn normalize_space(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                result.push(' ');
            }
            in_space = true;
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF\\id GEN";
        assert_eq!(decode_text(bytes, None), "\\id GEN");
    }

    #[test]
    fn test_ide_encoding() {
        assert_eq!(ide_encoding(b"\\id GEN\n\\ide ISO-8859-2\r\n\\p"), Some("ISO-8859-2"));
        assert_eq!(ide_encoding(b"\\id GEN\n\\ide UTF-8"), Some("UTF-8"));
        assert_eq!(ide_encoding(b"\\id GEN\n\\p text"), None);
        assert_eq!(ide_encoding(b"\\idex foo\n\\ide \n"), None);
    }

    #[test]
    fn test_decode_uses_ide_hint() {
        let bytes = b"\\ide iso-8859-2\n\\p \xB1";
        let hint = ide_encoding(bytes);
        assert_eq!(decode_text(bytes, hint), "\\ide iso-8859-2\n\\p \u{105}");
        assert_eq!(decode_text(bytes, None), "\\ide iso-8859-2\n\\p \u{B1}");
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        // 0x93/0x94 are curly quotes in Windows-1252 and invalid UTF-8.
        let bytes = b"\x93hi\x94";
        assert_eq!(decode_text(bytes, None), "\u{201c}hi\u{201d}");
    }

    #[test]
    fn test_decode_uses_hint() {
        let bytes = b"caf\xE9";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "café");
    }

    #[test]
    fn test_normalize_space() {
        assert_eq!(normalize_space("a  b\n\tc"), "a b c");
        assert_eq!(normalize_space("  lead"), " lead");
        assert_eq!(normalize_space(""), "");
    }
}
