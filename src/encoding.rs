//! Character encoding detection and transcoding.
//!
//! Byte input is decoded to UTF-8 before parsing. The charset is taken from a
//! byte order mark, then from a `<meta>` declaration near the start of the
//! document, and defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::{CHARSET_META, CONTENT_TYPE_CHARSET};

/// Bytes scanned for a `<meta>` charset declaration.
const SNIFF_LIMIT: usize = 1024;

/// Detect the character encoding of HTML bytes.
///
/// Order of precedence:
/// 1. byte order mark,
/// 2. `<meta charset="...">`,
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`,
/// 4. UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LIMIT)]);
    declared_charset(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        // A meta tag cannot declare UTF-16; the bytes it sits in are ASCII-compatible.
        .map_or(UTF_8, Encoding::output_encoding)
}

fn declared_charset(head: &str) -> Option<String> {
    [&*CHARSET_META, &*CONTENT_TYPE_CHARSET]
        .into_iter()
        .find_map(|re| re.captures(head).and_then(|c| c.get(1)).map(|m| m.as_str().to_string()))
}

/// Decode HTML bytes to a UTF-8 string.
///
/// Malformed sequences become U+FFFD; decoding never fails. A leading byte
/// order mark is stripped.
///
/// # Examples
///
/// ```
/// use rs_readable::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Caf\xE9</body></html>";
/// assert!(transcode_to_utf8(html).contains('\u{FFFD}'));
///
/// let html = b"<meta charset=\"latin1\"><p>Caf\xE9</p>";
/// assert!(transcode_to_utf8(html).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!(encoding = used.name(), "malformed byte sequences replaced while decoding");
    }
    decoded.into_owned()
}
