//! logfmt quoting and escaping
//!
//! A value is written verbatim unless it contains `=`, a space, `"`, an ASCII
//! control byte, an invalid UTF-8 sequence or U+FFFD, or is exactly `null`.
//! Anything else is wrapped in double quotes with JSON-style escapes.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Literal written for invalid UTF-8 sequences (and U+FFFD itself).
const REPLACEMENT_ESCAPE: &[u8] = b"\\ufffd";

/// Returns true when `raw` cannot be written as a bare logfmt value.
pub fn needs_quoting(raw: &[u8]) -> bool {
    if raw == b"null" {
        return true;
    }
    match std::str::from_utf8(raw) {
        Ok(s) => s
            .chars()
            .any(|c| matches!(c, '=' | ' ' | '"' | char::REPLACEMENT_CHARACTER) || c < ' '),
        Err(_) => true,
    }
}

/// Append `raw` to `buf`, quoting and escaping it when required.
pub fn write_escaped(buf: &mut Vec<u8>, raw: &[u8]) {
    if needs_quoting(raw) {
        write_quoted(buf, raw);
    } else {
        buf.extend_from_slice(raw);
    }
}

/// Escape `raw` into a fresh string.
pub fn escape(raw: &[u8]) -> String {
    let mut buf = Vec::with_capacity(raw.len() + 2);
    write_escaped(&mut buf, raw);
    // Output is valid UTF-8: invalid input sequences were replaced.
    String::from_utf8_lossy(&buf).into_owned()
}

/// Append `raw` wrapped in quotes, escaping everything that would break a line
/// or a quoted value.
pub fn write_quoted(buf: &mut Vec<u8>, raw: &[u8]) {
    buf.push(b'"');
    let mut start = 0;
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b.is_ascii() {
            if b >= 0x20 && b != b'\\' && b != b'"' {
                i += 1;
                continue;
            }
            buf.extend_from_slice(&raw[start..i]);
            match b {
                b'\\' | b'"' => buf.extend_from_slice(&[b'\\', b]),
                b'\n' => buf.extend_from_slice(b"\\n"),
                b'\r' => buf.extend_from_slice(b"\\r"),
                b'\t' => buf.extend_from_slice(b"\\t"),
                _ => {
                    buf.extend_from_slice(b"\\u00");
                    buf.push(HEX[usize::from(b >> 4)]);
                    buf.push(HEX[usize::from(b & 0xF)]);
                }
            }
            i += 1;
            start = i;
            continue;
        }

        match decode_char(&raw[i..]) {
            Some((c, len)) if c != char::REPLACEMENT_CHARACTER => i += len,
            decoded => {
                buf.extend_from_slice(&raw[start..i]);
                buf.extend_from_slice(REPLACEMENT_ESCAPE);
                i += decoded.map_or(1, |(_, len)| len);
                start = i;
            }
        }
    }
    buf.extend_from_slice(&raw[start..]);
    buf.push(b'"');
}

/// Decode one non-ASCII char at the start of `bytes`.
///
/// Returns `None` for an invalid or truncated sequence, which the caller
/// skips one byte at a time.
fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let len = match bytes.first()? {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let chunk = bytes.get(..len)?;
    let c = std::str::from_utf8(chunk).ok()?.chars().next()?;
    Some((c, len))
}
