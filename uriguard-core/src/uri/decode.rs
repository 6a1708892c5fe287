use crate::uri::MalformedEscape;
use std::borrow::Cow;

/// Decode every `%XX` triplet in `raw` exactly once.
///
/// Hex digits are case-insensitive. Decoded bytes are never re-scanned, so
/// `%2541` yields `%41` and not `A`.
pub fn decode(raw: &str) -> Result<Vec<u8>, MalformedEscape> {
    decode_at(raw, 0).map(Cow::into_owned)
}

/// Same as [`decode`] but reports error positions relative to `offset`, for
/// callers that decode one segment of a larger path at a time.
pub(crate) fn decode_at(raw: &str, offset: usize) -> Result<Cow<'_, [u8]>, MalformedEscape> {
    let bytes = raw.as_bytes();
    if !bytes.contains(&b'%') {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let value = bytes
                .get(i + 1..i + 3)
                .and_then(|pair| hex_pair(pair[0], pair[1]))
                .ok_or(MalformedEscape {
                    position: offset + i,
                })?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(Cow::Owned(out))
}

/// Well-formed escapes in `raw` as `(position, decoded byte)`. Malformed `%`s
/// are skipped; reporting them is the decoder's job.
pub(crate) fn escapes(raw: &str) -> impl Iterator<Item = (usize, u8)> + '_ {
    let bytes = raw.as_bytes();
    let mut i = 0;

    std::iter::from_fn(move || {
        while i < bytes.len() {
            let at = i;
            i += 1;
            if bytes[at] != b'%' {
                continue;
            }
            if let Some(value) = bytes.get(at + 1..at + 3).and_then(|p| hex_pair(p[0], p[1])) {
                i = at + 3;
                return Some((at, value));
            }
        }
        None
    })
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
