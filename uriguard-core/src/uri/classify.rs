use crate::uri::decode::{decode_at, escapes};
use crate::uri::{RawTarget, ViolationKind, ViolationSet};

/// Classify the raw (undecoded) path of a request-target.
///
/// Every check runs and the results are unioned. Never fails: malformed
/// escapes are ignored here and surface when the path is decoded.
pub fn classify(raw: &RawTarget) -> ViolationSet {
    classify_path(raw.path())
}

pub fn classify_path(path: &str) -> ViolationSet {
    let mut violations = ViolationSet::empty();

    let escapes: Vec<(usize, u8)> = escapes(path).collect();
    let has_encoded_separator = escapes.iter().any(|(_, b)| *b == b'/');

    if has_encoded_separator {
        violations.insert(ViolationKind::AmbiguousPathSeparator);
    }

    if escapes.iter().any(|(_, b)| *b == b'%') {
        violations.insert(ViolationKind::AmbiguousPathEncoding);
    }

    if has_empty_segment(path, &escapes) {
        violations.insert(ViolationKind::AmbiguousEmptySegment);
    }

    for segment in path.split('/') {
        let (name, params) = match segment.split_once(';') {
            Some((name, params)) => (name, Some(params)),
            None => (segment, None),
        };

        let dot = dot_segment(name);

        if params.is_some() && (has_encoded_separator || dot.is_some()) {
            violations.insert(ViolationKind::AmbiguousPathParameter);
        }

        if dot == Some(DotSegment::Encoded) {
            violations.insert(ViolationKind::AmbiguousPathSegment);
        }
    }

    violations
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DotSegment {
    Literal,
    Encoded,
}

/// Whether `name` is `.` or `..`, and whether escapes were needed to get there.
fn dot_segment(name: &str) -> Option<DotSegment> {
    if name == "." || name == ".." {
        return Some(DotSegment::Literal);
    }

    if !name.contains('%') || name.len() > 6 {
        return None;
    }

    let decoded = decode_at(name, 0).ok()?;
    match &*decoded {
        b"." | b".." => Some(DotSegment::Encoded),
        _ => None,
    }
}

fn has_empty_segment(path: &str, escapes: &[(usize, u8)]) -> bool {
    if path.contains("//") {
        return true;
    }

    // A segment made only of path parameters has an empty name.
    if path.split('/').skip(1).any(|segment| segment.starts_with(';')) {
        return true;
    }

    let bytes = path.as_bytes();
    escapes.iter().filter(|(_, b)| *b == b'/').any(|&(pos, _)| {
        let before = pos.checked_sub(1).and_then(|i| bytes.get(i));
        let after = bytes.get(pos + 3..).unwrap_or_default();

        before == Some(&b'/') || after.starts_with(b"/") || is_encoded_separator(after)
    })
}

fn is_encoded_separator(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', b'2', b'f' | b'F', ..])
}
