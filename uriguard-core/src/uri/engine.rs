use crate::uri::decode::decode_at;
use crate::uri::{
    BypassFlag, CompliancePolicy, MalformedEscape, PathError, PolicyDecision, RawTarget, TargetError,
    ViolationSet, classify, evaluate,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters re-escaped when rendering a segment back into a path string.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b';')
    .add(b'?');

/// Fully decoded path, split on the separators that were literal on the wire.
///
/// A segment may itself contain `/` when the client sent `%2F`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecodedPath {
    segments: SmallVec<[String; 8]>,
}

impl DecodedPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// `/` followed by the segments joined with `/`.
    ///
    /// Lossy by construction: `/a%2Fb` and `/a/b` render the same. Use
    /// [`DecodedPath::to_encoded_string`] wherever the string is matched on.
    pub fn to_decoded_string(&self) -> String {
        let mut out = String::from("/");
        out.push_str(&self.segments.join("/"));
        out
    }

    /// Canonical path with `%`, `/` and other unsafe bytes inside segments
    /// re-escaped, so the segment boundaries survive the round-trip.
    pub fn to_encoded_string(&self) -> String {
        let mut out = String::from("/");
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.extend(utf8_percent_encode(segment, SEGMENT));
        }
        out
    }
}

impl fmt::Display for DecodedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_encoded_string())
    }
}

impl Serialize for DecodedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    /// Ambiguities present in the target that the policy does not tolerate.
    Violations(ViolationSet),
    /// The policy allowed the target but it could not be decoded.
    InternalDecodeInconsistency(MalformedEscape),
    PathTraversal,
    InvalidUtf8,
    NulByte,
}

impl Rejection {
    /// Offending kinds; empty for rejections that are not policy decisions.
    pub fn violations(&self) -> ViolationSet {
        match self {
            Rejection::Violations(set) => *set,
            _ => ViolationSet::empty(),
        }
    }
}

impl From<PathError> for Rejection {
    fn from(err: PathError) -> Self {
        match err {
            PathError::Malformed(err) => Rejection::InternalDecodeInconsistency(err),
            PathError::Traversal => Rejection::PathTraversal,
            PathError::InvalidUtf8 => Rejection::InvalidUtf8,
            PathError::NulByte => Rejection::NulByte,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Violations(set) => write!(f, "ambiguous uri: {set}"),
            Rejection::InternalDecodeInconsistency(err) => {
                write!(f, "internal decode inconsistency: {err}")
            }
            Rejection::PathTraversal => f.write_str("path traversal above root"),
            Rejection::InvalidUtf8 => f.write_str("decoded path is not valid UTF-8"),
            Rejection::NulByte => f.write_str("decoded path contains a NUL byte"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecodeResult {
    Accepted {
        raw: RawTarget,
        canonical: DecodedPath,
    },
    Rejected(Rejection),
}

impl DecodeResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DecodeResult::Accepted { .. })
    }

    pub fn canonical(&self) -> Option<&DecodedPath> {
        match self {
            DecodeResult::Accepted { canonical, .. } => Some(canonical),
            DecodeResult::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            DecodeResult::Accepted { .. } => None,
            DecodeResult::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Classify, evaluate against `policy`, and decode if allowed.
///
/// Pure in both inputs; safe to call from any number of threads at once.
pub fn resolve(raw: &RawTarget, policy: &CompliancePolicy) -> DecodeResult {
    let violations = classify(raw);

    if let PolicyDecision::Reject { offending } = evaluate(violations, policy) {
        debug!(
            raw_target = %raw,
            policy = policy.name(),
            violations = %offending,
            "request target rejected by uri compliance policy"
        );
        return DecodeResult::Rejected(Rejection::Violations(offending));
    }

    match decode_path(raw) {
        Ok(canonical) => DecodeResult::Accepted {
            raw: raw.clone(),
            canonical,
        },
        Err(err) => {
            if let PathError::Malformed(malformed) = err {
                warn!(
                    raw_target = %raw,
                    policy = policy.name(),
                    position = malformed.position,
                    "request target passed classification but failed to decode"
                );
            }
            DecodeResult::Rejected(err.into())
        }
    }
}

/// Build the canonical path for `raw` without consulting any policy.
///
/// Splits on literal `/` only, resolves literal `.` and `..` segments, then
/// decodes each remaining segment exactly once. A decoded NUL is never valid.
pub fn decode_path(raw: &RawTarget) -> Result<DecodedPath, PathError> {
    let path = raw.path();
    let body = path.strip_prefix('/').unwrap_or(path);
    let mut offset = path.len() - body.len();

    let mut segments: SmallVec<[String; 8]> = SmallVec::new();
    let mut raw_segments = body.split('/').peekable();

    while let Some(segment) = raw_segments.next() {
        let last = raw_segments.peek().is_none();

        match segment {
            "." => {
                if last {
                    segments.push(String::new());
                }
            }
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathError::Traversal);
                }
                if last {
                    segments.push(String::new());
                }
            }
            _ => {
                let bytes = decode_at(segment, offset)?;
                if bytes.contains(&0) {
                    return Err(PathError::NulByte);
                }
                let decoded =
                    String::from_utf8(bytes.into_owned()).map_err(|_| PathError::InvalidUtf8)?;
                segments.push(decoded);
            }
        }

        offset += segment.len() + 1;
    }

    if segments.len() == 1 && segments[0].is_empty() {
        segments.clear();
    }

    Ok(DecodedPath { segments })
}

/// The engine bound to one startup-built policy.
#[derive(Debug, Clone)]
pub struct UriComplianceEngine {
    policy: Arc<CompliancePolicy>,
}

impl UriComplianceEngine {
    pub fn new(policy: impl Into<Arc<CompliancePolicy>>) -> Self {
        Self {
            policy: policy.into(),
        }
    }

    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    pub fn resolve(&self, raw: &RawTarget) -> DecodeResult {
        resolve(raw, &self.policy)
    }

    /// Resolve `raw` for routing.
    ///
    /// With `bypass` enabled, a target rejected only for its ambiguities is
    /// decoded anyway; the returned flag is `true` in that case. Traversal,
    /// malformed escapes and undecodable bytes are never bypassed.
    pub fn route_path(
        &self,
        raw: &RawTarget,
        bypass: BypassFlag,
    ) -> Result<(DecodedPath, bool), Rejection> {
        match self.resolve(raw) {
            DecodeResult::Accepted { canonical, .. } => Ok((canonical, false)),
            DecodeResult::Rejected(Rejection::Violations(violations)) if bypass.is_enabled() => {
                let canonical = decode_path(raw)?;
                warn!(
                    raw_target = %raw,
                    violations = %violations,
                    "routing ambiguous request target because ambiguity checks are bypassed"
                );
                Ok((canonical, true))
            }
            DecodeResult::Rejected(rejection) => Err(rejection),
        }
    }

    /// Isolate the path of `target` and resolve it.
    pub fn resolve_target(&self, target: &str) -> Result<DecodeResult, TargetError> {
        Ok(self.resolve(&RawTarget::parse(target)?))
    }
}
