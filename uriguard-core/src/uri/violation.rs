use crate::uri::PolicyError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A way in which a raw request path can be read as more than one resource path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// `%2F` inside what would become a single segment.
    AmbiguousPathSeparator,
    /// `%25`, i.e. a value that was percent-encoded twice.
    AmbiguousPathEncoding,
    /// `//`, a parameter-only segment, or an encoded separator next to a separator.
    AmbiguousEmptySegment,
    /// Path parameters mixed with encoded separators or dot segments.
    AmbiguousPathParameter,
    /// A segment that decodes to `.` or `..` but was written with escapes.
    AmbiguousPathSegment,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::AmbiguousPathSeparator,
        ViolationKind::AmbiguousPathEncoding,
        ViolationKind::AmbiguousEmptySegment,
        ViolationKind::AmbiguousPathParameter,
        ViolationKind::AmbiguousPathSegment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AmbiguousPathSeparator => "AMBIGUOUS_PATH_SEPARATOR",
            Self::AmbiguousPathEncoding => "AMBIGUOUS_PATH_ENCODING",
            Self::AmbiguousEmptySegment => "AMBIGUOUS_EMPTY_SEGMENT",
            Self::AmbiguousPathParameter => "AMBIGUOUS_PATH_PARAMETER",
            Self::AmbiguousPathSegment => "AMBIGUOUS_PATH_SEGMENT",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViolationKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PolicyError::UnknownViolation {
                name: name.to_string(),
            })
    }
}

/// Unordered, duplicate-free set of [`ViolationKind`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViolationSet(u8);

impl ViolationSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::from_iter(ViolationKind::ALL)
    }

    pub fn insert(&mut self, kind: ViolationKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: ViolationKind) {
        self.0 &= !kind.bit();
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_subset(&self, other: &ViolationSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Kinds in `self` that are not in `other`.
    pub fn difference(&self, other: &ViolationSet) -> ViolationSet {
        Self(self.0 & !other.0)
    }

    pub fn union(&self, other: &ViolationSet) -> ViolationSet {
        Self(self.0 | other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        ViolationKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ViolationKind> for ViolationSet {
    fn from_iter<I: IntoIterator<Item = ViolationKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Debug for ViolationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ViolationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(ViolationKind::name).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for ViolationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
