use crate::uri::{PolicyError, ViolationKind, ViolationSet};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A named, immutable set of tolerated [`ViolationKind`]s.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompliancePolicy {
    name: Cow<'static, str>,
    tolerated: ViolationSet,
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Reject { offending: ViolationSet },
}

/// `violations - policy.tolerated`: empty means allow, anything left is
/// exactly what the policy rejects.
pub fn evaluate(violations: ViolationSet, policy: &CompliancePolicy) -> PolicyDecision {
    let offending = violations.difference(&policy.tolerated);
    if offending.is_empty() {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Reject { offending }
    }
}

impl CompliancePolicy {
    /// Tolerates nothing.
    pub const DEFAULT: CompliancePolicy = CompliancePolicy {
        name: Cow::Borrowed("DEFAULT"),
        tolerated: ViolationSet::empty(),
    };

    pub fn legacy() -> Self {
        Self::from_kinds(
            "LEGACY",
            [
                ViolationKind::AmbiguousPathSeparator,
                ViolationKind::AmbiguousPathEncoding,
            ],
        )
    }

    /// Tolerates every kind. Only for setups where all consumers of the path
    /// are known to agree on its interpretation.
    pub fn unsafe_all() -> Self {
        Self::from_kinds("UNSAFE", ViolationKind::ALL)
    }

    pub fn preset(name: &str) -> Result<Self, PolicyError> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(Self::DEFAULT),
            "LEGACY" => Ok(Self::legacy()),
            "UNSAFE" => Ok(Self::unsafe_all()),
            _ => Err(PolicyError::UnknownPolicy {
                name: name.trim().to_string(),
            }),
        }
    }

    pub fn from_kinds(
        name: impl Into<Cow<'static, str>>,
        kinds: impl IntoIterator<Item = ViolationKind>,
    ) -> Self {
        Self {
            name: name.into(),
            tolerated: kinds.into_iter().collect(),
        }
    }

    /// Build from kind identifiers such as `AMBIGUOUS_PATH_SEPARATOR`. Any
    /// unknown identifier fails the whole policy.
    pub fn from_names<S: AsRef<str>>(
        name: impl Into<Cow<'static, str>>,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, PolicyError> {
        let kinds = names
            .into_iter()
            .map(|n| n.as_ref().parse::<ViolationKind>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_kinds(name, kinds))
    }

    /// Parse a policy string: `BASE,KIND,-KIND`.
    ///
    /// The first element may name a preset; otherwise `DEFAULT` is the base.
    /// `KIND` adds a tolerance and `-KIND` removes one.
    pub fn parse(spec: &str) -> Result<Self, PolicyError> {
        let mut elements = spec.split(',').map(str::trim).filter(|e| !e.is_empty());

        let mut policy = Self::DEFAULT;
        let mut customized = false;

        if let Some(first) = elements.next() {
            match Self::preset(first) {
                Ok(preset) => policy = preset,
                Err(unknown_policy) => {
                    let kind = first.strip_prefix('-').unwrap_or(first);
                    if kind.parse::<ViolationKind>().is_err() {
                        return Err(unknown_policy);
                    }
                    policy.apply(first)?;
                    customized = true;
                }
            }
        }

        for element in elements {
            policy.apply(element)?;
            customized = true;
        }

        if customized {
            policy.name = Cow::Owned(spec.trim().to_string());
        }

        Ok(policy)
    }

    fn apply(&mut self, element: &str) -> Result<(), PolicyError> {
        match element.strip_prefix('-') {
            Some(kind) => self.tolerated.remove(kind.parse()?),
            None => self.tolerated.insert(element.parse()?),
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tolerated(&self) -> ViolationSet {
        self.tolerated
    }

    pub fn tolerates(&self, kind: ViolationKind) -> bool {
        self.tolerated.contains(kind)
    }
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CompliancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.tolerated)
    }
}
