use crate::conf::error::ConfigError;
use crate::conf::types::ConfigSpec;
use crate::route::Router;
use crate::uri::{
    BypassError, BypassFlag, CompliancePolicy, UriComplianceEngine, bypass,
    should_bypass_ambiguity_checks,
};
use anyhow::Result;

/// Configuration that passed validation, with the compliance policy already
/// built.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub spec: ConfigSpec,
    policy: CompliancePolicy,
}

impl ValidatedConfig {
    pub(crate) fn new(spec: ConfigSpec) -> Result<Self, ConfigError> {
        let compliance = &spec.compliance;
        let policy = if compliance.tolerate.is_empty() {
            CompliancePolicy::preset(&compliance.policy)?
        } else {
            let elements: Vec<&str> = std::iter::once(compliance.policy.as_str())
                .chain(compliance.tolerate.iter().map(String::as_str))
                .collect();
            CompliancePolicy::parse(&elements.join(","))?
        };

        Ok(Self { spec, policy })
    }

    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    pub fn bypass(&self) -> BypassFlag {
        BypassFlag::new(self.spec.compliance.bypass_ambiguity_checks)
    }

    /// Build a router over the configured routes, using `bypass` rather than
    /// the configured flag so callers can pass the process-wide one.
    pub fn router_with(&self, bypass: BypassFlag) -> Result<Router> {
        let mut router = Router::new(UriComplianceEngine::new(self.policy.clone()), bypass);
        for route in &self.spec.routes {
            router.add_route(&route.path, &route.target)?;
        }
        Ok(router)
    }

    /// Install the configured bypass flag process-wide, then build a router
    /// that reads it back.
    ///
    /// Fails if a different flag was already installed.
    pub fn router(&self) -> Result<Router> {
        match bypass::install(self.bypass()) {
            Ok(()) => {}
            Err(BypassError::AlreadyInstalled) if bypass::installed() == self.bypass() => {}
            Err(err) => return Err(err.into()),
        }

        self.router_with(BypassFlag::new(should_bypass_ambiguity_checks()))
    }
}
