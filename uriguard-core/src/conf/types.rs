use serde::{Deserialize, Serialize};

/// Represents the top-level `uriguard.hcl` file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigSpec {
    pub server: ServerSpec,

    #[serde(default)]
    pub compliance: ComplianceSpec,

    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSpec {
    // Configuration schema version
    pub version: u32,
}

/// Read once at startup and never changed afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComplianceSpec {
    /// Base preset: DEFAULT, LEGACY or UNSAFE.
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Violation kinds tolerated on top of the preset.
    #[serde(default)]
    pub tolerate: Vec<String>,

    /// Route targets the policy rejects anyway. Unsafe.
    #[serde(default)]
    pub bypass_ambiguity_checks: bool,
}

impl Default for ComplianceSpec {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            tolerate: Vec::new(),
            bypass_ambiguity_checks: false,
        }
    }
}

fn default_policy() -> String {
    "DEFAULT".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteSpec {
    pub path: String,
    pub target: String,
}
