use crate::uri::BypassError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::warn;

static BYPASS: OnceCell<BypassFlag> = OnceCell::new();

/// Operator opt-out that lets a router decode a target the policy rejected.
///
/// Unsafe: consumers that read the same bytes differently is exactly the
/// hazard the policy exists to prevent. Never on by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BypassFlag(bool);

impl BypassFlag {
    pub const OFF: BypassFlag = BypassFlag(false);
    pub const ON: BypassFlag = BypassFlag(true);

    pub fn new(enabled: bool) -> Self {
        Self(enabled)
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }
}

impl From<bool> for BypassFlag {
    fn from(enabled: bool) -> Self {
        Self(enabled)
    }
}

/// Set the process-wide flag. May only happen once, at startup.
pub fn install(flag: BypassFlag) -> Result<(), BypassError> {
    BYPASS
        .set(flag)
        .map_err(|_| BypassError::AlreadyInstalled)?;

    if flag.is_enabled() {
        warn!(
            setting = "bypass_ambiguity_checks",
            "ambiguous URI checks are bypassed; requests rejected by the compliance policy will still be decoded and routed"
        );
    }

    Ok(())
}

/// The installed process-wide flag, or [`BypassFlag::OFF`] if none was installed.
pub fn installed() -> BypassFlag {
    BYPASS.get().copied().unwrap_or_default()
}

pub fn should_bypass_ambiguity_checks() -> bool {
    installed().is_enabled()
}
