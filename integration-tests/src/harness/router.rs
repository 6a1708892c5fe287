use crate::harness::{CapturedEvent, init_test_tracing};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use uriguard_core::conf::{ValidatedConfig, load_config};
use uriguard_core::route::{Dispatch, Router};

/// A router built from a fixture config directory, the way a server would
/// build it at startup.
pub struct TestRouter {
    config: ValidatedConfig,
    router: Router,
}

impl TestRouter {
    pub fn start(fixture: &str) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let fixture_dir = fixture_dir(fixture);
        assert!(
            fixture_dir.exists(),
            "fixture config directory does not exist: {:?}",
            fixture_dir
        );

        let config = load_config(&fixture_dir).expect("failed to load fixture config");
        let router = config.router().expect("failed to build router");

        Self { config, router }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn get(&self, target: &str) -> Dispatch<'_> {
        self.router.dispatch(target)
    }
}

pub fn fixture_dir(fixture: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("config")
        .join(fixture)
}

pub fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();
    EVENTS.get_or_init(|| Arc::new(Mutex::new(Vec::new()))).clone()
}
