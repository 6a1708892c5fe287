pub mod router;
pub mod tracing;

pub use router::TestRouter;
pub use tracing::{CapturedEvent, init_test_tracing};
