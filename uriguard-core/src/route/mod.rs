pub mod router;

pub use router::{Dispatch, RouteEntry, Router};
