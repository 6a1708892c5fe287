pub mod bypass;
mod classify;
mod decode;
mod engine;
mod error;
mod policy;
mod target;
#[cfg(test)]
mod tests;
mod violation;

pub use bypass::{BypassFlag, should_bypass_ambiguity_checks};
pub use classify::*;
pub use decode::decode;
pub use engine::*;
pub use error::*;
pub use policy::*;
pub use target::*;
pub use violation::*;
