mod error;
mod loader;
#[cfg(test)]
mod tests;
pub mod types;
mod validated_config;
pub(crate) mod validation;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE, load_config, load_spec_config};
pub use validated_config::ValidatedConfig;
