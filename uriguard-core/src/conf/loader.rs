use crate::conf::error::ConfigError;
use crate::conf::types::ConfigSpec;
use crate::conf::validation::validate_config;
use crate::conf::ValidatedConfig;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "uriguard.hcl";

pub fn load_config(root: &Path) -> Result<ValidatedConfig, ConfigError> {
    let spec = load_spec_config(root)?;

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all semantic errors)
    //--------------------------------------------------------------------------
    validate_config(&spec)?;

    ValidatedConfig::new(spec)
}

pub fn load_spec_config(root: &Path) -> Result<ConfigSpec, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let path = root.join(CONFIG_FILE);
    let source = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;

    hcl::from_str(&source).map_err(|e| ConfigError::parse(&path, e))
}
