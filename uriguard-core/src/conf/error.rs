use crate::uri::PolicyError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("config validation failed")]
    Validation {
        #[related]
        validation_errors: Vec<ConfigError>,
    },

    //-------------------------------------------------------------------------
    // Top-level
    //-------------------------------------------------------------------------
    #[error("invalid version '{version}'")]
    InvalidVersion { version: u32 },

    //-------------------------------------------------------------------------
    // Compliance
    //-------------------------------------------------------------------------
    #[error("unknown compliance policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("unknown violation kind '{name}' in compliance.tolerate")]
    UnknownViolation { name: String },

    //-------------------------------------------------------------------------
    // Routes
    //-------------------------------------------------------------------------
    #[error("invalid route path '{path}': {reason}")]
    InvalidRoutePath { path: String, reason: String },

    #[error("duplicate route for path '{path}'")]
    DuplicateRoute { path: String },
}

impl From<PolicyError> for ConfigError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::UnknownPolicy { name } => Self::UnknownPolicy { name },
            PolicyError::UnknownViolation { name } => Self::UnknownViolation { name },
        }
    }
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
