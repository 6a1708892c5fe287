use serde::Serialize;
use thiserror::Error;

/// A `%` at `position` (byte offset into the raw path) that is not followed by
/// two hexadecimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("malformed percent escape at byte {position}")]
pub struct MalformedEscape {
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("empty request target")]
    Empty,

    #[error("unsupported request-target form")]
    UnsupportedForm,

    #[error("invalid byte 0x{byte:02X} in request target at {position}")]
    InvalidCharacter { byte: u8, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown violation kind '{name}'")]
    UnknownViolation { name: String },

    #[error("unknown compliance policy '{name}'")]
    UnknownPolicy { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BypassError {
    #[error("ambiguous URI bypass flag already installed")]
    AlreadyInstalled,
}

/// Why a raw path could not be turned into a canonical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error(transparent)]
    Malformed(#[from] MalformedEscape),

    #[error("path climbs above the root")]
    Traversal,

    #[error("decoded path segment is not valid UTF-8")]
    InvalidUtf8,

    #[error("decoded path contains a NUL byte")]
    NulByte,
}
