use crate::conf::{ConfigError, load_config};
use crate::uri::ViolationKind::*;
use crate::uri::{BypassFlag, PolicyError, ViolationSet};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write_config(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("uriguard.hcl"), contents).unwrap();
    dir
}

fn validation_errors(err: ConfigError) -> Vec<ConfigError> {
    match err {
        ConfigError::Validation { validation_errors } => validation_errors,
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

#[test]
fn loads_minimal_config_with_strict_defaults() {
    // Arrange
    let dir = write_config("server {\n  version = 1\n}\n");

    // Act
    let cfg = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(cfg.policy().name(), "DEFAULT");
    assert!(cfg.policy().tolerated().is_empty());
    assert_eq!(cfg.bypass(), BypassFlag::OFF);
    assert!(cfg.spec.routes.is_empty());
}

#[test]
fn loads_tolerated_kinds_and_routes() {
    // Arrange
    let dir = write_config(
        r#"
server {
  version = 1
}

compliance {
  policy   = "DEFAULT"
  tolerate = ["AMBIGUOUS_PATH_SEPARATOR", "AMBIGUOUS_PATH_ENCODING"]
  bypass_ambiguity_checks = true
}

routes = [
  { path = "/", target = "root" },
  { path = "/api", target = "api" },
]
"#,
    );

    // Act
    let cfg = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(
        cfg.policy().tolerated(),
        [AmbiguousPathSeparator, AmbiguousPathEncoding]
            .into_iter()
            .collect::<ViolationSet>()
    );
    assert_eq!(cfg.bypass(), BypassFlag::ON);
    assert_eq!(cfg.spec.routes.len(), 2);
    assert!(cfg.router_with(cfg.bypass()).is_ok());
}

#[test]
fn preset_policy_is_resolved() {
    let dir = write_config("server {\n  version = 1\n}\ncompliance {\n  policy = \"legacy\"\n}\n");

    let cfg = load_config(dir.path()).unwrap();

    assert_eq!(cfg.policy().name(), "LEGACY");
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn malformed_hcl_is_parse_error() {
    let dir = write_config("server {\n  version = \n");

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_kinds_fail_at_startup() {
    // Arrange
    let dir = write_config(
        r#"
server {
  version = 1
}
compliance {
  tolerate = ["AMBIGUOUS_PATH_SEPARATOR", "AMBIGUOUS_EVERYTHING"]
}
"#,
    );

    // Act
    let errors = validation_errors(load_config(dir.path()).unwrap_err());

    // Assert
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownViolation { name } if name == "AMBIGUOUS_EVERYTHING"
    ));
}

#[test]
fn all_semantic_errors_are_reported_together() {
    // Arrange
    let dir = write_config(
        r#"
server {
  version = 2
}
compliance {
  policy = "RFC9999"
}
routes = [
  { path = "api", target = "api" },
  { path = "/a%2Fb", target = "escaped" },
  { path = "/dup", target = "one" },
  { path = "/dup/", target = "two" },
]
"#,
    );

    // Act
    let errors = validation_errors(load_config(dir.path()).unwrap_err());

    // Assert
    assert_eq!(errors.len(), 5);
    assert!(matches!(errors[0], ConfigError::InvalidVersion { version: 2 }));
    assert!(matches!(&errors[1], ConfigError::UnknownPolicy { name } if name == "RFC9999"));
    assert!(matches!(&errors[2], ConfigError::InvalidRoutePath { path, .. } if path == "api"));
    assert!(matches!(&errors[3], ConfigError::InvalidRoutePath { path, .. } if path == "/a%2Fb"));
    assert!(matches!(&errors[4], ConfigError::DuplicateRoute { path } if path == "/dup/"));
}

#[test]
fn policy_errors_map_onto_compliance_errors() {
    let err = ConfigError::from(PolicyError::UnknownViolation {
        name: "NOPE".to_string(),
    });

    assert_eq!(
        err.to_string(),
        "unknown violation kind 'NOPE' in compliance.tolerate"
    );
    assert!(matches!(
        ConfigError::from(PolicyError::UnknownPolicy {
            name: "FOO".to_string()
        }),
        ConfigError::UnknownPolicy { name } if name == "FOO"
    ));
}
