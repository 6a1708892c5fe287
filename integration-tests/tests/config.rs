use integration_tests::harness::router::fixture_dir;
use pretty_assertions::assert_eq;
use std::fs;
use uriguard_core::conf::{ConfigError, load_config};
use uriguard_core::uri::{BypassFlag, ViolationKind};

#[test]
fn fixture_policies_are_built_at_startup() {
    let strict = load_config(&fixture_dir("strict")).unwrap();
    let jetty = load_config(&fixture_dir("jetty")).unwrap();

    assert!(strict.policy().tolerated().is_empty());
    assert!(jetty.policy().tolerates(ViolationKind::AmbiguousPathSeparator));
    assert!(jetty.policy().tolerates(ViolationKind::AmbiguousPathEncoding));
    assert!(!jetty.policy().tolerates(ViolationKind::AmbiguousEmptySegment));
    assert!(!jetty.policy().tolerates(ViolationKind::AmbiguousPathParameter));
    assert_eq!(jetty.bypass(), BypassFlag::OFF);
}

#[test]
fn strict_policy_is_a_subset_of_jetty_policy() {
    let strict = load_config(&fixture_dir("strict")).unwrap();
    let jetty = load_config(&fixture_dir("jetty")).unwrap();

    assert!(strict
        .policy()
        .tolerated()
        .is_subset(&jetty.policy().tolerated()));
}

#[test]
fn unknown_violation_name_fails_fast() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("uriguard.hcl"),
        "server {\n  version = 1\n}\ncompliance {\n  tolerate = [\"AMBIGUOUS_SLASH\"]\n}\n",
    )
    .unwrap();

    // Act
    let err = load_config(dir.path()).unwrap_err();

    // Assert
    match err {
        ConfigError::Validation { validation_errors } => {
            assert_eq!(validation_errors.len(), 1);
            assert_eq!(
                validation_errors[0].to_string(),
                "unknown violation kind 'AMBIGUOUS_SLASH' in compliance.tolerate"
            );
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}
