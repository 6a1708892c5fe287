use crate::uri::{
    CompliancePolicy, DecodeResult, RawTarget, ViolationKind, ViolationSet, classify, decode,
    decode_path, resolve,
};
use proptest::prelude::*;

/// Paths of non-empty segments built from unreserved characters only.
fn plain_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z0-9_~=-][A-Za-z0-9._~=-]{0,11}", 0..6)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Paths mixing literal text, separators, parameters and escapes, including
/// the escapes that matter for ambiguity.
fn mixed_path() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z]{1,4}",
        Just("/".to_string()),
        Just(";".to_string()),
        Just(".".to_string()),
        Just("%2F".to_string()),
        Just("%2f".to_string()),
        Just("%25".to_string()),
        Just("%2e".to_string()),
        Just("%41".to_string()),
        Just("%".to_string()),
    ];
    prop::collection::vec(piece, 0..12).prop_map(|pieces| format!("/{}", pieces.concat()))
}

fn any_policy() -> impl Strategy<Value = ViolationSet> {
    prop::collection::vec(prop::sample::select(ViolationKind::ALL.to_vec()), 0..6)
        .prop_map(|kinds| kinds.into_iter().collect::<ViolationSet>())
}

proptest! {
    #[test]
    fn plain_paths_have_no_violations(path in plain_path()) {
        let raw = RawTarget::parse(&path).unwrap();

        prop_assert!(classify(&raw).is_empty());
    }

    #[test]
    fn plain_paths_are_accepted_by_strictest_policy(path in plain_path()) {
        let raw = RawTarget::parse(&path).unwrap();

        let result = resolve(&raw, &CompliancePolicy::DEFAULT);

        prop_assert!(result.is_accepted(), "{:?}", result);
    }

    #[test]
    fn encoded_separator_is_always_detected(prefix in mixed_path(), suffix in "[a-z%/]{0,6}") {
        let raw = RawTarget::parse(&format!("{prefix}%2F{suffix}")).unwrap();

        prop_assert!(classify(&raw).contains(ViolationKind::AmbiguousPathSeparator));
    }

    #[test]
    fn encoded_percent_is_always_detected(prefix in mixed_path(), suffix in "[a-z%/]{0,6}") {
        let raw = RawTarget::parse(&format!("{prefix}%25{suffix}")).unwrap();

        prop_assert!(classify(&raw).contains(ViolationKind::AmbiguousPathEncoding));
    }

    #[test]
    fn classification_never_panics(path in mixed_path()) {
        let raw = RawTarget::parse(&path).unwrap();

        let _ = classify(&raw);
    }

    #[test]
    fn canonical_segments_are_decoded_exactly_once(path in mixed_path()) {
        let raw = RawTarget::parse(&path).unwrap();

        if let DecodeResult::Accepted { canonical, .. } = resolve(&raw, &CompliancePolicy::unsafe_all()) {
            let body = raw.path().strip_prefix('/').unwrap_or(raw.path());
            let literal_segments: Vec<&str> = body.split('/').collect();
            let has_dots = literal_segments.iter().any(|s| *s == "." || *s == "..");

            if !has_dots && !(literal_segments.len() == 1 && literal_segments[0].is_empty()) {
                let expected: Vec<String> = literal_segments
                    .iter()
                    .map(|s| String::from_utf8(decode(s).unwrap()).unwrap())
                    .collect();
                prop_assert_eq!(canonical.segments(), expected.as_slice());
            }
        }
    }

    #[test]
    fn decode_path_agrees_with_resolve(path in mixed_path()) {
        let raw = RawTarget::parse(&path).unwrap();

        if let DecodeResult::Accepted { canonical, .. } = resolve(&raw, &CompliancePolicy::unsafe_all()) {
            prop_assert_eq!(decode_path(&raw).ok(), Some(canonical));
        }
    }

    #[test]
    fn loosening_a_policy_never_rejects_more(
        path in mixed_path(),
        narrow in any_policy(),
        extra in any_policy(),
    ) {
        let raw = RawTarget::parse(&path).unwrap();
        let strict = CompliancePolicy::from_kinds("strict", narrow.iter());
        let loose = CompliancePolicy::from_kinds("loose", narrow.union(&extra).iter());

        let strict_result = resolve(&raw, &strict);
        let loose_result = resolve(&raw, &loose);

        if strict_result.is_accepted() {
            prop_assert_eq!(&loose_result, &strict_result);
        }
        if let (Some(strict_rejection), Some(loose_rejection)) =
            (strict_result.rejection(), loose_result.rejection())
        {
            prop_assert!(loose_rejection.violations().is_subset(&strict_rejection.violations()));
        }
    }
}
