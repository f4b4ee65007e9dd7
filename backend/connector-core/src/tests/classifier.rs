// Unit tests for the error classifier
// Every branch of the decision procedure is covered here; the client tests
// only check that real transport failures reach it.

use crate::error::{ConnectionCode, ErrorKind, RawFailure, classify};

use std::error::Error;

/// **VALUE**: Verifies the status → kind table for the statuses Umbrella documents.
///
/// **WHY THIS MATTERS**: The platform decides whether to retry, alert an admin or fix
/// the source config based on the kind. A 404 surfacing as Generic would page
/// someone for a typo in an identity.
///
/// **BUG THIS CATCHES**: Would catch a status moved to the wrong arm, or the status code
/// dropped from the message.
#[test]
fn given_documented_http_statuses_when_classified_then_map_to_expected_kinds() {
    let cases = [
        (400, ErrorKind::InvalidRequest),
        (403, ErrorKind::InsufficientPermission),
        (404, ErrorKind::InvalidRequest),
        (409, ErrorKind::InvalidRequest),
    ];

    for (status, expected) in cases {
        // GIVEN: An HTTP failure with that status
        let failure = RawFailure::http(status, r#"{"message":"nope"}"#);

        // WHEN: Classifying
        let err = classify(failure);

        // THEN: Kind matches and the message leads with the status
        assert_eq!(err.kind(), expected, "status {status}");
        assert!(
            err.message().starts_with(&status.to_string()),
            "message for {status} should start with the status: {}",
            err.message()
        );
        assert!(err.message().contains("nope"), "body should be in the message");
    }
}

/// **VALUE**: Verifies 401 becomes InvalidConfiguration with the exact message.
///
/// **WHY THIS MATTERS**: A 401 means the configured key/secret pair is wrong. The
/// platform shows this message next to the source config, so it must be stable.
#[test]
fn given_401_when_classified_then_invalid_configuration_with_exact_message() {
    // GIVEN: A 401 with a noisy body
    let failure = RawFailure::http(401, "token endpoint says no");

    // WHEN: Classifying
    let err = classify(failure);

    // THEN: Exact message, no body leak
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert_eq!(err.message(), "401 Unauthorized");
}

#[test]
fn given_unmatched_statuses_when_classified_then_generic_with_status() {
    for status in [302, 422, 429, 500, 502, 503] {
        let err = classify(RawFailure::http(status, ""));
        assert_eq!(err.kind(), ErrorKind::Generic, "status {status}");
        assert!(err.message().contains(&status.to_string()));
    }
}

/// **VALUE**: Verifies DNS failures are reported as configuration problems.
///
/// **WHY THIS MATTERS**: An unresolvable host is almost always a wrong base URL or a
/// proxy problem, which the admin has to fix in configuration.
#[test]
fn given_host_not_found_when_classified_then_unknown_host_configuration_error() {
    // GIVEN: A resolution failure
    let failure = RawFailure::connection(
        ConnectionCode::HostNotFound,
        Some(-3008),
        "getaddrinfo ENOTFOUND api.umbrella.invalid",
    );

    // WHEN: Classifying
    let err = classify(failure);

    // THEN: InvalidConfiguration, with the original details embedded
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert!(err.message().contains("Unknown host."));
    assert!(err.message().contains("getaddrinfo ENOTFOUND api.umbrella.invalid"));
    assert!(err.message().contains("-3008"));
    assert!(err.message().contains("ENOTFOUND"));
}

#[test]
fn given_connection_refused_when_classified_then_configuration_error() {
    let failure = RawFailure::connection(
        ConnectionCode::ConnectionRefused,
        Some(111),
        "connect ECONNREFUSED 127.0.0.1:443",
    );

    let err = classify(failure);

    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert!(err.message().contains("Connection refused."));
    assert!(err.message().contains("connect ECONNREFUSED 127.0.0.1:443"));
}

#[test]
fn given_other_connection_code_when_classified_then_generic() {
    let failure = RawFailure::connection(ConnectionCode::ConnectionReset, None, "socket hang up");

    let err = classify(failure);

    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().contains("socket hang up"));
    assert!(err.message().contains("ECONNRESET"));
}

#[test]
fn given_plain_failure_when_classified_then_generic_with_original_message() {
    let err = classify(RawFailure::other("Wait time out reached, while waiting for results"));

    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(err.message(), "Wait time out reached, while waiting for results");
}

/// **VALUE**: Verifies the raw failure is kept as the error source.
///
/// **BUG THIS CATCHES**: Would catch the classifier discarding the original failure, which
/// would leave operators with only the summarized message.
#[test]
fn given_any_failure_when_classified_then_original_kept_as_source() {
    // GIVEN/WHEN: A classified 409
    let err = classify(RawFailure::http(409, "duplicate email"));

    // THEN: The raw failure is reachable through source()
    let source = err.source().expect("classified errors keep their cause");
    let raw = source
        .downcast_ref::<RawFailure>()
        .expect("source should be the raw failure");
    assert_eq!(raw.status().map(|s| s.0), Some(409));
}
