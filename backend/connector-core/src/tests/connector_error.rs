use crate::error::{ConnectorError, ErrorKind};

use std::error::Error;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};

/// **VALUE**: Verifies every constructor yields the matching kind and keeps the message verbatim.
///
/// **BUG THIS CATCHES**: Would catch a constructor wired to the wrong variant, which would
/// silently change how the platform treats that failure.
#[test]
fn given_each_constructor_when_called_then_kind_and_message_match() {
    let cases = [
        (ConnectorError::generic("g"), ErrorKind::Generic),
        (ConnectorError::invalid_configuration("c"), ErrorKind::InvalidConfiguration),
        (ConnectorError::invalid_request("r"), ErrorKind::InvalidRequest),
        (ConnectorError::invalid_response("p"), ErrorKind::InvalidResponse),
        (ConnectorError::insufficient_permission("i"), ErrorKind::InsufficientPermission),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.message().len(), 1);
        assert!(err.source().is_none(), "no cause unless attached");
    }
}

/// **VALUE**: Verifies Display carries kind, message and location.
///
/// **WHY THIS MATTERS**: Log lines are the only trace of a failed aggregation. They
/// need to say what failed and where it was raised.
#[test]
fn given_connector_error_when_formatted_then_includes_location() {
    // GIVEN: An InvalidRequest error
    let err = ConnectorError::invalid_request("Native identifier cannot be empty.");

    // WHEN: Formatting
    let rendered = err.to_string();

    // THEN: Kind label, message and this file are all present
    assert!(rendered.contains("Invalid Request Error"));
    assert!(rendered.contains("Native identifier cannot be empty."));
    assert!(rendered.contains("connector_error.rs"));
    assert!(err.location().line > 0);
}

#[test]
fn given_cause_when_attached_then_source_chain_preserved() {
    let io = IoError::new(IoErrorKind::PermissionDenied, "Wait time out reached");

    let err = ConnectorError::generic("Ran out of iterations").with_source(io);

    assert_eq!(err.message(), "Ran out of iterations");
    let source = err.source().expect("cause should be kept");
    assert_eq!(source.to_string(), "Wait time out reached");
}

#[test]
fn given_error_kinds_when_displayed_then_snake_case_names() {
    assert_eq!(ErrorKind::Generic.to_string(), "generic");
    assert_eq!(ErrorKind::InsufficientPermission.to_string(), "insufficient_permission");
}
