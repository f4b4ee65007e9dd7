use crate::helpers::{ROLES_PATH, client_for, mount_token};

use connector_core::{ClientError, ConnectorError, ErrorKind, RawFailure};

use common::HttpStatusCode;

use std::error::Error;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies the raw transport failure survives classification as the error source.
///
/// **WHY THIS MATTERS**: Logs print the source chain. Dropping the raw failure loses
/// the vendor's response body, which is usually the only clue to what went wrong.
#[tokio::test]
async fn given_http_failure_when_converted_then_raw_failure_is_source() {
    // GIVEN: A 400 with a vendor message
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("limit must be <= 200"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN
    let client_err = client.list_entitlements().await.unwrap_err();
    assert_eq!(client_err.status(), Some(HttpStatusCode::BAD_REQUEST));
    let err = ConnectorError::from(client_err);

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(
        err.message(),
        "400 Request failed with status code 400, Bad Request, limit must be <= 200"
    );
    let raw = err
        .source()
        .and_then(|s| s.downcast_ref::<RawFailure>())
        .expect("raw failure kept as source");
    assert_eq!(raw.status(), Some(HttpStatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn given_connector_error_inside_client_error_when_converted_then_passed_through() {
    // GIVEN: An already-classified error
    let inner = ConnectorError::invalid_response("Found empty response for token generation.");
    let client_err = ClientError::from(inner);

    // WHEN
    let err = ConnectorError::from(client_err);

    // THEN: kind and message unchanged
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert_eq!(err.message(), "Found empty response for token generation.");
}
