use crate::helpers::{
    ROLES_PATH, TOKEN_PATH, USERS_PATH, api_requests, client_for, mount_token, token_body,
    token_requests,
};

use connector_core::{ConnectorError, ErrorKind};

use serde_json::json;
use wiremock::matchers::{bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Token lifecycle
// ============================================================================

/// **VALUE**: Verifies `ensure_token(false)` only hits the token endpoint once.
///
/// **WHY THIS MATTERS**: Every operation calls ensure_token first. If it were not
/// idempotent, each API call would cost an extra token request and count against
/// the vendor's rate limit.
///
/// **BUG THIS CATCHES**: Would catch the `token.is_some() && !force` short-circuit being lost.
#[tokio::test]
async fn given_token_held_when_ensure_token_called_again_then_no_second_request() {
    // GIVEN: A token endpoint that expects exactly one call
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1")))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Ensuring a token twice
    client.ensure_token(false).await.unwrap();
    client.ensure_token(false).await.unwrap();

    // THEN: One call total (verified on drop), token held
    assert!(client.has_token().await);
    assert_eq!(token_requests(&server).await, 1);
}

/// **VALUE**: Verifies a forced refresh always goes to the network.
///
/// **BUG THIS CATCHES**: Would catch `force` being ignored, which would make the 403
/// recovery path retry with the same stale token.
#[tokio::test]
async fn given_token_held_when_forced_refresh_then_new_request_each_time() {
    // GIVEN: A token endpoint
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    let client = client_for(&server);

    // WHEN: One normal acquisition, then two forced refreshes
    client.ensure_token(false).await.unwrap();
    client.ensure_token(true).await.unwrap();
    client.ensure_token(true).await.unwrap();

    // THEN: Three token calls
    assert_eq!(token_requests(&server).await, 3);
}

#[tokio::test]
async fn given_token_response_without_access_token_when_acquiring_then_invalid_response() {
    // GIVEN: A token endpoint returning no token
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Acquiring
    let err = ConnectorError::from(client.ensure_token(false).await.unwrap_err());

    // THEN: InvalidResponse, no token held
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert_eq!(err.message(), "Found empty response for token generation.");
    assert!(!client.has_token().await);
}

/// **VALUE**: Verifies that rejected credentials classify as a configuration problem.
#[tokio::test]
async fn given_bad_credentials_when_acquiring_token_then_401_unauthorized() {
    // GIVEN: A token endpoint that rejects the credentials
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Testing the connection
    let err = ConnectorError::from(client.test_connection().await.unwrap_err());

    // THEN: InvalidConfiguration with the fixed message
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert_eq!(err.message(), "401 Unauthorized");
}

/// **VALUE**: Verifies the token call waits out a 429 like every other call.
///
/// **WHY THIS MATTERS**: The token endpoint shares the vendor's rate limit. A single
/// throttled token request must not fail a whole aggregation before it starts.
///
/// **BUG THIS CATCHES**: Would catch the token POST being sent outside the retry loop.
#[tokio::test]
async fn given_token_endpoint_throttled_once_when_acquiring_then_retries_and_succeeds() {
    // GIVEN: One 429, then a token
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token(&server, "tok").await;
    let client = client_for(&server);

    // WHEN: Testing the connection
    client.test_connection().await.unwrap();

    // THEN: Two token requests, token held
    assert_eq!(token_requests(&server).await, 2);
    assert!(client.has_token().await);
}

#[tokio::test]
async fn given_token_endpoint_always_throttled_when_acquiring_then_gives_up_after_three_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(4)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = ConnectorError::from(client.test_connection().await.unwrap_err());

    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().contains("429"));
    assert!(!client.has_token().await);
}

/// **VALUE**: Verifies a 403 from the token endpoint is final.
///
/// **WHY THIS MATTERS**: Refreshing from inside the token call would wait on the token
/// lock it already holds, and asking again with the same credentials cannot help.
///
/// **BUG THIS CATCHES**: Would catch the 403 refresh heuristic being applied to the token call.
#[tokio::test]
async fn given_token_endpoint_forbidden_when_acquiring_then_no_retry() {
    // GIVEN: Token endpoint answers 403
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Testing the connection
    let err = ConnectorError::from(client.test_connection().await.unwrap_err());

    // THEN: One request, classified as a permission problem
    assert_eq!(token_requests(&server).await, 1);
    assert_eq!(err.kind(), ErrorKind::InsufficientPermission);
}

// ============================================================================
// Request decoration
// ============================================================================

/// **VALUE**: Verifies every API call carries JSON headers and the bearer token.
///
/// **WHY THIS MATTERS**: Umbrella rejects calls missing either; a regression here
/// breaks every operation at once.
#[tokio::test]
async fn given_token_when_listing_users_then_bearer_and_json_headers_sent() {
    // GIVEN: A users endpoint that only answers a properly decorated request
    let server = MockServer::start().await;
    mount_token(&server, "tok-abc").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "1"))
        .and(query_param("limit", "200"))
        .and(bearer_token("tok-abc"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Requesting the first page with the default limit
    let body = client.list_users(1, None).await.unwrap();

    // THEN: The decorated request matched
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn given_identifier_with_reserved_characters_when_reading_then_path_is_encoded() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/admin/v2/users/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let body = client.read_account("a/b").await.unwrap();

    assert_eq!(body["id"], 1);
}

// ============================================================================
// Retry policy
// ============================================================================

/// **VALUE**: Verifies 429 is retried three times without refreshing the token.
///
/// **BUG THIS CATCHES**: Would catch throttling being treated like an auth failure
/// (extra token calls) or the retry budget changing.
#[tokio::test]
async fn given_persistent_429_when_requesting_then_three_retries_no_refresh() {
    // GIVEN: Roles always throttled
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(4)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Listing roles
    let err = ConnectorError::from(client.list_entitlements().await.unwrap_err());

    // THEN: 1 attempt + 3 retries, a single token call, Generic 429
    assert_eq!(api_requests(&server).await.len(), 4);
    assert_eq!(token_requests(&server).await, 1);
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().contains("429"));
}

#[tokio::test]
async fn given_transient_429_when_requesting_then_succeeds_after_retry() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"roleId": 1}])))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let body = client.list_entitlements().await.unwrap();

    assert_eq!(body, json!([{"roleId": 1}]));
    assert_eq!(api_requests(&server).await.len(), 3);
}

/// **VALUE**: Verifies that a 403 forces a refresh and the retry uses the NEW token.
///
/// **WHY THIS MATTERS**: Tokens expire mid-aggregation. Recovering transparently is the
/// whole point of the 403 heuristic; retrying with the old header would fail again.
///
/// **BUG THIS CATCHES**: Would catch the bearer header being captured before the retry loop.
#[tokio::test]
async fn given_stale_token_when_403_then_refreshes_and_retries_with_new_token() {
    // GIVEN: First token is stale, second is good
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("stale")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .and(bearer_token("stale"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Listing roles
    let body = client.list_entitlements().await.unwrap();

    // THEN: Success after exactly one refresh
    assert_eq!(body, json!([]));
    assert_eq!(token_requests(&server).await, 2);
}

#[tokio::test]
async fn given_persistent_403_when_requesting_then_one_refresh_per_retry() {
    // GIVEN: Every roles call is forbidden
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(4)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Listing roles
    let err = ConnectorError::from(client.list_entitlements().await.unwrap_err());

    // THEN: initial token + 3 forced refreshes, InsufficientPermission in the end
    assert_eq!(token_requests(&server).await, 4);
    assert_eq!(err.kind(), ErrorKind::InsufficientPermission);
    assert!(err.message().starts_with("403"));
}

#[tokio::test]
async fn given_404_when_requesting_then_no_retry() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/admin/v2/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = ConnectorError::from(client.read_account("404").await.unwrap_err());

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(err.message().contains("User not found"));
}
