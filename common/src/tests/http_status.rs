use crate::HttpStatusCode;

/// **VALUE**: Verifies the retry-relevant predicates on HttpStatusCode.
///
/// **WHY THIS MATTERS**: The retry policy keys off `is_rate_limited()` and
/// `is_forbidden()`. A wrong answer either hammers the vendor or never refreshes
/// a stale token.
#[test]
fn given_throttling_and_forbidden_codes_when_checked_then_predicates_match() {
    // GIVEN: The two retryable vendor answers and a neighbour
    let throttled = HttpStatusCode(429);
    let forbidden = HttpStatusCode(403);
    let unauthorized = HttpStatusCode(401);

    // THEN: Only the matching predicate is true
    assert!(throttled.is_rate_limited());
    assert!(!throttled.is_forbidden());
    assert!(forbidden.is_forbidden());
    assert!(!forbidden.is_rate_limited());
    assert!(!unauthorized.is_forbidden());
    assert!(!unauthorized.is_rate_limited());
}

#[test]
fn given_status_codes_when_converted_then_success_range_and_display_hold() {
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(404).is_success());
    assert_eq!(HttpStatusCode::from(reqwest::StatusCode::CONFLICT), HttpStatusCode::CONFLICT);
    assert_eq!(HttpStatusCode(500).to_string(), "500");
}
