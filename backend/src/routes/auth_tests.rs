//! Property-based tests for authentication
//!
//! Every protected route answers 401 unless the request carries a valid,
//! unexpired bearer token signed with the server's key.

#[cfg(test)]
mod tests {
    use crate::auth::JwtService;
    use crate::config::AppConfig;
    use crate::repositories::Store;
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use tower::ServiceExt;

    const SECRET: &str = "route-test-signing-key-0123456789abcdef";

    const PROTECTED: &[(&str, &str)] = &[
        ("GET", "/api/cat"),
        ("POST", "/api/cat"),
        ("PUT", "/api/cat"),
        ("DELETE", "/api/cat"),
        ("GET", "/api/usetoilet"),
        ("POST", "/api/usetoilet"),
        ("GET", "/api/wash"),
        ("GET", "/api/wash/1"),
        ("DELETE", "/api/wash"),
        ("GET", "/api/toilet"),
        ("PUT", "/api/toilet"),
    ];

    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.jwt.secret = SECRET.to_string();
        AppState::new(Store::in_memory(), config)
    }

    async fn status_with_header(route: (&str, &str), header: Option<String>) -> StatusCode {
        let app = create_router(test_state());

        let mut request_builder = Request::builder()
            .method(route.0)
            .uri(route.1)
            .header("Content-Type", "application/json");
        if let Some(header) = header {
            request_builder = request_builder.header("Authorization", header);
        }

        let request = request_builder.body(Body::from("{}")).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    /// Generate random invalid tokens
    fn invalid_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            // Empty token
            Just("".to_string()),
            // Random string (not a valid JWT)
            "[a-zA-Z0-9]{10,50}",
            // Malformed JWT (wrong number of parts)
            "[a-zA-Z0-9]{10}\\.[a-zA-Z0-9]{10}",
            // Valid format but invalid signature
            "[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}",
        ]
    }

    /// Generate random authorization header formats
    fn auth_header_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            // No header
            Just(None),
            // Missing Bearer prefix
            invalid_token_strategy().prop_map(Some),
            // Wrong prefix
            invalid_token_strategy().prop_map(|t| Some(format!("Basic {}", t))),
            // Bearer with invalid token
            invalid_token_strategy().prop_map(|t| Some(format!("Bearer {}", t))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Unauthenticated requests to protected endpoints return 401
        #[test]
        fn prop_unauthenticated_requests_return_401(
            auth_header in auth_header_strategy(),
            route in proptest::sample::select(PROTECTED),
        ) {
            let status = tokio_test::block_on(status_with_header(route, auth_header));
            prop_assert_eq!(
                status,
                StatusCode::UNAUTHORIZED,
                "Expected 401 for unauthenticated request"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_auth_header_returns_401() {
        let status = status_with_header(("GET", "/api/cat"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_with_wrong_secret_returns_401() {
        let other = JwtService::new("some-other-signing-key-0123456789abcdef", 3600);
        let token = other.issue_token(1, "tama").unwrap();

        let status = status_with_header(("GET", "/api/cat"), Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_returns_401() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt
            .issue_token_at(1, "tama", Utc::now() - Duration::hours(2))
            .unwrap();

        let status = status_with_header(("GET", "/api/cat"), Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes_auth() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt.issue_token(1, "tama").unwrap();

        let status = status_with_header(("GET", "/api/cat"), Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_signing_key_rejects_every_token() {
        let signed_elsewhere = JwtService::new(SECRET, 3600).issue_token(1, "tama").unwrap();
        let app = create_router(AppState::new(Store::in_memory(), AppConfig::default()));

        let request = Request::builder()
            .uri("/api/cat")
            .header("Authorization", format!("Bearer {}", signed_elsewhere))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_routes_need_no_token() {
        let app = create_router(test_state());

        for uri in ["/item", "/health", "/health/live", "/health/ready"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }
}
