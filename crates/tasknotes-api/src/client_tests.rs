//! Unit and integration tests for the TaskNotesClient.

use super::*;

// Test: TaskNotesClient uses the default timeout constant
#[test]
fn test_default_timeout_constant() {
    assert_eq!(DEFAULT_TIMEOUT_SECS, 30);
    let client = TaskNotesClient::new(DEFAULT_BASE_URL).unwrap();
    assert_eq!(client.request_timeout(), Duration::from_secs(30));
}

// Test: TaskNotesClient should implement Debug without leaking the token
#[test]
fn test_client_debug_redacts_token() {
    let client = TaskNotesClient::builder(DEFAULT_BASE_URL)
        .token("super-secret")
        .build()
        .unwrap();
    let debug_str = format!("{:?}", client);
    assert!(
        !debug_str.contains("super-secret"),
        "Token should be redacted in debug output"
    );
    assert!(debug_str.contains("[REDACTED]"));

    let builder = TaskNotesClient::builder(DEFAULT_BASE_URL).token("super-secret");
    assert!(!format!("{:?}", builder).contains("super-secret"));
}

// Test: builder chains all options
#[test]
fn test_builder_chaining() {
    let client = TaskNotesClientBuilder::new("http://127.0.0.1:9000")
        .token("t")
        .request_timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    assert_eq!(client.base_url(), "http://127.0.0.1:9000/");
    assert!(client.has_token());
    assert_eq!(client.request_timeout(), Duration::from_secs(5));
}

// Test: invalid base URLs are rejected at build time
#[test]
fn test_builder_rejects_invalid_url() {
    let err = TaskNotesClient::new("not a url").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));

    let err = TaskNotesClient::new("mailto:someone@example.com").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
}

// Test: endpoint segments are appended and percent-encoded
#[test]
fn test_endpoint_encodes_task_ids() {
    let client = TaskNotesClient::new("http://localhost:8080").unwrap();
    let url = client
        .endpoint(&["api", "tasks", "Tasks/Buy milk.md", "archive"])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/api/tasks/Tasks%2FBuy%20milk.md/archive"
    );
}

// Test: a base URL with a path prefix keeps it
#[test]
fn test_endpoint_keeps_base_path() {
    let client = TaskNotesClient::new("http://example.com/tasknotes/").unwrap();
    let url = client.endpoint(&["api", "health"]).unwrap();
    assert_eq!(url.as_str(), "http://example.com/tasknotes/api/health");
}

#[test]
fn test_unsupported_as_query() {
    let err = unsupported_as_query(Error::Api(ApiError::Http {
        status: 501,
        message: "Not Implemented".to_string(),
    }));
    assert!(matches!(
        err,
        Error::Api(ApiError::Unsupported { status: 501, ref endpoint }) if endpoint == "/api/tasks/query"
    ));

    let err = unsupported_as_query(Error::Api(ApiError::Auth {
        message: "nope".to_string(),
    }));
    assert!(matches!(err, Error::Api(ApiError::Auth { .. })));
}

#[test]
fn test_evaluation_mode_serializes_lowercase() {
    assert_eq!(
        serde_json::to_value(EvaluationMode::Local).unwrap(),
        serde_json::json!("local")
    );
    assert_eq!(EvaluationMode::Remote.to_string(), "remote");
}

mod wiremock_tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Test: bearer token is sent when configured
    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"status": "ok"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = TaskNotesClient::builder(mock_server.uri())
            .token("test-token")
            .build()
            .unwrap();
        let health = client.health().await.unwrap();
        assert!(health.is_ok());
    }

    // Test: no Authorization header without a token
    #[tokio::test]
    async fn test_get_without_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"status": "ok"}
            })))
            .mount(&mock_server)
            .await;

        let client = TaskNotesClient::new(mock_server.uri()).unwrap();
        client.health().await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    // Test: 401 maps to an auth error using the envelope message
    #[tokio::test]
    async fn test_unauthorized_maps_to_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "error": "Invalid token"
            })))
            .mount(&mock_server)
            .await;

        let client = TaskNotesClient::new(mock_server.uri()).unwrap();
        let err = client.list_tasks().await.unwrap_err();
        match err {
            Error::Api(ApiError::Auth { message }) => assert_eq!(message, "Invalid token"),
            other => panic!("Expected Auth error, got {other:?}"),
        }
    }

    // Test: 500 with plain text body keeps the text
    #[tokio::test]
    async fn test_server_error_keeps_body_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("vault not ready"))
            .mount(&mock_server)
            .await;

        let client = TaskNotesClient::new(mock_server.uri()).unwrap();
        let err = client.list_tasks().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Api(ApiError::Http { status: 500, ref message }) if message == "vault not ready"
        ));
        assert!(!err.is_unsupported());
    }

    // Test: malformed JSON surfaces as a Json error
    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let client = TaskNotesClient::new(mock_server.uri()).unwrap();
        let err = client.list_tasks().await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    // Test: connection failures are network errors with exit code 3
    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 1.
        let client = TaskNotesClient::new("http://127.0.0.1:1").unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Network { .. })));
        assert_eq!(err.exit_code(), 3);
    }
}
