//! Per-invocation adapter
//!
//! Runs the one-shot relay against a mocked upstream and checks the
//! CGI-style output written for each outcome.

use axum::http::{Method, StatusCode};
use chatrelay::{config::Config, credential::ApiKey, invocation, relay::Relay};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn relay_for(base_url: &str) -> Relay {
    let toml = format!("[upstream]\nbase_url = \"{}\"\ntimeout_seconds = 5\n", base_url);
    let config: Config = toml.parse().expect("should parse test config");
    Relay::from_config(&config, ApiKey::new("sk-or-invoke").unwrap()).expect("relay should build")
}

async fn run_to_string(method: &Method, body: &[u8], relay: &Relay) -> (StatusCode, String) {
    let mut out = Vec::new();
    let status = invocation::run(method, body, relay, &mut out)
        .await
        .expect("writing to a Vec cannot fail");
    (status, String::from_utf8(out).expect("output should be UTF-8"))
}

#[tokio::test]
async fn test_invocation_writes_reply() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hi there"}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = relay_for(&format!("{}/v1", upstream.uri()));
    let (status, output) = run_to_string(&Method::POST, br#"{"message":"hello"}"#, &relay).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        output,
        "Status: 200 OK\r\nContent-Type: application/json\r\n\r\n{\"reply\":\"hi there\"}"
    );
}

#[tokio::test]
async fn test_invocation_writes_validation_error() {
    let relay = relay_for("http://127.0.0.1:9/v1");
    let (status, output) = run_to_string(&Method::POST, br#"{"message":null}"#, &relay).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(output.starts_with("Status: 400 Bad Request\r\n"));
    assert!(output.ends_with("\r\n\r\n{\"error\":\"Message is required.\"}"));
}

#[tokio::test]
async fn test_invocation_upstream_failure_is_generic() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded: provider xyz"))
        .mount(&upstream)
        .await;

    let relay = relay_for(&format!("{}/v1", upstream.uri()));
    let (status, output) = run_to_string(&Method::POST, br#"{"message":"hello"}"#, &relay).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(output.starts_with("Status: 500 Internal Server Error\r\n"));
    assert!(output.ends_with("{\"error\":\"Failed to get response from AI.\"}"));
    assert!(!output.contains("overloaded"));
}

#[tokio::test]
async fn test_invocation_rejects_method_from_command_line() {
    let relay = relay_for("http://127.0.0.1:9/v1");
    let method = invocation::parse_method("DELETE").unwrap();
    let (status, output) = run_to_string(&method, b"", &relay).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(output.ends_with("\r\n\r\nMethod Not Allowed"));
}
