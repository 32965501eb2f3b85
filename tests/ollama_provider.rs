//! Ollama provider tests against a mock HTTP server

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reviewd::config::OllamaConfig;
use reviewd::providers::{GenerationOptions, Message, OllamaProvider, Provider};

fn options() -> GenerationOptions {
    GenerationOptions {
        max_tokens: 256,
        temperature: 0.2,
    }
}

fn provider_for(server: &MockServer) -> OllamaProvider {
    let config = OllamaConfig {
        host: server.uri(),
        model: "test-model".to_string(),
    };
    OllamaProvider::new(config).expect("provider init failed")
}

#[tokio::test]
async fn test_generate_returns_message_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "options": { "num_predict": 256 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "Line 2 leaks the file handle." },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let review = provider
        .generate(
            &[Message::system("reviewer"), Message::user("review this")],
            options(),
        )
        .await
        .expect("generate failed");

    assert_eq!(review, "Line 2 leaks the file handle.");
}

#[tokio::test]
async fn test_generate_forwards_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": "persona" },
                { "role": "user", "content": "the code" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "ok" },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider
        .generate(
            &[Message::system("persona"), Message::user("the code")],
            options(),
        )
        .await
        .expect("generate failed");
}

#[tokio::test]
async fn test_generate_propagates_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("x")], options()).await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Ollama returned error"));
    assert!(message.contains("model not loaded"));
}

#[tokio::test]
async fn test_generate_rejects_empty_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "" },
            "done": true
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("x")], options()).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("empty completion"));
}

#[tokio::test]
async fn test_generate_rejects_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("x")], options()).await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse Ollama response"));
}
