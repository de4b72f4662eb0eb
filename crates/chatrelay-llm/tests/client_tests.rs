use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chatrelay_llm::{AzureChatClient, ChatClient, Credential, TokenProvider, DEFAULT_API_VERSION};

const COMPLETIONS_PATH: &str =
    "/openai/deployments/gpt/chat/completions?api-version=2024-03-01-preview";

fn api_key_client(endpoint: &str) -> AzureChatClient {
    AzureChatClient::builder()
        .endpoint(endpoint)
        .deployment("gpt")
        .credential(Credential::ApiKey("test-key".to_string()))
        .build()
        .unwrap()
}

#[test]
fn test_builder_success() {
    let result = AzureChatClient::builder()
        .resource_name("test-resource")
        .deployment("gpt-4-deployment")
        .credential(Credential::ApiKey("test-key".to_string()))
        .build();

    assert!(result.is_ok());
}

#[test]
fn test_builder_missing_endpoint() {
    let result = AzureChatClient::builder()
        .deployment("gpt-4-deployment")
        .credential(Credential::ApiKey("test-key".to_string()))
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("Endpoint"));
}

#[test]
fn test_builder_missing_deployment() {
    let result = AzureChatClient::builder()
        .resource_name("test-resource")
        .credential(Credential::ApiKey("test-key".to_string()))
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("Deployment"));
}

#[test]
fn test_builder_missing_credential() {
    let result = AzureChatClient::builder()
        .resource_name("test-resource")
        .deployment("gpt-4-deployment")
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("Credential"));
}

#[test]
fn test_default_api_version_is_pinned() {
    assert_eq!(DEFAULT_API_VERSION, "2024-03-01-preview");
}

#[tokio::test]
async fn test_complete_returns_first_candidate_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[
                {"message":{"role":"assistant","content":"Hello"}},
                {"message":{"role":"assistant","content":"second"}},
                {"message":{"role":"assistant","content":"third"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = api_key_client(&server.url());
    let text = client.complete("system", "user", 0.7, 1).await.unwrap();

    assert_eq!(text, "Hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_complete_sends_expected_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "messages": [
                {"role": "system", "content": "You are helpful."},
                {"role": "user", "content": "Write a haiku"}
            ],
            "temperature": 0.7,
            "n": 1
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
        .create_async()
        .await;

    let client = api_key_client(&server.url());
    client
        .complete("You are helpful.", "Write a haiku", 0.7, 1)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_credential_fetches_token_per_request() {
    struct CountingProvider(AtomicUsize);

    #[async_trait]
    impl TokenProvider for CountingProvider {
        async fn token(&self) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("stub-token".to_string())
        }
    }

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("authorization", "Bearer stub-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
        .create_async()
        .await;

    let provider = Arc::new(CountingProvider(AtomicUsize::new(0)));
    let client = AzureChatClient::builder()
        .endpoint(server.url())
        .deployment("gpt")
        .credential(Credential::Bearer(provider.clone()))
        .build()
        .unwrap();

    client.complete("system", "user", 0.7, 1).await.unwrap();

    assert_eq!(provider.0.load(Ordering::SeqCst), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_propagates_with_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let client = api_key_client(&server.url());
    let err = client
        .complete("system", "user", 0.7, 1)
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("429"), "got: {}", msg);
    assert!(msg.contains("quota exceeded"), "got: {}", msg);
}

#[tokio::test]
async fn test_empty_candidate_list_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = api_key_client(&server.url());
    let err = client
        .complete("system", "user", 0.7, 1)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no completion candidates"));
}
