//! Completion endpoints: the remote OpenAI-compatible API used for the primary
//! model and the local Ollama server used as fallback.

use crate::chat::error::CallFailed;
use crate::chat::message::ChatMessage;
use crate::chat::model_id::ModelId;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// A language model that turns an ordered message list into one reply.
///
/// Implementations make a single attempt per call. Every failure, whatever its
/// cause, is reported as [`CallFailed`].
#[async_trait]
pub trait CompletionEndpoint: Send + Sync {
    fn model(&self) -> &ModelId;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CallFailed>;
}

// --- OpenAI compatible chat completions ---

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
    message: ReplyMessage,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

/// Endpoint speaking the `/chat/completions` protocol with bearer authentication.
///
/// Serves both Gemini (through Google's OpenAI compatibility layer) and OpenAI.
pub struct OpenAiCompatibleEndpoint {
    client: Client,
    model: ModelId,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleEndpoint {
    pub fn new(
        client: Client,
        model: ModelId,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            model,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionEndpoint for OpenAiCompatibleEndpoint {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CallFailed> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CallFailed::new(format!(
                "no API key configured for {}",
                self.model
            )));
        };
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(
            "Sending {} messages to {} using model {}",
            messages.len(),
            url,
            self.model
        );

        let request = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: self.model.name(),
                messages,
            });
        let response: CompletionResponse = send_json(request, &url).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CallFailed::new(format!("empty reply from {url}")))
    }
}

// --- Ollama native chat API ---

#[derive(Serialize, Debug)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: ReplyMessage,
}

/// Endpoint talking to a local Ollama server (`POST /api/chat`), unauthenticated.
pub struct OllamaEndpoint {
    client: Client,
    model: ModelId,
    base_url: String,
}

impl OllamaEndpoint {
    pub fn new(client: Client, model: ModelId, base_url: impl Into<String>) -> Self {
        Self {
            client,
            model,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CompletionEndpoint for OllamaEndpoint {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CallFailed> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        debug!("Sending {} messages to local model {}", messages.len(), self.model);

        let request = self.client.post(&url).json(&OllamaChatRequest {
            model: self.model.name(),
            messages,
            stream: false,
        });
        let response: OllamaChatResponse = send_json(request, &url).await?;

        response
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CallFailed::new(format!("empty reply from {url}")))
    }
}

/// Sends a request and decodes a JSON body, folding every failure into [`CallFailed`].
async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T, CallFailed> {
    let response = request
        .send()
        .await
        .map_err(|e| CallFailed::new(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        warn!("HTTP error for {}: {} {}", url, status, body);
        return Err(CallFailed::new(format!(
            "HTTP {status} from {url}: {body}"
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CallFailed::new(format!("malformed response from {url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::model_id::Provider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conversation() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("Tu es un expert météorologue."),
            ChatMessage::user("Quelle est la ville la plus chaude ?"),
        ]
    }

    fn gemini(server: &MockServer, api_key: Option<&str>) -> OpenAiCompatibleEndpoint {
        OpenAiCompatibleEndpoint::new(
            Client::new(),
            ModelId::new(Provider::Gemini, "gemini-2.5-flash-lite"),
            server.uri(),
            api_key.map(str::to_owned),
        )
    }

    #[tokio::test]
    async fn test_openai_compatible_success() -> Result<(), CallFailed> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "model": "gemini-2.5-flash-lite",
                "messages": [
                    {"role": "system", "content": "Tu es un expert météorologue."},
                    {"role": "user", "content": "Quelle est la ville la plus chaude ?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Avignon"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = gemini(&server, Some("secret")).complete(&conversation()).await?;
        assert_eq!(reply, "Avignon");
        Ok(())
    }

    #[tokio::test]
    async fn test_openai_compatible_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = gemini(&server, Some("secret"))
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(err.cause.contains("429"));
        assert!(err.cause.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = gemini(&server, None)
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(err.cause.contains("no API key"));
    }

    #[tokio::test]
    async fn test_openai_compatible_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = gemini(&server, Some("secret"))
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(err.cause.contains("empty reply"));
    }

    #[tokio::test]
    async fn test_ollama_success() -> Result<(), CallFailed> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"model": "mistral", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "mistral",
                "message": {"role": "assistant", "content": "Il fera 15°C à Avignon."},
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = OllamaEndpoint::new(
            Client::new(),
            ModelId::new(Provider::Ollama, "mistral"),
            format!("{}/", server.uri()),
        );
        let reply = endpoint.complete(&conversation()).await?;
        assert_eq!(reply, "Il fera 15°C à Avignon.");
        Ok(())
    }

    #[tokio::test]
    async fn test_ollama_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let endpoint = OllamaEndpoint::new(
            Client::new(),
            ModelId::new(Provider::Ollama, "mistral"),
            server.uri(),
        );
        let err = endpoint.complete(&conversation()).await.unwrap_err();
        assert!(err.cause.contains("malformed response"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let endpoint = OllamaEndpoint::new(
            Client::new(),
            ModelId::new(Provider::Ollama, "mistral"),
            "http://127.0.0.1:9",
        );
        let err = endpoint.complete(&conversation()).await.unwrap_err();
        assert!(err.cause.contains("request to http://127.0.0.1:9/api/chat failed"));
    }
}
