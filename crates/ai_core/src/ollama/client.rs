//! Ollama `/api/generate` client

use async_trait::async_trait;
use domain::ChatMessage;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::streaming::create_stream;
use crate::{
    config::RemoteEngineConfig,
    error::EngineError,
    ports::{ChunkStream, Engine, GenerationRequest},
};

/// Name reported by the remote engine
pub const OLLAMA_ENGINE_NAME: &str = "ollama";

/// Engine backed by an Ollama-compatible server
#[derive(Debug, Clone)]
pub struct OllamaEngine {
    client: Client,
    config: RemoteEngineConfig,
}

/// Body of a `/api/generate` call
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

/// Non-streaming `/api/generate` answer
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaEngine {
    /// Create an engine for the given backend
    ///
    /// The configured timeout bounds connecting and each read of the body,
    /// so long streams stay open as long as chunks keep arriving.
    pub fn new(config: RemoteEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        debug!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized Ollama engine"
        );

        Ok(Self { client, config })
    }

    fn build_body(&self, request: &GenerationRequest, stream: bool) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.config.model,
            prompt: build_prompt(&request.messages),
            stream,
            options: GenerateOptions {
                temperature: request.temperature,
                top_p: request.top_p,
                num_predict: request.max_tokens,
            },
        }
    }

    /// POST to `/api/generate` and reject non-success statuses
    async fn send(&self, request: &GenerationRequest, stream: bool) -> Result<Response, EngineError> {
        let body = self.build_body(request, stream);

        let response = self
            .client
            .post(self.config.endpoint("generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::from_transport(&e, self.config.timeout()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Generation request failed");
            return Err(EngineError::status(status.as_u16(), &body));
        }

        Ok(response)
    }
}

/// Flatten a conversation into a plain prompt, one `role: content` per line
fn build_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Engine for OllamaEngine {
    fn name(&self) -> &str {
        OLLAMA_ENGINE_NAME
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, EngineError> {
        debug!("Sending generate request");

        let response = self.send(request, false).await?;
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        info!(chars = parsed.response.chars().count(), "Generation completed");
        Ok(parsed.response)
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn stream(&self, request: &GenerationRequest) -> Result<ChunkStream, EngineError> {
        debug!("Sending streaming generate request");

        let response = self.send(request, true).await?;
        Ok(create_stream(response, self.config.timeout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_has_one_line_per_message() {
        let prompt = build_prompt(&[
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);
        assert_eq!(prompt, "system: be brief\nuser: hi\nassistant: hello");
    }

    #[test]
    fn request_body_carries_sampling_options() {
        let engine = OllamaEngine::new(RemoteEngineConfig::default().with_model("llama3.2")).unwrap();
        let request = GenerationRequest::simple("hi")
            .with_temperature(0.2)
            .with_top_p(0.8)
            .with_max_tokens(32);

        let body = serde_json::to_value(engine.build_body(&request, true)).unwrap();
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["prompt"], "user: hi");
        assert_eq!(body["stream"], true);
        assert_eq!(body["options"]["num_predict"], 32);
        assert!((body["options"]["top_p"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn engine_reports_name_and_model() {
        let engine = OllamaEngine::new(RemoteEngineConfig::default()).unwrap();
        assert_eq!(engine.name(), "ollama");
        assert_eq!(engine.model(), Some("qwen2.5:7b"));
        assert_eq!(engine.config.timeout_ms, 60_000);
    }

    #[test]
    fn generate_response_tolerates_missing_field() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(parsed.response.is_empty());
    }
}
