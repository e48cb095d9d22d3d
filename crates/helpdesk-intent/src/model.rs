//! Language-model seam and its OpenAI-compatible HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClassifierError;

/// Anything that can turn a prompt into completion text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint (Groq by default).
#[derive(Debug, Clone)]
pub struct ChatCompletionsModel {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl ChatCompletionsModel {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";
    pub const DEFAULT_MODEL: &'static str = "llama3-8b-8192";

    const TEMPERATURE: f32 = 0.1;
    const MAX_TOKENS: u32 = 500;

    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ClassifierError::Config(format!("API key is not a valid header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent(concat!("helpdesk-intent/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: [WireMessage {
                role: "user",
                content: prompt,
            }],
            temperature: Self::TEMPERATURE,
            max_tokens: Self::MAX_TOKENS,
        };

        let url = self.endpoint();
        debug!(%url, model = %self.model, "requesting intent classification");

        let resp = self.http.post(&url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(ClassifierError::EmptyReply)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let m = ChatCompletionsModel::new(
            "key",
            "https://api.example.test/v1/",
            ChatCompletionsModel::DEFAULT_MODEL,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(m.endpoint(), "https://api.example.test/v1/chat/completions");
        assert_eq!(m.model(), "llama3-8b-8192");
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let err = ChatCompletionsModel::new(
            "bad\nkey",
            ChatCompletionsModel::DEFAULT_BASE_URL,
            ChatCompletionsModel::DEFAULT_MODEL,
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));
    }

    #[test]
    fn request_body_shape() {
        let req = CompletionRequest {
            model: "m",
            messages: [WireMessage { role: "user", content: "hi" }],
            temperature: ChatCompletionsModel::TEMPERATURE,
            max_tokens: ChatCompletionsModel::MAX_TOKENS,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["max_tokens"], 500);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        let m = ChatCompletionsModel::new(
            "key",
            "http://127.0.0.1:9",
            ChatCompletionsModel::DEFAULT_MODEL,
            Duration::from_millis(500),
        )
        .unwrap();
        let err = m.complete("hello").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Http(_)));
    }
}
