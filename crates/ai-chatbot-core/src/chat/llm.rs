//! Language-model client
//!
//! The session talks to a [`LanguageModel`]; [`GeminiClient`] is the
//! implementation over the Generative Language REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::API_FAILURE_MESSAGE;
use crate::core::config::LlmConfig;
use crate::types::error::LlmError;
use crate::{log_debug, log_warn};

/// Something that turns a prompt into a reply
#[allow(async_fn_in_trait)]
pub trait LanguageModel {
    /// Generate a reply to `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// A model advertised by `list_models`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-pro`
    pub name: String,
    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Client for the configured endpoint and model
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Model name used for generation
    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        )
    }

    /// Models available to the configured key
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/v1beta/models?key={}", self.api_base, self.api_key()?);
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }

        let list: ModelList = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        Ok(list.models)
    }
}

impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self.generate_url(self.api_key()?);
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        log_debug!("Sending prompt to model {}", self.model);
        let response = self.http.post(url).json(&request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_generate_response(status, &body)
    }
}

/// Interpret a `generateContent` response
pub fn parse_generate_response(status: u16, body: &str) -> Result<String, LlmError> {
    if !(200..300).contains(&status) {
        let err = api_error(status, body);
        log_warn!("Model request failed with status {}: {}", status, err);
        return Err(err);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| LlmError::MalformedResponse("response contained no generated text".into()))
}

fn api_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| API_FAILURE_MESSAGE.to_string());
    LlmError::Api { status, message }
}
