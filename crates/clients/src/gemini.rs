use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use coach_common::{define_module_client, EvaluationBackendError, ModuleClient};

pub struct GeminiConnection {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

define_module_client! {
    (struct GeminiClient, "gemini")
    client_type: GeminiConnection,
    env: ["GEMINI_API_KEY"],
    setup: |env| GeminiConnection {
        http: reqwest::Client::new(),
        base_url: env.gemini_base_url.trim_end_matches('/').to_string(),
        api_key: env.gemini_api_key.clone().unwrap_or_default(),
        model: env.gemini_model.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    pub fn model(&self) -> &str {
        &self.get_client().model
    }

    /// Single `generateContent` call. Returns the first candidate's first text part.
    pub async fn generate_content(
        &self,
        prompt: &str,
        generation_config: &GenerationConfig,
    ) -> Result<String, EvaluationBackendError> {
        let connection = self.get_client();
        let url = format!("{}/models/{}:generateContent", connection.base_url, connection.model);
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": generation_config,
        });

        tracing::debug!("[GeminiClient::generate_content] Calling model {}", connection.model);
        let response = connection.http
            .post(&url)
            .query(&[("key", connection.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| EvaluationBackendError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("Unknown error").to_string();
            let message = response
                .json::<GeminiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(fallback);

            tracing::error!("[GeminiClient::generate_content] Model {} returned {}: {}", connection.model, status.as_u16(), message);
            return Err(EvaluationBackendError::Status { status: status.as_u16(), message });
        }

        let payload: Value = response.json().await.unwrap_or(Value::Null);
        extract_candidate_text(&payload).ok_or(EvaluationBackendError::NoContent)
    }
}

fn extract_candidate_text(payload: &Value) -> Option<String> {
    payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
