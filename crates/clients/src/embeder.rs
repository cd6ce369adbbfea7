use std::time::Duration;

use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::CreateEmbeddingRequestArgs,
    Client
};
use backoff::ExponentialBackoffBuilder;
use coach_common::{define_module_client, ModuleClient};

use crate::Embedding;

pub struct EmbederConnection {
    client: Client<OpenAIConfig>,
    model: String,
    dims: usize,
}

/// Models that only ever answer with one vector width and reject a `dimensions` request.
pub fn fixed_model_dims(model: &str) -> Option<usize> {
    match model {
        "text-embedding-ada-002" => Some(1536),
        _ => None,
    }
}

define_module_client! {
    (struct EmbederClient, "embeder")
    client_type: EmbederConnection,
    env: ["OPENAI_API_KEY"],
    setup: |env| {
        let embeder_config = OpenAIConfig::new()
            .with_api_base(env.openai_base_url.clone())
            .with_api_key(env.openai_api_key.clone().unwrap_or_default());

        // zero elapsed budget: a rate-limited call fails instead of being retried
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        EmbederConnection {
            client: Client::build(reqwest::Client::new(), embeder_config, no_retry),
            model: env.embedding_model.clone(),
            dims: env.embedding_dims,
        }
    }
}

impl EmbederClient {
    pub fn model(&self) -> &str {
        &self.get_client().model
    }

    pub fn dims(&self) -> usize {
        self.get_client().dims
    }

    /// False when the model's vector width is fixed and differs from the configured one.
    pub fn produces_configured_dims(&self) -> bool {
        fixed_model_dims(self.model()).map_or(true, |dims| dims == self.dims())
    }

    pub async fn embed(&self, text: Vec<String>) -> Result<Vec<Embedding>> {
        tracing::debug!("[EmbederClient::embed] Embedding {} text(s) with {}", text.len(), self.model());
        if text.is_empty() {
            return Ok(vec![]);
        }

        let mut args = CreateEmbeddingRequestArgs::default();
        args.model(self.model()).input(text);
        if fixed_model_dims(self.model()).is_none() {
            args.dimensions(self.dims() as u32);
        }
        let request = args.build()?;

        let response = self.get_client().client.embeddings().create(request).await?;
        let embeddings = response.data
            .into_iter()
            .map(|item| item.embedding)
            .collect::<Vec<_>>();

        if embeddings.is_empty() {
            return Err(anyhow!("[EmbederClient::embed] Model {} returned no embeddings", self.model()));
        }

        tracing::debug!("[EmbederClient::embed] Embedding response: {}", embeddings.len());
        Ok(embeddings)
    }
}
