use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use coach_common::{define_module_client, ModuleClient};

use crate::Embedding;

pub struct ProxyConnection {
    http: reqwest::Client,
    url: String,
}

define_module_client! {
    (struct ProxyEmbederClient, "embedding-proxy")
    client_type: ProxyConnection,
    env: ["EMBEDDING_PROXY_URL"],
    setup: |env| ProxyConnection {
        http: reqwest::Client::new(),
        url: env.embedding_proxy_url.clone(),
    }
}

#[derive(Debug, Serialize)]
struct ProxyEmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyEmbedResponse {
    embedding: Embedding,
}

impl ProxyEmbederClient {
    pub fn url(&self) -> &str {
        &self.get_client().url
    }

    /// Local embedding service speaking `{text}` -> `{embedding}`.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        tracing::debug!("[ProxyEmbederClient::embed] POST {}", self.url());
        let response = self.get_client().http
            .post(self.url())
            .json(&ProxyEmbedRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let body: ProxyEmbedResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(anyhow!("[ProxyEmbederClient::embed] Proxy returned an empty embedding"));
        }

        Ok(body.embedding)
    }
}
