use std::sync::Arc;

use anyhow::{anyhow, Result};
use coach_clients::{Embedding, EmbederClient, ProxyEmbederClient};
use coach_common::{CoachEnv, ModuleClient};

/// One way of turning text into a vector. Providers are tried in order by [`EmbeddingChain`].
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn embed_text(&self, text: &str) -> Result<Embedding>;
}

#[async_trait::async_trait]
impl EmbeddingProvider for EmbederClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn embed_text(&self, text: &str) -> Result<Embedding> {
        self.embed(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(anyhow!("[EmbederClient::embed_text] No embedding in the response"))
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for ProxyEmbederClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn embed_text(&self, text: &str) -> Result<Embedding> {
        self.embed(text).await
    }
}

/// Uniform draws in [-0.5, 0.5), scaled to unit length.
///
/// Carries no meaning. An all-zero draw divides by zero and yields NaNs; that
/// case has probability zero and is left alone.
pub fn random_unit_embedding(dims: usize) -> Embedding {
    let mut embedding = (0..dims)
        .map(|_| rand::random_range(-0.5f32..0.5f32))
        .collect::<Vec<_>>();

    let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    embedding.iter_mut().for_each(|x| *x /= norm);
    embedding
}

/// Resolves text to a vector of a fixed dimensionality, never failing.
///
/// Providers are tried in order and every failure is absorbed. When none
/// succeeds a random unit vector is returned and a warning is logged, since
/// any search built on it is meaningless.
#[derive(Clone)]
pub struct EmbeddingChain {
    providers: Vec<Arc<dyn EmbeddingProvider>>,
    dims: usize,
}

impl EmbeddingChain {
    pub fn new(dims: usize) -> Self {
        Self { providers: vec![], dims }
    }

    pub fn with_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Primary OpenAI-compatible embedder when a key is configured, then the local proxy.
    pub fn from_env(env: &CoachEnv) -> Self {
        let mut chain = Self::new(env.embedding_dims);
        match EmbederClient::from_env(env) {
            Some(embeder) if embeder.produces_configured_dims() => {
                chain = chain.with_provider(Arc::new(embeder));
            }
            Some(embeder) => {
                tracing::warn!(
                    "[EmbeddingChain::from_env] {} cannot produce {}-dimensional embeddings, skipping the primary embedder",
                    embeder.model(), env.embedding_dims
                );
            }
            None => {}
        }
        if let Some(proxy) = ProxyEmbederClient::from_env(env) {
            chain = chain.with_provider(Arc::new(proxy));
        }
        chain
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    pub async fn embed(&self, text: &str) -> Embedding {
        if let Some(embedding) = self.try_providers(text).await {
            return embedding;
        }

        tracing::warn!(
            "[EmbeddingChain::embed] No embedding provider succeeded, using a random {}-dimensional embedding. Search results will not be meaningful",
            self.dims
        );
        random_unit_embedding(self.dims)
    }

    async fn try_providers(&self, text: &str) -> Option<Embedding> {
        for provider in &self.providers {
            let attempt = provider
                .embed_text(text)
                .await
                .and_then(|embedding| self.check_dims(embedding));

            match attempt {
                Ok(embedding) => {
                    tracing::debug!("[EmbeddingChain::embed] Embedded with {}", provider.name());
                    return Some(embedding);
                }
                Err(e) => {
                    tracing::warn!("[EmbeddingChain::embed] Provider {} failed, trying next: {:#}", provider.name(), e);
                }
            }
        }
        None
    }

    fn check_dims(&self, embedding: Embedding) -> Result<Embedding> {
        if embedding.len() != self.dims {
            return Err(anyhow!(
                "[EmbeddingChain::check_dims] Expected {} dimensions, got {}",
                self.dims, embedding.len()
            ));
        }
        Ok(embedding)
    }
}
