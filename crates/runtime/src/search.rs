use std::sync::Arc;

use coach_clients::{BookEntry, IndexStats, SearchFilter, SearchResult, SupabaseClient};
use coach_common::{CoachEnv, ModuleClient, SearchBackendError};

use crate::embedding::EmbeddingChain;
use crate::render::{render_results, Highlighter, RenderedResults};

/// Read side of the chunk index.
#[async_trait::async_trait]
pub trait DocumentIndex: Send + Sync {
    async fn match_documents(&self, query_embedding: &[f32], filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchBackendError>;
    async fn list_books(&self) -> Result<Vec<BookEntry>, SearchBackendError>;
    async fn index_stats(&self) -> Result<IndexStats, SearchBackendError>;
}

#[async_trait::async_trait]
impl DocumentIndex for SupabaseClient {
    async fn match_documents(&self, query_embedding: &[f32], filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchBackendError> {
        SupabaseClient::match_documents(self, query_embedding, filter).await
    }

    async fn list_books(&self) -> Result<Vec<BookEntry>, SearchBackendError> {
        SupabaseClient::list_books(self).await
    }

    async fn index_stats(&self) -> Result<IndexStats, SearchBackendError> {
        SupabaseClient::index_stats(self).await
    }
}

/// A trimmed, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Please enter a search query")]
    EmptyQuery,
    #[error(transparent)]
    Backend(#[from] SearchBackendError),
}

/// Embeds a query, asks the index for the nearest chunks, and renders them.
#[derive(Clone)]
pub struct SearchPipeline {
    embedder: EmbeddingChain,
    index: Option<Arc<dyn DocumentIndex>>,
}

impl SearchPipeline {
    pub fn new(embedder: EmbeddingChain, index: Option<Arc<dyn DocumentIndex>>) -> Self {
        Self { embedder, index }
    }

    pub fn from_env(env: &CoachEnv) -> Self {
        let index = SupabaseClient::from_env(env).map(|client| Arc::new(client) as Arc<dyn DocumentIndex>);
        Self::new(EmbeddingChain::from_env(env), index)
    }

    pub fn embedder(&self) -> &EmbeddingChain {
        &self.embedder
    }

    pub fn is_configured(&self) -> bool {
        self.index.is_some()
    }

    fn index(&self) -> Result<&Arc<dyn DocumentIndex>, SearchBackendError> {
        self.index
            .as_ref()
            .ok_or_else(|| SearchBackendError::NotConfigured("SUPABASE_URL, SUPABASE_ANON_KEY".to_string()))
    }

    /// Results keep the order the index ranked them in.
    pub async fn search(&self, query: &Query, filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchError> {
        let index = self.index()?;
        tracing::info!("[SearchPipeline::search] {:?} in {}", query.as_str(), filter.book_name().unwrap_or("all books"));

        let embedding = self.embedder.embed(query.as_str()).await;
        let results = index.match_documents(&embedding, filter).await.map_err(|e| {
            tracing::error!("[SearchPipeline::search] Search failed: {}", e);
            e
        })?;

        tracing::info!("[SearchPipeline::search] {} results", results.len());
        Ok(results)
    }

    pub async fn search_and_render(
        &self,
        raw_query: &str,
        filter: &SearchFilter,
        highlighter: &Highlighter,
    ) -> Result<RenderedResults, SearchError> {
        let query = Query::parse(raw_query)?;
        let results = self.search(&query, filter).await?;
        Ok(render_results(&results, query.as_str(), highlighter))
    }

    pub async fn list_books(&self) -> Result<Vec<BookEntry>, SearchBackendError> {
        self.index()?.list_books().await
    }

    pub async fn stats(&self) -> Result<IndexStats, SearchBackendError> {
        self.index()?.index_stats().await
    }
}
