use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use coach_common::{define_module_client, ModuleClient, SearchBackendError};

use crate::{
    BookEntry, IndexStats, InterviewQuestion, QuestionFilter, SearchFilter, SearchResult,
    BOOKS_TABLE, CHUNKS_TABLE, MATCH_DOCUMENTS_RPC, QUESTIONS_TABLE,
};

pub struct SupabaseConnection {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

define_module_client! {
    (struct SupabaseClient, "supabase")
    client_type: SupabaseConnection,
    env: ["SUPABASE_URL", "SUPABASE_ANON_KEY"],
    setup: |env| SupabaseConnection {
        http: reqwest::Client::new(),
        url: env.supabase_url.clone().unwrap_or_default().trim_end_matches('/').to_string(),
        anon_key: env.supabase_anon_key.clone().unwrap_or_default(),
    }
}

#[derive(Debug, Serialize)]
struct MatchDocumentsRequest<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
    filter_book_name: Option<&'a str>,
}

/// PostgREST error envelope.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

impl SupabaseClient {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let connection = self.get_client();
        connection.http
            .request(method, format!("{}/rest/v1/{}", connection.url, path))
            .header("apikey", &connection.anon_key)
            .bearer_auth(&connection.anon_key)
    }

    async fn send(request: RequestBuilder) -> Result<Response, SearchBackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| SearchBackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status.canonical_reason().unwrap_or("Unknown error").to_string();
        let message = response
            .json::<PostgrestError>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback);

        tracing::error!("[SupabaseClient::send] Backend returned {}: {}", status.as_u16(), message);
        Err(SearchBackendError::Status { status: status.as_u16(), message })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SearchBackendError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SearchBackendError::MalformedBody(e.to_string()))
    }

    /// Ranking happens server side; results come back already ordered.
    pub async fn match_documents(
        &self,
        query_embedding: &[f32],
        filter: &SearchFilter,
    ) -> Result<Vec<SearchResult>, SearchBackendError> {
        tracing::debug!(
            "[SupabaseClient::match_documents] dims={} match_count={} book={:?}",
            query_embedding.len(), filter.match_count, filter.book_name()
        );

        let payload = MatchDocumentsRequest {
            query_embedding,
            match_count: filter.match_count.get(),
            filter_book_name: filter.book_name(),
        };

        let request = self
            .request(Method::POST, &format!("rpc/{}", MATCH_DOCUMENTS_RPC))
            .json(&payload);
        let response = Self::send(request).await?;

        // the RPC answers `null` when nothing matched
        let results: Option<Vec<SearchResult>> = Self::read_json(response).await?;
        Ok(results.unwrap_or_default())
    }

    pub async fn fetch_questions(&self, filter: &QuestionFilter) -> Result<Vec<InterviewQuestion>, SearchBackendError> {
        let params = filter.postgrest_params();
        tracing::debug!("[SupabaseClient::fetch_questions] filters={:?}", params);

        let request = self
            .request(Method::GET, QUESTIONS_TABLE)
            .query(&[("select", "*")])
            .query(&params);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    pub async fn list_books(&self) -> Result<Vec<BookEntry>, SearchBackendError> {
        let request = self
            .request(Method::GET, BOOKS_TABLE)
            .query(&[("select", "title,filename"), ("order", "title")]);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    pub async fn count_chunks(&self) -> Result<u64, SearchBackendError> {
        let request = self
            .request(Method::HEAD, CHUNKS_TABLE)
            .query(&[("select", "*")])
            .header("Prefer", "count=exact");
        let response = Self::send(request).await?;

        let content_range = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| SearchBackendError::MalformedBody("missing Content-Range header".to_string()))?;

        parse_content_range_total(content_range)
            .ok_or_else(|| SearchBackendError::MalformedBody(format!("unexpected Content-Range `{}`", content_range)))
    }

    pub async fn index_stats(&self) -> Result<IndexStats, SearchBackendError> {
        let total_chunks = self.count_chunks().await?;
        let total_books = self.list_books().await?.len();
        Ok(IndexStats { total_chunks, total_books })
    }
}

/// `0-24/3573` or `*/3573` -> 3573
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
