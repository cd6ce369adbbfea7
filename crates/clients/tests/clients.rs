use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, head, post},
    Json, Router,
};
use serde_json::{json, Value};

use coach_clients::{
    EmbederClient, GeminiClient, GenerationConfig, ProxyEmbederClient, QuestionFilter, SearchFilter,
    SupabaseClient,
};
use coach_common::{CoachEnv, EvaluationBackendError, ModuleClient, SearchBackendError};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn supabase_env(base_url: &str) -> CoachEnv {
    CoachEnv::from_pairs(&[("SUPABASE_URL", base_url), ("SUPABASE_ANON_KEY", "anon-key")])
}

#[test]
fn test_clients_absent_when_unconfigured() {
    let env = CoachEnv::from_pairs(&[
        ("GEMINI_API_KEY", "YOUR_GEMINI_API_KEY_HERE"),
        ("SUPABASE_URL", "https://example.supabase.co"),
    ]);

    assert!(GeminiClient::from_env(&env).is_none());
    assert!(SupabaseClient::from_env(&env).is_none());
    assert!(EmbederClient::from_env(&env).is_none());
    // the proxy URL always has a default
    assert!(ProxyEmbederClient::from_env(&env).is_some());
}

#[tokio::test]
async fn test_match_documents_sends_rpc_payload_and_keeps_order() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/rest/v1/rpc/match_documents", post(|State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers.get("apikey").unwrap(), "anon-key");
            assert_eq!(headers.get("authorization").unwrap(), "Bearer anon-key");
            captured.lock().unwrap().push(body);
            Json(json!([
                { "book_name": "Hands_On_ML", "page_number": 12, "chunk_text": "low", "similarity": 0.41 },
                { "book_name": "Deep_Learning", "page_number": null, "chunk_text": "high", "similarity": 0.93 }
            ]))
        }))
        .with_state(captured.clone());
    let base_url = serve(app).await;

    let client = SupabaseClient::from_env(&supabase_env(&base_url)).unwrap();
    let results = client.match_documents(&[0.25, -0.5, 0.75], &SearchFilter::default()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk_text, "low");
    assert_eq!(results[1].page_number, None);

    let body = captured.lock().unwrap()[0].clone();
    assert_eq!(body["match_count"], 5);
    assert!(body["filter_book_name"].is_null());
    assert_eq!(body["query_embedding"], json!([0.25, -0.5, 0.75]));
}

#[tokio::test]
async fn test_match_documents_with_book_filter_and_empty_result() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/rest/v1/rpc/match_documents", post(|State(captured): State<Captured>, Json(body): Json<Value>| async move {
            captured.lock().unwrap().push(body);
            Json(json!([]))
        }))
        .with_state(captured.clone());
    let base_url = serve(app).await;

    let client = SupabaseClient::from_env(&supabase_env(&base_url)).unwrap();
    let filter = SearchFilter::all_books(NonZeroUsize::new(3).unwrap()).within_book("Deep_Learning");
    let results = client.match_documents(&[1.0], &filter).await.unwrap();

    assert!(results.is_empty());
    let body = captured.lock().unwrap()[0].clone();
    assert_eq!(body["filter_book_name"], "Deep_Learning");
    assert_eq!(body["match_count"], 3);
}

#[tokio::test]
async fn test_match_documents_surfaces_backend_error() {
    let app = Router::new().route("/rest/v1/rpc/match_documents", post(|| async {
        (StatusCode::NOT_FOUND, Json(json!({
            "code": "PGRST202",
            "message": "Could not find the function public.match_documents"
        })))
    }));
    let base_url = serve(app).await;

    let client = SupabaseClient::from_env(&supabase_env(&base_url)).unwrap();
    let err = client.match_documents(&[1.0], &SearchFilter::default()).await.unwrap_err();

    assert_eq!(err, SearchBackendError::Status {
        status: 404,
        message: "Could not find the function public.match_documents".to_string(),
    });
}

#[tokio::test]
async fn test_match_documents_transport_failure() {
    // nothing listens on port 9 of the loopback interface
    let client = SupabaseClient::from_env(&supabase_env("http://127.0.0.1:9")).unwrap();
    let err = client.match_documents(&[1.0], &SearchFilter::default()).await.unwrap_err();
    assert!(matches!(err, SearchBackendError::Transport(_)));
}

#[tokio::test]
async fn test_books_and_stats() {
    let app = Router::new()
        .route("/rest/v1/books", get(|Query(params): Query<Vec<(String, String)>>| async move {
            assert!(params.contains(&("order".to_string(), "title".to_string())));
            Json(json!([
                { "title": "Deep Learning", "filename": "Deep_Learning" },
                { "title": "Hands-On ML", "filename": "Hands_On_ML" }
            ]))
        }))
        .route("/rest/v1/document_chunks", head(|headers: HeaderMap| async move {
            assert_eq!(headers.get("prefer").unwrap(), "count=exact");
            let mut response = HeaderMap::new();
            response.insert("content-range", "*/3573".parse().unwrap());
            (StatusCode::OK, response)
        }));
    let base_url = serve(app).await;

    let client = SupabaseClient::from_env(&supabase_env(&base_url)).unwrap();
    let books = client.list_books().await.unwrap();
    assert_eq!(books[0].filename, "Deep_Learning");

    let stats = client.index_stats().await.unwrap();
    assert_eq!(stats.total_chunks, 3573);
    assert_eq!(stats.total_books, 2);
}

fn gemini_env(base_url: &str) -> CoachEnv {
    CoachEnv::from_pairs(&[
        ("GEMINI_API_KEY", "test-key"),
        ("GEMINI_BASE_URL", base_url),
        ("GEMINI_MODEL", "gemini-test"),
    ])
}

const GENERATION: GenerationConfig = GenerationConfig { temperature: 0.7, max_output_tokens: 1024 };

#[tokio::test]
async fn test_generate_content_returns_candidate_text() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/models/{action}", post(|State(captured): State<Captured>, Query(params): Query<Vec<(String, String)>>, Json(body): Json<Value>| async move {
            assert!(params.contains(&("key".to_string(), "test-key".to_string())));
            captured.lock().unwrap().push(body);
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{\"score\": 8}" }] } }]
            }))
        }))
        .with_state(captured.clone());
    let base_url = serve(app).await;

    let client = GeminiClient::from_env(&gemini_env(&base_url)).unwrap();
    let text = client.generate_content("evaluate this", &GENERATION).await.unwrap();
    assert_eq!(text, "{\"score\": 8}");

    let body = captured.lock().unwrap()[0].clone();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "evaluate this");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
}

#[tokio::test]
async fn test_generate_content_error_message_and_status_text() {
    let app = Router::new()
        .route("/models/{action}", post(|| async {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": { "code": 400, "message": "API key not valid." } })))
        }));
    let base_url = serve(app).await;
    let client = GeminiClient::from_env(&gemini_env(&base_url)).unwrap();
    let err = client.generate_content("x", &GENERATION).await.unwrap_err();
    assert_eq!(err, EvaluationBackendError::Status { status: 400, message: "API key not valid.".to_string() });

    let app = Router::new()
        .route("/models/{action}", post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }));
    let base_url = serve(app).await;
    let client = GeminiClient::from_env(&gemini_env(&base_url)).unwrap();
    let err = client.generate_content("x", &GENERATION).await.unwrap_err();
    assert_eq!(err, EvaluationBackendError::Status { status: 503, message: "Service Unavailable".to_string() });
}

#[tokio::test]
async fn test_generate_content_without_text_is_no_content() {
    let app = Router::new()
        .route("/models/{action}", post(|| async { Json(json!({ "candidates": [] })) }));
    let base_url = serve(app).await;

    let client = GeminiClient::from_env(&gemini_env(&base_url)).unwrap();
    let err = client.generate_content("x", &GENERATION).await.unwrap_err();
    assert_eq!(err, EvaluationBackendError::NoContent);
}

#[tokio::test]
async fn test_proxy_embeder() {
    let app = Router::new()
        .route("/api/embed", post(|Json(body): Json<Value>| async move {
            assert_eq!(body["text"], "bias variance");
            Json(json!({ "embedding": [0.1, 0.2, 0.3], "dimension": 3 }))
        }));
    let base_url = serve(app).await;

    let env = CoachEnv::from_pairs(&[("EMBEDDING_PROXY_URL", &format!("{}/api/embed", base_url))]);
    let client = ProxyEmbederClient::from_env(&env).unwrap();
    let embedding = client.embed("bias variance").await.unwrap();
    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_proxy_embeder_rejects_error_status() {
    let app = Router::new()
        .route("/api/embed", post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "error": "Text cannot be empty" }))) }));
    let base_url = serve(app).await;

    let env = CoachEnv::from_pairs(&[("EMBEDDING_PROXY_URL", &format!("{}/api/embed", base_url))]);
    let client = ProxyEmbederClient::from_env(&env).unwrap();
    assert!(client.embed("anything").await.is_err());
}

#[tokio::test]
async fn test_primary_embeder_against_openai_compatible_endpoint() {
    let app = Router::new()
        .route("/v1/embeddings", post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers.get("authorization").unwrap(), "Bearer sk-test");
            assert_eq!(body["model"], "text-embedding-3-small");
            assert_eq!(body["dimensions"], 384);
            Json(json!({
                "object": "list",
                "model": "text-embedding-3-small",
                "data": [{ "object": "embedding", "index": 0, "embedding": [0.5, 0.5] }],
                "usage": { "prompt_tokens": 2, "total_tokens": 2 }
            }))
        }));
    let base_url = serve(app).await;

    let env = CoachEnv::from_pairs(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", &format!("{}/v1", base_url)),
    ]);
    let client = EmbederClient::from_env(&env).unwrap();
    let embeddings = client.embed(vec!["what is overfitting".to_string()]).await.unwrap();
    assert_eq!(embeddings, vec![vec![0.5, 0.5]]);
}

#[tokio::test]
async fn test_fixed_width_model_omits_dimensions() {
    let app = Router::new()
        .route("/v1/embeddings", post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "text-embedding-ada-002");
            assert!(body.get("dimensions").is_none());
            Json(json!({
                "object": "list",
                "model": "text-embedding-ada-002",
                "data": [{ "object": "embedding", "index": 0, "embedding": vec![0.25; 4] }],
                "usage": { "prompt_tokens": 1, "total_tokens": 1 }
            }))
        }));
    let base_url = serve(app).await;

    let env = CoachEnv::from_pairs(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", &format!("{}/v1", base_url)),
        ("EMBEDDING_MODEL", "text-embedding-ada-002"),
    ]);
    let client = EmbederClient::from_env(&env).unwrap();
    assert!(!client.produces_configured_dims());
    let embeddings = client.embed(vec!["entropy".to_string()]).await.unwrap();
    assert_eq!(embeddings[0].len(), 4);
}

#[tokio::test]
async fn test_fetch_questions_applies_equality_filters() {
    let app = Router::new()
        .route("/rest/v1/interview_questions", get(|Query(params): Query<Vec<(String, String)>>| async move {
            assert!(params.contains(&("select".to_string(), "*".to_string())));
            assert!(params.contains(&("question_type".to_string(), "eq.stats".to_string())));
            assert!(params.contains(&("difficulty".to_string(), "eq.hard".to_string())));
            assert!(!params.iter().any(|(key, _)| key == "company"));
            Json(json!([
                { "id": 3, "question_text": "Explain the CLT.", "answer_text": "Sums of iid variables...", "question_type": "stats", "difficulty": "hard" }
            ]))
        }));
    let base_url = serve(app).await;

    let client = SupabaseClient::from_env(&supabase_env(&base_url)).unwrap();
    let filter = QuestionFilter { company: Some(String::new()), ..QuestionFilter::new(Some("stats"), Some("hard")) };
    let questions = client.fetch_questions(&filter).await.unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question_text, "Explain the CLT.");
    assert_eq!(questions[0].model_answer(), Some("Sums of iid variables..."));
}
