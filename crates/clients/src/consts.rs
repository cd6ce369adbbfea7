pub type Embedding = Vec<f32>;

pub const MATCH_DOCUMENTS_RPC: &str = "match_documents";
pub const BOOKS_TABLE: &str = "books";
pub const CHUNKS_TABLE: &str = "document_chunks";
pub const QUESTIONS_TABLE: &str = "interview_questions";

pub const DEFAULT_MATCH_COUNT: usize = 5;
