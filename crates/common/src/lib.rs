mod client;
mod env;
mod error;

pub use client::ModuleClient;
pub use env::{
    is_placeholder, CoachEnv, EnvVars,
    DEFAULT_EMBEDDING_DIMS, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_PROXY_URL,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_PORT,
};
pub use error::{ErrorKind, EvaluationBackendError, SearchBackendError};
