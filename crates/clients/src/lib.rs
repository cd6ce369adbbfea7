mod consts;
mod questions;
mod vector;

#[cfg(feature = "embeder")]
mod embeder;
#[cfg(feature = "proxy")]
mod proxy;
#[cfg(feature = "supabase")]
mod supabase;
#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "embeder")]
pub use embeder::{fixed_model_dims, EmbederClient};
#[cfg(feature = "proxy")]
pub use proxy::ProxyEmbederClient;
#[cfg(feature = "supabase")]
pub use supabase::SupabaseClient;
#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GenerationConfig};

pub use questions::{InterviewQuestion, QuestionFilter};
pub use vector::{BookEntry, IndexStats, SearchFilter, SearchResult};

pub use consts::*;
