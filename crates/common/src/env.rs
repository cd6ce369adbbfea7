use std::collections::HashMap;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_PROXY_URL: &str = "http://localhost:5000/api/embed";
pub const DEFAULT_EMBEDDING_DIMS: usize = 384;
pub const DEFAULT_PORT: u16 = 3033;

pub trait EnvVars {
    fn load() -> Self;
    fn get_env_var(&self, key: &str) -> Option<String>;
}

/// Sample config files ship values like `YOUR_GEMINI_API_KEY_HERE`.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("YOUR_") && value.ends_with("_HERE")
}

fn configured(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Every setting the coach understands. Absent, empty and placeholder values
/// all collapse to "not configured".
#[derive(Debug, Clone)]
pub struct CoachEnv {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,

    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,

    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub embedding_proxy_url: String,
    pub embedding_dims: usize,

    pub port: u16,
}

impl CoachEnv {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).and_then(configured);

        let embedding_dims = match value("EMBEDDING_DIMS").map(|raw| raw.parse::<usize>()) {
            Some(Ok(dims)) if dims > 0 => dims,
            Some(_) => {
                tracing::warn!(
                    "[CoachEnv::from_lookup] EMBEDDING_DIMS is not a positive integer, using {}",
                    DEFAULT_EMBEDDING_DIMS
                );
                DEFAULT_EMBEDDING_DIMS
            }
            None => DEFAULT_EMBEDDING_DIMS,
        };

        let port = match value("PORT").map(|raw| raw.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(_)) => {
                tracing::warn!("[CoachEnv::from_lookup] PORT is not a valid port, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };

        Self {
            gemini_api_key: value("GEMINI_API_KEY"),
            gemini_base_url: value("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: value("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),

            supabase_url: value("SUPABASE_URL"),
            supabase_anon_key: value("SUPABASE_ANON_KEY"),

            openai_api_key: value("OPENAI_API_KEY"),
            openai_base_url: value("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            embedding_model: value("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_proxy_url: value("EMBEDDING_PROXY_URL").unwrap_or_else(|| DEFAULT_EMBEDDING_PROXY_URL.to_string()),
            embedding_dims,

            port,
        }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        Self::from_lookup(|key| map.get(key).cloned())
    }
}

impl EnvVars for CoachEnv {
    fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        match key {
            "GEMINI_API_KEY" => self.gemini_api_key.clone(),
            "GEMINI_BASE_URL" => Some(self.gemini_base_url.clone()),
            "GEMINI_MODEL" => Some(self.gemini_model.clone()),
            "SUPABASE_URL" => self.supabase_url.clone(),
            "SUPABASE_ANON_KEY" => self.supabase_anon_key.clone(),
            "OPENAI_API_KEY" => self.openai_api_key.clone(),
            "OPENAI_BASE_URL" => Some(self.openai_base_url.clone()),
            "EMBEDDING_MODEL" => Some(self.embedding_model.clone()),
            "EMBEDDING_PROXY_URL" => Some(self.embedding_proxy_url.clone()),
            "EMBEDDING_DIMS" => Some(self.embedding_dims.to_string()),
            "PORT" => Some(self.port.to_string()),
            _ => panic!("{} is not a recognized setting", key),
        }
    }
}
