use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_model: String,
    /// Fallback cloud backend is optional; without a key the chain is
    /// primary cloud → local inference.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub ollama_model: String,
    /// Bounds one request's fallback attempts combined, in seconds.
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: env_or("GROQ_MODEL", "llama-3.3-70b-versatile"),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            openrouter_model: env_or("OPENROUTER_MODEL", "meta-llama/llama-3.3-70b-instruct"),
            ollama_host: env_or("OLLAMA_HOST", "localhost"),
            ollama_port: env_or("OLLAMA_PORT", "11434")
                .parse::<u16>()
                .context("OLLAMA_PORT must be a valid port number")?,
            ollama_model: env_or("OLLAMA_MODEL", "llama3"),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
