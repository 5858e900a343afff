use std::env;

use crate::core::translation::upstream::DEFAULT_INFERENCE_URL;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Hugging Face inference API key. Empty means unauthenticated requests.
    pub huggingface_api_key: Option<String>,
    /// Base URL of the inference API (overridable for testing).
    pub huggingface_api_url: String,

    // Rate limiting for the translate endpoint
    pub rate_limit_enabled: bool,
    pub rate_limit_per_minute: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid port number: {e}"))?;

        let huggingface_api_key = env::var("HUGGINGFACE_API_KEY").ok();
        let huggingface_api_url = env::var("HUGGINGFACE_API_URL")
            .unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string());

        let rate_limit_enabled = env::var("RATE_LIMIT_ENABLED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let rate_limit_per_minute = env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(20);

        Ok(ServerConfig {
            host,
            port,
            huggingface_api_key,
            huggingface_api_url,
            rate_limit_enabled,
            rate_limit_per_minute,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
