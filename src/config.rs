use std::env;
use std::time::Duration;

/// Service configuration derived from environment variables.
///
/// Everything downstream receives these values explicitly; nothing below
/// `main` reads the environment.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub bind: String,
    pub port: u16,
    /// Bearer token for API auth.  Empty ⇒ auth disabled.
    pub token: String,

    /// Base URL of the upstream trend API, no trailing slash.
    pub api_base: String,
    /// Per-request timeout applied by the HTTP client.
    pub http_timeout: Duration,
    pub user_agent: String,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl BoardConfig {
    pub fn from_env() -> Self {
        let api_base = env_str("TRENDBOARD_API_BASE", "http://127.0.0.1:8000")
            .trim_end_matches('/')
            .to_string();

        Self {
            bind: env_str("TRENDBOARD_BIND", "127.0.0.1"),
            port: env_u16("TRENDBOARD_PORT", 61020),
            token: env_str("TRENDBOARD_TOKEN", ""),
            api_base,
            http_timeout: Duration::from_millis(env_u64("TRENDBOARD_HTTP_TIMEOUT_MS", 12_000)),
            user_agent: env_str("TRENDBOARD_USER_AGENT", "trendboard/0.1"),
        }
    }
}
