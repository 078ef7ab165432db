use std::env;
use std::str::FromStr;
use std::time::Duration;

use cn_agent::{AgentConfig, DEFAULT_BASE_URL, DEFAULT_MAX_STEPS, DEFAULT_MODEL};
use cn_core::{Error, Result};

/// Startup settings. The search API key is not among them: the search
/// adapter reads it from the environment on every request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub agent: AgentConfig,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let agent = AgentConfig {
            kind: get_or("AGENT_KIND", "llm"),
            model: get_or("AGENT_MODEL", DEFAULT_MODEL),
            base_url: get_or("AGENT_BASE_URL", DEFAULT_BASE_URL),
            api_key: lookup("AGENT_API_KEY").or_else(|| lookup("OPENAI_API_KEY")),
            max_steps: parse(&lookup, "AGENT_MAX_STEPS")?.unwrap_or(DEFAULT_MAX_STEPS),
            timeout: parse(&lookup, "AGENT_TIMEOUT_SECS")?.map(Duration::from_secs),
        };

        Ok(Self {
            host: get_or("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT")?.unwrap_or(8000),
            log_level: get_or("LOG_LEVEL", "info"),
            agent,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {}: {}", key, e)))
        })
        .transpose()
}
