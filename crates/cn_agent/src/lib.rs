use std::fmt;
use std::time::Duration;

pub mod agents;
pub mod news;
pub mod task;

pub use agents::{create_agent, Agent};
pub use news::company_news;
pub use task::{ResponseFormat, Task};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_STEPS: usize = 6;

#[derive(Clone)]
pub struct AgentConfig {
    /// `llm` or `direct`.
    pub kind: String,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_steps: usize,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("max_steps", &self.max_steps)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: "llm".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_steps: DEFAULT_MAX_STEPS,
            timeout: None,
        }
    }
}
