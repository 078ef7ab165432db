use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use cn_core::{Error, Result};
use serde_json::Value;

use crate::task::Task;
use crate::AgentConfig;

pub mod chat;
pub mod direct;

pub use chat::ChatAgent;
pub use direct::DirectAgent;

/// Executes a task, optionally calling the task's tools, and returns a value
/// shaped like the task's response format. `None` means the agent gave up
/// without producing an answer.
///
/// Implementations keep no per-task state, so one instance is shared by all
/// concurrent requests.
#[async_trait]
pub trait Agent: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn execute(&self, task: &Task) -> Result<Option<Value>>;
}

pub fn create_agent(config: AgentConfig) -> Result<Arc<dyn Agent>> {
    match config.kind.as_str() {
        "llm" => Ok(Arc::new(ChatAgent::new(config)?)),
        "direct" => Ok(Arc::new(DirectAgent::new())),
        other => Err(Error::Config(format!(
            "Unknown agent kind '{}'. Available agents: llm, direct",
            other
        ))),
    }
}
