use async_trait::async_trait;
use cn_core::{ArticleCollection, Error, Result};
use reqwest::Client;
use serde_json::{json, Value};

use crate::serper::SerperSearch;
use crate::web::WebSearch;

/// A search capability the agent may invoke while executing a task.
#[async_trait]
pub trait SearchTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the call arguments.
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn search(&self, query: &str) -> Result<ArticleCollection>;
}

/// The closed set of tools an agent can be granted.
#[derive(Debug, Clone)]
pub enum Tool {
    WebSearch(WebSearch),
    NewsSearch(SerperSearch),
}

impl Tool {
    pub fn name(&self) -> &str {
        match self {
            Tool::WebSearch(t) => t.name(),
            Tool::NewsSearch(t) => t.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Tool::WebSearch(t) => t.description(),
            Tool::NewsSearch(t) => t.description(),
        }
    }

    pub fn parameters(&self) -> Value {
        match self {
            Tool::WebSearch(t) => t.parameters(),
            Tool::NewsSearch(t) => t.parameters(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<ArticleCollection> {
        match self {
            Tool::WebSearch(t) => t.search(query).await,
            Tool::NewsSearch(t) => t.search(query).await,
        }
    }

    /// Function declaration in the chat-completions `tools` format.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters()
            }
        })
    }

    /// Runs the tool with model-supplied arguments and returns the articles as JSON.
    pub async fn call(&self, arguments: &Value) -> Result<Value> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::Agent(format!("{} called without a query", self.name())))?;

        let articles = self.search(query).await?;
        Ok(serde_json::to_value(articles)?)
    }
}

/// Tools granted to the company news task.
pub fn company_news_tools(client: &Client) -> Vec<Tool> {
    vec![
        Tool::WebSearch(WebSearch::new(client.clone())),
        Tool::NewsSearch(SerperSearch::new(client.clone())),
    ]
}
