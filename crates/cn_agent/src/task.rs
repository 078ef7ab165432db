use cn_core::{CompanyQuery, NewsResponse};
use cn_search::Tool;
use serde_json::{json, Value};

/// Declared shape the agent's final answer must conform to.
#[derive(Debug, Clone)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: Value,
}

impl ResponseFormat {
    pub fn news() -> Self {
        Self {
            name: NewsResponse::NAME.to_string(),
            schema: NewsResponse::schema(),
        }
    }

    /// `response_format` payload for chat-completions requests.
    pub fn to_request(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    /// Search query for agents that skip planning and hit a tool directly.
    pub query: String,
    pub tools: Vec<Tool>,
    pub response_format: ResponseFormat,
}

impl Task {
    pub fn company_news(query: &CompanyQuery, tools: Vec<Tool>) -> Self {
        Self {
            description: format!("Fetch the latest news about {}.", query.name()),
            query: query.search_query(),
            tools,
            response_format: ResponseFormat::news(),
        }
    }

    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }
}
