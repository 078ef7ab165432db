use async_trait::async_trait;
use cn_core::Result;
use cn_search::Tool;
use serde_json::{json, Value};
use tracing::debug;

use super::Agent;
use crate::task::Task;

/// Runs the task's news search once with the task query. No model involved.
#[derive(Debug, Default)]
pub struct DirectAgent;

impl DirectAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for DirectAgent {
    fn name(&self) -> &str {
        "Direct"
    }

    async fn execute(&self, task: &Task) -> Result<Option<Value>> {
        let tool = task
            .tools
            .iter()
            .find(|tool| matches!(tool, Tool::NewsSearch(_)))
            .or_else(|| task.tools.first());

        let Some(tool) = tool else {
            debug!("Task has no tools, nothing to run");
            return Ok(None);
        };

        debug!("Running {} for {:?}", tool.name(), task.query);
        let articles = tool.search(&task.query).await?;
        Ok(Some(json!({ "articles": articles })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cn_core::{CompanyQuery, Error};
    use cn_search::{SerperSearch, WebSearch};
    use reqwest::Client;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_prefers_news_search() {
        std::env::set_var("CN_TEST_DIRECT_KEY", "secret");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "q": "Latest news about Acme" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [{
                    "title": "Acme IPO",
                    "link": "https://acme.com/ipo",
                    "snippet": "Big day"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let tools = vec![
            Tool::WebSearch(WebSearch::new(client.clone()).with_endpoint("http://127.0.0.1:9")),
            Tool::NewsSearch(
                SerperSearch::new(client)
                    .with_endpoint(server.uri())
                    .with_key_var("CN_TEST_DIRECT_KEY"),
            ),
        ];
        let task = Task::company_news(&CompanyQuery::new("Acme"), tools);

        let value = DirectAgent::new().execute(&task).await.unwrap().unwrap();
        assert_eq!(value["articles"][0]["title"], "Acme IPO");
    }

    #[tokio::test]
    async fn test_no_tools_is_no_answer() {
        let task = Task::company_news(&CompanyQuery::new("Acme"), vec![]);
        assert!(DirectAgent::new().execute(&task).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tool_errors_propagate() {
        std::env::remove_var("CN_TEST_DIRECT_MISSING_KEY");
        let tools = vec![Tool::NewsSearch(
            SerperSearch::new(Client::new()).with_key_var("CN_TEST_DIRECT_MISSING_KEY"),
        )];
        let task = Task::company_news(&CompanyQuery::new("Acme"), tools);

        let result = DirectAgent::new().execute(&task).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
