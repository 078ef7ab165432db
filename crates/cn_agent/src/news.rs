use cn_core::{CompanyQuery, Error, NewsReport, NewsResponse, Result};
use cn_search::Tool;
use tracing::debug;

use crate::agents::Agent;
use crate::task::Task;

/// Runs the company news task and turns the agent's answer into a report.
///
/// An agent that gives up yields [`Error::EmptyResult`]; an answer that does
/// not fit [`NewsResponse`] yields [`Error::Agent`].
pub async fn company_news(
    agent: &dyn Agent,
    query: &CompanyQuery,
    tools: Vec<Tool>,
) -> Result<NewsReport> {
    let task = Task::company_news(query, tools);
    let value = agent.execute(&task).await?.ok_or(Error::EmptyResult)?;
    debug!("{} answered: {}", agent.name(), value);

    let response: NewsResponse = serde_json::from_value(value).map_err(|e| {
        Error::Agent(format!("answer does not match {}: {}", NewsResponse::NAME, e))
    })?;

    Ok(NewsReport::new(query.company_name.clone(), response.articles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::DirectAgent;
    use cn_core::NO_URL;
    use cn_search::SerperSearch;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_report_from_direct_agent() {
        std::env::set_var("CN_TEST_NEWS_KEY", "secret");
        let results: Vec<_> = (0..12)
            .map(|i| json!({ "title": format!("Story {}", i), "snippet": "s" }))
            .collect();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "organic": results })))
            .mount(&server)
            .await;

        let tools = vec![Tool::NewsSearch(
            SerperSearch::new(Client::new())
                .with_endpoint(server.uri())
                .with_key_var("CN_TEST_NEWS_KEY"),
        )];
        let report = company_news(&DirectAgent::new(), &CompanyQuery::new("Acme"), tools)
            .await
            .unwrap();

        assert_eq!(report.company_name, "Acme");
        assert_eq!(report.articles.len(), 10);
        assert!(report.articles.iter().all(|a| a.url == NO_URL));
    }

    #[tokio::test]
    async fn test_no_answer_is_empty_result() {
        let result = company_news(&DirectAgent::new(), &CompanyQuery::new("Acme"), vec![]).await;
        assert!(matches!(result, Err(Error::EmptyResult)));
    }
}
