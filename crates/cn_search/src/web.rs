use std::fmt;

use async_trait::async_trait;
use cn_core::{Article, ArticleCollection, Error, Result, MAX_ARTICLES};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::tools::SearchTool;

const SERVICE: &str = "DuckDuckGo";

pub const DUCKDUCKGO_ENDPOINT: &str = "https://api.duckduckgo.com/";

#[derive(Deserialize, Default)]
struct InstantAnswer {
    #[serde(rename = "Results", default)]
    results: Vec<Topic>,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<Topic>,
}

#[derive(Deserialize)]
struct Topic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Vec<Topic>,
}

/// General purpose web lookup through the keyless DuckDuckGo instant answer API.
#[derive(Clone)]
pub struct WebSearch {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for WebSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSearch")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl WebSearch {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: DUCKDUCKGO_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn search(&self, query: &str) -> Result<ArticleCollection> {
        debug!("Searching DuckDuckGo for {:?}", query);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("DuckDuckGo returned {}: {}", status, body);
            return Err(Error::Upstream { service: SERVICE, body });
        }

        // The API answers with an empty body for queries it has nothing on.
        let answer: InstantAnswer = if body.trim().is_empty() {
            InstantAnswer::default()
        } else {
            serde_json::from_str(&body)?
        };

        let mut articles = Vec::new();
        for topic in answer.results.into_iter().chain(answer.related_topics) {
            flatten(topic, &mut articles);
        }
        articles.truncate(MAX_ARTICLES);
        Ok(articles)
    }
}

fn flatten(topic: Topic, out: &mut ArticleCollection) {
    if out.len() >= MAX_ARTICLES {
        return;
    }
    if !topic.topics.is_empty() {
        for nested in topic.topics {
            flatten(nested, out);
        }
        return;
    }
    let title = topic
        .text
        .as_deref()
        .map(|text| text.split(" - ").next().unwrap_or(text).to_string());
    out.push(Article::from_fields(title, topic.first_url, topic.text));
}

#[async_trait]
impl SearchTool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for general information about a query."
    }

    async fn search(&self, query: &str) -> Result<ArticleCollection> {
        WebSearch::search(self, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_flattens_nested_topics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Acme"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Results": [
                    { "Text": "Acme - Official site", "FirstURL": "https://acme.com" }
                ],
                "RelatedTopics": [
                    {
                        "Text": "Acme Corp - Fictional company",
                        "FirstURL": "https://duckduckgo.com/Acme_Corp"
                    },
                    {
                        "Name": "Products",
                        "Topics": [
                            { "Text": "Anvil", "FirstURL": "https://duckduckgo.com/Anvil" }
                        ]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let search = WebSearch::new(Client::new()).with_endpoint(server.uri());
        let articles = search.search("Acme").await.unwrap();

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Acme");
        assert_eq!(articles[0].snippet, "Acme - Official site");
        assert_eq!(articles[1].title, "Acme Corp");
        assert_eq!(articles[2].url, "https://duckduckgo.com/Anvil");
    }

    #[tokio::test]
    async fn test_caps_results() {
        let topics: Vec<_> = (0..15)
            .map(|i| {
                json!({
                    "Text": format!("Topic {}", i),
                    "FirstURL": format!("https://duckduckgo.com/{}", i)
                })
            })
            .collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "RelatedTopics": topics })),
            )
            .mount(&server)
            .await;

        let search = WebSearch::new(Client::new()).with_endpoint(server.uri());
        let articles = search.search("Acme").await.unwrap();
        assert_eq!(articles.len(), MAX_ARTICLES);
        assert_eq!(articles[9].title, "Topic 9");
    }

    #[tokio::test]
    async fn test_empty_body_yields_no_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let search = WebSearch::new(Client::new()).with_endpoint(server.uri());
        assert!(search.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let search = WebSearch::new(Client::new()).with_endpoint(server.uri());
        match search.search("Acme").await {
            Err(err @ Error::Upstream { .. }) => {
                let detail = err.to_string();
                assert_eq!(detail, "DuckDuckGo request failed: boom");
                assert!(!detail.contains("SerpAPI"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
