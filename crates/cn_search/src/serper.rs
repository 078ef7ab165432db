use std::fmt;

use async_trait::async_trait;
use cn_core::{Article, ArticleCollection, Error, Result, MAX_ARTICLES};
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::tools::SearchTool;

const SERVICE: &str = "SerpAPI";

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// Environment variable holding the Serper API key.
pub const API_KEY_VAR: &str = "SERPAPI_API_KEY";

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

/// News search backed by the Serper Google search API.
///
/// The API key is looked up in the process environment on every call, so a
/// key added or rotated while the server runs takes effect on the next
/// request.
#[derive(Clone)]
pub struct SerperSearch {
    client: Client,
    endpoint: String,
    key_var: String,
}

impl fmt::Debug for SerperSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperSearch")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("key_var", &self.key_var)
            .finish()
    }
}

impl SerperSearch {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: SERPER_ENDPOINT.to_string(),
            key_var: API_KEY_VAR.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_key_var(mut self, key_var: impl Into<String>) -> Self {
        self.key_var = key_var.into();
        self
    }

    fn api_key(&self) -> Result<String> {
        std::env::var(&self.key_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("SerpAPI API key not found".to_string()))
    }

    pub async fn search(&self, query: &str) -> Result<ArticleCollection> {
        let api_key = self.api_key()?;

        debug!("Searching Serper for {:?}", query);
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&SearchRequest { q: query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!("Serper returned {}: {}", status, body);
            return Err(Error::Upstream { service: SERVICE, body });
        }

        let data = response.json::<SearchResponse>().await?;
        let articles: ArticleCollection = data
            .organic
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|hit| Article::from_fields(hit.title, hit.link, hit.snippet))
            .collect();

        debug!("Serper returned {} articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl SearchTool for SerperSearch {
    fn name(&self) -> &str {
        "company_news_search"
    }

    fn description(&self) -> &str {
        "Fetch the latest news articles for a query using Google search results. \
         Returns up to 10 articles with title, url and snippet."
    }

    async fn search(&self, query: &str) -> Result<ArticleCollection> {
        SerperSearch::search(self, query).await
    }
}
