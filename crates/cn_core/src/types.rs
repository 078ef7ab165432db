use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::{Error, Result};

/// Upper bound on the number of articles in any report.
pub const MAX_ARTICLES: usize = 10;

pub const NO_TITLE: &str = "No Title";
pub const NO_URL: &str = "#";
pub const NO_DESCRIPTION: &str = "No Description";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyQuery {
    pub company_name: String,
}

impl CompanyQuery {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(Error::Validation("company_name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.company_name.trim()
    }

    /// Free-text query handed to the search tools.
    pub fn search_query(&self) -> String {
        format!("Latest news about {}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_snippet")]
    pub snippet: String,
}

fn default_title() -> String {
    NO_TITLE.to_string()
}

fn default_url() -> String {
    NO_URL.to_string()
}

fn default_snippet() -> String {
    NO_DESCRIPTION.to_string()
}

impl Article {
    /// Builds an article from possibly missing upstream fields. Blank values
    /// count as missing and URLs that are not http(s) collapse to `#`.
    pub fn from_fields(
        title: Option<String>,
        url: Option<String>,
        snippet: Option<String>,
    ) -> Self {
        Self {
            title: non_blank(title).unwrap_or_else(default_title),
            url: non_blank(url)
                .filter(|u| is_web_url(u))
                .unwrap_or_else(default_url),
            snippet: non_blank(snippet).unwrap_or_else(default_snippet),
        }
    }

    pub fn normalized(self) -> Self {
        Self::from_fields(Some(self.title), Some(self.url), Some(self.snippet))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

pub type ArticleCollection = Vec<Article>;

/// Structured response shape the agent is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: ArticleCollection,
}

impl NewsResponse {
    pub const NAME: &'static str = "NewsResponse";

    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "articles": {
                    "type": "array",
                    "maxItems": MAX_ARTICLES,
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "url": { "type": "string" },
                            "snippet": { "type": "string" }
                        },
                        "required": ["title", "url", "snippet"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["articles"],
            "additionalProperties": false
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsReport {
    pub company_name: String,
    pub articles: ArticleCollection,
}

impl NewsReport {
    /// Truncates to [`MAX_ARTICLES`] and normalizes every article.
    pub fn new(company_name: impl Into<String>, articles: ArticleCollection) -> Self {
        Self {
            company_name: company_name.into(),
            articles: articles
                .into_iter()
                .take(MAX_ARTICLES)
                .map(Article::normalized)
                .collect(),
        }
    }
}
