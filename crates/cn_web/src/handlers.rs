use std::sync::Arc;

use axum::{extract::State, response::Html, Json};
use cn_core::{CompanyQuery, NewsReport};
use cn_search::company_news_tools;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::AppState;

const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fetches the latest news articles about the given company.
pub async fn get_company_news(
    State(state): State<Arc<AppState>>,
    ValidJson(query): ValidJson<CompanyQuery>,
) -> Result<Json<NewsReport>, ApiError> {
    info!("📰 Fetching news about {} (agent: {})", query.name(), state.agent.name());

    let tools = company_news_tools(&state.client);
    let report = cn_agent::company_news(state.agent.as_ref(), &query, tools).await?;

    info!("✨ Returning {} articles about {}", report.articles.len(), query.name());
    Ok(Json(report))
}
