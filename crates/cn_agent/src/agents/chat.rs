use std::fmt;

use async_trait::async_trait;
use cn_core::{Error, Result};
use cn_search::Tool;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::Agent;
use crate::task::Task;
use crate::AgentConfig;

const SYSTEM_PROMPT: &str = "You are a company news analyst. Use the provided tools to look up \
recent news articles and answer only with JSON matching the requested schema. \
Only report articles returned by the tools; never invent titles or URLs.";

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [Value],
    response_format: Value,
}

fn no_tools(tools: &&[Value]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Agent backed by an OpenAI-compatible chat-completions endpoint with
/// function calling.
pub struct ChatAgent {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_steps: usize,
}

impl fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatAgent")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

impl ChatAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("Agent API key is required".to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            max_steps: config.max_steps.max(1),
        })
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
        task: &Task,
    ) -> Result<ChatMessage> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            tools,
            response_format: task.response_format.to_request(),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::Agent(format!("{} returned {}: {}", self.model, status, body)));
        }

        response
            .json::<ChatResponse>()
            .await?
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::Agent("completion returned no choices".to_string()))
    }

    async fn run_tool(&self, task: &Task, call: &ToolCall) -> Result<Value> {
        let name = &call.function.name;
        let tool = task
            .tool(name)
            .ok_or_else(|| Error::Agent(format!("unknown tool: {}", name)))?;

        let raw = if call.function.arguments.trim().is_empty() {
            "{}"
        } else {
            call.function.arguments.as_str()
        };
        let arguments: Value = serde_json::from_str(raw)
            .map_err(|e| Error::Agent(format!("invalid arguments for {}: {}", name, e)))?;

        tool.call(&arguments).await
    }
}

/// Bad calls and generic web search failures go back to the model as tool
/// output. News search failures end the task.
fn reported_to_model(task: &Task, call: &ToolCall, err: &Error) -> bool {
    matches!(err, Error::Agent(_))
        || matches!(task.tool(&call.function.name), Some(Tool::WebSearch(_)))
}

/// Extracts the structured answer from the final assistant message.
fn parse_structured(content: Option<&str>) -> Option<Value> {
    let content = content?.trim();
    let content = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .and_then(|body| body.strip_suffix("```"))
        .unwrap_or(content)
        .trim();

    if content.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!("Model answered with JSON that is not an object");
            None
        }
        Err(e) => {
            warn!("Model answer is not valid JSON: {}", e);
            None
        }
    }
}

#[async_trait]
impl Agent for ChatAgent {
    fn name(&self) -> &str {
        &self.model
    }

    async fn execute(&self, task: &Task) -> Result<Option<Value>> {
        let tools: Vec<Value> = task.tools.iter().map(|tool| tool.definition()).collect();
        let mut messages = vec![
            ChatMessage::text("system", SYSTEM_PROMPT),
            ChatMessage::text("user", task.description.clone()),
        ];

        for step in 1..=self.max_steps {
            let message = self.complete(&messages, &tools, task).await?;
            let calls = message.tool_calls.clone().unwrap_or_default();

            if calls.is_empty() {
                debug!("[step {}] model produced its answer", step);
                return Ok(parse_structured(message.content.as_deref()));
            }

            info!("[step {}] model requested {} tool call(s)", step, calls.len());
            messages.push(message);

            for call in &calls {
                let output = match self.run_tool(task, call).await {
                    Ok(value) => value.to_string(),
                    Err(e) if reported_to_model(task, call, &e) => {
                        let message = e.to_string();
                        warn!("[step {}] {}", step, message);
                        json!({ "error": message }).to_string()
                    }
                    Err(e) => return Err(e),
                };
                messages.push(ChatMessage::tool_result(&call.id, output));
            }
        }

        warn!("Model did not answer within {} steps", self.max_steps);
        Ok(None)
    }
}
