use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Config(String),

    #[error("{service} request failed: {body}")]
    Upstream { service: &'static str, body: String },

    #[error("Failed to fetch company news.")]
    EmptyResult,

    #[error("{0}")]
    Validation(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_keeps_body() {
        let err = Error::Upstream {
            service: "SerpAPI",
            body: "{\"message\":\"quota exceeded\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "SerpAPI request failed: {\"message\":\"quota exceeded\"}"
        );
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(Error::EmptyResult.to_string(), "Failed to fetch company news.");
    }
}
