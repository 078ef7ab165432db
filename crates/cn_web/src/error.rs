use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cn_core::Error;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = self.0.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", detail);
        } else {
            tracing::debug!("Rejected request: {}", detail);
        }

        let body = serde_json::json!({ "detail": detail });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = ApiError(Error::Validation("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ApiError(Error::Config("missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(Error::Upstream {
            service: "SerpAPI",
            body: "down".into(),
        }).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(Error::EmptyResult).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
