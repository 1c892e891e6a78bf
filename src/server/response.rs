use crate::feed::FeedError;
use crate::pipeline::Headline;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON envelope shared by every endpoint.
///
/// Serializes as `{"status": "success", "headlines": [...]}` or
/// `{"status": "error", "message": "..."}`. `serde_json` writes non-ASCII
/// text as raw UTF-8.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Success { headlines: Vec<Headline> },
    Error { message: String },
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse::Error {
            message: message.into(),
        }
    }
}

/// A pipeline failure on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub FeedError);

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Origin-side and client-side failures are both reported as 400
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(self.0.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::Sentiment;

    #[test]
    fn test_success_shape() {
        let body = ApiResponse::Success {
            headlines: vec![Headline {
                title: "Markets rally".into(),
                sentiment: Sentiment::Positive,
            }],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"success","headlines":[{"title":"Markets rally","sentiment":"positive"}]}"#
        );
    }

    #[test]
    fn test_error_shape() {
        let body = ApiResponse::error("No channel element found in RSS feed.");
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"error","message":"No channel element found in RSS feed."}"#
        );
    }

    #[test]
    fn test_non_ascii_not_escaped() {
        let body = ApiResponse::Success {
            headlines: vec![Headline {
                title: "Économie: 経済".into(),
                sentiment: Sentiment::Neutral,
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("Économie: 経済"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_api_error_is_bad_request() {
        let response = ApiError(FeedError::HttpStatus(503)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
