use std::any::Any;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use super::params::ErrorBody;
use crate::answer::PipelineError;

/// A failed request: status code plus the `detail` string shown to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let status = match &e {
            PipelineError::EmptyQuery => StatusCode::BAD_REQUEST,
            PipelineError::NoResults => StatusCode::NOT_FOUND,
            PipelineError::Search(_) | PipelineError::Answer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!(error = %e, "search request failed");
        } else {
            warn!(error = %e, "search request rejected");
        }
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "malformed request body");
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// Last-resort handler: a panic anywhere below the router still yields a `detail` body.
pub(super) fn panic_to_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unexpected internal error".to_string()
    };
    error!(%message, "handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkup::LinkupError;
    use crate::openai::OpenAiError;

    #[test]
    fn empty_query_is_bad_request() {
        let err = ApiError::from(PipelineError::EmptyQuery);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_results_is_not_found() {
        let err = ApiError::from(PipelineError::NoResults);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "No search results found");
    }

    #[test]
    fn provider_failures_are_internal_errors() {
        let search = ApiError::from(PipelineError::Search(LinkupError::Api {
            code: 401,
            message: "HTTP 401 Unauthorized: bad key".into(),
        }));
        assert_eq!(search.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(search.detail.contains("bad key"), "got: {}", search.detail);

        let answer = ApiError::from(PipelineError::Answer(OpenAiError::EmptyCompletion));
        assert_eq!(answer.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(answer.detail.starts_with("OpenAI processing error"));
    }

    #[test]
    fn panic_payload_becomes_detail() {
        let response = panic_to_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_to_response(Box::new(String::from("owned boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_to_response(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
