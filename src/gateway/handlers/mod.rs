//! HTTP 请求处理器

pub mod evaluate;
pub mod health;

pub use evaluate::handle_evaluate;
pub use health::{handle_api_info, handle_health};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::evaluation::EvaluationError;
use crate::providers::ProviderError;
use crate::utils::preview;

/// 错误详情中保留的模型原始输出长度
const RAW_DETAIL_CHARS: usize = 200;

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    details: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
}

/// 错误对应的 HTTP 状态码、提示信息和详情
fn describe(err: &EvaluationError) -> (StatusCode, String, String) {
    match err {
        EvaluationError::MissingField(field) => (
            StatusCode::BAD_REQUEST,
            format!("Missing required field: {field}"),
            format!("The field '{field}' is required for evaluation"),
        ),
        EvaluationError::InvalidField { field, reason } => (
            StatusCode::BAD_REQUEST,
            format!("Invalid field: {field}"),
            reason.clone(),
        ),
        EvaluationError::InvalidBody(reason) => (
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object sent as application/json".to_string(),
            reason.clone(),
        ),
        EvaluationError::MalformedEvaluation { raw, reason } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to parse AI evaluation response".to_string(),
            format!(
                "The AI response was not valid JSON ({reason}): {}",
                preview(raw, RAW_DETAIL_CHARS)
            ),
        ),
        EvaluationError::Provider(ProviderError::RateLimited { .. }) => (
            StatusCode::TOO_MANY_REQUESTS,
            "OpenAI API rate limit exceeded".to_string(),
            "Please try again in a few minutes".to_string(),
        ),
        EvaluationError::Provider(ProviderError::Authentication { .. }) => (
            StatusCode::UNAUTHORIZED,
            "OpenAI API authentication failed".to_string(),
            "Invalid API key or authentication issue".to_string(),
        ),
        EvaluationError::Provider(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to evaluate the answer at this time".to_string(),
            other.to_string(),
        ),
    }
}

fn error_response(err: &EvaluationError) -> axum::response::Response {
    let (status, message, details) = describe(err);
    let body = ErrorResponse {
        success: false,
        error: ErrorDetail {
            code: err.code(),
            message,
            details,
        },
    };
    (status, Json(body)).into_response()
}
