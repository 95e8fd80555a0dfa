//! 评估 API 处理器

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::evaluation::{Evaluation, EvaluationError, EvaluationRequest};
use crate::gateway::{handlers::error_response, state::AppState};

#[derive(Serialize)]
struct EvaluateResponse<'a> {
    success: bool,
    evaluation: &'a Evaluation,
}

/// POST /api/evaluate 处理器
pub async fn handle_evaluate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let result: Result<Evaluation, EvaluationError> = async {
        let Json(body) = payload.map_err(|r| EvaluationError::InvalidBody(r.body_text()))?;
        let request = EvaluationRequest::from_value(body)?;
        state.evaluator().evaluate(&request).await
    }
    .await;

    match result {
        Ok(evaluation) => Json(EvaluateResponse {
            success: true,
            evaluation: &evaluation,
        })
        .into_response(),
        Err(err) => {
            if matches!(
                err,
                EvaluationError::MissingField(_)
                    | EvaluationError::InvalidField { .. }
                    | EvaluationError::InvalidBody(_)
            ) {
                tracing::info!(code = err.code(), "rejected: {err}");
            }
            error_response(&err)
        }
    }
}
