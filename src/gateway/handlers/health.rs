//! 健康检查和 API 信息处理器

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

const SERVICE_NAME: &str = "Cybersecurity Interview Evaluation API";

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    version: &'static str,
}

/// GET /api/health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Cybersecurity Interview Evaluation API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api
pub async fn handle_api_info() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "evaluate": "POST /api/evaluate - Evaluate cybersecurity interview answers",
            "health": "GET /api/health - Health check"
        }
    }))
}
