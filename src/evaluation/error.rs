//! 评估流程错误类型

use crate::providers::ProviderError;

/// 评估流程错误
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// 请求缺少必需字段（`null` 视为缺失）
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// 请求体不是 JSON 对象
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// 模型输出无法解析为评估结果，`raw` 保留原始文本用于诊断
    #[error("model output is not a valid evaluation: {reason}")]
    MalformedEvaluation { raw: String, reason: String },
}

impl EvaluationError {
    /// 对外暴露的错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::InvalidBody(_) => "INVALID_REQUEST_BODY",
            Self::MalformedEvaluation { .. } => "INVALID_AI_RESPONSE",
            Self::Provider(ProviderError::RateLimited { .. }) => "RATE_LIMIT_EXCEEDED",
            Self::Provider(ProviderError::Authentication { .. }) => "AUTHENTICATION_ERROR",
            Self::Provider(_) => "EVALUATION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_have_distinct_codes() {
        let auth = EvaluationError::from(ProviderError::Authentication {
            message: "bad key".into(),
        });
        let limited = EvaluationError::from(ProviderError::RateLimited {
            message: "slow".into(),
        });
        let other = EvaluationError::from(ProviderError::InvalidResponse("empty".into()));

        assert_eq!(auth.code(), "AUTHENTICATION_ERROR");
        assert_eq!(limited.code(), "RATE_LIMIT_EXCEEDED");
        assert_eq!(other.code(), "EVALUATION_FAILED");
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = EvaluationError::MissingField("role");
        assert_eq!(err.code(), "MISSING_FIELD");
        assert_eq!(err.to_string(), "Missing required field: role");
    }
}
