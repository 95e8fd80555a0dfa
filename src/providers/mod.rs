//! Provider 抽象层
//!
//! 定义补全服务的统一接口：输入一组带角色的消息，返回一段补全文本

pub mod openai;

use async_trait::async_trait;
use serde::Serialize;

pub use openai::OpenAiProvider;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// 带角色的对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 补全服务错误
///
/// 认证失败、限流和其他失败是可区分的错误类型，由调用方决定如何上报。
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// 401 / 403
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// 429
    #[error("rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("provider returned {status}: {message}")]
    Api {
        status: http::StatusCode,
        message: String,
    },

    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// 用于日志的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::RateLimited { .. } => "rate_limit",
            Self::Api { .. } => "api",
            Self::Transport(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Provider Trait - 补全服务的统一接口
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// 模型名称（用于日志）
    fn model(&self) -> &str;

    /// 发送消息，返回唯一一条补全的文本内容
    ///
    /// 每次调用只发出一个网络请求，不重试、不缓存。
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}
