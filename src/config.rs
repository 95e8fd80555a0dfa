//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - 补全服务（OpenAI 兼容接口）的密钥、模型与采样参数

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// 原部署使用的 env 文件
const PRODUCTION_ENV_FILE: &str = ".env.production";

/// 加载 env 文件（如果存在），已存在的进程环境变量优先
pub fn load_env_file() {
    if let Ok(path) = std::env::var("EVAL_ENV_FILE") {
        dotenvy::from_path(&path).ok();
        return;
    }
    if Path::new(PRODUCTION_ENV_FILE).exists() {
        dotenvy::from_path(PRODUCTION_ENV_FILE).ok();
    }
    dotenvy::dotenv().ok();
}

/// 补全服务配置
///
/// 在构造时注入到 [`crate::providers::OpenAiProvider`]，之后不再读取环境变量。
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// 应用配置
#[derive(Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 补全服务密钥，`test` 命令不需要
    api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `EVAL_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `EVAL_PORT`: 服务器监听端口（默认: 5000）
    /// - `OPENAI_API_KEY`: 补全服务密钥（`serve` / `evaluate` **必需**）
    /// - `OPENAI_BASE_URL`, `OPENAI_MODEL`, `OPENAI_TEMPERATURE`,
    ///   `OPENAI_MAX_TOKENS`, `OPENAI_TIMEOUT_SECS`: 可选的补全参数
    ///
    /// # 错误
    ///
    /// - 如果任一数值变量无法解析
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("EVAL_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "EVAL_PORT", 5000u16)?;

        let api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        let base_url = lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let temperature = parse_or(&lookup, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        let max_tokens = parse_or(&lookup, "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let timeout_secs = parse_or(&lookup, "OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            host,
            port,
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// 构造补全服务配置
    ///
    /// # 错误
    ///
    /// - 如果 `OPENAI_API_KEY` 未设置
    pub fn completion(&self) -> Result<CompletionConfig> {
        let api_key = self
            .api_key
            .clone()
            .context("OPENAI_API_KEY environment variable is required")?;

        Ok(CompletionConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
            ..CompletionConfig::new(api_key).with_base_url(self.base_url.as_str())
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid value, got {raw:?}")),
        None => Ok(default),
    }
}
