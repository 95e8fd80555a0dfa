//! Evaluate 命令 - 离线评估单个请求
//!
//! 从 JSON 文件（或标准输入）读取与 `POST /api/evaluate` 相同的请求体，
//! 直接调用补全服务并打印评估结果，不启动 HTTP 服务器。

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::config::Config;
use crate::evaluation::{EvaluationError, EvaluationRequest, Evaluator};
use crate::providers::OpenAiProvider;

/// 执行评估命令
///
/// # 参数
///
/// * `config` - 应用配置，需要 `OPENAI_API_KEY`
/// * `input` - 请求体 JSON 文件路径，`-` 表示标准输入
///
/// # 返回
///
/// 成功时将 `evaluation` 对象以格式化 JSON 打印到标准输出。
/// 失败时错误信息中带有与 HTTP 接口相同的错误码。
pub async fn evaluate_command(config: Config, input: &Path) -> Result<()> {
    let body = read_request(input).await?;
    let request = EvaluationRequest::from_value(body).map_err(with_code)?;

    let provider = OpenAiProvider::new(config.completion()?)
        .context("Failed to create completion provider")?;
    let evaluator = Evaluator::new(Arc::new(provider));

    let evaluation = evaluator.evaluate(&request).await.map_err(with_code)?;

    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

fn with_code(err: EvaluationError) -> anyhow::Error {
    let code = err.code();
    anyhow::Error::new(err).context(format!("Evaluation failed ({code})"))
}

async fn read_request(input: &Path) -> Result<Value> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content).context("Request file is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_request_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"question": {{"question": "What is XSS?", "answer": ["Script injection"]}},
               "user_answer": "Injecting scripts", "role": "AppSec", "experience_level": "Junior"}}"#
        )
        .unwrap();

        let body = read_request(file.path()).await.unwrap();
        let request = EvaluationRequest::from_value(body).unwrap();
        assert_eq!(request.question.question, "What is XSS?");
        assert_eq!(request.question.category, "");
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "question: nope").unwrap();

        let err = read_request(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_request(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn error_context_carries_code() {
        let err = with_code(EvaluationError::MissingField("role"));
        assert!(err.to_string().contains("MISSING_FIELD"));
        assert!(format!("{err:#}").contains("role"));
    }
}
