//! 模型输出归一化
//!
//! 去掉可选的 Markdown 代码块包裹，解析为 [`EvaluationResult`]。
//! 缺失的子字段使用空值，多余字段忽略。

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{EvaluationError, EvaluationResult, Feedback};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// 去掉首尾的代码块标记，保留内部内容
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = match trimmed
        .strip_prefix(JSON_FENCE)
        .or_else(|| trimmed.strip_prefix(FENCE))
    {
        Some(rest) => rest,
        None => return trimmed,
    };
    inner.strip_suffix(FENCE).unwrap_or(inner).trim()
}

/// 将模型原始输出解析为评估结果
///
/// # 错误
///
/// 文本不是 JSON 对象时返回 [`EvaluationError::MalformedEvaluation`]，
/// 其中带有原始文本。
pub fn parse_evaluation(raw: &str) -> Result<EvaluationResult, EvaluationError> {
    let malformed = |reason: String| EvaluationError::MalformedEvaluation {
        raw: raw.to_string(),
        reason,
    };

    let value: Value =
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(mut record) = value else {
        return Err(malformed("expected a JSON object".to_string()));
    };

    Ok(EvaluationResult {
        overall_score: record
            .get("overall_score")
            .and_then(score_from_value)
            .unwrap_or(0),
        breakdown: read_breakdown(record.remove("breakdown")),
        feedback: read_feedback(record.remove("feedback")),
        expert_reference: text_list(record.remove("expert_reference")),
    })
}

/// 整数原样返回，浮点数四舍五入，数字字符串会被解析
fn score_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_finite)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(round_finite))
        }
        _ => None,
    }
}

fn round_finite(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.round() as i64)
}

fn read_breakdown(value: Option<Value>) -> BTreeMap<String, i64> {
    let Some(Value::Object(entries)) = value else {
        return BTreeMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(name, score)| match score_from_value(&score) {
            Some(score) => Some((name, score)),
            None => {
                tracing::debug!(name = %name, "skipping non-numeric breakdown entry");
                None
            }
        })
        .collect()
}

fn read_feedback(value: Option<Value>) -> Feedback {
    let Some(Value::Object(mut map)) = value else {
        return Feedback::default();
    };
    Feedback {
        strengths: take_list(&mut map, "strengths"),
        improvements: take_list(&mut map, "improvements"),
        specific_suggestions: take_list(&mut map, "specific_suggestions"),
    }
}

fn take_list(map: &mut Map<String, Value>, key: &str) -> Vec<String> {
    text_list(map.remove(key))
}

/// 字符串数组；单个字符串视为一个元素，非字符串元素保留其 JSON 文本
pub(crate) fn text_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.into_iter().map(item_text).collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    }
}

pub(crate) fn item_text(item: Value) -> String {
    match item {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
