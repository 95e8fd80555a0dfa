//! 面试回答评估
//!
//! 数据流：请求字段 → Prompt 构建 → 补全服务 → 输出归一化 → XP 计算

mod error;
pub mod normalize;
pub mod prompt;
pub mod xp;

pub use error::EvaluationError;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::providers::{ChatMessage, CompletionProvider};
use crate::utils::preview;

/// 请求中必需的字段，按校验顺序排列
pub const REQUIRED_FIELDS: [&str; 4] = ["question", "user_answer", "role", "experience_level"];

/// 诊断日志中保留的原始输出长度
const RAW_PREVIEW_CHARS: usize = 200;

/// 题目记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub category: String,
    /// 专家参考答案片段，保持顺序
    pub answer: Vec<String>,
}

impl QuestionRecord {
    /// 宽松读取题目对象
    ///
    /// `question` / `category` 缺失或为 `null` 时为空字符串，
    /// `answer` 与模型输出中的列表按同样规则读取。
    fn from_value(value: Value) -> Result<Self, EvaluationError> {
        let mut record = match value {
            Value::Object(record) => record,
            other => {
                return Err(EvaluationError::InvalidField {
                    field: "question",
                    reason: format!("expected an object, got {}", json_type(&other)),
                })
            }
        };

        Ok(Self {
            question: optional_text(record.remove("question")),
            category: optional_text(record.remove("category")),
            answer: normalize::text_list(record.remove("answer")),
        })
    }
}

fn optional_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(other) => normalize::item_text(other),
    }
}

/// 评估请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub question: QuestionRecord,
    pub user_answer: String,
    pub role: String,
    pub experience_level: String,
}

impl EvaluationRequest {
    /// 从 JSON 请求体构建并校验请求
    ///
    /// 按 [`REQUIRED_FIELDS`] 的顺序检查字段是否存在，`null` 视为缺失。
    pub fn from_value(body: Value) -> Result<Self, EvaluationError> {
        let Value::Object(mut fields) = body else {
            return Err(EvaluationError::InvalidBody(
                "request body must be a JSON object".to_string(),
            ));
        };

        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|name| fields.get(**name).map_or(true, Value::is_null))
        {
            return Err(EvaluationError::MissingField(*missing));
        }

        let question = QuestionRecord::from_value(take_field(&mut fields, "question")?)?;

        Ok(Self {
            question,
            user_answer: take_text(&mut fields, "user_answer")?,
            role: take_text(&mut fields, "role")?,
            experience_level: take_text(&mut fields, "experience_level")?,
        })
    }
}

fn take_field(fields: &mut Map<String, Value>, name: &'static str) -> Result<Value, EvaluationError> {
    fields
        .remove(name)
        .ok_or(EvaluationError::MissingField(name))
}

fn take_text(fields: &mut Map<String, Value>, name: &'static str) -> Result<String, EvaluationError> {
    match take_field(fields, name)? {
        Value::String(s) => Ok(s),
        other => Err(EvaluationError::InvalidField {
            field: name,
            reason: format!("expected a string, got {}", json_type(&other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 文字反馈
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub specific_suggestions: Vec<String>,
}

/// 模型给出的评估结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    /// 不做范围校验
    pub overall_score: i64,
    pub breakdown: BTreeMap<String, i64>,
    pub feedback: Feedback,
    pub expert_reference: Vec<String>,
}

/// 评估结果 + XP，作为响应中的 `evaluation` 对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub xp_earned: u32,
}

impl From<EvaluationResult> for Evaluation {
    fn from(result: EvaluationResult) -> Self {
        let xp_earned = xp::xp_for_score(result.overall_score);
        Self { result, xp_earned }
    }
}

/// 评估器
///
/// 无共享可变状态，可在并发请求间共享。
#[derive(Clone)]
pub struct Evaluator {
    provider: Arc<dyn CompletionProvider>,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        let prompt = prompt::build_evaluation_prompt(
            &request.question,
            &request.user_answer,
            &request.role,
            &request.experience_level,
        );
        let messages = [
            ChatMessage::system(prompt::SYSTEM_INSTRUCTION),
            ChatMessage::user(prompt),
        ];

        let model = self.provider.model();
        tracing::info!(model, role = %request.role, category = %request.question.category, "evaluating");

        let raw = match self.provider.complete(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(model, kind = e.kind(), "completion failed: {e}");
                return Err(e.into());
            }
        };

        let result = match normalize::parse_evaluation(&raw) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    model,
                    raw = %preview(&raw, RAW_PREVIEW_CHARS),
                    "{e}"
                );
                return Err(e);
            }
        };

        let evaluation = Evaluation::from(result);
        tracing::info!(
            model,
            overall_score = evaluation.result.overall_score,
            xp = evaluation.xp_earned,
            "evaluated"
        );
        Ok(evaluation)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::providers::{ProviderError, Role};
    use serde_json::json;

    fn request_body() -> Value {
        json!({
            "question": {
                "question": "What is a SIEM?",
                "category": "Security Operations",
                "answer": ["Aggregates logs", "Correlates events"]
            },
            "user_answer": "A SIEM collects and correlates logs.",
            "role": "SOC Analyst",
            "experience_level": "Junior"
        })
    }

    #[test]
    fn from_value_accepts_complete_request() {
        let request = EvaluationRequest::from_value(request_body()).unwrap();
        assert_eq!(request.question.answer.len(), 2);
        assert_eq!(request.role, "SOC Analyst");
    }

    #[test]
    fn from_value_reports_first_missing_field() {
        let mut body = request_body();
        body.as_object_mut().unwrap().remove("role");
        body.as_object_mut().unwrap().remove("experience_level");

        let err = EvaluationRequest::from_value(body).unwrap_err();
        assert!(matches!(err, EvaluationError::MissingField("role")));
    }

    #[test]
    fn from_value_treats_null_as_missing() {
        let mut body = request_body();
        body["user_answer"] = Value::Null;

        let err = EvaluationRequest::from_value(body).unwrap_err();
        assert!(matches!(err, EvaluationError::MissingField("user_answer")));
    }

    #[test]
    fn from_value_defaults_question_sub_fields() {
        let mut body = request_body();
        body["question"] = json!({});

        let request = EvaluationRequest::from_value(body).unwrap();
        assert_eq!(request.question, QuestionRecord::default());
    }

    #[test]
    fn from_value_accepts_null_question_sub_fields() {
        let mut body = request_body();
        body["question"] = json!({"question": "Q", "category": null, "answer": ["a"]});

        let request = EvaluationRequest::from_value(body).unwrap();
        assert_eq!(request.question.question, "Q");
        assert_eq!(request.question.category, "");
        assert_eq!(request.question.answer, vec!["a"]);
    }

    #[test]
    fn from_value_renders_non_string_answer_fragments() {
        let mut body = request_body();
        body["question"]["answer"] = json!(["a", {"step": 2}, 3]);

        let request = EvaluationRequest::from_value(body).unwrap();
        assert_eq!(request.question.answer, vec!["a", r#"{"step":2}"#, "3"]);
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let mut body = request_body();
        body["role"] = json!(3);
        let err = EvaluationRequest::from_value(body).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidField { field: "role", .. }));

        let mut body = request_body();
        body["question"] = json!("just text");
        let err = EvaluationRequest::from_value(body).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidField { field: "question", .. }));

        let err = EvaluationRequest::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn evaluate_sends_system_and_user_messages() {
        let provider = Arc::new(FakeProvider::replying(
            "```json\n{\"overall_score\": 82, \"breakdown\": {\"coverage_score\": 25}}\n```",
        ));
        let evaluator = Evaluator::new(provider.clone());
        let request = EvaluationRequest::from_value(request_body()).unwrap();

        let evaluation = evaluator.evaluate(&request).await.unwrap();
        assert_eq!(evaluation.result.overall_score, 82);
        assert_eq!(evaluation.xp_earned, 30);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let messages = &seen[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, prompt::SYSTEM_INSTRUCTION);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("A SIEM collects and correlates logs."));
    }

    #[tokio::test]
    async fn evaluate_surfaces_provider_errors() {
        let provider = Arc::new(FakeProvider::with(|| {
            Err(ProviderError::RateLimited {
                message: "quota".into(),
            })
        }));
        let evaluator = Evaluator::new(provider);
        let request = EvaluationRequest::from_value(request_body()).unwrap();

        let err = evaluator.evaluate(&request).await.unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");
    }

    #[tokio::test]
    async fn evaluate_surfaces_malformed_output() {
        let evaluator = Evaluator::new(Arc::new(FakeProvider::replying("not json at all")));
        let request = EvaluationRequest::from_value(request_body()).unwrap();

        let err = evaluator.evaluate(&request).await.unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::MalformedEvaluation { ref raw, .. } if raw == "not json at all"
        ));
    }

    #[test]
    fn evaluation_serializes_flat_with_xp() {
        let evaluation = Evaluation::from(EvaluationResult {
            overall_score: 91,
            ..Default::default()
        });
        let value = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(value["overall_score"], 91);
        assert_eq!(value["xp_earned"], 35);
        assert_eq!(value["breakdown"], json!({}));
        assert_eq!(value["expert_reference"], json!([]));
        assert_eq!(
            value["feedback"],
            json!({"strengths": [], "improvements": [], "specific_suggestions": []})
        );
    }
}
