//! 评估 Prompt 构建

use serde_json::Value;

use super::QuestionRecord;

/// 发送给模型的 system 指令
pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert cybersecurity interview evaluator. Always respond with valid JSON only.";

/// 构建评估 prompt
///
/// 输出只依赖输入：面试上下文、专家参考答案（格式化 JSON）、候选人原始回答，
/// 以及四个评分维度（30/30/25/15）和模型必须返回的 JSON 结构。
pub fn build_evaluation_prompt(
    question: &QuestionRecord,
    user_answer: &str,
    role: &str,
    experience_level: &str,
) -> String {
    let expert_answer = Value::from(question.answer.clone());

    format!(
        r#"
You are an expert cybersecurity interview evaluator. Please evaluate the following candidate's answer against the expert reference answer.

**Interview Context:**
- Role: {role}
- Experience Level: {experience_level}
- Question Category: {category}
- Question: {question_text}

**Expert Reference Answer:**
{expert_pretty:#}

**Candidate's Answer:**
{user_answer}

**Evaluation Instructions:**
Please provide a detailed evaluation with the following scoring criteria:
- Coverage Score (0-30): How many key points from the expert answer were covered
- Technical Accuracy (0-30): Correctness of technical information provided
- Communication Quality (0-25): Clarity, structure, and professionalism of the response
- Additional Insights (0-15): Extra knowledge, best practices, or tools mentioned beyond the reference

**Required Response Format (JSON only):**
{{
    "overall_score": <sum of all breakdown scores>,
    "breakdown": {{
        "coverage_score": <0-30>,
        "technical_accuracy": <0-30>,
        "communication_quality": <0-25>,
        "additional_insights": <0-15>
    }},
    "feedback": {{
        "strengths": [<list of specific strengths observed>],
        "improvements": [<list of specific areas for improvement>],
        "specific_suggestions": [<list of actionable suggestions for improvement>]
    }},
    "expert_reference": {expert_compact}
}}

Please respond with ONLY the JSON object, no additional text or explanation.
"#,
        category = question.category,
        question_text = question.question,
        expert_pretty = expert_answer,
        expert_compact = inline_json_list(&question.answer),
    )
}

/// 单行 JSON 数组，元素之间用 `", "` 分隔
fn inline_json_list(items: &[String]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| Value::from(item.as_str()).to_string())
        .collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> QuestionRecord {
        QuestionRecord {
            question: "How would you respond to a ransomware outbreak?".to_string(),
            category: "Incident Response".to_string(),
            answer: vec![
                "Isolate affected hosts".to_string(),
                "Preserve evidence".to_string(),
            ],
        }
    }

    #[test]
    fn contains_question_and_answer_verbatim() {
        let answer = "First I would isolate the network segment.\nThen notify the IR lead.";
        let prompt =
            build_evaluation_prompt(&sample_question(), answer, "SOC Analyst", "Mid-level");

        assert!(prompt.contains("How would you respond to a ransomware outbreak?"));
        assert!(prompt.contains(answer));
        assert!(prompt.contains("- Role: SOC Analyst"));
        assert!(prompt.contains("- Experience Level: Mid-level"));
        assert!(prompt.contains("- Question Category: Incident Response"));
    }

    #[test]
    fn renders_expert_answer_pretty_and_compact() {
        let prompt = build_evaluation_prompt(&sample_question(), "answer", "role", "junior");

        assert!(prompt.contains("[\n  \"Isolate affected hosts\",\n  \"Preserve evidence\"\n]"));
        assert!(prompt
            .contains("\"expert_reference\": [\"Isolate affected hosts\", \"Preserve evidence\"]"));
    }

    #[test]
    fn rubric_lists_dimension_maximums() {
        let prompt = build_evaluation_prompt(&sample_question(), "answer", "role", "junior");

        assert!(prompt.contains("Coverage Score (0-30)"));
        assert!(prompt.contains("Technical Accuracy (0-30)"));
        assert!(prompt.contains("Communication Quality (0-25)"));
        assert!(prompt.contains("Additional Insights (0-15)"));
        assert!(prompt.contains("\"coverage_score\": <0-30>"));
    }

    #[test]
    fn empty_question_record_is_accepted() {
        let prompt = build_evaluation_prompt(&QuestionRecord::default(), "", "", "");

        assert!(prompt.contains("- Question: \n"));
        assert!(prompt.contains("**Expert Reference Answer:**\n[]\n"));
    }

    #[test]
    fn inline_list_escapes_and_separates() {
        assert_eq!(inline_json_list(&[]), "[]");
        assert_eq!(
            inline_json_list(&["say \"hi\"".to_string(), "b".to_string()]),
            r#"["say \"hi\"", "b"]"#
        );
    }

    #[test]
    fn is_deterministic() {
        let a = build_evaluation_prompt(&sample_question(), "x", "r", "e");
        let b = build_evaluation_prompt(&sample_question(), "x", "r", "e");
        assert_eq!(a, b);
    }
}
