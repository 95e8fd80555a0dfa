/// 截断文本用于日志和错误信息
///
/// 按字符而非字节截断，超出部分以 `…` 结尾。
///
/// # 参数
///
/// * `text` - 原始文本
/// * `max_chars` - 保留的最大字符数
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
