//! 经验值（XP）计算

/// 分数阈值到 XP 的映射，按阈值降序
const XP_BRACKETS: &[(i64, u32)] = &[(90, 35), (80, 30), (70, 25), (60, 20), (50, 15)];

/// 低于所有阈值（包括负分）时的 XP
const BASE_XP: u32 = 10;

/// 根据总分计算 XP
///
/// 对所有整数都有定义，分数不做范围校验。
pub fn xp_for_score(overall_score: i64) -> u32 {
    XP_BRACKETS
        .iter()
        .find(|(threshold, _)| overall_score >= *threshold)
        .map(|&(_, xp)| xp)
        .unwrap_or(BASE_XP)
}
