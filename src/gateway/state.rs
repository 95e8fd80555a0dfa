//! Gateway 应用状态

use crate::evaluation::Evaluator;

/// Gateway 应用状态
///
/// 请求之间只共享只读的评估器，克隆只增加 provider 的引用计数。
#[derive(Clone)]
pub struct AppState {
    evaluator: Evaluator,
}

impl AppState {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }
}
