//! CLI 命令实现

pub mod evaluate;
pub mod serve;

pub use evaluate::evaluate_command;
pub use serve::serve_command;
pub use test::test_command;
