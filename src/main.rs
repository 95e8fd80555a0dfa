//! Interview Eval - 面试回答评估服务
//!
//! 将候选人的回答与专家参考答案一起交给大模型评分，
//! 并把模型输出整理为结构化评估结果和经验值（XP）。
//!
//! # 功能特性
//!
//! - 结构化评估 prompt（四个评分维度）
//! - 兼容 OpenAI Chat Completions 接口的补全服务
//! - 宽松的模型输出解析（代码块包裹、缺失字段）
//! - 根据总分计算 XP
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器
//! - `evaluate`: 离线评估一个请求文件
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod evaluation;
mod gateway;
mod providers;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interview Eval CLI
#[derive(Parser)]
#[command(name = "interview-eval")]
#[command(about = "LLM-backed interview answer evaluation service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 服务器
    Serve,
    /// 评估一个请求文件并打印结果
    Evaluate {
        /// 请求体 JSON 文件，`-` 表示标准输入
        input: PathBuf,
    },
    /// 向本地服务器发送测试请求
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 env 文件（如果存在）
    config::load_env_file();

    // 初始化日志系统，输出到 stderr，stdout 留给命令结果
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interview_eval=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Evaluate { input } => commands::evaluate_command(config, &input).await,
        Commands::Test => commands::test_command(config).await,
    }
}
