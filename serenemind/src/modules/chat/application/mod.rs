// Chat Application Layer - 应用层
// 实现 CQRS 模式的命令和查询处理器，以及按会话串行化轮次的编排器

pub mod commands;
pub mod orchestrator;
pub mod queries;
pub mod session_state;
pub mod settings;

// 导出命令和查询
pub use commands::*;
pub use orchestrator::*;
pub use queries::*;
pub use session_state::*;
pub use settings::*;

use async_trait::async_trait;
use thiserror::Error;

use super::ports::StoreError;
use crate::modules::config::ConfigError;

/// 应用层错误类型
///
/// 分类与生成错误在轮次内部被兜底策略吸收，不会出现在这里
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Adapter initialisation failed: {0}")]
    AdapterInit(String),
}

/// 命令处理器 trait
///
/// 遵循 CQRS 模式，命令处理器负责执行有副作用的操作
#[async_trait]
pub trait CommandHandler<C, R>: Send + Sync
where
    C: Send + Sync,
{
    /// 执行命令
    async fn handle(&self, command: C) -> Result<R, ApplicationError>;
}

/// 查询处理器 trait
///
/// 遵循 CQRS 模式，查询处理器负责只读操作
#[async_trait]
pub trait QueryHandler<Q, R>: Send + Sync
where
    Q: Send + Sync,
{
    /// 执行查询
    async fn handle(&self, query: Q) -> Result<R, ApplicationError>;
}
