use crate::error::ServiceError;
use async_trait::async_trait;
use cmdkit_core::context::CommandContext;

/// 命令分发器（Command Dispatcher）
///
/// - 根据文本找到匹配的命令，检查前置条件后执行；
/// - 框架可提供不同实现（进程内注册表、远程转发等）。
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// 分发一条命令文本
    ///
    /// - `ctx`：调用上下文（调用者、频道、链路追踪）
    /// - `text`：去掉触发前缀后的命令文本，例如 `math add 1 2`
    async fn execute(&self, ctx: &CommandContext, text: &str) -> Result<(), ServiceError>;
}
