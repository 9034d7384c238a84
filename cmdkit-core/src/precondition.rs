//! 前置条件（Precondition）
//!
//! 不透明的能力/授权检查描述符。核心层在发现阶段只收集，从不求值；
//! 由注册表在分发时统一执行。
//!
use crate::{command::Command, context::CommandContext, error::CoreResult};
use async_trait::async_trait;
use std::fmt;

#[async_trait]
pub trait Precondition: Send + Sync + fmt::Debug {
    /// 前置条件名称（用于日志与帮助输出）
    fn name(&self) -> &str;

    /// 检查是否允许执行；未满足时返回 `CommandError::PreconditionFailed`
    async fn check(&self, ctx: &CommandContext, command: &Command) -> CoreResult<()>;
}
