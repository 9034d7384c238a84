use bon::Builder;
use serde::{Deserialize, Serialize};

/// 命令调用上下文（Command Context）
///
/// 承载一次命令调用的横切信息；核心层不解读其内容，只原样传递给处理器与前置条件。
///
/// ```rust
/// use cmdkit_core::context::CommandContext;
///
/// let ctx = CommandContext::builder()
///     .message("math add 1 2")
///     .actor_id("u-1")
///     .build();
/// assert_eq!(ctx.actor_id(), Some("u-1"));
/// assert_eq!(ctx.channel_id(), None);
/// ```
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct CommandContext {
    /// 原始消息文本
    #[builder(into, default)]
    message: String,
    /// 触发命令的主体ID
    #[builder(into)]
    actor_id: Option<String>,
    /// 来源频道ID
    #[builder(into)]
    channel_id: Option<String>,
    /// 关联ID（链路追踪）
    #[builder(into)]
    correlation_id: Option<String>,
}

impl CommandContext {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
