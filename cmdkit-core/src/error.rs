//! 核心层统一错误定义
//!
//! 发现阶段本身是全函数（不会因标记而失败），唯一的失败面是实例构造；
//! 其余变体服务于调用期（前置条件、类型擦除后的还原）。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    // --- 实例构造 ---
    #[error("construction failed: type={type_name}, reason={reason}")]
    Construction { type_name: String, reason: String },
    #[error("missing dependency: {dependency}")]
    MissingDependency { dependency: &'static str },
    #[error("cyclic group: type={type_name}")]
    CyclicGroup { type_name: String },

    // --- 调用期 ---
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("precondition failed: precondition={precondition}, reason={reason}")]
    PreconditionFailed {
        precondition: String,
        reason: String,
    },
    #[error("invocation failed: command={command}, reason={reason}")]
    Invocation { command: String, reason: String },
}

/// 统一 Result 类型别名
pub type CoreResult<T> = Result<T, CommandError>;

impl CommandError {
    /// 便捷构造：前置条件未满足
    pub fn unmet(precondition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            precondition: precondition.into(),
            reason: reason.into(),
        }
    }

    /// 便捷构造：命令执行失败
    pub fn invocation(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invocation {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
