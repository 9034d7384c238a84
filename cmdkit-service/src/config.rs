use bon::Builder;
use serde::{Deserialize, Serialize};

/// 命令注册表配置
///
/// 缺省值：命令名大小写不敏感；同一根类型重复注册时报错。
///
/// ```rust
/// use cmdkit_service::config::CommandServiceConfig;
///
/// let cfg = CommandServiceConfig::builder()
///     .case_sensitive_commands(true)
///     .build();
/// assert!(cfg.case_sensitive_commands);
/// assert!(cfg.reject_duplicate_modules);
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandServiceConfig {
    /// 搜索时是否区分大小写
    #[builder(default)]
    pub case_sensitive_commands: bool,
    /// 同一根类型重复注册时是否报错（否则替换旧模块）
    #[builder(default = true)]
    pub reject_duplicate_modules: bool,
}

impl Default for CommandServiceConfig {
    fn default() -> Self {
        Self {
            case_sensitive_commands: false,
            reject_duplicate_modules: true,
        }
    }
}
