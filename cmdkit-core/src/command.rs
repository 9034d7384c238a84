//! 命令（Command）
//!
//! 一个可调用的动作：方法标记 + 解析后的完整调用名 + 绑定实例。
//! 由模块构建器在遍历时收集，构建完成后不可变。
//!
use crate::{
    context::CommandContext,
    error::CoreResult,
    introspect::{Instance, MethodInfo},
    marker::CommandMarker,
    precondition::Precondition,
};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Command {
    name: String,
    text: String,
    summary: Option<String>,
    description: Option<String>,
    preconditions: Vec<Arc<dyn Precondition>>,
    group_preconditions: Vec<Arc<dyn Precondition>>,
    module: Arc<str>,
    method: MethodInfo,
    instance: Instance,
}

impl Command {
    /// 由命令标记与已解析前缀生成命令记录
    ///
    /// `prefix` 为空或已带分隔空格；完整名 = `prefix` + 标记声明的名称段。
    /// 调用方负责确认方法带有命令标记。
    pub fn collect(
        module: Arc<str>,
        instance: Instance,
        marker: &CommandMarker,
        method: &MethodInfo,
        prefix: &str,
    ) -> Self {
        let markers = method.markers();
        Self {
            name: format!("{prefix}{}", marker.name()),
            text: marker.name().to_string(),
            summary: markers.summary().map(str::to_string),
            description: markers.description().map(str::to_string),
            preconditions: markers.preconditions(),
            group_preconditions: Vec::new(),
            module,
            method: method.clone(),
            instance,
        }
    }

    /// 完整调用名（含分组前缀）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 命令自身的名称段
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 方法上直接挂载的前置条件（只收集，不求值）
    pub fn preconditions(&self) -> &[Arc<dyn Precondition>] {
        &self.preconditions
    }

    /// 外层分组（由外到内）挂载的前置条件；不含根类型上的模块级前置条件
    pub fn group_preconditions(&self) -> &[Arc<dyn Precondition>] {
        &self.group_preconditions
    }

    pub fn with_group_preconditions(mut self, preconditions: Vec<Arc<dyn Precondition>>) -> Self {
        self.group_preconditions = preconditions;
        self
    }

    /// 所属模块名
    pub fn module_name(&self) -> &str {
        &self.module
    }

    pub fn method(&self) -> &MethodInfo {
        &self.method
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// 以绑定实例执行处理器
    pub async fn invoke(&self, ctx: &CommandContext, args: Vec<String>) -> CoreResult<()> {
        let handler = self.method.handler().clone();
        (handler)(self.instance.as_ref(), ctx, args).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("method", &self.method.name())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
