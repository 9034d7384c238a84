//! 模块（Module）
//!
//! 以一个带模块标记的根类型为起点发现到的、不可变的命令集合及其元信息。
//!
use crate::{command::Command, introspect::Instance, precondition::Precondition};
use serde::Serialize;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Module {
    pub(crate) name: String,
    pub(crate) type_id: TypeId,
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) commands: Vec<Command>,
    pub(crate) preconditions: Vec<Arc<dyn Precondition>>,
    pub(crate) instance: Instance,
}

impl Module {
    /// 根类型名
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 先序遍历顺序下扁平化的全部命令
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// 仅根类型上直接挂载的前置条件
    pub fn preconditions(&self) -> &[Arc<dyn Precondition>] {
        &self.preconditions
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// 帮助输出用的可序列化视图
    pub fn describe(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            name: self.name.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            preconditions: self
                .preconditions
                .iter()
                .map(|p| p.name().to_string())
                .collect(),
            commands: self
                .commands
                .iter()
                .map(|c| CommandDescriptor {
                    name: c.name().to_string(),
                    summary: c.summary().map(str::to_string),
                    description: c.description().map(str::to_string),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("commands", &self.commands)
            .field("preconditions", &self.preconditions)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub preconditions: Vec<String>,
    pub commands: Vec<CommandDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
