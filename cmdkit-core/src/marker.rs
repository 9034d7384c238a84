//! 声明式标记（Marker）
//!
//! 模块/分组/命令/前置条件/摘要/描述等标记均为只读的数据记录，
//! 由宏或手写描述表挂载到类型与方法上。查找只看"直接挂载"的标记，
//! 同类标记至多取第一个。
//!
use crate::precondition::Precondition;
use std::sync::Arc;

/// 模块标记：根类型上的可选前缀
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleMarker {
    prefix: Option<String>,
}

impl ModuleMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// 仅返回非空前缀
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }
}

/// 分组标记：没有前缀的分组是"透明"的，只组织代码不贡献名称段
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupMarker {
    prefix: Option<String>,
}

impl GroupMarker {
    pub fn transparent() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// 仅返回非空前缀；`None` 表示透明分组
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }

    pub fn is_transparent(&self) -> bool {
        self.prefix().is_none()
    }
}

/// 命令标记：方法自身的名称段
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandMarker {
    name: String,
}

impl CommandMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug)]
pub enum Marker {
    Module(ModuleMarker),
    Group(GroupMarker),
    Command(CommandMarker),
    Summary(String),
    Description(String),
    Precondition(Arc<dyn Precondition>),
}

/// 直接挂载在某个类型或方法上的标记集合（保持声明顺序）
#[derive(Clone, Debug, Default)]
pub struct Markers(Vec<Marker>);

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: Marker) {
        self.0.push(marker);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn module(&self) -> Option<&ModuleMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Module(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn group(&self) -> Option<&GroupMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Group(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn command(&self) -> Option<&CommandMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Command(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.iter().find_map(|m| match m {
            Marker::Summary(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.0.iter().find_map(|m| match m {
            Marker::Description(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// 全部前置条件（声明顺序）
    pub fn preconditions(&self) -> Vec<Arc<dyn Precondition>> {
        self.0
            .iter()
            .filter_map(|m| match m {
                Marker::Precondition(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Marker>> for Markers {
    fn from(markers: Vec<Marker>) -> Self {
        Self(markers)
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
