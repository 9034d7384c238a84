//! 文本搜索
//!
//! 命令完整名按空白切分为名称段，与输入文本的前若干段逐一比较；
//! 匹配的段数越多越优先，剩余段作为参数交给处理器。
//!
use cmdkit_core::{command::Command, module::Module};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct SearchMatch {
    pub module: Arc<Module>,
    pub command: Command,
    pub args: Vec<String>,
    depth: usize,
}

impl SearchMatch {
    pub(crate) fn new(module: Arc<Module>, command: Command, input: &[&str], depth: usize) -> Self {
        Self {
            module,
            command,
            args: input[depth..].iter().map(|s| s.to_string()).collect(),
            depth,
        }
    }

    /// 命中的名称段数
    pub fn depth(&self) -> usize {
        self.depth
    }

    // 更长的匹配在前；同长度按模块名、命令名排序
    pub(crate) fn precedence(a: &Self, b: &Self) -> Ordering {
        b.depth
            .cmp(&a.depth)
            .then_with(|| a.module.name().cmp(b.module.name()))
            .then_with(|| a.command.name().cmp(b.command.name()))
    }
}

/// 若命令名是输入的前缀，返回命中的段数
pub(crate) fn match_tokens(command_name: &str, input: &[&str], case_sensitive: bool) -> Option<usize> {
    let tokens: Vec<&str> = command_name.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > input.len() {
        return None;
    }

    let hit = tokens.iter().zip(input).all(|(expected, actual)| {
        if case_sensitive {
            expected == actual
        } else {
            expected.to_lowercase() == actual.to_lowercase()
        }
    });

    hit.then_some(tokens.len())
}
