//! 命令模块发现基础库（cmdkit-core）
//!
//! 给定带声明式标记（模块/分组/命令/前置条件/摘要/描述）的类型描述，
//! 在注册时一次性遍历其结构，产出不可变、可查询的命令树：
//! - 标记模型（`marker`）与结构内省（`introspect`）
//! - 命令收集（`command`）与模块树构建（`module_builder`）
//! - 构建结果（`module`）
//! - 分组实例构造的外部协作者（`factory`、`services`）
//!
//! 本 crate 不执行命令解析、不求值前置条件，只负责发现与索引；
//! 分发逻辑见 `cmdkit-service`。
//!
//! 典型用法：
//! 1. 使用 `cmdkit-macros` 的 `#[module]`/`#[group]` 为 `impl` 块生成描述表，或手写 `TypeInfo`；
//! 2. 通过 `ModuleBuilder`（或 `build_module`）构建 `Module`；
//! 3. 将 `Module` 交给注册表建立文本索引。
//!
pub mod command;
pub mod context;
pub mod error;
pub mod factory;
pub mod introspect;
pub mod marker;
pub mod module;
pub mod module_builder;
pub mod precondition;
pub mod services;

pub use command::Command;
pub use context::CommandContext;
pub use error::{CommandError, CoreResult};
pub use introspect::{Instance, Introspect, TypeInfo};
pub use module::Module;
pub use module_builder::{ModuleBuilder, build_module};

// 允许在本 crate 内部通过 ::cmdkit_core 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::cmdkit_core 路径。
extern crate self as cmdkit_core;
