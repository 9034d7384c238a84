//! 命令服务
//!
//! 在 `cmdkit-core` 的模块发现之上提供注册表、依赖表与文本分发：
//! - [`CommandService`]：注册模块，按文本搜索并执行命令
//! - [`DependencyMap`]：供分组构造器解析的共享依赖
//! - [`CommandDispatcher`]：执行入口抽象
//!
pub mod command_service;
pub mod config;
pub mod dependency_map;
pub mod dispatcher;
pub mod error;
pub mod search;

pub use command_service::CommandService;
pub use config::CommandServiceConfig;
pub use dependency_map::DependencyMap;
pub use dispatcher::CommandDispatcher;
pub use error::ServiceError;
pub use search::SearchMatch;
