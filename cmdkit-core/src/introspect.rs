//! 结构内省（Structural Introspection）
//!
//! 以显式描述表代替运行时反射：
//! - `TypeInfo`：类型名、直接挂载的标记、直接声明的方法与嵌套类型、可选的基类型与构造器；
//! - `MethodInfo`：方法名、标记与类型擦除后的异步处理器；
//! - `Introspect`：由 `#[module]`/`#[group]` 宏生成，也可以手写。
//!
//! "直接声明"不包含经由 `base` 继承而来的成员，发现阶段只读取直接声明的部分。
//!
use crate::{
    context::CommandContext,
    error::{CommandError, CoreResult},
    marker::Markers,
    services::ServiceProvider,
};
use bon::Builder;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// 命令背后的实例句柄（仅在调用期被还原）
pub type Instance = Arc<dyn Any + Send + Sync>;

pub type CmdFuture<'a> = Pin<Box<dyn Future<Output = CoreResult<()>> + Send + 'a>>;

pub type MethodHandler = Arc<
    dyn for<'a> Fn(&'a (dyn Any + Send + Sync), &'a CommandContext, Vec<String>) -> CmdFuture<'a>
        + Send
        + Sync,
>;

pub type Constructor = Arc<dyn Fn(&dyn ServiceProvider) -> CoreResult<Instance> + Send + Sync>;

/// 包装处理器闭包，使其获得高阶生命周期签名
pub fn method_handler<F>(f: F) -> MethodHandler
where
    F: for<'a> Fn(&'a (dyn Any + Send + Sync), &'a CommandContext, Vec<String>) -> CmdFuture<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// 包装构造器闭包
pub fn constructor<F>(f: F) -> Constructor
where
    F: Fn(&dyn ServiceProvider) -> CoreResult<Instance> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 将类型擦除的实例还原为具体类型
pub fn downcast_instance<T: Any>(instance: &(dyn Any + Send + Sync)) -> CoreResult<&T> {
    instance
        .downcast_ref::<T>()
        .ok_or(CommandError::TypeMismatch {
            expected: type_name::<T>(),
            found: "unknown",
        })
}

/// 可被内省的类型
pub trait Introspect: Any + Send + Sync {
    fn type_info() -> TypeInfo;
}

/// 嵌套类型/基类型引用
///
/// 宏生成的描述表使用 `Lazy`，只有在遍历到时才展开，避免声明期递归。
#[derive(Clone)]
pub enum TypeRef {
    Resolved(Arc<TypeInfo>),
    Lazy(fn() -> TypeInfo),
}

impl TypeRef {
    pub fn of<T: Introspect>() -> Self {
        Self::Lazy(<T as Introspect>::type_info)
    }

    pub fn resolve(&self) -> Arc<TypeInfo> {
        match self {
            Self::Resolved(info) => info.clone(),
            Self::Lazy(f) => Arc::new(f()),
        }
    }
}

impl From<TypeInfo> for TypeRef {
    fn from(info: TypeInfo) -> Self {
        Self::Resolved(Arc::new(info))
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(info) => f.debug_tuple("Resolved").field(&info.name).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

#[derive(Builder, Clone)]
pub struct MethodInfo {
    #[builder(into)]
    name: String,
    #[builder(default)]
    markers: Markers,
    handler: MethodHandler,
}

impl MethodInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn handler(&self) -> &MethodHandler {
        &self.handler
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

#[derive(Builder, Clone)]
pub struct TypeInfo {
    #[builder(into)]
    name: String,
    type_id: TypeId,
    #[builder(default)]
    markers: Markers,
    #[builder(default)]
    methods: Vec<MethodInfo>,
    #[builder(default)]
    nested_types: Vec<TypeRef>,
    #[builder(into)]
    base: Option<TypeRef>,
    constructor: Option<Constructor>,
}

impl TypeInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// 直接声明的方法（不含基类型）
    pub fn declared_methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// 直接声明的嵌套类型（不含基类型）
    pub fn declared_nested_types(&self) -> &[TypeRef] {
        &self.nested_types
    }

    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("markers", &self.markers)
            .field("methods", &self.methods)
            .field("nested_types", &self.nested_types)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
