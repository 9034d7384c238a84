//! 依赖提供者（ServiceProvider）
//!
//! 构造分组实例时透传的不透明上下文；具体实现由注册表提供（例如依赖表）。
//!
use crate::error::{CommandError, CoreResult};
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

pub trait ServiceProvider: Send + Sync {
    /// 按类型查找已注册的依赖
    fn get_service(&self, type_id: TypeId) -> Option<Arc<dyn Any + Send + Sync>>;
}

pub trait ServiceProviderExt {
    /// 解析依赖并还原为具体类型；缺失时返回 `MissingDependency`
    fn resolve<T: Any + Send + Sync>(&self) -> CoreResult<Arc<T>>;
}

impl<P> ServiceProviderExt for P
where
    P: ServiceProvider + ?Sized,
{
    fn resolve<T: Any + Send + Sync>(&self) -> CoreResult<Arc<T>> {
        let Some(service) = self.get_service(TypeId::of::<T>()) else {
            return Err(CommandError::MissingDependency {
                dependency: type_name::<T>(),
            });
        };

        service
            .downcast::<T>()
            .map_err(|_| CommandError::TypeMismatch {
                expected: type_name::<T>(),
                found: "unknown",
            })
    }
}

/// 空依赖提供者
#[derive(Clone, Copy, Debug, Default)]
pub struct NoServices;

impl ServiceProvider for NoServices {
    fn get_service(&self, _type_id: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}
