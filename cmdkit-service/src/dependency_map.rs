use cmdkit_core::services::ServiceProvider;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 基于内存的依赖表
/// - 以 TypeId 为键保存共享依赖
/// - 作为 `ServiceProvider` 透传给分组构造器
#[derive(Default)]
pub struct DependencyMap {
    services: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册依赖；返回是否替换了同类型的旧值
    pub fn insert<T: Any + Send + Sync>(&self, value: T) -> bool {
        self.insert_arc(Arc::new(value))
    }

    pub fn insert_arc<T: Any + Send + Sync>(&self, value: Arc<T>) -> bool {
        self.services.insert(TypeId::of::<T>(), value).is_some()
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value().clone().downcast::<T>().ok())
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceProvider for DependencyMap {
    fn get_service(&self, type_id: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        self.services.get(&type_id).map(|entry| entry.value().clone())
    }
}
