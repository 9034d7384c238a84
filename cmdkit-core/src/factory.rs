//! 实例构造（InstanceFactory）
//!
//! 遍历到分组类型时通过工厂创建其实例；构造失败直接中止整个模块构建。
//!
use crate::{
    error::{CommandError, CoreResult},
    introspect::{Instance, TypeInfo},
    services::ServiceProvider,
};

pub trait InstanceFactory: Send + Sync {
    fn create(&self, type_info: &TypeInfo, services: &dyn ServiceProvider) -> CoreResult<Instance>;
}

/// 默认工厂：调用描述表中声明的构造器
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstructorFactory;

impl InstanceFactory for ConstructorFactory {
    fn create(&self, type_info: &TypeInfo, services: &dyn ServiceProvider) -> CoreResult<Instance> {
        let Some(ctor) = type_info.constructor() else {
            return Err(CommandError::Construction {
                type_name: type_info.name().to_string(),
                reason: "no constructor declared".to_string(),
            });
        };

        ctor(services).map_err(|err| match err {
            err @ CommandError::Construction { .. } => err,
            other => CommandError::Construction {
                type_name: type_info.name().to_string(),
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::constructor;
    use crate::services::{NoServices, ServiceProviderExt};
    use std::any::TypeId;
    use std::sync::Arc;

    struct Needy;
    struct Database;

    #[test]
    fn missing_constructor_fails_fast() {
        let info = TypeInfo::builder()
            .name("Needy")
            .type_id(TypeId::of::<Needy>())
            .build();

        let err = ConstructorFactory.create(&info, &NoServices).unwrap_err();
        match err {
            CommandError::Construction { type_name, reason } => {
                assert_eq!(type_name, "Needy");
                assert!(reason.contains("no constructor"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dependency_errors_are_wrapped_with_type_name() {
        let info = TypeInfo::builder()
            .name("Needy")
            .type_id(TypeId::of::<Needy>())
            .constructor(constructor(|services| {
                let _db = services.resolve::<Database>()?;
                Ok(Arc::new(Needy) as Instance)
            }))
            .build();

        let err = ConstructorFactory.create(&info, &NoServices).unwrap_err();
        match err {
            CommandError::Construction { type_name, reason } => {
                assert_eq!(type_name, "Needy");
                assert!(reason.contains("Database"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
