//! 模块树构建器（ModuleBuilder）
//!
//! 对根类型做一次深度优先、先序的遍历：
//! 1. 收集当前类型直接声明且带命令标记的方法；
//! 2. 对直接声明且带分组标记的嵌套类型，计算子前缀、构造实例并递归；
//! 3. 遍历结束后，仅从根类型读取前置条件与摘要/描述。
//!
//! 分组上的前置条件不并入模块，而是按路径累积到各命令的 `group_preconditions`。
//!
//! 没有分组标记的嵌套类型完全不遍历（也不会被构造）。
//!
use crate::{
    command::Command,
    precondition::Precondition,
    error::{CommandError, CoreResult},
    factory::{ConstructorFactory, InstanceFactory},
    introspect::{Instance, TypeInfo},
    marker::ModuleMarker,
    module::Module,
    services::ServiceProvider,
};
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

pub struct ModuleBuilder<'a> {
    services: &'a dyn ServiceProvider,
    factory: &'a dyn InstanceFactory,
}

// 单次构建的可变状态
struct Walk {
    module: Arc<str>,
    commands: Vec<Command>,
    // 当前递归路径上的类型，用于发现循环分组
    path: Vec<TypeId>,
}

impl<'a> ModuleBuilder<'a> {
    pub fn new(services: &'a dyn ServiceProvider, factory: &'a dyn InstanceFactory) -> Self {
        Self { services, factory }
    }

    /// 构建模块：任何分组实例构造失败都会使整个构建失败，不返回部分结果
    pub fn build(
        &self,
        instance: Instance,
        module_marker: &ModuleMarker,
        type_info: &TypeInfo,
    ) -> CoreResult<Module> {
        let mut walk = Walk {
            module: Arc::from(type_info.name()),
            commands: Vec::new(),
            path: vec![type_info.type_id()],
        };

        let root_prefix = module_marker.prefix().unwrap_or_default();
        self.visit(&mut walk, &instance, type_info, root_prefix, &[])?;

        let markers = type_info.markers();
        let module = Module {
            name: type_info.name().to_string(),
            type_id: type_info.type_id(),
            summary: markers.summary().map(str::to_string),
            description: markers.description().map(str::to_string),
            commands: walk.commands,
            preconditions: markers.preconditions(),
            instance,
        };

        debug!(
            module = %module.name,
            commands = module.commands.len(),
            preconditions = module.preconditions.len(),
            "module built"
        );

        Ok(module)
    }

    // `group_prefix` 不带尾随空格；透明分组原样向下传递，避免重复分隔符
    fn visit(
        &self,
        walk: &mut Walk,
        instance: &Instance,
        type_info: &TypeInfo,
        group_prefix: &str,
        guards: &[Arc<dyn Precondition>],
    ) -> CoreResult<()> {
        let padded = if group_prefix.is_empty() {
            String::new()
        } else {
            format!("{group_prefix} ")
        };

        for method in type_info.declared_methods() {
            let Some(marker) = method.markers().command() else {
                continue;
            };

            let command = Command::collect(
                walk.module.clone(),
                instance.clone(),
                marker,
                method,
                &padded,
            )
            .with_group_preconditions(guards.to_vec());
            debug!(
                module = %walk.module,
                command = command.name(),
                method = method.name(),
                "command discovered"
            );
            walk.commands.push(command);
        }

        for nested in type_info.declared_nested_types() {
            let nested = nested.resolve();
            let Some(group) = nested.markers().group() else {
                debug!(module = %walk.module, nested = nested.name(), "nested type skipped");
                continue;
            };

            if walk.path.contains(&nested.type_id()) {
                return Err(CommandError::CyclicGroup {
                    type_name: nested.name().to_string(),
                });
            }

            let child_prefix = match group.prefix() {
                Some(prefix) => format!("{padded}{prefix}"),
                None => group_prefix.to_string(),
            };

            let mut child_guards = guards.to_vec();
            child_guards.extend(nested.markers().preconditions());

            let child = self.factory.create(&nested, self.services)?;

            walk.path.push(nested.type_id());
            self.visit(walk, &child, &nested, &child_prefix, &child_guards)?;
            walk.path.pop();
        }

        Ok(())
    }
}

/// 使用默认工厂构建模块
pub fn build_module(
    services: &dyn ServiceProvider,
    instance: Instance,
    module_marker: &ModuleMarker,
    type_info: &TypeInfo,
) -> CoreResult<Module> {
    ModuleBuilder::new(services, &ConstructorFactory).build(instance, module_marker, type_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CommandContext;
    use crate::introspect::{MethodInfo, TypeRef, constructor, method_handler};
    use crate::marker::{CommandMarker, GroupMarker, Marker, Markers};
    use crate::precondition::Precondition;
    use crate::services::NoServices;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Root;
    struct Math;
    struct Trig;
    struct Quiet;
    struct Helper;
    struct Ancestor;
    struct Broken;

    #[derive(Debug)]
    struct Named(&'static str);

    #[async_trait]
    impl Precondition for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn check(&self, _ctx: &CommandContext, _command: &Command) -> CoreResult<()> {
            Ok(())
        }
    }

    fn cmd(token: &str) -> MethodInfo {
        MethodInfo::builder()
            .name(token)
            .markers(Markers::from(vec![Marker::Command(CommandMarker::new(token))]))
            .handler(method_handler(|_instance, _ctx, _args| Box::pin(async { Ok(()) })))
            .build()
    }

    fn plain(name: &str) -> MethodInfo {
        MethodInfo::builder()
            .name(name)
            .handler(method_handler(|_instance, _ctx, _args| Box::pin(async { Ok(()) })))
            .build()
    }

    fn group<T: 'static>(name: &str, marker: GroupMarker) -> TypeInfo {
        TypeInfo::builder()
            .name(name)
            .type_id(TypeId::of::<T>())
            .markers(Markers::from(vec![
                Marker::Group(marker),
                Marker::Precondition(Arc::new(Named("group-only"))),
                Marker::Summary("group summary".into()),
            ]))
            .constructor(constructor(|_services| Ok(Arc::new(()) as Instance)))
            .build()
    }

    fn names(module: &Module) -> Vec<&str> {
        module.commands().iter().map(|c| c.name()).collect()
    }

    fn build(info: &TypeInfo) -> CoreResult<Module> {
        build_module(&NoServices, Arc::new(()), &ModuleMarker::new(), info)
    }

    fn sample() -> TypeInfo {
        let trig = TypeInfo::builder()
            .name("Trig")
            .type_id(TypeId::of::<Trig>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix("trig"))]))
            .methods(vec![cmd("sin"), cmd("cos")])
            .constructor(constructor(|_services| Ok(Arc::new(Trig) as Instance)))
            .build();

        let math = TypeInfo::builder()
            .name("Math")
            .type_id(TypeId::of::<Math>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix("math"))]))
            .methods(vec![cmd("add"), plain("helper_fn")])
            .nested_types(vec![trig.into()])
            .constructor(constructor(|_services| Ok(Arc::new(Math) as Instance)))
            .build();

        TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .markers(Markers::from(vec![
                Marker::Module(ModuleMarker::new()),
                Marker::Summary("root summary".into()),
                Marker::Description("root description".into()),
                Marker::Precondition(Arc::new(Named("owner"))),
            ]))
            .methods(vec![cmd("ping"), cmd("echo")])
            .nested_types(vec![math.into()])
            .build()
    }

    #[test]
    fn flattens_in_preorder_with_composed_prefixes() {
        let module = build(&sample()).unwrap();
        assert_eq!(
            names(&module),
            vec!["ping", "echo", "math add", "math trig sin", "math trig cos"]
        );
        assert_eq!(module.name(), "Root");
        assert_eq!(module.to_string(), "Root");
        assert_eq!(module.summary(), Some("root summary"));
        assert_eq!(module.description(), Some("root description"));
    }

    #[test]
    fn commands_bind_the_instance_of_their_declaring_type() {
        let module = build(&sample()).unwrap();
        let by_name = |n: &str| module.commands().iter().find(|c| c.name() == n).unwrap();

        assert!(by_name("ping").instance().downcast_ref::<()>().is_some());
        assert!(by_name("math add").instance().downcast_ref::<Math>().is_some());
        assert!(by_name("math trig sin").instance().downcast_ref::<Trig>().is_some());
        assert!(module.commands().iter().all(|c| c.module_name() == "Root"));
    }

    #[test]
    fn transparent_group_adds_no_segment() {
        let quiet = TypeInfo::builder()
            .name("Quiet")
            .type_id(TypeId::of::<Quiet>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::transparent())]))
            .methods(vec![cmd("add")])
            .constructor(constructor(|_services| Ok(Arc::new(Quiet) as Instance)))
            .build();
        let math = TypeInfo::builder()
            .name("Math")
            .type_id(TypeId::of::<Math>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix("math"))]))
            .nested_types(vec![quiet.clone().into()])
            .constructor(constructor(|_services| Ok(Arc::new(Math) as Instance)))
            .build();
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .nested_types(vec![quiet.into(), math.into()])
            .build();

        let module = build(&root).unwrap();
        assert_eq!(names(&module), vec!["add", "math add"]);
    }

    #[test]
    fn empty_group_prefix_is_transparent() {
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .nested_types(vec![
                TypeInfo::builder()
                    .name("Quiet")
                    .type_id(TypeId::of::<Quiet>())
                    .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix(""))]))
                    .methods(vec![cmd("stats")])
                    .constructor(constructor(|_services| Ok(Arc::new(Quiet) as Instance)))
                    .build()
                    .into(),
            ])
            .build();

        assert_eq!(names(&build(&root).unwrap()), vec!["stats"]);
    }

    #[test]
    fn module_prefix_seeds_the_root() {
        let module = build_module(
            &NoServices,
            Arc::new(()),
            &ModuleMarker::with_prefix("adm"),
            &sample(),
        )
        .unwrap();

        assert_eq!(names(&module)[0], "adm ping");
        assert_eq!(names(&module)[3], "adm math trig sin");
    }

    #[test]
    fn unmarked_nested_types_are_never_constructed() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let helper = TypeInfo::builder()
            .name("Helper")
            .type_id(TypeId::of::<Helper>())
            .methods(vec![cmd("hidden")])
            .constructor(constructor(|_services| {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Helper) as Instance)
            }))
            .build();
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .methods(vec![cmd("ping")])
            .nested_types(vec![helper.into()])
            .build();

        let module = build(&root).unwrap();
        assert_eq!(names(&module), vec!["ping"]);
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn inherited_members_are_not_discovered() {
        let ancestor = TypeInfo::builder()
            .name("Ancestor")
            .type_id(TypeId::of::<Ancestor>())
            .methods(vec![cmd("inherited")])
            .nested_types(vec![group::<Math>("Math", GroupMarker::with_prefix("math")).into()])
            .build();
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .methods(vec![cmd("own")])
            .base(ancestor)
            .build();

        assert_eq!(names(&build(&root).unwrap()), vec!["own"]);
    }

    #[test]
    fn only_root_preconditions_are_collected() {
        let module = build(&sample()).unwrap();
        let pre: Vec<&str> = module.preconditions().iter().map(|p| p.name()).collect();
        assert_eq!(pre, vec!["owner"]);

        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .nested_types(vec![group::<Math>("Math", GroupMarker::with_prefix("math")).into()])
            .build();
        let module = build(&root).unwrap();
        assert!(module.preconditions().is_empty());
        assert_eq!(module.summary(), None);
    }

    #[test]
    fn group_preconditions_accumulate_on_commands() {
        let inner = TypeInfo::builder()
            .name("Trig")
            .type_id(TypeId::of::<Trig>())
            .markers(Markers::from(vec![
                Marker::Group(GroupMarker::with_prefix("trig")),
                Marker::Precondition(Arc::new(Named("trig-only"))),
            ]))
            .methods(vec![cmd("sin")])
            .constructor(constructor(|_services| Ok(Arc::new(Trig) as Instance)))
            .build();
        let math = TypeInfo::builder()
            .name("Math")
            .type_id(TypeId::of::<Math>())
            .markers(Markers::from(vec![
                Marker::Group(GroupMarker::with_prefix("math")),
                Marker::Precondition(Arc::new(Named("group-only"))),
            ]))
            .methods(vec![cmd("add")])
            .nested_types(vec![inner.into()])
            .constructor(constructor(|_services| Ok(Arc::new(Math) as Instance)))
            .build();
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .markers(Markers::from(vec![Marker::Precondition(Arc::new(Named("owner")))]))
            .methods(vec![cmd("ping")])
            .nested_types(vec![math.into()])
            .build();

        let module = build(&root).unwrap();
        let guards = |n: &str| -> Vec<String> {
            module
                .commands()
                .iter()
                .find(|c| c.name() == n)
                .unwrap()
                .group_preconditions()
                .iter()
                .map(|p| p.name().to_string())
                .collect()
        };

        assert!(guards("ping").is_empty());
        assert_eq!(guards("math add"), vec!["group-only"]);
        assert_eq!(guards("math trig sin"), vec!["group-only", "trig-only"]);

        let pre: Vec<&str> = module.preconditions().iter().map(|p| p.name()).collect();
        assert_eq!(pre, vec!["owner"]);
    }

    #[test]
    fn missing_text_markers_stay_absent() {
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .methods(vec![cmd("ping")])
            .build();
        let module = build(&root).unwrap();
        assert_eq!(module.summary(), None);
        assert_eq!(module.description(), None);

        let json = serde_json::to_value(module.describe()).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["commands"][0]["name"], "ping");
    }

    #[test]
    fn duplicate_full_names_are_all_retained() {
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .methods(vec![cmd("ping"), cmd("ping")])
            .build();
        assert_eq!(names(&build(&root).unwrap()), vec!["ping", "ping"]);
    }

    #[test]
    fn rebuilding_yields_the_same_sequence() {
        let first = build(&sample()).unwrap();
        let second = build(&sample()).unwrap();
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn construction_failure_aborts_the_build() {
        let broken = TypeInfo::builder()
            .name("Broken")
            .type_id(TypeId::of::<Broken>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix("b"))]))
            .methods(vec![cmd("x")])
            .build();
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .methods(vec![cmd("ping")])
            .nested_types(vec![broken.into()])
            .build();

        let err = build(&root).unwrap_err();
        assert!(matches!(err, CommandError::Construction { type_name, .. } if type_name == "Broken"));
    }

    fn looping() -> TypeInfo {
        TypeInfo::builder()
            .name("Trig")
            .type_id(TypeId::of::<Trig>())
            .markers(Markers::from(vec![Marker::Group(GroupMarker::with_prefix("loop"))]))
            .nested_types(vec![TypeRef::Lazy(looping)])
            .constructor(constructor(|_services| Ok(Arc::new(Trig) as Instance)))
            .build()
    }

    #[test]
    fn cyclic_groups_are_rejected() {
        let root = TypeInfo::builder()
            .name("Root")
            .type_id(TypeId::of::<Root>())
            .nested_types(vec![TypeRef::Lazy(looping)])
            .build();

        let err = build(&root).unwrap_err();
        assert!(matches!(err, CommandError::CyclicGroup { type_name } if type_name == "Trig"));
    }
}
