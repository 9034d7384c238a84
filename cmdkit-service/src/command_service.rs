use crate::{
    config::CommandServiceConfig,
    dependency_map::DependencyMap,
    dispatcher::CommandDispatcher,
    error::ServiceError,
    search::{SearchMatch, match_tokens},
};
use async_trait::async_trait;
use cmdkit_core::{
    command::Command,
    context::CommandContext,
    error::CoreResult,
    factory::{ConstructorFactory, InstanceFactory},
    introspect::{Instance, Introspect, TypeInfo},
    module::Module,
    module_builder::ModuleBuilder,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 基于内存的命令注册表
/// - 以根类型的 TypeId 注册模块
/// - 按完整命令名做文本前缀搜索，检查前置条件后调用
pub struct CommandService {
    config: CommandServiceConfig,
    dependencies: DependencyMap,
    factory: Arc<dyn InstanceFactory>,
    modules: DashMap<TypeId, Arc<Module>>,
}

impl Default for CommandService {
    fn default() -> Self {
        Self::new(CommandServiceConfig::default())
    }
}

impl CommandService {
    pub fn new(config: CommandServiceConfig) -> Self {
        Self::with_factory(config, Arc::new(ConstructorFactory))
    }

    pub fn with_factory(config: CommandServiceConfig, factory: Arc<dyn InstanceFactory>) -> Self {
        Self {
            config,
            dependencies: DependencyMap::new(),
            factory,
            modules: DashMap::new(),
        }
    }

    pub fn config(&self) -> &CommandServiceConfig {
        &self.config
    }

    /// 分组/模块构造器可解析的依赖
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// 注册模块：通过工厂构造根实例
    pub fn add_module<T: Introspect>(&self) -> Result<Arc<Module>, ServiceError> {
        self.add_module_info(T::type_info())
    }

    /// 注册模块：使用调用方已构造好的根实例
    pub fn add_module_instance<T: Introspect>(&self, instance: T) -> Result<Arc<Module>, ServiceError> {
        let info = T::type_info();
        self.register(Arc::new(instance), &info)
    }

    /// 注册手写描述表对应的模块
    pub fn add_module_info(&self, info: TypeInfo) -> Result<Arc<Module>, ServiceError> {
        if info.markers().module().is_none() {
            return Err(ServiceError::NotAModule(info.name().to_string()));
        }

        let instance = self.factory.create(&info, &self.dependencies)?;
        self.register(instance, &info)
    }

    fn register(&self, instance: Instance, info: &TypeInfo) -> Result<Arc<Module>, ServiceError> {
        let Some(marker) = info.markers().module() else {
            return Err(ServiceError::NotAModule(info.name().to_string()));
        };

        let module = ModuleBuilder::new(&self.dependencies, self.factory.as_ref())
            .build(instance, marker, info)?;
        let module = Arc::new(module);

        match self.modules.entry(info.type_id()) {
            Entry::Occupied(_) if self.config.reject_duplicate_modules => {
                return Err(ServiceError::AlreadyRegistered {
                    module: info.name().to_string(),
                });
            }
            Entry::Occupied(mut slot) => {
                warn!(module = %module, "module replaced");
                slot.insert(module.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(module.clone());
            }
        }

        self.warn_on_duplicate_names(&module);
        info!(
            module = %module,
            commands = module.commands().len(),
            "module registered"
        );

        Ok(module)
    }

    // 同名命令全部保留，只记录告警；歧义在搜索时按优先级处理
    fn warn_on_duplicate_names(&self, added: &Module) {
        for (command, occurrences) in self.duplicate_names(added) {
            warn!(command = command.as_str(), module = %added, occurrences, "duplicate command name");
        }
    }

    /// 新模块中与注册表（含其自身）重名的命令及出现次数，按首次出现顺序
    fn duplicate_names(&self, added: &Module) -> Vec<(String, usize)> {
        let key = |name: &str| {
            if self.config.case_sensitive_commands {
                name.to_string()
            } else {
                name.to_lowercase()
            }
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in self.modules.iter() {
            for command in entry.value().commands() {
                *counts.entry(key(command.name())).or_default() += 1;
            }
        }

        let mut reported: HashSet<String> = HashSet::new();
        added
            .commands()
            .iter()
            .filter_map(|command| {
                let name = key(command.name());
                let occurrences = counts.get(&name).copied().unwrap_or_default();
                (occurrences > 1 && reported.insert(name))
                    .then(|| (command.name().to_string(), occurrences))
            })
            .collect()
    }

    pub fn remove_module<T: Introspect>(&self) -> bool {
        self.remove_module_by_id(TypeId::of::<T>())
    }

    /// 按根类型 TypeId 注销模块（适用于手写描述表注册的模块）
    pub fn remove_module_by_id(&self, type_id: TypeId) -> bool {
        let removed = self.modules.remove(&type_id);
        if let Some((_, module)) = &removed {
            info!(module = %module, "module removed");
        }
        removed.is_some()
    }

    /// 已注册模块（按名称排序）
    pub fn modules(&self) -> Vec<Arc<Module>> {
        let mut modules: Vec<Arc<Module>> =
            self.modules.iter().map(|e| e.value().clone()).collect();
        modules.sort_by(|a, b| a.name().cmp(b.name()));
        modules
    }

    /// 全部命令（按模块名，再按发现顺序）
    pub fn commands(&self) -> Vec<Command> {
        self.modules()
            .iter()
            .flat_map(|m| m.commands().iter().cloned())
            .collect()
    }

    /// 按文本搜索候选命令，最长匹配在前
    pub fn search(&self, text: &str) -> Vec<SearchMatch> {
        let input: Vec<&str> = text.split_whitespace().collect();
        let mut found: Vec<SearchMatch> = Vec::new();

        for module in self.modules() {
            for command in module.commands() {
                if let Some(depth) =
                    match_tokens(command.name(), &input, self.config.case_sensitive_commands)
                {
                    found.push(SearchMatch::new(module.clone(), command.clone(), &input, depth));
                }
            }
        }

        found.sort_by(SearchMatch::precedence);
        debug!(text, candidates = found.len(), "command search");
        found
    }

    // 顺序：模块级 -> 外层分组（由外到内） -> 命令级
    async fn check_preconditions(ctx: &CommandContext, candidate: &SearchMatch) -> CoreResult<()> {
        for precondition in candidate
            .module
            .preconditions()
            .iter()
            .chain(candidate.command.group_preconditions())
            .chain(candidate.command.preconditions())
        {
            precondition.check(ctx, &candidate.command).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandDispatcher for CommandService {
    async fn execute(&self, ctx: &CommandContext, text: &str) -> Result<(), ServiceError> {
        let candidates = self.search(text);
        let mut rejection = None;

        for candidate in candidates {
            match Self::check_preconditions(ctx, &candidate).await {
                Ok(()) => {
                    debug!(command = candidate.command.name(), args = candidate.args.len(), "dispatching");
                    let SearchMatch { command, args, .. } = candidate;
                    return command.invoke(ctx, args).await.map_err(ServiceError::from);
                }
                Err(err) => {
                    warn!(command = candidate.command.name(), error = %err, "precondition rejected");
                    rejection = Some(err);
                }
            }
        }

        match rejection {
            Some(err) => Err(err.into()),
            None => Err(ServiceError::UnknownCommand(text.trim().to_string())),
        }
    }
}
