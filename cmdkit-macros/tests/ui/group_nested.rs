use async_trait::async_trait;
use cmdkit_core::command::Command;
use cmdkit_core::context::CommandContext;
use cmdkit_core::error::{CommandError, CoreResult};
use cmdkit_core::introspect::Introspect;
use cmdkit_core::precondition::Precondition;
use cmdkit_core::services::ServiceProvider;
use cmdkit_macros::{group, module};

#[derive(Debug)]
struct RequireOwner;

#[async_trait]
impl Precondition for RequireOwner {
    fn name(&self) -> &str {
        "RequireOwner"
    }

    async fn check(&self, ctx: &CommandContext, _command: &Command) -> CoreResult<()> {
        match ctx.actor_id() {
            Some("owner") => Ok(()),
            _ => Err(CommandError::unmet("RequireOwner", "not the owner")),
        }
    }
}

#[derive(Default)]
struct Root;

#[module(prefix = "calc", preconditions(RequireOwner), groups(Math, Layout))]
impl Root {}

struct Math {
    scale: i64,
}

impl Math {
    fn new(_services: &dyn ServiceProvider) -> CoreResult<Self> {
        Ok(Self { scale: 1 })
    }
}

#[group(prefix = "math", constructor = Math::new)]
impl Math {
    #[command]
    async fn add(&self, _ctx: &CommandContext, args: Vec<String>) -> CoreResult<()> {
        let _ = args.len() as i64 * self.scale;
        Ok(())
    }
}

#[derive(Default)]
struct Layout;

#[group]
impl Layout {}

fn main() {
    let info = <Root as Introspect>::type_info();
    assert_eq!(info.declared_nested_types().len(), 2);
    assert_eq!(info.markers().preconditions().len(), 1);
    assert_eq!(info.markers().module().and_then(|m| m.prefix()), Some("calc"));

    let math = info.declared_nested_types()[0].resolve();
    assert_eq!(math.markers().group().and_then(|g| g.prefix()), Some("math"));

    let layout = info.declared_nested_types()[1].resolve();
    assert!(layout.markers().group().is_some_and(|g| g.is_transparent()));
}
