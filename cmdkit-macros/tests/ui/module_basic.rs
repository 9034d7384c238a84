use cmdkit_core::context::CommandContext;
use cmdkit_core::error::CoreResult;
use cmdkit_core::introspect::Introspect;
use cmdkit_macros::module;

#[derive(Default)]
struct Ping;

#[module(summary = "liveness", description = "basic health commands")]
impl Ping {
    #[command("ping")]
    async fn ping(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }
}

fn main() {
    let info = <Ping as Introspect>::type_info();
    assert_eq!(info.name(), "Ping");
    assert!(info.markers().module().is_some());
    assert_eq!(info.markers().summary(), Some("liveness"));
    assert_eq!(info.declared_methods().len(), 1);
}
