use cmdkit_core::context::CommandContext;
use cmdkit_core::error::CoreResult;
use cmdkit_core::introspect::Introspect;
use cmdkit_macros::module;

#[derive(Default)]
struct Forms;

#[module]
impl Forms {
    #[command]
    async fn bare(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }

    #[command("short", summary = "positional name")]
    async fn shorthand(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }

    #[command(name = "long", description = "keyed name")]
    async fn keyed(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        self.helper();
        Ok(())
    }

    fn helper(&self) {}
}

fn main() {
    let info = <Forms as Introspect>::type_info();
    let names: Vec<&str> = info
        .declared_methods()
        .iter()
        .filter_map(|m| m.markers().command().map(|c| c.name()))
        .collect();
    assert_eq!(names, vec!["bare", "short", "long"]);
    assert_eq!(info.declared_methods()[1].name(), "shorthand");
    assert_eq!(info.declared_methods()[1].markers().summary(), Some("positional name"));
    assert_eq!(info.declared_methods()[2].markers().description(), Some("keyed name"));
}
