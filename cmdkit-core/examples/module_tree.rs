use cmdkit_core::context::CommandContext;
use cmdkit_core::error::CoreResult;
use cmdkit_core::introspect::Introspect;
use cmdkit_core::services::NoServices;
use cmdkit_core::build_module;
use cmdkit_macros::{group, module};
use std::sync::Arc;

#[derive(Default)]
struct Music;

#[module(summary = "music playback", groups(Queue))]
impl Music {
    #[command]
    async fn play(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }

    #[command]
    async fn stop(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Queue;

#[group(prefix = "queue")]
impl Queue {
    #[command(summary = "show the queue")]
    async fn list(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }

    #[command]
    async fn clear(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let info = Music::type_info();
    let marker = info.markers().module().cloned().unwrap_or_default();
    let module = build_module(&NoServices, Arc::new(Music), &marker, &info)?;

    println!("{module}: {}", module.summary().unwrap_or("-"));
    for command in module.commands() {
        println!("  {:<12} {}", command.name(), command.summary().unwrap_or(""));
    }

    Ok(())
}
