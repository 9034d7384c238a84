use async_trait::async_trait;
use cmdkit_core::command::Command;
use cmdkit_core::context::CommandContext;
use cmdkit_core::error::{CommandError, CoreResult};
use cmdkit_core::precondition::Precondition;
use cmdkit_core::services::{ServiceProvider, ServiceProviderExt};
use cmdkit_macros::{group, module};
use cmdkit_service::{CommandDispatcher, CommandService, CommandServiceConfig};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct RequireDj;

#[async_trait]
impl Precondition for RequireDj {
    fn name(&self) -> &str {
        "RequireDj"
    }

    async fn check(&self, ctx: &CommandContext, _command: &Command) -> CoreResult<()> {
        match ctx.actor_id() {
            Some("dj") => Ok(()),
            other => Err(CommandError::unmet(
                "RequireDj",
                format!("actor={}", other.unwrap_or("anonymous")),
            )),
        }
    }
}

#[derive(Default)]
struct Playlist(Mutex<Vec<String>>);

#[derive(Default)]
struct Music;

#[module(
    summary = "music playback",
    description = "play tracks and manage the queue",
    groups(Queue, Controls)
)]
impl Music {
    #[command(summary = "start playing a track")]
    async fn play(&self, ctx: &CommandContext, args: Vec<String>) -> CoreResult<()> {
        println!("[{}] now playing: {}", ctx.actor_id().unwrap_or("-"), args.join(" "));
        Ok(())
    }
}

struct Queue {
    playlist: Arc<Playlist>,
}

impl Queue {
    fn new(services: &dyn ServiceProvider) -> CoreResult<Self> {
        Ok(Self {
            playlist: services.resolve::<Playlist>()?,
        })
    }
}

#[group(prefix = "queue", summary = "queue management", constructor = Queue::new)]
impl Queue {
    #[command(summary = "append a track")]
    async fn add(&self, _ctx: &CommandContext, args: Vec<String>) -> CoreResult<()> {
        let mut tracks = self
            .playlist
            .0
            .lock()
            .map_err(|e| CommandError::invocation("queue add", e.to_string()))?;
        tracks.push(args.join(" "));
        println!("queued ({} total)", tracks.len());
        Ok(())
    }

    #[command(summary = "drop every queued track", preconditions(RequireDj))]
    async fn clear(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        self.playlist
            .0
            .lock()
            .map_err(|e| CommandError::invocation("queue clear", e.to_string()))?
            .clear();
        println!("queue cleared");
        Ok(())
    }

    #[command]
    async fn list(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        let tracks = self
            .playlist
            .0
            .lock()
            .map_err(|e| CommandError::invocation("queue list", e.to_string()))?;
        for (idx, track) in tracks.iter().enumerate() {
            println!("{:>2}. {track}", idx + 1);
        }
        Ok(())
    }
}

// 透明分组：命令直接挂在根名称下
#[derive(Default)]
struct Controls;

#[group]
impl Controls {
    #[command(summary = "pause playback")]
    async fn pause(&self, _ctx: &CommandContext, _args: Vec<String>) -> CoreResult<()> {
        println!("paused");
        Ok(())
    }
}

fn load_config() -> anyhow::Result<CommandServiceConfig> {
    match std::env::var("CMDKIT_CONFIG") {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(_) => Ok(CommandServiceConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cmdkit_core=debug,cmdkit_service=debug,demo=info")),
        )
        .init();

    let config = load_config()?;
    info!(?config, "starting");

    let service = CommandService::new(config);
    service.dependencies().insert(Playlist::default());
    let music = service.add_module::<Music>()?;

    println!("{}", serde_json::to_string_pretty(&music.describe())?);

    let script = [
        ("listener", "play never gonna give you up"),
        ("listener", "queue add take on me"),
        ("listener", "QUEUE add africa"),
        ("listener", "queue list"),
        ("listener", "queue clear"),
        ("dj", "queue clear"),
        ("listener", "pause"),
        ("listener", "skip"),
    ];

    for (actor, line) in script {
        let ctx = CommandContext::builder()
            .message(line)
            .actor_id(actor)
            .build();
        if let Err(err) = service.execute(&ctx, line).await {
            warn!(line, error = %err, "command failed");
        }
    }

    Ok(())
}
