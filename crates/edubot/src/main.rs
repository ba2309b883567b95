use clap::{Parser, Subcommand};
use edubot_core::inference::{InferenceConfig, ModelMode};
use edubot_events::bus::EventBus;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "edubot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Serve,
    Openapi,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            let db_path =
                std::env::var("EDUBOT_DB_PATH").unwrap_or_else(|_| ".edubot/edubot.db".to_string());
            if let Some(parent) = Path::new(&db_path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let docs_dir = std::env::var("EDUBOT_DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".edubot/docs"));
            let port = std::env::var("EDUBOT_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(5000);
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
            let state = edubot_serve::AppState {
                db_path,
                docs_dir,
                static_dir: static_dir_from_env(),
                event_bus: EventBus::new(1024),
                inference: inference_from_env(),
            };
            info!(%addr, "edubot listening");
            if let Err(err) = edubot_serve::serve(state, addr).await {
                eprintln!("serve error: {err}");
            }
        }
        Command::Openapi => {
            let spec = edubot_serve::openapi::generate_spec();
            println!("{spec}");
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn static_dir_from_env() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("EDUBOT_STATIC_DIR") {
        return Some(PathBuf::from(dir));
    }
    let default = PathBuf::from("frontend");
    default.is_dir().then_some(default)
}

/// The chat endpoint works without a model; it falls back to the keyword
/// resolver when `EDUBOT_MODEL_CMD` is unset.
fn inference_from_env() -> Option<InferenceConfig> {
    let command = std::env::var("EDUBOT_MODEL_CMD").ok()?;
    let mut config = InferenceConfig::new(command);
    if let Ok(mode) = std::env::var("EDUBOT_MODEL_MODE") {
        config.mode = match mode.as_str() {
            "direct" => ModelMode::Direct,
            _ => ModelMode::Json,
        };
    }
    if let Some(secs) = std::env::var("EDUBOT_MODEL_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        config.timeout = Duration::from_secs(secs);
    }
    config.num_predict = std::env::var("EDUBOT_NUM_PREDICT")
        .ok()
        .and_then(|value| value.parse::<u32>().ok());
    Some(config)
}
