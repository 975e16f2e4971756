//! Flowdeck runner - workflow execution service

use clap::{Parser, Subcommand};
use flowdeck_gateway::{start_runner, BindMode, RunnerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowdeck-gateway", about = "Flowdeck workflow runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the workflow runner server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short, long, default_value = "loopback")]
        bind: String,
        /// Base URL of the document store backing knowledge-base stages
        #[arg(short, long, default_value = "http://127.0.0.1:8001")]
        document_store: String,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            bind,
            document_store,
        } => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "flowdeck=info,tower_http=info".into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            let bind_mode = match bind.as_str() {
                "lan" | "0.0.0.0" => BindMode::Lan,
                _ => BindMode::Loopback,
            };

            let config = RunnerConfig {
                port,
                bind: bind_mode,
                document_store_url: document_store,
                gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
                openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            };
            start_runner(config).await?;
        }

        Commands::Version => {
            println!("flowdeck v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
