mod config;
mod error;

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use ferry_runtime::{AnthropicBackend, McpToolHost, Session};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "ferry.toml";

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Chat with an LLM that can call the tools of one MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the MCP server script (.py or .js)
    server_script: PathBuf,

    /// Config file (defaults to ./ferry.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Arguments are parsed before anything logs the server path.
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let api_key = config.api_key(std::env::var("ANTHROPIC_API_KEY").ok())?;
    let model = std::env::var("FERRY_MODEL").unwrap_or_else(|_| config.backend.model.clone());

    let mut builder =
        AnthropicBackend::builder(api_key, &model).max_tokens(config.backend.max_tokens);
    let base_url = config
        .backend
        .base_url
        .clone()
        .or_else(|| std::env::var("ANTHROPIC_BASE_URL").ok());
    if let Some(base_url) = base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(system) = &config.backend.system {
        builder = builder.system(system);
    }
    let backend = builder.build();

    let server = cli.server_script.display().to_string();
    let host = McpToolHost::connect(&cli.server_script, &config.host).await?;
    info!(%server, %backend, "connected to the server");

    println!("ferry v{}", env!("CARGO_PKG_VERSION"));
    let session = Session::new(backend, host, config.session);
    session
        .interactive_loop(io::stdin().lock(), io::stdout())
        .await?;

    info!(%server, "disconnected from the server");
    Ok(())
}

fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "ferry_cli=debug,ferry_runtime=debug"
    } else {
        "ferry_cli=info,ferry_runtime=info"
    }
}

fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}
