use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "capjobs",
    about = "Read-only API over job listings grouped by capital city and keyword"
)]
struct Cli {
    /// Address to listen on. Overrides BIND_ADDR.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// HTML file served on `/`. Overrides INDEX_HTML.
    #[arg(long)]
    index: Option<PathBuf>,

    /// Default the log filter to `debug` when RUST_LOG is unset.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = capjobs_core::Config::load()?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(index) = cli.index {
        config.server.index_html = index;
    }

    capjobs::serve(config).await
}
