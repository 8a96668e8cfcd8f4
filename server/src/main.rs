use anyhow::Result;
use axum::Router;
use clap::Parser;
use gamerec_core::SelfExclusion;
use gamerec_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory holding the CSV datasets
    #[arg(long, default_value = "./data")]
    data_dir: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Exclude the query item by dropping the top ranked row instead of by index
    #[arg(long, default_value_t = false)]
    top_rank_exclusion: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let exclusion = if args.top_rank_exclusion { SelfExclusion::TopRank } else { SelfExclusion::ById };
    let app: Router = build_app(args.data_dir.clone(), exclusion)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_dir = %args.data_dir, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
