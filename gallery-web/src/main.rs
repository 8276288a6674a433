mod browser;
mod error;
mod handlers;
mod network;
mod state;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "gallery-web")]
#[command(about = "Serve a built gallery with its like counter", long_about = None)]
struct Args {
    /// Gallery directory produced by `gallery build`
    #[arg(short, long, env = "GALLERY_DIR", default_value = "./gallery_output")]
    dir: PathBuf,

    /// Address to bind (all interfaces by default)
    #[arg(long, env = "GALLERY_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Do not open a browser window on startup
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_web=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if !args.dir.is_dir() {
        anyhow::bail!("Gallery directory does not exist: {}", args.dir.display());
    }

    let state = AppState::new(args.dir.clone());
    let app = build_router(state);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Gallery web server listening on {}", addr);
    print_banner(&args);

    if !args.no_browser {
        let url = format!("http://localhost:{}", args.port);
        if let Err(e) = browser::open(&url) {
            tracing::warn!("Could not open a browser at {}: {}", url, e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\nServer stopped");

    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.layout.root());

    Router::new()
        .route("/likes", get(handlers::get_likes))
        .route("/save-likes", post(handlers::save_likes))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn print_banner(args: &Args) {
    let rule = "=".repeat(50);
    let dir = args.dir.canonicalize().unwrap_or_else(|_| args.dir.clone());

    println!("\n{rule}");
    println!("✓ Gallery server running");
    println!("{rule}");
    println!("\nServing files from: {}", dir.display());
    println!("\nAccess your gallery at:");
    println!("  • http://localhost:{}", args.port);
    // Only the default-route interface is discovered, not every local address
    for addr in network::reachable_addresses(args.host) {
        match addr {
            IpAddr::V4(v4) => println!("  • http://{}:{}", v4, args.port),
            IpAddr::V6(v6) => println!("  • http://[{}]:{}", v6, args.port),
        }
    }
    println!("\nPress Ctrl+C to stop the server");
    println!("{rule}\n");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server");
}
