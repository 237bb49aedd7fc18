use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_news_shorts::config::Config;
use ai_news_shorts::generator::VideoGenerator;
use ai_news_shorts::{init, server};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    init::ensure_directories(&config).await?;
    if !init::check_ffmpeg().await {
        warn!("ffmpeg not found in PATH; video generation will fail");
    }

    let generator = VideoGenerator::new(&config)?;
    let app = server::create_router(generator, PathBuf::from(&config.output_dir));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
