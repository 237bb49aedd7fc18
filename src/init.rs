use crate::config::Config;
use anyhow::Result;
use std::path::Path;
use tokio::fs;
use tracing::info;

pub async fn ensure_directories(config: &Config) -> Result<()> {
    for dir in [&config.output_dir, &config.temp_dir] {
        if !Path::new(dir).exists() {
            fs::create_dir_all(dir).await?;
            info!("created directory: {}", dir);
        }
    }
    Ok(())
}

pub async fn check_ffmpeg() -> bool {
    match tokio::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
    {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
