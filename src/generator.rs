use crate::api::groq::GroqClient;
use crate::api::newsapi::{Headline, NewsClient};
use crate::api::pexels::PexelsClient;
use crate::config::Config;
use crate::error::{GenerateError, GenerateResult};
use crate::{ffmpeg, overlay};
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

pub const SCENE_DURATION_SECS: u32 = 7;
pub const VIDEO_FPS: u32 = 24;
pub const TRENDING_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub scenes: usize,
}

/// Builds the shared outbound HTTP client. Proxy use is disabled on the
/// builder itself rather than through process-wide environment variables.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(120))
        .build()
}

pub struct VideoGenerator {
    client: reqwest::Client,
    news: NewsClient,
    groq: GroqClient,
    pexels: PexelsClient,
    output_dir: PathBuf,
    temp_dir: PathBuf,
}

impl VideoGenerator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = build_http_client().context("failed to build HTTP client")?;
        Ok(Self {
            news: NewsClient::new(client.clone(), config.news_key.clone()),
            groq: GroqClient::new(client.clone(), config.groq_key.clone()),
            pexels: PexelsClient::new(client.clone(), config.pexels_key.clone()),
            client,
            output_dir: PathBuf::from(&config.output_dir),
            temp_dir: PathBuf::from(&config.temp_dir),
        })
    }

    pub async fn trending_topics(&self) -> GenerateResult<Vec<Headline>> {
        self.news.fetch_trending(TRENDING_LIMIT).await
    }

    /// The whole assembly pipeline for one topic: script generation, per-scene
    /// photo fetch and caption render, clip composition, final concat/encode.
    /// Scenes with no matching photo are skipped; everything else is
    /// all-or-nothing.
    pub async fn generate_video(
        &self,
        topic: &Headline,
    ) -> GenerateResult<(String, VideoMetadata)> {
        let script = self.groq.generate_script(topic).await?;

        // All temp assets for this call live in a session directory removed
        // on drop, success or failure.
        let session = tempfile::Builder::new()
            .prefix("gen_")
            .tempdir_in(&self.temp_dir)?;

        let mut scene_clips = Vec::new();
        for (idx, scene) in script.scenes.iter().enumerate() {
            let Some(img_url) = self.pexels.search_photo(&scene.keywords).await? else {
                warn!("no stock photo for scene {idx} ({}); skipping", scene.keywords);
                continue;
            };

            let img_path = session.path().join(format!("img_{idx}.jpg"));
            self.download_image(&img_url, &img_path).await?;

            let overlay_png = overlay::render_overlay(&scene.narration, session.path()).await?;

            let clip_path = session.path().join(format!("scene_{idx}.mp4"));
            ffmpeg::compose_scene_clip(
                &img_path,
                &overlay_png,
                SCENE_DURATION_SECS,
                VIDEO_FPS,
                &clip_path,
            )
            .await?;
            info!("built scene clip {}/{}", idx + 1, script.scenes.len());
            scene_clips.push(clip_path);
        }

        if scene_clips.is_empty() {
            return Err(GenerateError::NoUsableScenes);
        }

        let filename = artifact_filename();
        let dest = self.output_dir.join(&filename);
        ffmpeg::concat_compose(&scene_clips, VIDEO_FPS, &dest).await?;
        info!(
            "wrote video artifact: {} ({} of {} scenes)",
            dest.display(),
            scene_clips.len(),
            script.scenes.len()
        );

        let metadata = VideoMetadata {
            title: script.title,
            scenes: scene_clips.len(),
        };
        Ok((filename, metadata))
    }

    async fn download_image(&self, url: &str, dest: &Path) -> GenerateResult<()> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        fs::write(dest, &bytes).await?;
        Ok(())
    }
}

/// `vid_HHMMSS` stem kept for readability; the unique suffix makes
/// same-second generations distinct.
fn artifact_filename() -> String {
    let stamp = Local::now().format("%H%M%S");
    let unique = Uuid::new_v4().simple().to_string();
    format!("vid_{stamp}_{}.mp4", &unique[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_filenames_are_unique_within_a_second() {
        let a = artifact_filename();
        let b = artifact_filename();
        assert_ne!(a, b);
    }

    #[test]
    fn artifact_filename_shape() {
        let name = artifact_filename();
        assert!(name.starts_with("vid_"));
        assert!(name.ends_with(".mp4"));
        // vid_ + HHMMSS + _ + 8 hex chars + .mp4
        assert_eq!(name.len(), 4 + 6 + 1 + 8 + 4);
    }
}
