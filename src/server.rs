use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::fs;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::api::newsapi::Headline;
use crate::error::{GenerateError, GenerateResult};
use crate::generator::VideoGenerator;

#[derive(Clone)]
pub struct AppState {
    generator: Arc<VideoGenerator>,
    output_dir: PathBuf,
    // one generation in flight at a time
    generation_lock: Arc<Mutex<()>>,
}

pub fn create_router(generator: VideoGenerator, output_dir: PathBuf) -> Router {
    let state = AppState {
        generator: Arc::new(generator),
        output_dir,
        generation_lock: Arc::new(Mutex::new(())),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/trending-topics", get(trending_topics))
        .route("/api/generate-video", post(generate_video))
        .route("/api/videos", get(list_videos))
        .route("/videos/{filename}", get(serve_video))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn status_for(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::InvalidTopicIndex => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn generate_failure(err: &GenerateError) -> Response {
    failure(status_for(err), &err.to_string())
}

pub fn select_topic(topics: &[Headline], index: usize) -> GenerateResult<&Headline> {
    topics.get(index).ok_or(GenerateError::InvalidTopicIndex)
}

async fn trending_topics(State(state): State<AppState>) -> Response {
    match state.generator.trending_topics().await {
        Ok(topics) => Json(json!({ "success": true, "topics": topics })).into_response(),
        Err(err) => {
            error!("trending topics failed: {err}");
            generate_failure(&err)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    topic_index: usize,
}

async fn generate_video(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let topics = match state.generator.trending_topics().await {
        Ok(topics) => topics,
        Err(err) => {
            error!("topic refetch failed: {err}");
            return generate_failure(&err);
        }
    };

    let topic = match select_topic(&topics, req.topic_index) {
        Ok(topic) => topic,
        Err(err) => return generate_failure(&err),
    };

    let _running = state.generation_lock.lock().await;
    match state.generator.generate_video(topic).await {
        Ok((video_path, metadata)) => Json(json!({
            "success": true,
            "video_path": video_path,
            "metadata": metadata,
        }))
        .into_response(),
        Err(err) => {
            error!("generation failed: {err}");
            generate_failure(&err)
        }
    }
}

#[derive(Debug, Serialize)]
struct VideoEntry {
    filename: String,
    created: String,
    size: String,
}

async fn list_videos(State(state): State<AppState>) -> Response {
    match collect_videos(&state.output_dir).await {
        Ok(videos) => Json(json!({ "success": true, "videos": videos })).into_response(),
        Err(err) => {
            error!("video listing failed: {err}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn collect_videos(dir: &Path) -> std::io::Result<Vec<VideoEntry>> {
    let mut rows: Vec<(SystemTime, VideoEntry)> = Vec::new();

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_mp4 = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
        if !is_mp4 {
            continue;
        }

        let meta = entry.metadata().await?;
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let created_local: DateTime<Local> = created.into();

        rows.push((
            created,
            VideoEntry {
                filename: entry.file_name().to_string_lossy().into_owned(),
                created: created_local.format("%Y-%m-%d %H:%M:%S").to_string(),
                size: format!("{:.2} MB", meta.len() as f64 / (1024.0 * 1024.0)),
            },
        ));
    }

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(rows.into_iter().map(|(_, entry)| entry).collect())
}

async fn serve_video(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Response {
    // single flat directory; anything path-like is not a video we serve
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return video_not_found();
    }

    let path = state.output_dir.join(&filename);
    match fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "video/mp4")], bytes).into_response(),
        Err(_) => video_not_found(),
    }
}

fn video_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Video not found" })),
    )
        .into_response()
}
