//! HTTP surface tests for the endpoints that do not need live credentials:
//! the video listing and the video file route.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use ai_news_shorts::config::Config;
use ai_news_shorts::generator::VideoGenerator;
use ai_news_shorts::server::create_router;

fn test_router(output_dir: &TempDir) -> Router {
    let config = Config {
        groq_key: "test-key".to_string(),
        news_key: "test-key".to_string(),
        pexels_key: "test-key".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        output_dir: output_dir.path().display().to_string(),
        temp_dir: output_dir.path().display().to_string(),
    };
    let generator = VideoGenerator::new(&config).unwrap();
    create_router(generator, output_dir.path().to_path_buf())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_answers_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn video_listing_only_reports_mp4_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vid_101010_deadbeef.mp4"), b"abc").unwrap();
    std::fs::write(dir.path().join("vid_101011_cafebabe.mp4"), b"def").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not a video").unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/videos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let videos = json["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    for video in videos {
        let filename = video["filename"].as_str().unwrap();
        assert!(filename.ends_with(".mp4"));
        assert_eq!(video["size"], "0.00 MB");
        // "%Y-%m-%d %H:%M:%S"
        assert_eq!(video["created"].as_str().unwrap().len(), 19);
    }
}

#[tokio::test]
async fn existing_video_streams_as_mp4() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vid_090000_0badf00d.mp4"), b"mp4-bytes").unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/videos/vid_090000_0badf00d.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"mp4-bytes");
}

#[tokio::test]
async fn missing_video_is_a_404_with_the_expected_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/videos/missing.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Video not found");
}

#[tokio::test]
async fn path_traversal_in_the_filename_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.mp4"), b"secret").unwrap();
    let app = test_router(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/videos/..%2Fsecret.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
