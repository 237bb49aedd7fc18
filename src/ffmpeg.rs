use crate::error::{GenerateError, GenerateResult};
use crate::overlay;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs ffmpeg with quiet output and the given arguments, capturing stderr
/// so a failure carries the encoder's own diagnostic.
pub async fn run_ffmpeg(args: &[String]) -> GenerateResult<()> {
    let output = Command::new("ffmpeg")
        .args(["-y", "-hide_banner", "-loglevel", "error"])
        .args(args)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GenerateError::Ffmpeg(stderr));
    }
    Ok(())
}

/// Width and height of the first video stream; works for still images too.
pub async fn probe_dimensions(path: &Path) -> GenerateResult<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(GenerateError::Ffmpeg(format!(
            "ffprobe failed for {}",
            path.display()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let mut parts = text.split('x');
    let w = parts.next().and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
    let h = parts.next().and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);

    if w == 0 || h == 0 {
        return Err(GenerateError::Ffmpeg(format!(
            "invalid dimensions for {}",
            path.display()
        )));
    }
    Ok((w, h))
}

fn scene_clip_args(
    photo: &Path,
    overlay_png: &Path,
    duration_secs: u32,
    fps: u32,
    out_mp4: &Path,
) -> Vec<String> {
    let duration = duration_secs.to_string();
    // Photo scaled to the canvas width with an even preserved-aspect height;
    // the caption overlay rides the bottom edge of the composited clip.
    let filter = format!(
        "[0:v]scale={}:-2[bg];[bg][1:v]overlay=x=0:y=main_h-overlay_h[v]",
        overlay::FRAME_WIDTH
    );

    vec![
        "-loop".to_string(),
        "1".to_string(),
        "-t".to_string(),
        duration.clone(),
        "-i".to_string(),
        photo.display().to_string(),
        "-loop".to_string(),
        "1".to_string(),
        "-t".to_string(),
        duration,
        "-i".to_string(),
        overlay_png.display().to_string(),
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(),
        "[v]".to_string(),
        "-r".to_string(),
        fps.to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-preset".to_string(),
        "ultrafast".to_string(),
        "-an".to_string(),
        out_mp4.display().to_string(),
    ]
}

/// One fixed-duration scene clip: the photo looped for the duration with the
/// caption overlay layered on top.
pub async fn compose_scene_clip(
    photo: &Path,
    overlay_png: &Path,
    duration_secs: u32,
    fps: u32,
    out_mp4: &Path,
) -> GenerateResult<()> {
    let args = scene_clip_args(photo, overlay_png, duration_secs, fps, out_mp4);
    run_ffmpeg(&args).await
}

fn concat_filter(count: usize, canvas_w: u32, canvas_h: u32) -> String {
    let mut filter = String::new();
    for i in 0..count {
        filter.push_str(&format!(
            "[{i}:v]pad={canvas_w}:{canvas_h}:(ow-iw)/2:(oh-ih)/2:black[p{i}];"
        ));
    }
    for i in 0..count {
        filter.push_str(&format!("[p{i}]"));
    }
    filter.push_str(&format!("concat=n={count}:v=1:a=0[v]"));
    filter
}

/// Concatenates the scene clips in order onto a common canvas sized to the
/// largest clip, so clips of differing natural heights pad rather than fail,
/// and encodes the timeline as a silent mp4.
pub async fn concat_compose(clips: &[PathBuf], fps: u32, out_mp4: &Path) -> GenerateResult<()> {
    if clips.is_empty() {
        return Err(GenerateError::NoUsableScenes);
    }

    let mut canvas_w = 0u32;
    let mut canvas_h = 0u32;
    for clip in clips {
        let (w, h) = probe_dimensions(clip).await?;
        canvas_w = canvas_w.max(w);
        canvas_h = canvas_h.max(h);
    }

    let mut args = Vec::new();
    for clip in clips {
        args.push("-i".to_string());
        args.push(clip.display().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        concat_filter(clips.len(), canvas_w, canvas_h),
        "-map".to_string(),
        "[v]".to_string(),
        "-r".to_string(),
        fps.to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-preset".to_string(),
        "ultrafast".to_string(),
        "-an".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        out_mp4.display().to_string(),
    ]);

    run_ffmpeg(&args).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_clip_loops_both_inputs_for_the_duration() {
        let args = scene_clip_args(
            Path::new("img_0.jpg"),
            Path::new("txt_0.png"),
            7,
            24,
            Path::new("scene_0.mp4"),
        );
        assert_eq!(args.iter().filter(|a| *a == "-loop").count(), 2);
        assert_eq!(args.iter().filter(|a| *a == "7").count(), 2);
        assert!(args.contains(&"-an".to_string()));
        assert!(args.contains(&"ultrafast".to_string()));
        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "24"));
    }

    #[test]
    fn scene_clip_anchors_the_overlay_to_the_bottom_edge() {
        let args = scene_clip_args(
            Path::new("a.jpg"),
            Path::new("b.png"),
            7,
            24,
            Path::new("c.mp4"),
        );
        let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert!(filter.contains("scale=1920:-2"));
        assert!(filter.contains("overlay=x=0:y=main_h-overlay_h"));
    }

    #[test]
    fn concat_filter_pads_every_input_onto_the_common_canvas() {
        let filter = concat_filter(3, 1920, 1280);
        assert_eq!(filter.matches("pad=1920:1280").count(), 3);
        assert!(filter.ends_with("concat=n=3:v=1:a=0[v]"));
        assert!(filter.contains("[p0][p1][p2]concat"));
    }

    #[tokio::test]
    async fn concat_refuses_an_empty_clip_list() {
        let err = concat_compose(&[], 24, Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NoUsableScenes));
    }
}
