use crate::error::GenerateResult;
use crate::ffmpeg;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

pub const FRAME_WIDTH: u32 = 1920;
pub const FRAME_HEIGHT: u32 = 1080;

const BAR_HEIGHT: u32 = 250;
const BAR_ALPHA: f64 = 160.0 / 255.0;
const FONT_SIZE: u32 = 50;
const WRAP_COLUMNS: usize = 50;
const FIRST_LINE_Y: u32 = FRAME_HEIGHT - 180;
const LINE_STEP: u32 = 60;

/// Lines past this count would leave the caption band, so the layout is
/// truncated instead of letting text run off the bottom of the frame.
pub const MAX_LINES: usize = 3;

const FONT_CANDIDATES: &[&str] = &[
    "resources/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

static FONT_FILE: Lazy<Option<PathBuf>> = Lazy::new(|| {
    let found = FONT_CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists());
    if found.is_none() {
        warn!("no preferred font file found, falling back to the fontconfig default");
    }
    found
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLine {
    pub text: String,
    pub center_y: u32,
}

/// Greedy word wrap to at most `WRAP_COLUMNS` characters per line. Words
/// longer than the column budget are hard-split.
pub fn wrap_narration(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > WRAP_COLUMNS {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(WRAP_COLUMNS)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > WRAP_COLUMNS {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps the narration and assigns each line its vertical center, starting
/// near the top of the caption band and stepping downward. Truncated layouts
/// end in an ellipsis.
pub fn layout_lines(text: &str) -> Vec<OverlayLine> {
    let mut lines = wrap_narration(text);
    if lines.len() > MAX_LINES {
        lines.truncate(MAX_LINES);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| OverlayLine {
            text,
            center_y: FIRST_LINE_Y + i as u32 * LINE_STEP,
        })
        .collect()
}

fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
        .replace(',', "\\,")
}

/// Builds the drawbox + per-line drawtext filter chain for a laid-out
/// narration. Pure so the layout-to-filter mapping stays testable.
pub fn overlay_filter(lines: &[OverlayLine]) -> String {
    let bar_y = FRAME_HEIGHT - BAR_HEIGHT;
    let mut filter = format!(
        "drawbox=x=0:y={bar_y}:w={FRAME_WIDTH}:h={BAR_HEIGHT}:color=black@{BAR_ALPHA:.3}:t=fill"
    );

    let fontfile = FONT_FILE
        .as_ref()
        .map(|p| format!(":fontfile={}", p.display()))
        .unwrap_or_default();

    for line in lines {
        filter.push_str(&format!(
            ",drawtext=text='{}':fontsize={FONT_SIZE}:fontcolor=white:x=(w-text_w)/2:y={}-th/2{}",
            escape_drawtext(&line.text),
            line.center_y,
            fontfile
        ));
    }
    filter
}

/// Rasterizes the narration onto a transparent 1920x1080 canvas and writes it
/// as a uniquely named PNG under `temp_dir`. The file is owned by the calling
/// generation session and removed with it.
pub async fn render_overlay(narration: &str, temp_dir: &Path) -> GenerateResult<PathBuf> {
    let lines = layout_lines(narration);
    let filter = overlay_filter(&lines);

    let unique = Uuid::new_v4().simple().to_string();
    let out_png = temp_dir.join(format!("txt_{}.png", &unique[..8]));

    let source = format!("color=c=black@0.0:s={FRAME_WIDTH}x{FRAME_HEIGHT},format=rgba");
    let args = vec![
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        source,
        "-vf".to_string(),
        filter,
        "-frames:v".to_string(),
        "1".to_string(),
        out_png.display().to_string(),
    ];

    ffmpeg::run_ffmpeg(&args).await?;
    Ok(out_png)
}
