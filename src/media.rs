use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use tokio::process::Command;

use crate::app_config::VideoConfig;
use crate::errors::CollaboratorError;

// @module: Audio measurement and ffmpeg collaborators
//
// Three narrow contracts live here: measuring the duration of a rendered
// WAV, concatenating per-segment WAV parts into one track, and muxing the
// audio with a fixed-color background into a video. All subprocess calls
// run under an explicit timeout.

// @const: Generous ceilings for local ffmpeg work
const CONCAT_TIMEOUT_SECS: u64 = 120;
const RENDER_TIMEOUT_SECS: u64 = 600;

/// Measured result of the audio-rendering collaborator
#[derive(Debug, Clone, Copy)]
pub struct AudioRenderResult {
    /// Total duration in seconds, frame_count / sample_rate
    pub duration_secs: f64,
}

/// Measure the duration of a WAV artifact.
///
/// Fails if the artifact is unreadable or declares a zero sample rate.
pub fn measure_wav_duration<P: AsRef<Path>>(
    path: P,
) -> Result<AudioRenderResult, CollaboratorError> {
    let path = path.as_ref();
    let map_err = |reason: String| CollaboratorError::DurationMeasurement {
        path: path.display().to_string(),
        reason,
    };

    let reader = hound::WavReader::open(path).map_err(|e| map_err(e.to_string()))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(map_err("sample rate is zero".to_string()));
    }

    // reader.duration() is the frame count (samples per channel)
    let frames = reader.duration() as f64;
    let duration_secs = frames / spec.sample_rate as f64;
    debug!(
        "Measured {:.3}s of audio ({} frames at {} Hz)",
        duration_secs, frames, spec.sample_rate
    );

    Ok(AudioRenderResult { duration_secs })
}

/// Concatenate WAV part files into a single track using the ffmpeg concat
/// demuxer, then remove the parts and the list file.
pub async fn concat_wav_parts(
    parts: &[PathBuf],
    output: &Path,
) -> Result<(), CollaboratorError> {
    let list_path = output.with_extension("concat.txt");
    let list_body: String = parts.iter().map(|part| concat_list_entry(part)).collect();

    std::fs::write(&list_path, list_body).map_err(|e| {
        CollaboratorError::SynthesisFailed(format!(
            "failed to write concat list {}: {}",
            list_path.display(),
            e
        ))
    })?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args([
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        list_path.to_str().unwrap_or_default(),
        "-c",
        "copy",
        output.to_str().unwrap_or_default(),
    ]);

    let result = run_with_timeout(cmd, CONCAT_TIMEOUT_SECS, "ffmpeg concat").await;

    // Best-effort cleanup of intermediates, success or not; a failed
    // concat must not litter the output directory with part files
    let _ = std::fs::remove_file(&list_path);
    for part in parts {
        let _ = std::fs::remove_file(part);
    }

    result
        .map_err(|e| CollaboratorError::SynthesisFailed(format!("audio concatenation: {}", e)))
}

/// Entry line for ffmpeg's concat demuxer list. Paths go in single
/// quotes; a quote inside the path is escaped as close-quote, escaped
/// quote, reopen-quote, the way the demuxer expects.
pub fn concat_list_entry(path: &Path) -> String {
    let escaped = path.display().to_string().replace('\'', r"'\''");
    format!("file '{}'\n", escaped)
}

/// Mux the rendered audio with a fixed-color background into a video whose
/// duration equals the shorter of the two streams. An optional lead-in
/// delays the audio so the video opens with silence.
pub async fn render_video(
    audio: &Path,
    output: &Path,
    video: &VideoConfig,
) -> Result<(), CollaboratorError> {
    let background = format!(
        "color=c={}:s={}:r={}",
        video.background_color, video.resolution, video.fps
    );

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-f", "lavfi", "-i", &background, "-i"])
        .arg(audio);
    if video.lead_in_secs > 0 {
        let delay_ms = video.lead_in_secs * 1000;
        cmd.args(["-af", &format!("adelay={}|{}", delay_ms, delay_ms)]);
    }
    cmd.arg("-shortest").arg(output);

    run_with_timeout(cmd, RENDER_TIMEOUT_SECS, "ffmpeg render")
        .await
        .map_err(CollaboratorError::RenderFailed)
}

/// Run an ffmpeg invocation with a timeout, returning the filtered stderr
/// as the error string on failure.
async fn run_with_timeout(
    mut cmd: Command,
    timeout_secs: u64,
    what: &str,
) -> Result<(), String> {
    let future = cmd.output();
    let output = tokio::select! {
        result = future => {
            result.map_err(|e| format!("failed to execute {}: {}", what, e))?
        },
        _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
            return Err(format!("{} timed out after {}s", what, timeout_secs));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        warn!("{} failed: {}", what, filtered);
        return Err(filtered);
    }

    Ok(())
}

/// Keep only the meaningful lines of ffmpeg stderr, dropping the version
/// banner, build configuration and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Output #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Stream mapping:",
        "Press [q]",
        "size=",
        "video:",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(|line| line.trim())
        .filter(|line| {
            !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
