use std::path::PathBuf;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::markdown::StripPolicy;
use crate::numbers::Locale;
use crate::segmenter::SegmentPolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Everything the pipeline
/// used to treat as a module-level constant (output directory, background
/// color, resolution) is an explicit configuration value here.

// @const: WIDTHxHEIGHT, e.g. 1920x1080
static RESOLUTION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2,5}x\d{2,5}$").unwrap());

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Voice identifier handed to the synthesis engine (e.g. "de")
    pub voice: String,

    /// Spoken locale for number-to-words expansion
    #[serde(default)]
    pub locale: Locale,

    /// Markdown stripping policy
    #[serde(default)]
    pub strip_policy: StripPolicy,

    /// Sentence segmentation policy
    #[serde(default)]
    pub segment_policy: SegmentPolicy,

    /// Synthesis engine invocation
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Video rendering settings
    #[serde(default)]
    pub video: VideoConfig,

    /// Directory all artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Invocation template for the external synthesis engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Executable to run
    #[serde(default = "default_synth_command")]
    pub command: String,

    /// Argument template; {text}, {voice} and {output} are substituted
    #[serde(default = "default_synth_args")]
    pub args: Vec<String>,

    /// Reading units per synthesis segment. Long documents are synthesized
    /// in bounded segments to stay under the engine's request-duration
    /// ceiling, then concatenated.
    #[serde(default = "default_units_per_segment")]
    pub units_per_segment: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_synth_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            command: default_synth_command(),
            args: default_synth_args(),
            units_per_segment: default_units_per_segment(),
            timeout_secs: default_synth_timeout_secs(),
        }
    }
}

/// Settings for the optional fixed-background video artifact
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoConfig {
    /// Whether a video is rendered in addition to the audio
    #[serde(default)]
    pub enabled: bool,

    /// ffmpeg color name or 0xRRGGBB value
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Output resolution, WIDTHxHEIGHT
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Output frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Seconds of silence before the audio starts (video only)
    #[serde(default)]
    pub lead_in_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            background_color: default_background_color(),
            resolution: default_resolution(),
            fps: default_fps(),
            lead_in_secs: 0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_synth_command() -> String {
    "espeak-ng".to_string()
}

fn default_synth_args() -> Vec<String> {
    ["-v", "{voice}", "-w", "{output}", "{text}"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_units_per_segment() -> usize {
    // Small segments keep each request comfortably under the engine's
    // request-duration ceiling; the last segment may be shorter
    5
}

fn default_synth_timeout_secs() -> u64 {
    600
}

fn default_background_color() -> String {
    "black".to_string()
}

fn default_resolution() -> String {
    "1920x1080".to_string()
}

fn default_fps() -> u32 {
    30
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.voice.trim().is_empty() {
            return Err(anyhow!("Voice must not be empty"));
        }

        if self.synthesis.command.trim().is_empty() {
            return Err(anyhow!("Synthesis command must not be empty"));
        }

        if self.synthesis.units_per_segment == 0 {
            return Err(anyhow!("units_per_segment must be at least 1"));
        }

        if !RESOLUTION_PATTERN.is_match(&self.video.resolution) {
            return Err(anyhow!(
                "Invalid resolution '{}', expected WIDTHxHEIGHT like 1920x1080",
                self.video.resolution
            ));
        }

        if self.video.fps == 0 {
            return Err(anyhow!("Frame rate must be at least 1"));
        }

        if self.video.background_color.trim().is_empty()
            || self.video.background_color.contains(char::is_whitespace)
        {
            return Err(anyhow!(
                "Invalid background color '{}'",
                self.video.background_color
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            voice: "de".to_string(),
            locale: Locale::default(),
            strip_policy: StripPolicy::default(),
            segment_policy: SegmentPolicy::default(),
            synthesis: SynthesisConfig::default(),
            video: VideoConfig::default(),
            output_dir: default_output_dir(),
            log_level: LogLevel::default(),
        }
    }
}
