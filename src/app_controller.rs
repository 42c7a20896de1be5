use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::errors::{AppError, InputError};
use crate::file_utils::FileManager;
use crate::markdown;
use crate::media;
use crate::numbers::{FlaggedNumber, NumberExpander};
use crate::segmenter::{self, ReadingUnit};
use crate::synth::{CommandSynthesizer, Synthesizer};
use crate::timeline::SubtitleTimeline;

// @module: Application controller for the narration pipeline

/// Paths and measurements produced by one pipeline run
#[derive(Debug)]
pub struct RunArtifacts {
    /// Rendered audio track
    pub audio_path: PathBuf,
    /// SubRip subtitle file
    pub subtitle_path: PathBuf,
    /// Sidecar with verbatim caption units, one per line
    pub captions_path: PathBuf,
    /// Sidecar with normalized synthesis units, one per line
    pub speech_path: PathBuf,
    /// Muxed video, when rendering is enabled
    pub video_path: Option<PathBuf>,
    /// Measured audio duration in seconds
    pub duration_secs: f64,
    /// Number of reading units / caption entries
    pub unit_count: usize,
    /// Numerals left unexpanded for author audit
    pub flagged: Vec<FlaggedNumber>,
}

/// Main application controller: document in, audio + subtitles out
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the pipeline for a single document file
    pub async fn run(
        &self,
        input_file: PathBuf,
        base_label: Option<&str>,
        force_overwrite: bool,
    ) -> Result<()> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let document = FileManager::read_to_string(&input_file)?;
        let base = FileManager::output_base_name(&document, base_label);
        FileManager::ensure_dir(&self.config.output_dir)?;

        let audio_path = FileManager::artifact_path(&self.config.output_dir, &base, "wav");
        if audio_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        let start_time = Instant::now();
        let synthesizer = CommandSynthesizer::from_config(&self.config.synthesis);
        let artifacts = self.run_document(&document, &base, &synthesizer).await?;

        info!(
            "Narration complete in {} — {:.2}s of audio across {} caption entries",
            Self::format_duration(start_time.elapsed()),
            artifacts.duration_secs,
            artifacts.unit_count
        );
        info!("Audio:     {:?}", artifacts.audio_path);
        info!("Subtitles: {:?}", artifacts.subtitle_path);
        if let Some(video) = &artifacts.video_path {
            info!("Video:     {:?}", video);
        }
        if !artifacts.flagged.is_empty() {
            warn!(
                "{} numeral(s) could not be expanded and were left as-is — check {:?}",
                artifacts.flagged.len(),
                artifacts.speech_path
            );
        }

        Ok(())
    }

    /// Run the pipeline for every document in a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_documents(&input_dir)?;
        if documents.is_empty() {
            warn!("No documents (.md / .txt) found in {:?}", input_dir);
            return Ok(());
        }

        let mut processed_count = 0;
        for path in documents {
            info!("Processing document: {:?}", path);
            if let Err(e) = self.run(path.clone(), None, force_overwrite).await {
                error!("Error processing {:?}: {}", path, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} document(s)", processed_count);
        Ok(())
    }

    /// The core pipeline: strip, segment, expand, synthesize, time, render.
    ///
    /// The synthesizer is injected so tests can run the full pipeline
    /// against a mock engine.
    pub async fn run_document(
        &self,
        document: &str,
        base: &str,
        synthesizer: &dyn Synthesizer,
    ) -> Result<RunArtifacts> {
        let output_dir = &self.config.output_dir;
        FileManager::ensure_dir(output_dir)?;

        // Stage 1: markdown stripping. An empty result stops the run
        // before any collaborator is invoked.
        let stripped = markdown::strip(document, self.config.strip_policy);
        if stripped.trim().is_empty() {
            return Err(AppError::Input(InputError::EmptyDocument).into());
        }

        // Stage 2: segmentation into reading units
        let mut units = segmenter::segment(&stripped, self.config.segment_policy);
        debug!(
            "Segmented into {} reading unit(s) using {:?} policy",
            units.len(),
            self.config.segment_policy
        );

        // Stage 3: number expansion. Expansion builds a new string per
        // unit; original_text stays verbatim for the captions.
        let expander = NumberExpander::new(self.config.locale);
        let mut flagged = Vec::new();
        for unit in &mut units {
            let expansion = expander.expand(&unit.original_text);
            unit.normalized_text = expansion.text;
            flagged.extend(expansion.flagged);
        }

        // Sidecar outputs: verbatim units for caption upload, normalized
        // units for proofreading what the engine will actually read.
        let captions_path = FileManager::artifact_path(output_dir, base, "captions.txt");
        let speech_path = FileManager::artifact_path(output_dir, base, "speech.txt");
        FileManager::write_to_file(&captions_path, &unit_lines(&units, |u| &u.original_text))?;
        FileManager::write_to_file(&speech_path, &unit_lines(&units, |u| &u.normalized_text))?;

        // Stage 4: speech synthesis over bounded segments
        let speakable: Vec<ReadingUnit> = units
            .iter()
            .filter(|u| !u.normalized_text.trim().is_empty())
            .cloned()
            .collect();
        if speakable.is_empty() {
            return Err(AppError::Input(InputError::EmptyDocument).into());
        }

        let segment_texts: Vec<String> = speakable
            .chunks(self.config.synthesis.units_per_segment)
            .map(segmenter::build_spoken_text)
            .collect();

        let audio_path = FileManager::artifact_path(output_dir, base, "wav");
        self.synthesize_segments(synthesizer, &segment_texts, &audio_path)
            .await?;

        // Stage 5: duration measurement
        let audio = media::measure_wav_duration(&audio_path)?;

        // Stage 6: subtitle timeline over all units, including empty
        // line-policy placeholders
        let timeline = SubtitleTimeline::allocate(audio.duration_secs, &units);
        let subtitle_path =
            timeline.write_srt(FileManager::artifact_path(output_dir, base, "srt"))?;

        // Stage 7: optional video rendering
        let video_path = if self.config.video.enabled {
            let path = FileManager::artifact_path(output_dir, base, "mp4");
            media::render_video(&audio_path, &path, &self.config.video).await?;
            Some(path)
        } else {
            None
        };

        Ok(RunArtifacts {
            audio_path,
            subtitle_path,
            captions_path,
            speech_path,
            video_path,
            duration_secs: audio.duration_secs,
            unit_count: units.len(),
            flagged,
        })
    }

    /// Synthesize each segment to its own part file, then concatenate.
    /// A single segment goes straight to the final path.
    async fn synthesize_segments(
        &self,
        synthesizer: &dyn Synthesizer,
        segment_texts: &[String],
        audio_path: &std::path::Path,
    ) -> Result<()> {
        let voice = &self.config.voice;

        if let [only] = segment_texts {
            synthesizer.synthesize(only, voice, audio_path).await?;
            return Ok(());
        }

        let progress = ProgressBar::new(segment_texts.len() as u64);
        progress.set_style(ProgressStyle::default_bar());
        progress.set_message("synthesizing");

        let mut part_files = Vec::with_capacity(segment_texts.len());
        for (idx, segment) in segment_texts.iter().enumerate() {
            let part_path = audio_path.with_extension(format!("part_{:03}.wav", idx + 1));
            if let Err(e) = synthesizer.synthesize(segment, voice, &part_path).await {
                // A failed run must not leave earlier part files behind
                progress.finish_and_clear();
                for part in &part_files {
                    let _ = std::fs::remove_file(part);
                }
                let _ = std::fs::remove_file(&part_path);
                return Err(e.into());
            }
            part_files.push(part_path);
            progress.inc(1);
        }
        progress.finish_and_clear();

        media::concat_wav_parts(&part_files, audio_path).await?;
        Ok(())
    }

    /// Format a duration as a human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        if minutes > 0 {
            format!("{}m{:02}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Join one projection of the units into newline-separated file content
fn unit_lines<F>(units: &[ReadingUnit], project: F) -> String
where
    F: Fn(&ReadingUnit) -> &str,
{
    let mut out = String::new();
    for unit in units {
        out.push_str(project(unit));
        out.push('\n');
    }
    out
}
