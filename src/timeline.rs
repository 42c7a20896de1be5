use std::fmt;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::segmenter::ReadingUnit;

// @module: Subtitle timeline allocation and SRT rendering

/// One timestamped subtitle block
#[derive(Debug, Clone)]
pub struct CaptionEntry {
    // @field: 1-based sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Verbatim caption text
    pub text: String,
}

impl CaptionEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        CaptionEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for CaptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Caption entries for one rendered audio track
#[derive(Debug, Default)]
pub struct SubtitleTimeline {
    /// Entries in strict sequence order, contiguous and non-overlapping
    pub entries: Vec<CaptionEntry>,
}

impl SubtitleTimeline {
    /// Allocate per-unit time windows over the measured audio duration.
    ///
    /// Uniform proportional allocation: every unit gets an equal share of
    /// the total. Deliberately unweighted by text length or speech rate;
    /// accuracy degrades when units vary greatly in length. Zero units
    /// yield an empty timeline, zero duration yields zero-length windows —
    /// both are valid, degenerate inputs, not errors. Fractional seconds
    /// are truncated to milliseconds, never rounded.
    pub fn allocate(total_duration_secs: f64, units: &[ReadingUnit]) -> Self {
        let count = units.len();
        if count == 0 {
            debug!("No reading units, producing empty timeline");
            return SubtitleTimeline::default();
        }

        let total = total_duration_secs.max(0.0);
        let average = total / count as f64;
        let total_ms = (total * 1000.0) as u64;

        let boundary_ms = |i: usize| -> u64 {
            if i == count {
                // Pin the final boundary to the exact measured duration so
                // the entries cover [0, total] without float drift.
                total_ms
            } else {
                (i as f64 * average * 1000.0) as u64
            }
        };

        let entries = units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                CaptionEntry::new(
                    unit.sequence_index,
                    boundary_ms(i),
                    boundary_ms(i + 1),
                    unit.original_text.clone(),
                )
            })
            .collect();

        SubtitleTimeline { entries }
    }

    /// Render all entries as SubRip text: index line, timestamp range line,
    /// caption text, trailing blank line — no header, no styling.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            // Display never fails when writing to a String
            let _ = write!(out, "{}", entry);
        }
        out
    }

    /// Write the timeline to an SRT file
    pub fn write_srt<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(path.to_path_buf())
    }
}

impl fmt::Display for SubtitleTimeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Timeline")?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
