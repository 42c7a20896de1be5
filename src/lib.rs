/*!
 * # vorleser - Markdown to narrated German audio with subtitles
 *
 * A Rust library that turns a loosely structured Markdown document into a
 * speech-synthesizer-ready text stream plus a timed SubRip subtitle file.
 *
 * ## Features
 *
 * - Strip Markdown structure while keeping the prose (two policies:
 *   flattening and line-preserving)
 * - Segment prose into sentence/clause reading units (punctuation-based
 *   or line-based)
 * - Expand numerals into German words with priority-ordered pattern
 *   classes (year ranges, age ranges, percentages, bare integers)
 * - Allocate caption time codes proportionally over the measured audio
 *   duration and render SubRip output
 * - Drive an external synthesis engine in bounded segments, with optional
 *   fixed-background video rendering via ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `markdown`: Markdown stripping policies
 * - `segmenter`: Reading-unit segmentation and spoken-text assembly
 * - `numbers`: Number-to-words expansion:
 *   - `numbers::german`: German cardinal words
 * - `timeline`: Caption timing and SRT rendering
 * - `synth`: Speech-synthesis collaborator boundary
 * - `media`: Audio measurement and ffmpeg collaborators
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod markdown;
pub mod media;
pub mod numbers;
pub mod segmenter;
pub mod synth;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunArtifacts};
pub use errors::{AppError, CollaboratorError, InputError, NumberError};
pub use numbers::{Locale, NumberExpander, PatternClass};
pub use segmenter::{ReadingUnit, SegmentPolicy};
pub use timeline::{CaptionEntry, SubtitleTimeline};
