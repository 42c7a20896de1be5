/*!
 * Error types for the vorleser application.
 *
 * This module contains custom error types for the different stages of the
 * narration pipeline, using the thiserror crate for ergonomic error
 * definitions. Every data-dependent failure carries the literal offending
 * fragment so authors can fix their document without re-running synthesis.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised before any collaborator is invoked
#[derive(Error, Debug)]
pub enum InputError {
    /// The document contained nothing readable once markup was removed
    #[error("document is empty after markdown stripping")]
    EmptyDocument,
}

/// Errors raised by number-to-words expansion
#[derive(Error, Debug)]
pub enum NumberError {
    /// A numeral the expander cannot classify or convert.
    /// Policy: the substring is left unexpanded and flagged for audit,
    /// the run itself keeps going.
    #[error("unsupported number format: {fragment:?}")]
    UnsupportedNumberFormat {
        /// Literal text of the offending numeral
        fragment: String,
    },
}

/// Errors surfaced from external collaborators (speech synthesis,
/// duration measurement, video rendering)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The synthesis engine reported a cancellation
    #[error("speech synthesis canceled: {0}")]
    SynthesisCanceled(String),

    /// The synthesis engine failed outright
    #[error("speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The rendered audio artifact could not be measured
    #[error("duration measurement failed for {path}: {reason}")]
    DurationMeasurement {
        /// Path to the audio artifact
        path: String,
        /// Diagnostic text from the measurement collaborator
        reason: String,
    },

    /// The video renderer exited non-zero or could not be launched
    #[error("video rendering failed: {0}")]
    RenderFailed(String),

    /// A collaborator subprocess exceeded its time budget
    #[error("{command} timed out after {secs}s")]
    Timeout {
        /// The command that was running
        command: String,
        /// The timeout that was exceeded
        secs: u64,
    },
}

/// Main application error type that wraps all stage errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from input validation
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Error from number expansion
    #[error("number expansion error: {0}")]
    Number(#[from] NumberError),

    /// Error from an external collaborator
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility conversions for error propagation at the boundaries
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
