use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::app_config::SynthesisConfig;
use crate::errors::CollaboratorError;

// @module: Speech synthesis collaborator boundary
//
// The pipeline does not synthesize speech itself; it hands normalized text
// to an engine behind this trait and consumes the WAV artifact it leaves on
// disk. Cancellations and failures carry the engine's own diagnostic text
// and are surfaced, never swallowed.

/// Contract for the external speech-synthesis engine
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render `text` with the given voice into a WAV file at `output`
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output: &Path,
    ) -> Result<(), CollaboratorError>;
}

/// Synthesizer that shells out to a configurable command line.
///
/// The argv template substitutes `{text}`, `{voice}` and `{output}`
/// placeholders, so any engine with a file-writing CLI (espeak-ng, piper,
/// a vendor wrapper script) plugs in without code changes.
pub struct CommandSynthesizer {
    command: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl CommandSynthesizer {
    pub fn from_config(config: &SynthesisConfig) -> Self {
        CommandSynthesizer {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    fn fill_template(template: &str, text: &str, voice: &str, output: &Path) -> String {
        template
            .replace("{text}", text)
            .replace("{voice}", voice)
            .replace("{output}", &output.to_string_lossy())
    }
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output: &Path,
    ) -> Result<(), CollaboratorError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| Self::fill_template(arg, text, voice, output))
            .collect();

        debug!(
            "Invoking synthesis engine '{}' for {} chars of text",
            self.command,
            text.len()
        );

        let invocation = Command::new(&self.command).args(&args).output();

        let timeout = Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = invocation => result.map_err(|e| {
                CollaboratorError::SynthesisFailed(format!(
                    "failed to launch '{}': {}", self.command, e
                ))
            })?,
            _ = tokio::time::sleep(timeout) => {
                // A request that outlives its budget counts as canceled,
                // same as an engine-side abort
                return Err(CollaboratorError::SynthesisCanceled(format!(
                    "'{}' exceeded the {}s request ceiling", self.command, self.timeout_secs
                )));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(CollaboratorError::SynthesisFailed(format!(
                "'{}' exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(CollaboratorError::SynthesisFailed(format!(
                "'{}' reported success but produced no file at {}",
                self.command,
                output.display()
            )));
        }

        Ok(())
    }
}
