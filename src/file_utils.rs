use anyhow::{Context, Result};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: First Markdown heading in a document
static FIRST_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*#+\s+(.+)$").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Output path for a run artifact
    // @params: output_dir, base name, extension
    pub fn artifact_path<P: AsRef<Path>>(output_dir: P, base: &str, extension: &str) -> PathBuf {
        output_dir.as_ref().join(format!("{}.{}", base, extension))
    }

    /// Find narratable documents (.md / .txt) under a directory
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy().to_lowercase();
                    if ext == "md" || ext == "markdown" || ext == "txt" {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// First Markdown heading of a document, markers removed
    pub fn first_heading(document: &str) -> Option<String> {
        FIRST_HEADING
            .captures(document)
            .map(|caps| caps[1].trim().to_string())
    }

    /// Reduce a label to filesystem-safe characters
    pub fn sanitize_filename(label: &str) -> String {
        let cleaned: String = label
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        cleaned.replace(' ', "_")
    }

    /// Base name for a run's artifacts. A caller-supplied label is used
    /// as-is (sanitized), so repeated runs address the same files and the
    /// existing-output check can actually fire. Only the derived default
    /// (first heading, or "output") gets a timestamp to keep unlabeled
    /// runs distinct.
    pub fn output_base_name(document: &str, custom_label: Option<&str>) -> String {
        if let Some(label) = custom_label {
            let safe = Self::sanitize_filename(label);
            if !safe.is_empty() {
                return safe;
            }
        }

        let label = Self::first_heading(document).unwrap_or_else(|| "output".to_string());
        let safe = Self::sanitize_filename(&label);
        let safe = if safe.is_empty() {
            "output".to_string()
        } else {
            safe
        };
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}", safe, timestamp)
    }
}
