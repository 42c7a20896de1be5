use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// @module: Markdown stripping
//
// Removes structural markup from a document and keeps the prose. Pure,
// line-wise transformation with no error conditions: malformed markup is
// treated as literal text. Stripping is idempotent for both policies.

// @const: Inline markup patterns
static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]\s+(?:\[[ xX]\]\s+)?|[•✅▶✔]\u{FE0F}?\s*)").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// How stripped prose is reassembled from the document's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripPolicy {
    /// Drop every heading and rejoin non-blank lines with single spaces.
    /// Used for synthesis-only pipelines where line structure is noise.
    #[default]
    Flatten,
    /// Keep the first heading as an ordinary sentence, preserve newlines
    /// and collapse blank-line runs. Used when line-per-caption alignment
    /// matters.
    PreserveLines,
}

/// Remove structural markup from a document, keeping the prose
pub fn strip(document: &str, policy: StripPolicy) -> String {
    match policy {
        StripPolicy::Flatten => strip_flatten(document),
        StripPolicy::PreserveLines => strip_preserve_lines(document),
    }
}

/// Code-fence delimiters and horizontal rules are dropped entirely. A
/// rule is a line of nothing but dashes or asterisks; a line that merely
/// begins with "---" is prose and stays. Emphasis stripping can produce
/// such lines, and re-stripping must keep them intact.
fn is_rule_or_fence(trimmed: &str) -> bool {
    if trimmed.starts_with("```") {
        return true;
    }
    trimmed.len() >= 3
        && (trimmed.chars().all(|c| c == '-') || trimmed.chars().all(|c| c == '*'))
}

/// Remove bullet prefixes and emphasis markers, keeping the enclosed text
fn clean_inline(line: &str) -> String {
    let line = BULLET_PREFIX.replace(line, "");
    let line = BOLD.replace_all(&line, "$1");
    let line = ITALIC.replace_all(&line, "$1");
    line.into_owned()
}

fn strip_flatten(document: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || is_rule_or_fence(trimmed) {
            continue;
        }
        kept.push(clean_inline(trimmed));
    }
    let joined = kept.join(" ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

fn strip_preserve_lines(document: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    let mut first_heading_seen = false;

    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Blank lines survive as paragraph separators
            kept.push(String::new());
            continue;
        }
        if trimmed.starts_with('#') {
            // Only the first heading is kept, demoted to an ordinary
            // sentence so the segmenter can treat it like any other line
            if !first_heading_seen {
                let heading_text = trimmed.trim_start_matches('#').trim();
                if !heading_text.is_empty() {
                    let mut sentence = clean_inline(heading_text);
                    if !sentence.ends_with(['.', '!', '?', '。', '！', '？']) {
                        sentence.push('.');
                    }
                    kept.push(sentence);
                }
                first_heading_seen = true;
            }
            continue;
        }
        if is_rule_or_fence(trimmed) {
            continue;
        }
        kept.push(clean_inline(trimmed));
    }

    let joined = kept.join("\n");
    BLANK_RUN
        .replace_all(&joined, "\n\n")
        .trim_matches('\n')
        .to_string()
}
