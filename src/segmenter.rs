use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// @module: Sentence and clause segmentation
//
// Splits stripped prose into reading units, the atomic granularity shared
// by synthesis input and caption timing. The two policies are not
// equivalent: they produce different caption granularity, so one policy is
// picked per run and recorded in the configuration.

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One sentence- or clause-sized fragment of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingUnit {
    /// 1-based position in the run, strictly increasing
    pub sequence_index: usize,
    /// Verbatim text, used for captions
    pub original_text: String,
    /// Post-number-expansion text, used for synthesis. Starts out equal to
    /// the original; the pipeline swaps in the expanded string, it never
    /// edits `original_text`.
    pub normalized_text: String,
}

impl ReadingUnit {
    pub fn new(sequence_index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        ReadingUnit {
            sequence_index,
            normalized_text: text.clone(),
            original_text: text,
        }
    }
}

/// How prose is cut into reading units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// Split on sentence-terminal punctuation followed by whitespace (the
    /// terminator stays on the preceding unit), then split each sentence
    /// on commas into clauses. Known limitation: abbreviations containing
    /// periods get cut, deliberately not special-cased.
    #[default]
    Punctuation,
    /// Each physical line is one unit; blank lines become empty units so
    /// the caption timeline keeps a placeholder slot for them. Avoids the
    /// abbreviation problem at the cost of author-supplied line breaks.
    Lines,
}

/// Split prose into an ordered sequence of reading units.
///
/// Output keeps input order; nothing is reordered or deduplicated.
pub fn segment(text: &str, policy: SegmentPolicy) -> Vec<ReadingUnit> {
    let fragments: Vec<String> = match policy {
        SegmentPolicy::Punctuation => split_sentences(text)
            .into_iter()
            .flat_map(|sentence| {
                sentence
                    .split(',')
                    .map(|clause| clause.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|clause| !clause.is_empty())
            .collect(),
        SegmentPolicy::Lines => text.lines().map(|line| line.trim_end().to_string()).collect(),
    };

    fragments
        .into_iter()
        .enumerate()
        .map(|(i, fragment)| ReadingUnit::new(i + 1, fragment))
        .collect()
}

/// Split on `.`, `?` or `!` followed by whitespace, keeping the terminator
/// attached to the preceding sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '?' | '!') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    let end = i + c.len_utf8();
                    sentences.push(&text[start..end]);
                    start = end;
                }
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Compose the normalized reading units into the single string handed to
/// the synthesis collaborator. Guarantees no internal whitespace run longer
/// than one space and no leading/trailing whitespace.
pub fn build_spoken_text(units: &[ReadingUnit]) -> String {
    let joined = units
        .iter()
        .map(|u| u.normalized_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}
