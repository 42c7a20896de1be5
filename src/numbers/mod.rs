use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::NumberError;

pub mod german;

// @module: Locale-aware number-to-words expansion
//
// Numeric substrings are rewritten into their spoken German form through an
// explicit, ordered list of pattern rules. Ranges and suffixed numerals are
// structurally ambiguous with bare integers, so the most specific pattern
// classes fire first and consume their span; later passes never re-match
// text a higher-priority class already claimed.

// @const: Pattern matchers, one per pattern class
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*[–-]\s*(\d{4})").unwrap());
static AGE_RANGE_WITH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*[–-]\s*(\d{1,2})-Jährigen").unwrap());
static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*%").unwrap());
static SMALL_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*[–-]\s*(\d{1,2})").unwrap());
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
static BARE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").unwrap());

// @const: Cleanup patterns applied once after all rewrite passes
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]+").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A named category of numeral formatting with a fixed priority relative
/// to the other classes. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternClass {
    YearRange,
    AgeRangeWithSuffix,
    Percentage,
    SmallRange,
    BareYear,
    BareInteger,
}

impl PatternClass {
    fn matcher(self) -> &'static Regex {
        match self {
            Self::YearRange => &YEAR_RANGE,
            Self::AgeRangeWithSuffix => &AGE_RANGE_WITH_SUFFIX,
            Self::Percentage => &PERCENTAGE,
            Self::SmallRange => &SMALL_RANGE,
            Self::BareYear => &BARE_YEAR,
            Self::BareInteger => &BARE_INTEGER,
        }
    }
}

// All pattern classes in priority order
const PATTERN_PRIORITY: [PatternClass; 6] = [
    PatternClass::YearRange,
    PatternClass::AgeRangeWithSuffix,
    PatternClass::Percentage,
    PatternClass::SmallRange,
    PatternClass::BareYear,
    PatternClass::BareInteger,
];

/// Target spoken locale for word forms and connective tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// German (de-DE)
    #[default]
    German,
}

impl Locale {
    /// Integer-to-words for this locale. The expansion contract is
    /// narrowed to the u64 range: a digit run that does not fit never
    /// reaches this function — it fails the upstream parse, is reported
    /// as an unsupported number format and stays in the text, flagged
    /// for author audit.
    pub fn words(&self, n: u64) -> String {
        match self {
            Self::German => german::cardinal(n),
        }
    }

    /// Connective between the two ends of a range ("1991 bis 2002")
    fn range_connector(&self) -> &'static str {
        match self {
            Self::German => "bis",
        }
    }

    /// Spoken word for the percent sign
    fn percent_word(&self) -> &'static str {
        match self {
            Self::German => "Prozent",
        }
    }

    /// Suffix token that marks an age range ("25–29-Jährigen")
    fn age_suffix(&self) -> &'static str {
        match self {
            Self::German => "Jährigen",
        }
    }
}

/// A single resolved rewrite: the matched span, its pattern class and the
/// replacement text that will stand in for it.
#[derive(Debug, Clone)]
pub struct NumberMatch {
    /// Byte offset where the match starts
    pub start: usize,
    /// Byte offset one past the end of the match
    pub end: usize,
    /// The pattern class that claimed this span
    pub pattern_class: PatternClass,
    /// Spoken-word replacement text
    pub replacement: String,
}

/// A numeral the expander refused to rewrite, kept for author audit
#[derive(Debug, Clone)]
pub struct FlaggedNumber {
    /// Literal offending fragment, verbatim from the input
    pub fragment: String,
    /// The pattern class that matched but could not be converted
    pub pattern_class: PatternClass,
}

/// Result of expanding one reading unit
#[derive(Debug, Clone)]
pub struct Expansion {
    /// The rewritten, cleaned-up text
    pub text: String,
    /// Numerals left unexpanded because they could not be converted
    pub flagged: Vec<FlaggedNumber>,
}

/// Deterministic, pure rewriter of numeric substrings into spoken words
#[derive(Debug, Clone, Default)]
pub struct NumberExpander {
    locale: Locale,
}

impl NumberExpander {
    pub fn new(locale: Locale) -> Self {
        NumberExpander { locale }
    }

    /// Expand all numeric substrings of a reading unit into spoken words.
    ///
    /// Passes run in priority order; each pass only claims spans no earlier
    /// pass has consumed. A numeral that cannot be converted (for example a
    /// digit run that overflows u64) is left in place and flagged rather
    /// than failing the run.
    pub fn expand(&self, text: &str) -> Expansion {
        let mut consumed: Vec<(usize, usize)> = Vec::new();
        let mut matches: Vec<NumberMatch> = Vec::new();
        let mut flagged: Vec<FlaggedNumber> = Vec::new();

        for class in PATTERN_PRIORITY {
            for caps in class.matcher().captures_iter(text) {
                let whole = caps.get(0).unwrap();
                if overlaps_consumed(&consumed, whole.start(), whole.end()) {
                    continue;
                }
                match self.replacement_for(class, &caps) {
                    Ok(replacement) => {
                        consumed.push((whole.start(), whole.end()));
                        matches.push(NumberMatch {
                            start: whole.start(),
                            end: whole.end(),
                            pattern_class: class,
                            replacement,
                        });
                    }
                    Err(err) => {
                        warn!("Leaving numeral unexpanded ({:?}): {}", class, err);
                        consumed.push((whole.start(), whole.end()));
                        flagged.push(FlaggedNumber {
                            fragment: whole.as_str().to_string(),
                            pattern_class: class,
                        });
                    }
                }
            }
        }

        // Apply all rewrites in a single left-to-right rebuild
        matches.sort_by_key(|m| m.start);
        let mut rebuilt = String::with_capacity(text.len());
        let mut cursor = 0;
        for m in &matches {
            rebuilt.push_str(&text[cursor..m.start]);
            rebuilt.push_str(&m.replacement);
            cursor = m.end;
        }
        rebuilt.push_str(&text[cursor..]);

        Expansion {
            text: self.cleanup(&rebuilt),
            flagged,
        }
    }

    /// Build the spoken replacement for one match, or report why it cannot
    /// be converted.
    fn replacement_for(
        &self,
        class: PatternClass,
        caps: &Captures,
    ) -> Result<String, NumberError> {
        let number = |idx: usize| -> Result<u64, NumberError> {
            let fragment = caps.get(idx).map_or("", |m| m.as_str());
            fragment
                .parse::<u64>()
                .map_err(|_| NumberError::UnsupportedNumberFormat {
                    fragment: fragment.to_string(),
                })
        };

        let words = |n: u64| self.locale.words(n);
        let bis = self.locale.range_connector();

        Ok(match class {
            PatternClass::YearRange | PatternClass::SmallRange => {
                format!("{} {} {}", words(number(1)?), bis, words(number(2)?))
            }
            PatternClass::AgeRangeWithSuffix => format!(
                "{} {} {} {}",
                words(number(1)?),
                bis,
                words(number(2)?),
                self.locale.age_suffix()
            ),
            PatternClass::Percentage => {
                format!("{} {}", words(number(1)?), self.locale.percent_word())
            }
            PatternClass::BareYear | PatternClass::BareInteger => words(number(1)?),
        })
    }

    /// Post-pass cleanup over the fully rewritten unit: spell out leftover
    /// percent signs, drop parentheses, collapse residual dashes to spaces
    /// and normalize whitespace.
    fn cleanup(&self, text: &str) -> String {
        let spoken_percent = format!(" {}", self.locale.percent_word());
        let text = text.replace('%', &spoken_percent);
        let text = PARENS.replace_all(&text, " ");
        let text = text.replace(['–', '-'], " ");
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        text.trim().to_string()
    }
}

/// Check whether a candidate span overlaps any already-consumed span
fn overlaps_consumed(consumed: &[(usize, usize)], start: usize, end: usize) -> bool {
    consumed
        .iter()
        .any(|&(c_start, c_end)| start < c_end && end > c_start)
}
