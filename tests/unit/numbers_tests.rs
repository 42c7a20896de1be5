/*!
 * Tests for number-to-words expansion and German cardinal forms
 */

use vorleser::numbers::german;
use vorleser::numbers::{Locale, NumberExpander, PatternClass};

fn expander() -> NumberExpander {
    NumberExpander::new(Locale::German)
}

/// Spot checks over the tricky German compound forms
#[test]
fn test_cardinal_withKnownValues_shouldMatchSpokenGerman() {
    assert_eq!(german::cardinal(0), "null");
    assert_eq!(german::cardinal(1), "eins");
    assert_eq!(german::cardinal(16), "sechzehn");
    assert_eq!(german::cardinal(21), "einundzwanzig");
    assert_eq!(german::cardinal(30), "dreißig");
    assert_eq!(german::cardinal(100), "einhundert");
    assert_eq!(german::cardinal(101), "einhunderteins");
    assert_eq!(german::cardinal(1991), "eintausendneunhunderteinundneunzig");
    assert_eq!(german::cardinal(2002), "zweitausendzwei");
}

/// Million-scale values become separate capitalized nouns
#[test]
fn test_cardinal_withLargeValues_shouldUseScaleNouns() {
    assert_eq!(german::cardinal(1_000_000), "eine Million");
    assert_eq!(german::cardinal(2_000_000), "zwei Millionen");
    assert_eq!(german::cardinal(1_000_001), "eine Million eins");
    assert_eq!(
        german::cardinal(3_000_000_000),
        "drei Milliarden"
    );
}

/// A four-digit range expands with the locale connector, digit-free
#[test]
fn test_expand_withYearRange_shouldSpeakBothEndsWithConnector() {
    let result = expander().expand("Von 1991–2002 lief das Projekt.");
    assert_eq!(
        result.text,
        "Von eintausendneunhunderteinundneunzig bis zweitausendzwei lief das Projekt."
    );
    assert!(!result.text.contains(|c: char| c.is_ascii_digit()));
    assert!(result.flagged.is_empty());
}

/// The suffixed age range wins over the plain small range
#[test]
fn test_expand_withAgeRangeSuffix_shouldKeepSuffixWord() {
    let result = expander().expand("bei den 25–29-Jährigen");
    assert_eq!(result.text, "bei den fünfundzwanzig bis neunundzwanzig Jährigen");
}

/// Percentages handle both tight and spaced percent signs
#[test]
fn test_expand_withPercentage_shouldSpeakProzent() {
    assert_eq!(expander().expand("40%").text, "vierzig Prozent");
    assert_eq!(expander().expand("40 %").text, "vierzig Prozent");
}

/// A percent sign with no preceding digits still gets spelled out
#[test]
fn test_expand_withStrayPercentSign_shouldSpellItOut() {
    assert_eq!(expander().expand("% allein").text, "Prozent allein");
}

/// Parentheses are dropped in the cleanup pass
#[test]
fn test_expand_withParentheses_shouldDropThem() {
    assert_eq!(expander().expand("(siehe 3)").text, "siehe drei");
}

/// Bare four-digit numbers are read as years, shorter ones as integers
#[test]
fn test_expand_withBareNumbers_shouldExpandEach() {
    let result = expander().expand("Kapitel 7 erschien 2002.");
    assert_eq!(result.text, "Kapitel sieben erschien zweitausendzwei.");
}

/// The full scenario sentence from a typical study summary
#[test]
fn test_expand_withMixedPatterns_shouldRewriteEverything() {
    let result = expander()
        .expand("Die Studie (1991–2002) zeigt, dass 25–29-Jährigen einen Anteil von 40% ausmachen.");
    assert_eq!(
        result.text,
        "Die Studie eintausendneunhunderteinundneunzig bis zweitausendzwei zeigt, \
         dass fünfundzwanzig bis neunundzwanzig Jährigen einen Anteil von vierzig Prozent ausmachen."
    );
    assert!(result.flagged.is_empty());
}

/// A digit run past the u64 range is flagged and left in place
#[test]
fn test_expand_withOverflowingInteger_shouldFlagNotFail() {
    let result = expander().expand("Seriennummer 99999999999999999999999 liegt vor.");
    assert_eq!(result.flagged.len(), 1);
    assert_eq!(result.flagged[0].fragment, "99999999999999999999999");
    assert_eq!(result.flagged[0].pattern_class, PatternClass::BareInteger);
    assert!(result.text.contains("99999999999999999999999"));
}

/// Expansion is pure: same input, same output
#[test]
fn test_expand_withSameInput_shouldBeDeterministic() {
    let a = expander().expand("Von 1991–2002 stiegen 40% der Werte.");
    let b = expander().expand("Von 1991–2002 stiegen 40% der Werte.");
    assert_eq!(a.text, b.text);
}

/// Text without numerals passes through with only whitespace cleanup
#[test]
fn test_expand_withNoNumerals_shouldLeaveTextAlone() {
    let result = expander().expand("Nur Worte, keine Zahlen.");
    assert_eq!(result.text, "Nur Worte, keine Zahlen.");
    assert!(result.flagged.is_empty());
}
