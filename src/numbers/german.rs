//! German cardinal number words.
//!
//! Converts non-negative integers into their spoken German form, the way a
//! reader would say them: compounds below a million are written as one word
//! ("neunhunderteinundneunzig"), million-and-above scales are separate
//! capitalized nouns ("zwei Millionen"). Covers the full u64 range.

const SMALL: [&str; 20] = [
    "null", "eins", "zwei", "drei", "vier", "fünf", "sechs", "sieben", "acht", "neun", "zehn",
    "elf", "zwölf", "dreizehn", "vierzehn", "fünfzehn", "sechzehn", "siebzehn", "achtzehn",
    "neunzehn",
];

const TENS: [&str; 10] = [
    "", "", "zwanzig", "dreißig", "vierzig", "fünfzig", "sechzig", "siebzig", "achtzig",
    "neunzig",
];

// Scales from 10^6 upward as (singular, plural) noun pairs.
// u64::MAX is ~1.8 * 10^19, so Trillion (10^18) is the largest scale needed.
const SCALES: [(&str, &str); 5] = [
    ("Million", "Millionen"),
    ("Milliarde", "Milliarden"),
    ("Billion", "Billionen"),
    ("Billiarde", "Billiarden"),
    ("Trillion", "Trillionen"),
];

/// Words for 1..=99. A bare trailing one is "eins", but inside a compound
/// ("einundzwanzig", "einhundert") it is "ein".
fn under_100(n: u64, trailing_eins: bool) -> String {
    debug_assert!((1..100).contains(&n));
    if n == 1 {
        return if trailing_eins { "eins" } else { "ein" }.to_string();
    }
    if n < 20 {
        return SMALL[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        1 => format!("einund{}", tens),
        unit => format!("{}und{}", SMALL[unit as usize], tens),
    }
}

/// Words for 1..=999 as a single compound.
fn under_1000(n: u64, trailing_eins: bool) -> String {
    debug_assert!((1..1000).contains(&n));
    let mut out = String::new();
    let hundreds = n / 100;
    if hundreds > 0 {
        out.push_str(&under_100(hundreds, false));
        out.push_str("hundert");
    }
    let rest = n % 100;
    if rest > 0 {
        out.push_str(&under_100(rest, trailing_eins));
    }
    out
}

/// Convert a non-negative integer to German cardinal words.
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return "null".to_string();
    }

    // Split into thousand-groups, least significant first.
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut words: Vec<String> = Vec::new();

    // Million-and-above scales become separate noun tokens.
    for idx in (2..groups.len()).rev() {
        let chunk = groups[idx];
        if chunk == 0 {
            continue;
        }
        let (singular, plural) = SCALES[idx - 2];
        if chunk == 1 {
            words.push(format!("eine {}", singular));
        } else {
            words.push(format!("{} {}", under_1000(chunk, false), plural));
        }
    }

    // Thousands and the final group fuse into one compound word.
    let mut compound = String::new();
    if groups.len() > 1 && groups[1] > 0 {
        compound.push_str(&under_1000(groups[1], false));
        compound.push_str("tausend");
    }
    if groups[0] > 0 {
        compound.push_str(&under_1000(groups[0], true));
    }
    if !compound.is_empty() {
        words.push(compound);
    }

    words.join(" ")
}
