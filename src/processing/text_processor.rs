//! Text normalization shared by keyword matching and embeddings

use once_cell::sync::Lazy;
use regex::Regex;

static SPLIT_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([;@$%&?!()\[\]{}<>"])"#).expect("Invalid punctuation regex"));

// Commas and colons are split unless they sit inside a number ("1,000", "10:30")
static SPLIT_COMMA_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([,:])(\D|$)").expect("Invalid comma regex"));

static CONTRACTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])(n't|'s|'m|'d|'ll|'re|'ve)\b").expect("Invalid contraction regex"));

static FINAL_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^.])\.(\s*)$").expect("Invalid final period regex"));

/// Treebank-style normalizer.
///
/// Lowercases, separates punctuation into standalone tokens and rejoins the
/// tokens with single spaces. Characters that are part of common skill names
/// (`+`, `#`, `.`, `-`, `/`) stay attached, so `c++`, `c#`, `node.js` and
/// `b.tech` survive normalization intact.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextProcessor;

impl TextProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Canonical whitespace-joined form used for keyword matching and embeddings
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }

    /// Lowercase, otherwise untouched text for experience extraction
    pub fn lowercase(&self, text: &str) -> String {
        normalize_unicode(text).to_lowercase()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lowered = self.lowercase(text);
        let padded = SPLIT_PUNCT.replace_all(&lowered, " ${1} ");
        let padded = SPLIT_COMMA_COLON.replace_all(&padded, " ${1} ${2}");
        let padded = CONTRACTIONS.replace_all(&padded, "${1} ${2}");
        let padded = FINAL_PERIOD.replace(&padded, "${1} . ${2}");

        padded.split_whitespace().map(str::to_string).collect()
    }
}

/// Convenience wrapper around [`TextProcessor::normalize`]
pub fn normalize_text(text: &str) -> String {
    TextProcessor::new().normalize(text)
}

/// Fold typographic quotes and dashes onto their ASCII counterparts
fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{00A0}' => ' ',
            _ => c,
        })
        .collect()
}
