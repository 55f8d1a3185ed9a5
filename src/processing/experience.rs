//! Years-of-experience extraction

use once_cell::sync::Lazy;
use regex::Regex;

/// Mentions at or above this many years are treated as false positives
/// (phone number fragments, calendar years)
pub const MAX_PLAUSIBLE_YEARS: f64 = 40.0;

static YEARS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:\+?\s*)?(?:years|yrs)").expect("Invalid years regex")
});

/// Every plausible "<number> years" / "<number>+ yrs" mention, in text order
pub fn year_mentions(text: &str) -> Vec<f64> {
    YEARS_PATTERN
        .captures_iter(text)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
        .filter(|years| *years < MAX_PLAUSIBLE_YEARS)
        .collect()
}

/// Largest plausible mention, or 0 when there is none.
///
/// The maximum is used rather than the sum because resumes routinely repeat
/// the same figure in the summary and the experience section.
pub fn extract_years(text: &str) -> f64 {
    year_mentions(text).into_iter().fold(0.0, f64::max)
}
