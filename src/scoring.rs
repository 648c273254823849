//! Per-attempt accuracy and per-word speed.
//!
//! Both functions are pure. Inputs that would divide by zero are rejected
//! with an error instead of yielding `inf`/`NaN`.

use crate::error::{Error, Result};

/// Characters per "word" in the WPM convention.
pub const CHARS_PER_WORD: f64 = 5.0;

fn strip_spaces(s: &str) -> Vec<char> {
    s.chars().filter(|&c| c != ' ').collect()
}

/// Accuracy of `submitted` against `target` as a percentage in `[0, 100]`.
///
/// Spaces are removed from both sides first. Position-wise mismatches are
/// counted over the overlapping prefix, then the length difference is added
/// once. This is not an edit distance: a single dropped character early in
/// the word shifts every later position and is counted again by the length
/// penalty.
pub fn accuracy(target: &str, submitted: &str) -> Result<f64> {
    let target = strip_spaces(target);
    let submitted = strip_spaces(submitted);

    if target.is_empty() {
        return Err(Error::EmptyTarget);
    }

    let mismatches = target
        .iter()
        .zip(submitted.iter())
        .filter(|(t, s)| t != s)
        .count();
    let errors = mismatches + target.len().abs_diff(submitted.len());

    let score = 100.0 - (errors as f64 / target.len() as f64) * 100.0;
    Ok(score.max(0.0))
}

/// Words per minute for `repetitions` typings of a word of `word_length`
/// characters taking `total_time_seconds` altogether.
pub fn words_per_minute(
    word_length: usize,
    repetitions: usize,
    total_time_seconds: f64,
) -> Result<f64> {
    if total_time_seconds.is_nan() || total_time_seconds <= 0.0 {
        return Err(Error::NonPositiveTime(total_time_seconds));
    }

    let typed_words = (word_length * repetitions) as f64 / CHARS_PER_WORD;
    Ok(typed_words / (total_time_seconds / 60.0))
}
