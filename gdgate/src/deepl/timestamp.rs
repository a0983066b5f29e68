//! Request timestamp derivation
//!
//! The mobile client sends a millisecond timestamp that is a multiple of
//! `N + 1`, where `N` is the number of `i`/`I` characters in the text. The
//! server uses this as an automation check.

use chrono::Utc;

/// Case-insensitive count of the letter `i`
pub fn count_i(text: &str) -> i64 {
    text.chars().filter(|c| matches!(c, 'i' | 'I')).count() as i64
}

/// Timestamp for `text` derived from the current wall clock
pub fn timestamp(text: &str) -> i64 {
    timestamp_at(text, Utc::now().timestamp_millis())
}

/// Largest value `<= now_ms` divisible by `count_i(text) + 1`
pub fn timestamp_at(text: &str, now_ms: i64) -> i64 {
    let modulus = count_i(text) + 1;
    now_ms - now_ms.rem_euclid(modulus)
}
