/// Canonical word identity: trimmed and lowercased. All tracking and
/// review state is keyed by this form so the same word matches across
/// exercise types regardless of how the pool spells it.
pub fn canonical(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Percentage rounded to the nearest whole number; 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}
