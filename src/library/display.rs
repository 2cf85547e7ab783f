/// Format a number of seconds as zero-padded `MM:SS`.
///
/// Minutes are `floor(t / 60)` and seconds `floor(t mod 60)`. Minutes widen
/// past two digits rather than wrapping. NaN, infinite and negative inputs
/// render as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Trimmed `value`, or `fallback` when it is missing or blank.
pub fn display_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
