//! Text formatting helpers for timeline values.

/// Formats seconds from the timeline origin as `HH:MM:SS`.
///
/// Hours are not wrapped, so offsets past one day keep counting. Fractions
/// are truncated and negative offsets get a leading minus.
///
/// # Examples
/// ```
/// use rhere::formatting::format_seconds;
///
/// assert_eq!(format_seconds(0.0), "00:00:00");
/// assert_eq!(format_seconds(3725.9), "01:02:05");
/// assert_eq!(format_seconds(-90.0), "-00:01:30");
/// assert_eq!(format_seconds(90_000.0), "25:00:00");
/// ```
pub fn format_seconds(seconds: f64) -> String {
    let total = seconds.abs().trunc() as u64;
    let sign = if seconds < 0.0 && total > 0 { "-" } else { "" };
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Parses a time typed by a user: `HH:MM:SS`, `MM:SS` or plain seconds.
///
/// Returns `None` for anything else. The inverse of [`format_seconds`] for
/// whole seconds.
///
/// # Examples
/// ```
/// use rhere::formatting::parse_clock;
///
/// assert_eq!(parse_clock("01:02:05"), Some(3725.0));
/// assert_eq!(parse_clock("90"), Some(90.0));
/// assert_eq!(parse_clock("-00:01:30"), Some(-90.0));
/// ```
pub fn parse_clock(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text),
    };
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        // Only the first field may exceed its unit (e.g. "90" or "25:00:00")
        if i > 0 && value >= 60.0 {
            return None;
        }
        total = total * 60.0 + value;
    }
    Some(sign * total)
}

/// Formats a ratio for display, e.g. `"0.05 px/s"` or `"2 px/s"`.
pub fn format_ratio(ratio: f64) -> String {
    if ratio >= 10.0 || ratio.fract() == 0.0 {
        format!("{:.0} px/s", ratio)
    } else if ratio >= 0.1 {
        format!("{:.2} px/s", ratio)
    } else {
        format!("{:.4} px/s", ratio)
    }
}

/// Formats a duration compactly: `"45s"`, `"30m"`, `"1h 30m"`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    match (h, m, s) {
        (0, 0, s) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, 0, 0) => format!("{}h", h),
        (h, m, _) => format!("{}h {}m", h, m),
    }
}
