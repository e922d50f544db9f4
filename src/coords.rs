//! Coordinate conversions between timeline seconds and surface pixels.
//!
//! This module provides pure functions for:
//! - Converting seconds to pixels (and back) for a given ratio
//! - Computing event bar geometry
//! - Choosing tick intervals for the time axis
//!
//! The ratio is always "pixels per second".

/// Tick spacing candidates in seconds, smallest first.
const TICK_STEPS: [u64; 16] = [
    1, 2, 5, 10, 15, 30, 60, 120, 300, 600, 900, 1800, 3600, 7200, 21600, 43200,
];

/// Converts a number of seconds into pixels.
///
/// The seconds value is truncated toward zero before scaling, so fractional
/// offsets snap to whole seconds.
///
/// # Arguments
/// * `seconds` - Seconds from the timeline origin
/// * `ratio` - Pixels per second
///
/// # Examples
/// ```
/// use rhere::coords::seconds_to_pixels;
///
/// assert_eq!(seconds_to_pixels(100.0, 2.0), 200.0);
/// assert_eq!(seconds_to_pixels(10.9, 1.5), 15.0);
/// ```
pub fn seconds_to_pixels(seconds: f64, ratio: f64) -> f64 {
    seconds.trunc() * ratio
}

/// Converts a pixel distance back to seconds. Not truncated.
pub fn pixels_to_seconds(pixels: f64, ratio: f64) -> f64 {
    pixels / ratio
}

/// Width in whole pixels of an event lasting `duration` seconds.
pub fn event_width(duration: i64, ratio: f64) -> i64 {
    (duration as f64 * ratio).floor() as i64
}

/// Left edge in whole pixels of an event starting `offset` seconds after the origin.
pub fn event_left(offset: i64, ratio: f64) -> i64 {
    (offset as f64 * ratio).floor() as i64
}

/// Horizontal position of the scrollable surface for a given offset.
///
/// The surface moves left as the offset grows, hence the negation.
pub fn surface_left(offset: f64, ratio: f64) -> f64 {
    -seconds_to_pixels(offset, ratio)
}

/// Ratio at which a timeline of `duration` seconds exactly fills `viewport_width` pixels.
///
/// Returns `None` if either input is not strictly positive.
pub fn fit_ratio(viewport_width: f64, duration: u64) -> Option<f64> {
    if viewport_width <= 0.0 || !viewport_width.is_finite() || duration == 0 {
        return None;
    }
    Some(viewport_width / duration as f64)
}

/// Returns true if `ratio` can be used as a pixels-per-second ratio.
pub fn is_valid_ratio(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}

/// Picks the smallest tick interval (in seconds) whose on-screen spacing is
/// at least `min_spacing_px`.
///
/// Falls back to whole days when even the largest step is too dense.
pub fn tick_interval(ratio: f64, min_spacing_px: f64) -> u64 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|step| *step as f64 * ratio >= min_spacing_px)
        .unwrap_or_else(|| {
            let days = (min_spacing_px / (86_400.0 * ratio)).ceil().max(1.0);
            days as u64 * 86_400
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_pixels_truncates_seconds() {
        assert_eq!(seconds_to_pixels(5.0, 2.0), 10.0);
        assert_eq!(seconds_to_pixels(5.99, 2.0), 10.0);
        assert_eq!(seconds_to_pixels(-5.99, 2.0), -10.0);
        assert_eq!(seconds_to_pixels(3.0, 0.5), 1.5);
    }

    #[test]
    fn test_floor_property_for_positive_ratios() {
        for ratio in [0.25, 1.0, 1.5, 3.0, 17.0] {
            for s in [0.0, 0.4, 1.0, 59.9, 3600.5] {
                let expected = f64::floor(s) * ratio;
                assert_eq!(seconds_to_pixels(s, ratio), expected, "s={s} ratio={ratio}");
            }
        }
    }

    #[test]
    fn test_event_geometry() {
        assert_eq!(event_width(10, 2.0), 20);
        assert_eq!(event_left(5, 2.0), 10);
        assert_eq!(event_width(3, 0.5), 1);
        assert_eq!(event_left(7, 0.3), 2);
    }

    #[test]
    fn test_surface_left() {
        assert_eq!(surface_left(100.0, 1.0), -100.0);
        assert_eq!(surface_left(100.0, 3.0), -300.0);
        assert_eq!(surface_left(-20.0, 1.0), 20.0);
    }

    #[test]
    fn test_fit_ratio() {
        assert_eq!(fit_ratio(864.0, 86_400), Some(0.01));
        assert_eq!(fit_ratio(0.0, 100), None);
        assert_eq!(fit_ratio(100.0, 0), None);
    }

    #[test]
    fn test_is_valid_ratio() {
        assert!(is_valid_ratio(0.001));
        assert!(!is_valid_ratio(0.0));
        assert!(!is_valid_ratio(-1.0));
        assert!(!is_valid_ratio(f64::NAN));
        assert!(!is_valid_ratio(f64::INFINITY));
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(100.0, 80.0), 1);
        assert_eq!(tick_interval(1.0, 80.0), 120);
        assert_eq!(tick_interval(0.05, 80.0), 1800);
        // 12h is only 43px here, so fall back to whole days
        assert_eq!(tick_interval(0.001, 80.0), 86_400);
    }
}
