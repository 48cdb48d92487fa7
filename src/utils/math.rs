// src/utils/math.rs

/// Rounds the exact decimal value of `value` to 2 places.
///
/// Scaling by 100 first would round inexact halves such as 0.345 (stored as
/// 0.34499999...) the wrong way. Exact halves (odd multiples of 1/8) round
/// away from zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        // 100 * value is exact here, so `round` sees the true half.
        return (value * 100.0).round() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `earned / max` as a percentage clamped to [0, 100].
/// Returns 0 when `max` is not positive.
pub fn percentage(earned: f64, max: f64) -> f64 {
    if max > 0.0 {
        (earned / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
