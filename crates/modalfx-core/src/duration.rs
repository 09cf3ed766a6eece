#![forbid(unsafe_code)]

//! Wait-time extraction from CSS animation descriptors.
//!
//! The browser reports a computed `animation` shorthand such as
//! `0.3s ease-out 50ms 1 normal forwards running modal-overlay-close-dynamic`.
//! The coordinator needs to know how long to wait before the animated element
//! can be hidden, which is the first declared duration plus the first declared
//! delay.
//!
//! # Rules
//!
//! 1. Time tokens are `<number>s` or `<number>ms`, optionally negative, where
//!    `<number>` is `12`, `12.5` or `.5` in ASCII digits.
//! 2. A token must stand alone: digits glued to an identifier (`fade3s`) or a
//!    unit glued to more letters (`2sec`) are not time tokens. Unitless
//!    numbers (iteration counts) never match.
//! 3. Only the first two tokens count (duration, then delay).
//! 4. Arithmetic is exact to the microsecond; a negative total clamps to zero.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | `""` | zero |
//! | `"none"` | zero |
//! | no time tokens | zero |
//! | non-ASCII digits (`٣s`) | not a token |
//! | absurdly long digit runs | saturates instead of overflowing |

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,(])(-?)([0-9]*)(?:\.([0-9]+))?(ms|s)\b").expect("time token pattern is valid")
});

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MILLI: i64 = 1_000;

/// Total wait (duration + delay) declared by an animation descriptor.
///
/// ```
/// use std::time::Duration;
/// use modalfx_core::duration::parse_duration;
///
/// assert_eq!(parse_duration("0.3s 150ms"), Duration::from_millis(450));
/// assert_eq!(parse_duration("none"), Duration::ZERO);
/// ```
#[must_use]
pub fn parse_duration(descriptor: &str) -> Duration {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() || descriptor.eq_ignore_ascii_case("none") {
        return Duration::ZERO;
    }

    let total: i64 = TIME_TOKEN
        .captures_iter(descriptor)
        .filter_map(|caps| {
            let negative = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let whole = caps.get(2).map_or("", |m| m.as_str());
            let frac = caps.get(3).map_or("", |m| m.as_str());
            let unit = caps.get(4).map_or("", |m| m.as_str());
            token_micros(negative, whole, frac, unit)
        })
        .take(2)
        .fold(0i64, i64::saturating_add);

    Duration::from_micros(u64::try_from(total).unwrap_or(0))
}

/// [`parse_duration`] in fractional milliseconds, for timer APIs that take
/// milliseconds directly.
#[must_use]
pub fn parse_duration_ms(descriptor: &str) -> f64 {
    parse_duration(descriptor).as_micros() as f64 / 1_000.0
}

/// Convert one matched token into signed microseconds.
///
/// Returns `None` when the token has no digits at all (a bare `.s` cannot
/// occur with the pattern, but a bare `s` after a separator can).
fn token_micros(negative: bool, whole: &str, frac: &str, unit: &str) -> Option<i64> {
    if whole.is_empty() && frac.is_empty() {
        return None;
    }

    let (scale, frac_digits) = match unit {
        "ms" => (MICROS_PER_MILLI, 3),
        _ => (MICROS_PER_SECOND, 6),
    };

    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Only overflow can fail here; saturate.
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().unwrap_or(i64::MAX)
    };

    // Right-pad or truncate the fraction to the unit's microsecond precision.
    let mut frac_value: i64 = 0;
    for i in 0..frac_digits {
        let digit = frac.as_bytes().get(i).map_or(0, |b| i64::from(b - b'0'));
        frac_value = frac_value * 10 + digit;
    }

    let micros = whole_value.saturating_mul(scale).saturating_add(frac_value);
    Some(if negative { -micros } else { micros })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn duration_plus_delay() {
        assert_eq!(parse_duration("0.3s 150ms"), ms(450));
    }

    #[test]
    fn none_and_empty_are_zero() {
        assert_eq!(parse_duration("none"), Duration::ZERO);
        assert_eq!(parse_duration("NONE"), Duration::ZERO);
        assert_eq!(parse_duration(""), Duration::ZERO);
        assert_eq!(parse_duration("   "), Duration::ZERO);
    }

    #[test]
    fn single_token_is_duration_only() {
        assert_eq!(parse_duration("1200ms"), ms(1200));
    }

    #[test]
    fn only_first_two_tokens_count() {
        assert_eq!(parse_duration("0.2s 0.1s, 5s 5s"), ms(300));
    }

    #[test]
    fn computed_shorthand_ignores_iteration_count_and_name() {
        let descriptor = "0.3s ease-out 50ms 1 normal forwards running modal-overlay-close-dynamic";
        assert_eq!(parse_duration(descriptor), ms(350));
    }

    #[test]
    fn digits_inside_identifiers_are_not_tokens() {
        assert_eq!(parse_duration("fade3s 1 forwards"), Duration::ZERO);
        assert_eq!(parse_duration("2sec"), Duration::ZERO);
        assert_eq!(parse_duration("0.5s slide2s"), ms(500));
    }

    #[test]
    fn non_ascii_digits_are_not_tokens() {
        assert_eq!(parse_duration("\u{0663}s"), Duration::ZERO);
        assert_eq!(parse_duration("\u{0663}.5s"), Duration::ZERO);
        assert_eq!(parse_duration("0.3s \u{0661}\u{0662}ms"), ms(300));
        assert_eq!(parse_duration("\u{0661}\u{0662}ms 0.3s"), ms(300));
    }

    #[test]
    fn token_with_non_ascii_digits_is_rejected() {
        assert_eq!(token_micros(false, "\u{0663}", "", "s"), None);
        assert_eq!(token_micros(false, "1", "\u{0665}", "ms"), None);
        assert_eq!(token_micros(false, "99999999999999999999", "", "s"), Some(i64::MAX));
    }

    #[test]
    fn leading_dot_fraction() {
        assert_eq!(parse_duration(".25s"), ms(250));
    }

    #[test]
    fn negative_delay_shortens_wait() {
        assert_eq!(parse_duration("0.4s ease -100ms"), ms(300));
        assert_eq!(parse_duration("0.1s linear -1s"), Duration::ZERO);
    }

    #[test]
    fn fractional_milliseconds_are_kept() {
        assert_eq!(parse_duration("12.5ms"), Duration::from_micros(12_500));
        assert_eq!(parse_duration_ms("12.5ms"), 12.5);
    }

    #[test]
    fn exact_decimal_arithmetic() {
        assert_eq!(parse_duration_ms("0.1s 0.2s"), 300.0);
        assert_eq!(parse_duration_ms("0.3s 150ms"), 450.0);
    }

    #[test]
    fn huge_values_saturate() {
        let d = parse_duration("99999999999999999999999s");
        assert!(d > Duration::from_secs(1_000_000));
    }

    proptest! {
        #[test]
        fn never_panics(s in "\\PC*") {
            let _ = parse_duration(&s);
        }

        #[test]
        fn integer_millis_round_trip(a in 0u64..100_000, b in 0u64..100_000) {
            let descriptor = format!("{a}ms ease {b}ms");
            prop_assert_eq!(parse_duration(&descriptor), ms(a + b));
        }
    }
}
