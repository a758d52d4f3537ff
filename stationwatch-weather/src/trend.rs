//! Pressure trend derivation
//!
//! A rising barometer means a high is building in; a falling one means a low
//! (and usually rain) is on the way. The trend is a pure function of the
//! current and previous reading: no hidden state, same pair in, same answer
//! out.
//!
//! Comparison is exact by default. [`Trend::within`] accepts a tolerance for
//! stations whose sensor noise would otherwise flicker between trends.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Direction of change between two consecutive readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Pressure rising
    Improving,
    /// Pressure unchanged
    Steady,
    /// Pressure falling
    Worsening,
}

impl Trend {
    /// Exact comparison of `current` against `last`
    pub fn between(current: f32, last: f32) -> Self {
        Self::within(current, last, 0.0)
    }

    /// Comparison treating differences up to `tolerance` as no change
    ///
    /// Equal readings are always steady. A negative or non-finite tolerance
    /// counts as zero. Readings are expected to be finite; the subject
    /// rejects anything else.
    pub fn within(current: f32, last: f32, tolerance: f32) -> Self {
        let tolerance = if tolerance.is_finite() { tolerance.max(0.0) } else { 0.0 };

        if current == last || (current - last).abs() <= tolerance {
            Trend::Steady
        } else if current > last {
            Trend::Improving
        } else {
            Trend::Worsening
        }
    }

    /// Human-readable forecast text
    pub const fn description(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Steady => "more of the same",
            Trend::Worsening => "watch out for cooler, rainy weather",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rising_falling_unchanged() {
        assert_eq!(Trend::between(30.10, 29.92), Trend::Improving);
        assert_eq!(Trend::between(29.50, 30.10), Trend::Worsening);
        assert_eq!(Trend::between(29.50, 29.50), Trend::Steady);
    }

    #[test]
    fn descriptions() {
        assert_eq!(Trend::Improving.to_string(), "improving");
        assert_eq!(Trend::Worsening.to_string(), "watch out for cooler, rainy weather");
        assert_eq!(Trend::Steady.to_string(), "more of the same");
    }

    #[test]
    fn exact_comparison_sees_tiny_changes() {
        let last = 29.92_f32;
        let current = f32::from_bits(last.to_bits() + 1);

        assert_eq!(Trend::between(current, last), Trend::Improving);
        assert_eq!(Trend::within(current, last, 0.005), Trend::Steady);
    }

    #[test]
    fn tolerance_boundary_is_steady() {
        assert_eq!(Trend::within(30.0, 29.5, 0.5), Trend::Steady);
        assert_eq!(Trend::within(30.0, 29.0, 0.5), Trend::Improving);
        assert_eq!(Trend::within(29.0, 30.0, 0.5), Trend::Worsening);
    }

    #[test]
    fn unusable_tolerance_counts_as_exact() {
        for tolerance in [-0.1, f32::NAN, f32::NEG_INFINITY, f32::INFINITY] {
            assert_eq!(Trend::within(29.5, 29.5, tolerance), Trend::Steady);
            assert_eq!(Trend::within(29.6, 29.5, tolerance), Trend::Improving);
            assert_eq!(Trend::within(29.4, 29.5, tolerance), Trend::Worsening);
        }
    }

    proptest! {
        #[test]
        fn agrees_with_partial_cmp(current in 25.0f32..33.0, last in 25.0f32..33.0) {
            let expected = match current.partial_cmp(&last).unwrap() {
                core::cmp::Ordering::Greater => Trend::Improving,
                core::cmp::Ordering::Less => Trend::Worsening,
                core::cmp::Ordering::Equal => Trend::Steady,
            };
            prop_assert_eq!(Trend::between(current, last), expected);
        }

        #[test]
        fn equal_readings_are_steady(reading in 25.0f32..33.0, tolerance in any::<f32>()) {
            prop_assert_eq!(Trend::within(reading, reading, tolerance), Trend::Steady);
        }
    }
}
