use std::fmt;

/// Numeric value range with optional bounds
///
/// A bound of `None` means the range is open on that side. Classification
/// branches for open-ended tiers (e.g. "β ≥ 2.0") produce one-sided ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    /// Creates a closed range
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Creates a range open below
    pub fn below(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Creates a range open above
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Returns whether exactly one bound is set
    pub fn is_one_sided(&self) -> bool {
        self.min.is_some() != self.max.is_some()
    }

    /// Returns `self` with every bound that `other` sets replaced
    ///
    /// Bounds `other` leaves open keep their current value.
    pub fn overlay(self, other: ValueRange) -> Self {
        Self {
            min: other.min.or(self.min),
            max: other.max.or(self.max),
        }
    }

    /// Returns whether `min <= max` holds when both bounds are present
    pub fn is_consistent(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{} ~ {}", format_value(min), format_value(max)),
            (Some(min), None) => write!(f, "≥ {}", format_value(min)),
            (None, Some(max)) => write!(f, "< {}", format_value(max)),
            (None, None) => write!(f, "-"),
        }
    }
}

/// Formats a measured value for display
///
/// Whole numbers keep one decimal place (`33.0`); everything else uses the
/// shortest representation that round-trips (`0.573`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
