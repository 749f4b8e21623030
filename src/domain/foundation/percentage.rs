//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A finite value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a new Percentage, clamping to valid range.
    ///
    /// Non-finite input collapses to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 100.0))
        } else {
            Self::ZERO
        }
    }

    /// Creates a Percentage, returning error if out of range or not finite.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::not_finite("percentage"));
        }
        if !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::out_of_range("percentage", 0.0, 100.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_range() {
        assert_eq!(Percentage::new(101.0).value(), 100.0);
        assert_eq!(Percentage::new(-3.0).value(), 0.0);
        assert_eq!(Percentage::new(f64::NAN), Percentage::ZERO);
    }

    #[test]
    fn percentage_try_new_accepts_bounds() {
        assert!(Percentage::try_new(0.0).is_ok());
        assert!(Percentage::try_new(87.5).is_ok());
        assert!(Percentage::try_new(100.0).is_ok());
    }

    #[test]
    fn percentage_try_new_rejects_over_100() {
        match Percentage::try_new(100.5) {
            Err(ValidationError::OutOfRange { field, min, max, actual }) => {
                assert_eq!(field, "percentage");
                assert_eq!(min, 0.0);
                assert_eq!(max, 100.0);
                assert_eq!(actual, 100.5);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn percentage_try_new_rejects_infinity() {
        assert!(matches!(
            Percentage::try_new(f64::INFINITY),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn percentage_as_fraction_converts_correctly() {
        assert!((Percentage::new(50.0).as_fraction() - 0.5).abs() < f64::EPSILON);
        assert!((Percentage::HUNDRED.as_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_displays_one_decimal() {
        assert_eq!(format!("{}", Percentage::new(92.34)), "92.3%");
        assert_eq!(format!("{}", Percentage::ZERO), "0.0%");
    }

    #[test]
    fn percentage_serde_round_trips_as_number() {
        let json = serde_json::to_string(&Percentage::new(42.5)).unwrap();
        assert_eq!(json, "42.5");
        let pct: Percentage = serde_json::from_str("75").unwrap();
        assert_eq!(pct.value(), 75.0);
    }

    #[test]
    fn percentage_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Percentage>("120").is_err());
    }
}
