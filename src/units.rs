//! Lengths and unit conversion.
//!
//! Every distance in the engine is a [`Length`], stored internally in
//! typographic points (1/72 inch). Named constructors convert from
//! millimeters and inches; comparisons that matter for layout use a small
//! tolerance so that values converted through different units still match.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Points per inch.
const POINTS_PER_INCH: f64 = 72.0;
/// Points per millimeter.
const POINTS_PER_MM: f64 = POINTS_PER_INCH / 25.4;
/// Tolerance used by [`Length::approx_eq`], in points.
pub const LENGTH_EPSILON: f64 = 0.001;

/// An immutable distance, stored in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(f64);

/// Shorthand for a zero length.
pub const ZERO: Length = Length(0.0);

impl Length {
    /// A length in points (the device/base unit).
    pub const fn pt(value: f64) -> Self {
        Self(value)
    }

    pub fn mm(value: f64) -> Self {
        Self(value * POINTS_PER_MM)
    }

    pub fn inch(value: f64) -> Self {
        Self(value * POINTS_PER_INCH)
    }

    /// The value in points.
    pub const fn to_pt(self) -> f64 {
        self.0
    }

    pub fn to_mm(self) -> f64 {
        self.0 / POINTS_PER_MM
    }

    pub fn to_inch(self) -> f64 {
        self.0 / POINTS_PER_INCH
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Equality within [`LENGTH_EPSILON`].
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() < LENGTH_EPSILON
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}pt", self.0)
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl SubAssign for Length {
    fn sub_assign(&mut self, rhs: Length) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl std::iter::Sum for Length {
    fn sum<I: Iterator<Item = Length>>(iter: I) -> Length {
        iter.fold(ZERO, |acc, l| acc + l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_round_trip_within_tolerance() {
        assert!(Length::inch(1.0).approx_eq(Length::mm(25.4)));
        assert!(Length::pt(72.0).approx_eq(Length::inch(1.0)));
        assert!((Length::mm(210.0).to_mm() - 210.0).abs() < 1e-9);
    }

    #[test]
    fn arithmetic_keeps_points() {
        let total = Length::pt(10.0) + Length::pt(5.0) - Length::pt(3.0);
        assert_eq!(total, Length::pt(12.0));
        assert_eq!(-total, Length::pt(-12.0));
        assert_eq!(total * 0.5, Length::pt(6.0));
        let sum: Length = [Length::pt(1.0), Length::pt(2.0)].into_iter().sum();
        assert_eq!(sum, Length::pt(3.0));
    }
}
