//! Resolution-independent distances expressed in staff interlines

use std::fmt;

use serde::Deserialize;

/// A distance expressed as a fraction of the staff interline
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Fraction(pub f64);

impl Fraction {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}il", self.0)
    }
}

/// Scale of a page: the pixel distance between two staff lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    interline: f64,
}

impl Scale {
    pub fn new(interline: f64) -> Self {
        Self { interline }
    }

    pub fn interline(&self) -> f64 {
        self.interline
    }

    pub fn to_pixels(&self, fraction: Fraction) -> f64 {
        fraction.0 * self.interline
    }

    pub fn pixels_to_frac(&self, pixels: f64) -> f64 {
        pixels / self.interline
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let scale = Scale::new(16.0);
        assert_eq!(scale.to_pixels(Fraction(1.5)), 24.0);
        assert_eq!(scale.pixels_to_frac(40.0), 2.5);
        assert_eq!(scale.interline(), 16.0);
    }
}
