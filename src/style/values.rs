//! CSS value types
//!
//! Computed-value representations of lengths. The table engine only ever
//! sees absolute lengths and percentages; font- and viewport-relative units
//! are resolved before layout by the embedder.

use std::fmt;

/// CSS length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Pixels (px) - CSS reference unit, 1/96th of an inch
    Px,

    /// Points (pt) - 1/72nd of an inch
    Pt,

    /// Percentage - resolved against a containing block dimension
    Percent,
}

impl LengthUnit {
    /// Returns true if this unit has a fixed pixel conversion
    pub fn is_absolute(self) -> bool {
        matches!(self, LengthUnit::Px | LengthUnit::Pt)
    }

    /// Returns true if this is a percentage
    pub fn is_percentage(self) -> bool {
        self == LengthUnit::Percent
    }
}

/// A CSS length: a numeric value with a unit
///
/// # Examples
///
/// ```
/// use tableflow::{Length, LengthUnit};
///
/// let length = Length::px(10.0);
/// assert_eq!(length.value, 10.0);
/// assert_eq!(length.unit, LengthUnit::Px);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    /// The numeric value
    pub value: f32,
    /// The unit
    pub unit: LengthUnit,
}

impl Length {
    /// Creates a new length with the given value and unit
    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Creates a length in pixels
    pub const fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Creates a length in points (1pt = 1.333px)
    pub const fn pt(value: f32) -> Self {
        Self::new(value, LengthUnit::Pt)
    }

    /// Creates a percentage value
    pub const fn percent(value: f32) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    /// Converts this length to pixels
    ///
    /// Percentages return their raw numeric value; use
    /// [`resolve_against`](Self::resolve_against) when a base is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::Length;
    ///
    /// assert_eq!(Length::px(100.0).to_px(), 100.0);
    /// assert_eq!(Length::pt(72.0).to_px(), 96.0); // 72pt = 1in = 96px
    /// ```
    pub fn to_px(self) -> f32 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Pt => self.value * (96.0 / 72.0), // 1pt = 1/72 inch
            LengthUnit::Percent => self.value,
        }
    }

    /// Resolves this length to pixels against a percentage base
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::Length;
    ///
    /// assert_eq!(Length::percent(50.0).resolve_against(200.0), 100.0);
    /// assert_eq!(Length::px(30.0).resolve_against(200.0), 30.0);
    /// ```
    pub fn resolve_against(self, base: f32) -> f32 {
        match self.unit {
            LengthUnit::Percent => self.value / 100.0 * base,
            _ => self.to_px(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Px => write!(f, "{}px", self.value),
            LengthUnit::Pt => write!(f, "{}pt", self.value),
            LengthUnit::Percent => write!(f, "{}%", self.value),
        }
    }
}

/// A length value or the `auto` keyword
///
/// Used for `width` and `height`, where `auto` defers to the layout
/// algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LengthOrAuto {
    /// A specific length value
    Length(Length),
    /// The `auto` keyword
    #[default]
    Auto,
}

impl LengthOrAuto {
    /// Creates a length in pixels
    pub const fn px(value: f32) -> Self {
        Self::Length(Length::px(value))
    }

    /// Creates a percentage value
    pub const fn percent(value: f32) -> Self {
        Self::Length(Length::percent(value))
    }

    /// Returns true if this is `auto`
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Returns the length if this is not auto
    pub fn length(self) -> Option<Length> {
        match self {
            Self::Length(length) => Some(length),
            Self::Auto => None,
        }
    }

    /// Converts to pixels if this is an absolute length, otherwise None
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::style::LengthOrAuto;
    ///
    /// assert_eq!(LengthOrAuto::px(100.0).to_px(), Some(100.0));
    /// assert_eq!(LengthOrAuto::percent(50.0).to_px(), None);
    /// assert_eq!(LengthOrAuto::Auto.to_px(), None);
    /// ```
    pub fn to_px(self) -> Option<f32> {
        match self {
            Self::Length(length) if length.unit.is_absolute() => Some(length.to_px()),
            _ => None,
        }
    }

    /// Resolves this value against a percentage base; None when auto
    pub fn resolve_against(self, base: f32) -> Option<f32> {
        self.length().map(|length| length.resolve_against(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_lengths_convert_to_pixels() {
        assert_eq!(Length::pt(12.0).to_px(), 16.0);
    }

    #[test]
    fn percent_resolves_against_base() {
        assert_eq!(Length::percent(25.0).resolve_against(400.0), 100.0);
    }

    #[test]
    fn auto_resolves_to_none() {
        assert_eq!(LengthOrAuto::Auto.resolve_against(400.0), None);
        assert!(LengthOrAuto::Auto.is_auto());
    }
}
