//! Layout constraints
//!
//! Describes the space a box is being laid out into. Sizing happens under
//! one of three regimes per axis: a definite number of pixels, or the
//! min-content / max-content interrogation modes used for intrinsic
//! measurement.

/// Available space in one axis
///
/// # Examples
///
/// ```
/// use tableflow::layout::AvailableSpace;
///
/// let definite = AvailableSpace::Definite(800.0);
/// assert!(definite.is_definite());
/// assert_eq!(definite.definite_value(), Some(800.0));
///
/// assert_eq!(AvailableSpace::MinContent.definite_value(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvailableSpace {
    /// A definite amount of space in CSS pixels
    Definite(f32),
    /// Size to the smallest width that avoids overflow
    MinContent,
    /// Size to the ideal width with no wrapping
    MaxContent,
}

impl AvailableSpace {
    /// Returns true if the space is a definite pixel amount
    pub fn is_definite(self) -> bool {
        matches!(self, AvailableSpace::Definite(_))
    }

    /// Returns the pixel amount if definite
    pub fn definite_value(self) -> Option<f32> {
        match self {
            AvailableSpace::Definite(value) => Some(value),
            _ => None,
        }
    }
}

/// The full set of constraints a box is laid out under
///
/// Percentage bases are tracked separately from available space because a
/// box can have definite available space but an indefinite percentage base
/// (e.g. a percent height inside an auto-height table).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    /// Available width for this box
    pub available_width: AvailableSpace,
    /// Available height for this box
    pub available_height: AvailableSpace,
    /// Base for resolving percentage widths, when known
    pub percentage_base_width: Option<f32>,
    /// Base for resolving percentage heights, when known
    pub percentage_base_height: Option<f32>,
}

impl LayoutConstraints {
    /// Creates constraints with the given available space and no percentage
    /// bases
    pub fn new(available_width: AvailableSpace, available_height: AvailableSpace) -> Self {
        Self {
            available_width,
            available_height,
            percentage_base_width: None,
            percentage_base_height: None,
        }
    }

    /// Creates constraints for a definite width with indefinite height
    ///
    /// The definite width doubles as the percentage base, the common case
    /// for table and cell layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use tableflow::layout::LayoutConstraints;
    ///
    /// let constraints = LayoutConstraints::definite_width(640.0);
    /// assert_eq!(constraints.percentage_base_width, Some(640.0));
    /// ```
    pub fn definite_width(width: f32) -> Self {
        Self {
            available_width: AvailableSpace::Definite(width),
            available_height: AvailableSpace::MaxContent,
            percentage_base_width: Some(width),
            percentage_base_height: None,
        }
    }

    /// Returns a copy with both percentage bases set
    pub fn with_percentage_bases(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        self.percentage_base_width = width;
        self.percentage_base_height = height;
        self
    }
}
