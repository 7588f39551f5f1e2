//! Color representation
//!
//! Colors are stored as 8-bit RGB channels with a floating point alpha,
//! matching how computed `border-color` values arrive from a cascade.

/// An RGBA color
///
/// # Examples
///
/// ```
/// use tableflow::Rgba;
///
/// let red = Rgba::rgb(255, 0, 0);
/// assert_eq!(red.a, 1.0);
/// assert!(Rgba::TRANSPARENT.is_transparent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0.0-1.0)
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Opaque black
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Creates a color from channels and alpha
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns true if the color is fully transparent
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}
