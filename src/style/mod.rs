//! Computed style representation
//!
//! The table engine consumes already-computed style: every box carries an
//! `Arc<ComputedStyle>` with resolved property values. There is no cascade
//! here; styles are constructed by the embedder (or by hand in tests).

pub mod color;
pub mod computed;
pub mod types;
pub mod values;

pub use color::Rgba;
pub use computed::ComputedStyle;
pub use types::{
    BorderCollapse, BorderStyle, CaptionSide, Display, EmptyCells, TableLayout, VerticalAlign,
};
pub use values::{Length, LengthOrAuto, LengthUnit};
