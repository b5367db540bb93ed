//! Style values and inline style declarations.
//!
//! [`StyleFormatter`] turns a raw value into the CSS string to store, and
//! [`InlineStyle`] holds the declarations of an element's `style` attribute.

mod format;
mod inline;

pub use format::{PIXEL_PROPERTIES, StyleFormatter, StyleValue, format_style_value};
pub use inline::InlineStyle;
