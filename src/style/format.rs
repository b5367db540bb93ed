//! Style value formatting: the pixel-unit rule.

use std::collections::HashSet;
use std::fmt;

/// CSS properties whose bare numbers are pixel lengths.
pub const PIXEL_PROPERTIES: &[&str] = &[
    "border-bottom-left-radius",
    "border-bottom-right-radius",
    "border-bottom-width",
    "border-left-width",
    "border-right-width",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-top-width",
    "bottom",
    "font-size",
    "height",
    "left",
    "letter-spacing",
    "line-height",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "outline-width",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "right",
    "top",
    "width",
    "word-spacing",
    "stroke-width",
];

/// A raw value handed to a style setter.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// No value at all (undefined / null).
    Unset,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Empty string, `false`, and unset all count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            StyleValue::Unset | StyleValue::Bool(false) => true,
            StyleValue::Text(text) => text.is_empty(),
            StyleValue::Bool(true) | StyleValue::Number(_) => false,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Unset => Ok(()),
            StyleValue::Bool(b) => write!(f, "{b}"),
            StyleValue::Number(n) => f.write_str(&format_number(*n)),
            StyleValue::Text(text) => f.write_str(text),
        }
    }
}

/// Render a number the way script engines print one: no negative zero,
/// plain digits between 1e-6 and 1e21, exponent form outside that range.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<&String> for StyleValue {
    fn from(value: &String) -> Self {
        StyleValue::Text(value.clone())
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

macro_rules! number_into_style_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StyleValue {
                fn from(value: $ty) -> Self {
                    StyleValue::Number(f64::from(value))
                }
            }
        )*
    };
}

number_into_style_value!(f64, f32, i32, u32, i16, u16, i8, u8);

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StyleValue::Unset, Into::into)
    }
}

/// Decides the serialized CSS string for a property/value pair.
///
/// Rules, in order:
/// 1. An empty value becomes `0px` for pixel properties, `none` otherwise.
/// 2. A number on a pixel property gets a `px` suffix.
/// 3. Anything else is passed through as its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleFormatter {
    pixel_properties: HashSet<String>,
}

impl Default for StyleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleFormatter {
    /// Formatter using [`PIXEL_PROPERTIES`].
    pub fn new() -> Self {
        Self {
            pixel_properties: PIXEL_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Formatter with no pixel properties.
    pub fn empty() -> Self {
        Self {
            pixel_properties: HashSet::new(),
        }
    }

    pub fn with_pixel_property(mut self, property: impl Into<String>) -> Self {
        self.pixel_properties.insert(property.into());
        self
    }

    pub fn without_pixel_property(mut self, property: &str) -> Self {
        self.pixel_properties.remove(property);
        self
    }

    pub fn is_pixel_property(&self, property: &str) -> bool {
        self.pixel_properties.contains(property)
    }

    pub fn format(&self, property: &str, value: impl Into<StyleValue>) -> String {
        let value = value.into();
        let pixel = self.is_pixel_property(property);

        let formatted = match value {
            ref empty if empty.is_empty() => {
                if pixel {
                    "0px".to_string()
                } else {
                    "none".to_string()
                }
            }
            StyleValue::Number(n) if pixel => format!("{}px", format_number(n)),
            other => other.to_string(),
        };

        log::trace!("format {property}: {formatted}");
        formatted
    }
}

/// Format with the default pixel-property table.
pub fn format_style_value(property: &str, value: impl Into<StyleValue>) -> String {
    StyleFormatter::new().format(property, value)
}
