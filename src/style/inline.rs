//! Inline `style="..."` attribute declarations.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// Ordered declarations of an element's `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value. Invalid declarations are skipped and
    /// a repeated property keeps its first position with the last value.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut style = Self::new();

        loop {
            parser.skip_whitespace();
            if parser.is_exhausted() {
                break;
            }

            let result = parser.try_parse(|i| parse_declaration(i));
            match result {
                Ok((property, value)) => {
                    style.set(&property, value);
                }
                Err(_) => {
                    // Skip to the next semicolon to recover.
                    while let Ok(token) = parser.next() {
                        if matches!(token, Token::Semicolon) {
                            break;
                        }
                    }
                }
            }
        }

        style
    }

    /// Declared value for `property` (ASCII case-insensitive).
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration. An empty (or whitespace) value removes it.
    ///
    /// A value that would not survive a round trip as one declaration (a
    /// top-level `;`, for instance) is rejected and the existing declaration
    /// is left as it was. Returns whether the style changed.
    pub fn set(&mut self, property: &str, value: impl Into<String>) -> bool {
        let property = property.trim().to_ascii_lowercase();
        let value = value.into().trim().to_string();
        if property.is_empty() {
            return false;
        }
        if value.is_empty() {
            return self.remove(&property).is_some();
        }
        if !is_single_value(&value) {
            return false;
        }

        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property, value)),
        }
        true
    }

    /// Remove a declaration, returning its value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = property.to_ascii_lowercase();
        let index = self.declarations.iter().position(|(p, _)| *p == property)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Serialize back to attribute form: `a: b; c: d;`.
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// True when `value` is one complete declaration value: nothing is left
/// after reading up to the first top-level `;`.
fn is_single_value(value: &str) -> bool {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let read: Result<(), ParseError<'_, ()>> =
        parser.parse_until_before(Delimiter::Semicolon, |v| {
            while v.next().is_ok() {}
            Ok(())
        });
    read.is_ok() && parser.is_exhausted()
}

/// Parse `property: value` followed by `;` or the end of input.
fn parse_declaration<'i>(
    i: &mut Parser<'i, '_>,
) -> Result<(String, String), ParseError<'i, ()>> {
    let property = match i.next()? {
        Token::Ident(name) => name.to_ascii_lowercase(),
        _ => return Err(i.new_custom_error(())),
    };

    i.expect_colon()?;

    let value = i.parse_until_before(Delimiter::Semicolon, |v| {
        let start = v.position();
        while v.next().is_ok() {}
        Ok::<_, ParseError<'i, ()>>(v.slice_from(start).trim().to_string())
    })?;
    if value.is_empty() {
        return Err(i.new_custom_error(()));
    }

    if !i.is_exhausted() {
        i.expect_semicolon()?;
    }

    Ok((property, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = InlineStyle::parse("color: red; width:10px");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("WIDTH"), Some("10px"));
        assert_eq!(style.to_css(), "color: red; width: 10px;");
    }

    #[test]
    fn test_function_values_are_kept_whole() {
        let style = InlineStyle::parse("background: rgb(1, 2, 3) url(a.png); margin: 0 auto");
        assert_eq!(style.get("background"), Some("rgb(1, 2, 3) url(a.png)"));
        assert_eq!(style.get("margin"), Some("0 auto"));
    }

    #[test]
    fn test_invalid_declarations_are_skipped() {
        let style = InlineStyle::parse("color red; : x; width: 5px; height:; top: 1px");
        assert_eq!(style.to_css(), "width: 5px; top: 1px;");
    }

    #[test]
    fn test_duplicate_keeps_position_last_value() {
        let style = InlineStyle::parse("top: 1px; left: 2px; top: 3px");
        assert_eq!(style.to_css(), "top: 3px; left: 2px;");
    }

    #[test]
    fn test_set_and_remove() {
        let mut style = InlineStyle::new();
        style.set("Width", "10px");
        style.set("color", "blue");
        style.set("width", "20px");
        assert_eq!(style.to_css(), "width: 20px; color: blue;");

        style.set("color", "");
        assert_eq!(style.get("color"), None);

        assert_eq!(style.remove("width"), Some("20px".to_string()));
        assert!(style.is_empty());
        assert_eq!(style.to_css(), "");
    }

    #[test]
    fn test_set_rejects_values_that_split() {
        let mut style = InlineStyle::parse("color: blue");

        assert!(!style.set("color", "red; width: 99px"));
        assert!(!style.set("width", ";"));
        assert_eq!(style.to_css(), "color: blue;");

        // A semicolon nested in a block or string is part of the value.
        assert!(style.set("content", "\"a;b\""));
        assert!(style.set("background", "url(a;b.png)"));
        assert_eq!(
            InlineStyle::parse(&style.to_css()).get("content"),
            Some("\"a;b\"")
        );
    }
}
