//! Selector shorthand grammar and resolution.
//!
//! Supported forms:
//!
//! | Selector      | Matches                                           |
//! |---------------|---------------------------------------------------|
//! | `#id`         | the element with that id, or nothing              |
//! | `.class`      | every element carrying the class                  |
//! | `tag`         | every element with the tag name                   |
//! | `*`           | every element                                     |
//! | `#id .class`  | descendants of `#id` carrying the class           |
//!
//! Collections are always in document order.

use std::fmt;
use std::str::FromStr;

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// Lookups a host document provides for selector resolution.
pub trait ElementLookup {
    /// The connected element whose id is `id`, first in document order.
    fn get_by_id(&self, id: &str) -> Option<NodeId>;

    /// Elements carrying `class`, within `scope` (descendants only) or the
    /// whole document when `scope` is `None`.
    fn get_by_class_name(&self, class: &str, scope: Option<NodeId>) -> Vec<NodeId>;

    /// Elements with tag `tag` (ASCII case-insensitive, `*` for all), within
    /// `scope` or the whole document.
    fn get_by_tag_name(&self, tag: &str, scope: Option<NodeId>) -> Vec<NodeId>;
}

impl ElementLookup for Dom {
    fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.document())
            .find(|&node| self.element_id(node) == Some(id))
    }

    fn get_by_class_name(&self, class: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        let root = scope.unwrap_or_else(|| self.document());
        self.descendants(root)
            .filter(|&node| self.has_class(node, class))
            .collect()
    }

    fn get_by_tag_name(&self, tag: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        let root = scope.unwrap_or_else(|| self.document());
        self.descendants(root)
            .filter(|&node| {
                self.element_name(node)
                    .is_some_and(|name| tag == "*" || name.as_ref().eq_ignore_ascii_case(tag))
            })
            .collect()
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
    /// `*`
    Universal,
    /// `#id .class`
    ClassWithin { id: String, class: String },
}

/// Result of resolving a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matches {
    /// Id selectors resolve to at most one element.
    Element(Option<NodeId>),
    /// Every other form resolves to a document-order collection.
    Collection(Vec<NodeId>),
}

impl Matches {
    /// First matched element, if any.
    pub fn first(&self) -> Option<NodeId> {
        match self {
            Matches::Element(node) => *node,
            Matches::Collection(nodes) => nodes.first().copied(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Matches::Element(node) => usize::from(node.is_some()),
            Matches::Collection(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        match self {
            Matches::Element(node) => node.iter().copied().collect(),
            Matches::Collection(nodes) => nodes.clone(),
        }
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        match self {
            Matches::Element(node) => node.into_iter().collect(),
            Matches::Collection(nodes) => nodes,
        }
    }
}

impl IntoIterator for Matches {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// One space-free token of a selector.
#[derive(Debug, PartialEq, Eq)]
enum Simple<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
    Universal,
}

/// Parse `^([#.]?)(\w[\w-]*|\*)$` with ASCII `\w`.
fn parse_simple(token: &str) -> Option<Simple<'_>> {
    let (prefix, name) = match token.as_bytes().first()? {
        b'#' | b'.' => token.split_at(1),
        _ => ("", token),
    };

    if name == "*" {
        return prefix.is_empty().then_some(Simple::Universal);
    }
    if !is_identifier(name) {
        return None;
    }

    Some(match prefix {
        "#" => Simple::Id(name),
        "." => Simple::Class(name),
        _ => Simple::Tag(name),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_word_char(first) && chars.all(|c| is_word_char(c) || c == '-')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidSelector(input.to_string());
        let tokens: Vec<&str> = input.split(' ').collect();

        match tokens.as_slice() {
            [single] => match parse_simple(single).ok_or_else(invalid)? {
                Simple::Id(id) => Ok(Selector::Id(id.to_string())),
                Simple::Class(class) => Ok(Selector::Class(class.to_string())),
                Simple::Tag(tag) => Ok(Selector::Tag(tag.to_string())),
                Simple::Universal => Ok(Selector::Universal),
            },
            [scope, target] => match (parse_simple(scope), parse_simple(target)) {
                (Some(Simple::Id(id)), Some(Simple::Class(class))) => Ok(Selector::ClassWithin {
                    id: id.to_string(),
                    class: class.to_string(),
                }),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Tag(tag) => f.write_str(tag),
            Selector::Universal => f.write_str("*"),
            Selector::ClassWithin { id, class } => write!(f, "#{id} .{class}"),
        }
    }
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    /// Resolve against a host document.
    pub fn resolve<L: ElementLookup + ?Sized>(&self, host: &L) -> Matches {
        match self {
            Selector::Id(id) => Matches::Element(host.get_by_id(id)),
            Selector::Class(class) => Matches::Collection(host.get_by_class_name(class, None)),
            Selector::Tag(tag) => Matches::Collection(host.get_by_tag_name(tag, None)),
            Selector::Universal => Matches::Collection(host.get_by_tag_name("*", None)),
            Selector::ClassWithin { id, class } => Matches::Collection(
                host.get_by_id(id)
                    .map(|scope| host.get_by_class_name(class, Some(scope)))
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Parse and resolve `selector` in one step.
pub fn resolve<L: ElementLookup + ?Sized>(host: &L, selector: &str) -> Result<Matches> {
    let parsed = Selector::parse(selector)?;
    let matches = parsed.resolve(host);
    log::debug!("resolve {parsed} -> {} match(es)", matches.len());
    Ok(matches)
}

/// First element matched by `selector`.
///
/// An empty result is an error rather than a silent `None`.
pub fn first<L: ElementLookup + ?Sized>(host: &L, selector: &str) -> Result<NodeId> {
    resolve(host, selector)?
        .first()
        .ok_or_else(|| Error::EmptyResult(selector.to_string()))
}
