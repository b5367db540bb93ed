//! Element content, creation, injection and lifecycle.

use std::fmt;
use std::str::FromStr;

use crate::document::Document;
use crate::dom::{self, NodeId};
use crate::error::{Error, Result};
use crate::selector::ElementLookup;

/// What a `get`/`set`/`remove` key addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKey {
    /// Text content (`"text"`, any case).
    Text,
    /// Serialized inner HTML (`"html"`, any case).
    Html,
    /// A named attribute, lowercased.
    Attribute(String),
}

impl ElementKey {
    pub fn parse(key: &str) -> Self {
        if key.eq_ignore_ascii_case("text") {
            ElementKey::Text
        } else if key.eq_ignore_ascii_case("html") {
            ElementKey::Html
        } else {
            ElementKey::Attribute(key.to_ascii_lowercase())
        }
    }
}

/// Where [`Document::inject`] places a node relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectPosition {
    /// Last child of the target.
    #[default]
    Bottom,
    /// First child of the target.
    Top,
    /// Previous sibling of the target.
    Before,
    /// Next sibling of the target.
    After,
}

impl InjectPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectPosition::Bottom => "bottom",
            InjectPosition::Top => "top",
            InjectPosition::Before => "before",
            InjectPosition::After => "after",
        }
    }
}

impl fmt::Display for InjectPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InjectPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bottom" => Ok(InjectPosition::Bottom),
            "top" => Ok(InjectPosition::Top),
            "before" => Ok(InjectPosition::Before),
            "after" => Ok(InjectPosition::After),
            _ => Err(Error::InvalidPosition(s.to_string())),
        }
    }
}

fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Content and attributes.
impl Document {
    /// Read text, inner HTML, or an attribute.
    pub fn get(&self, id: NodeId, key: &str) -> Result<Option<String>> {
        self.expect_element(id)?;
        match ElementKey::parse(key) {
            ElementKey::Text => self.text(id).map(Some),
            ElementKey::Html => self.inner_html(id).map(Some),
            ElementKey::Attribute(name) => Ok(self.dom().get_attr(id, &name).map(str::to_string)),
        }
    }

    /// Write text, inner HTML, or an attribute.
    pub fn set(&mut self, id: NodeId, key: &str, value: &str) -> Result<()> {
        self.expect_element(id)?;
        match ElementKey::parse(key) {
            ElementKey::Text => self.set_text(id, value),
            ElementKey::Html => self.set_inner_html(id, value),
            ElementKey::Attribute(name) => {
                self.dom_mut().set_attr(id, &name, value.to_string());
                Ok(())
            }
        }
    }

    /// Clear text/HTML content, or remove an attribute.
    pub fn remove(&mut self, id: NodeId, key: &str) -> Result<()> {
        self.expect_element(id)?;
        match ElementKey::parse(key) {
            ElementKey::Text | ElementKey::Html => self.clear_children(id),
            ElementKey::Attribute(name) => {
                self.dom_mut().remove_attr(id, &name);
            }
        }
        Ok(())
    }

    /// Replace the children with one text node (none for empty text).
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.expect_element(id)?;
        self.clear_children(id);
        if !text.is_empty() {
            let tree = self.dom_mut();
            let node = tree.create_text(text.to_string());
            tree.append(id, node);
        }
        Ok(())
    }

    /// Replace the children with the HTML fragment, parsed in the context
    /// of this element.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<()> {
        self.expect_element(id)?;
        let context = self
            .dom()
            .qual_name(id)
            .cloned()
            .ok_or(Error::NotAnElement(id))?;
        self.clear_children(id);
        let tree = self.dom_mut();
        for node in dom::parse_fragment_into(tree, context, html) {
            tree.append(id, node);
        }
        Ok(())
    }

    /// Drop the children and every event registration in their subtrees.
    fn clear_children(&mut self, id: NodeId) {
        let descendants: Vec<_> = self.dom().descendants(id).collect();
        for node in descendants {
            self.events_mut().remove_all(node);
        }
        self.dom_mut().remove_children(id);
    }
}

/// Creation and placement.
impl Document {
    /// Create a detached element. Options are applied in order with the
    /// same key rules as [`Document::set`].
    pub fn create_element<I, K, V>(&mut self, tag: &str, options: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if !is_valid_tag_name(tag) {
            return Err(Error::InvalidTagName(tag.to_string()));
        }
        let id = self.dom_mut().create_html_element(tag);
        for (key, value) in options {
            self.set(id, key.as_ref(), value.as_ref())?;
        }
        Ok(id)
    }

    /// Insert `node` relative to `target`, moving it if it is already in the
    /// tree. `Top` and `Bottom` need an element target.
    pub fn inject(&mut self, node: NodeId, target: NodeId, position: InjectPosition) -> Result<()> {
        self.node(node)?;
        self.node(target)?;
        if node == target && matches!(position, InjectPosition::Before | InjectPosition::After) {
            return Ok(());
        }

        let anchor = match position {
            InjectPosition::Bottom | InjectPosition::Top => {
                self.expect_element(target)?;
                target
            }
            InjectPosition::Before | InjectPosition::After => {
                self.parent(target).ok_or(Error::Detached(target))?
            }
        };
        if self.dom().is_inclusive_ancestor(node, anchor) {
            return Err(Error::HierarchyRequest { node, target });
        }

        let (first_child, next_sibling) = {
            let target_node = self.node(target)?;
            (target_node.first_child, target_node.next_sibling)
        };
        let tree = self.dom_mut();
        match position {
            InjectPosition::Bottom => tree.append(target, node),
            InjectPosition::Top if first_child == node => {}
            InjectPosition::Top if first_child.is_some() => tree.insert_before(first_child, node),
            InjectPosition::Top => tree.append(target, node),
            InjectPosition::Before => tree.insert_before(target, node),
            InjectPosition::After if next_sibling == node => {}
            InjectPosition::After if next_sibling.is_some() => {
                tree.insert_before(next_sibling, node)
            }
            InjectPosition::After => tree.append(anchor, node),
        }

        log::debug!("inject {node} {position} {target}");
        Ok(())
    }
}

/// Lifecycle.
impl Document {
    /// Detach an element from its parent. A detached element is left as is.
    pub fn dispose(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.dom_mut().detach(id);
        Ok(())
    }

    /// Remove every child, dropping the event registrations of all
    /// descendants.
    pub fn empty(&mut self, id: NodeId) -> Result<()> {
        self.expect_element(id)?;
        self.clear_children(id);
        Ok(())
    }

    /// Drop the element's own events, empty it, and detach it.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        self.expect_element(id)?;
        let removed = self.remove_all_events(id);
        self.clear_children(id);
        self.dom_mut().detach(id);
        log::debug!("destroy {id} ({removed} event(s) dropped)");
        Ok(())
    }

    /// Descendant elements with `tag` (`None` or `"*"` for all), in document
    /// order.
    pub fn elements_within(&self, id: NodeId, tag: Option<&str>) -> Result<Vec<NodeId>> {
        self.node(id)?;
        Ok(self.get_by_tag_name(tag.unwrap_or("*"), Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|&n| doc.dom().element_id(n).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_element_key_parse() {
        assert_eq!(ElementKey::parse("TEXT"), ElementKey::Text);
        assert_eq!(ElementKey::parse("Html"), ElementKey::Html);
        assert_eq!(
            ElementKey::parse("Data-Role"),
            ElementKey::Attribute("data-role".into())
        );
    }

    #[test]
    fn test_inject_position_parse() {
        assert_eq!("top".parse::<InjectPosition>().unwrap(), InjectPosition::Top);
        assert_eq!("AFTER".parse::<InjectPosition>().unwrap(), InjectPosition::After);
        assert!(matches!(
            "middle".parse::<InjectPosition>(),
            Err(Error::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_get_set_remove() {
        let mut doc = Document::parse(r#"<a id="link" href="/x">go <b>now</b></a>"#);
        let a = doc.first("#link").unwrap();

        assert_eq!(doc.get(a, "href").unwrap().as_deref(), Some("/x"));
        assert_eq!(doc.get(a, "text").unwrap().as_deref(), Some("go now"));
        assert_eq!(doc.get(a, "HTML").unwrap().as_deref(), Some("go <b>now</b>"));
        assert_eq!(doc.get(a, "title").unwrap(), None);

        doc.set(a, "Title", "hint").unwrap();
        assert_eq!(doc.dom().get_attr(a, "title"), Some("hint"));

        doc.set(a, "html", "<i>x</i><i>y</i>").unwrap();
        assert_eq!(doc.resolve("i").unwrap().len(), 2);

        doc.remove(a, "href").unwrap();
        assert_eq!(doc.get(a, "href").unwrap(), None);

        doc.remove(a, "text").unwrap();
        assert_eq!(doc.inner_html(a).unwrap(), "");
    }

    #[test]
    fn test_set_text_escapes_markup() {
        let mut doc = Document::parse(r#"<p id="p"></p>"#);
        let p = doc.first("#p").unwrap();
        doc.set(p, "text", "<b>not bold</b>").unwrap();

        assert_eq!(doc.inner_html(p).unwrap(), "&lt;b&gt;not bold&lt;/b&gt;");
        assert!(doc.resolve("b").unwrap().is_empty());
    }

    #[test]
    fn test_setting_id_updates_lookup() {
        let mut doc = Document::parse("<p></p>");
        let p = doc.first("p").unwrap();
        doc.set(p, "id", "fresh").unwrap();
        assert_eq!(doc.first("#fresh").unwrap(), p);
    }

    #[test]
    fn test_create_element_with_options() {
        let mut doc = Document::new();
        let el = doc
            .create_element("LI", [("id", "item"), ("class", "a b"), ("text", "hi")])
            .unwrap();

        assert_eq!(doc.tag_name(el), Some("li"));
        assert_eq!(doc.outer_html(el).unwrap(), r#"<li id="item" class="a b">hi</li>"#);
        assert!(!doc.is_connected(el));
        assert!(doc.resolve("#item").unwrap().is_empty());
    }

    #[test]
    fn test_create_element_rejects_bad_tags() {
        let mut doc = Document::new();
        for tag in ["", "1p", "a b", "<p>"] {
            assert!(matches!(
                doc.create_element(tag, Vec::<(&str, &str)>::new()),
                Err(Error::InvalidTagName(_))
            ));
        }
    }

    #[test]
    fn test_inject_positions() {
        let mut doc = Document::parse(r#"<ul id="list"><li id="mid"></li></ul>"#);
        let list = doc.first("#list").unwrap();
        let mid = doc.first("#mid").unwrap();
        let none: [(&str, &str); 0] = [];

        let make = |doc: &mut Document, id: &str| {
            doc.create_element("li", [("id", id)]).unwrap()
        };
        let top = make(&mut doc, "top");
        let bottom = make(&mut doc, "bottom");
        let before = make(&mut doc, "before");
        let after = make(&mut doc, "after");

        doc.inject(bottom, list, InjectPosition::Bottom).unwrap();
        doc.inject(top, list, InjectPosition::Top).unwrap();
        doc.inject(before, mid, InjectPosition::Before).unwrap();
        doc.inject(after, mid, InjectPosition::After).unwrap();

        let order = doc.children(list);
        assert_eq!(ids(&doc, &order), ["top", "before", "mid", "after", "bottom"]);

        let last = doc.create_element("li", none).unwrap();
        doc.inject(last, bottom, InjectPosition::After).unwrap();
        assert_eq!(doc.children(list).last().copied(), Some(last));
    }

    #[test]
    fn test_inject_top_of_empty_element() {
        let mut doc = Document::parse(r#"<div id="box"></div>"#);
        let div = doc.first("#box").unwrap();
        let span = doc.create_element("span", [("id", "s")]).unwrap();

        doc.inject(span, div, InjectPosition::Top).unwrap();
        assert_eq!(doc.children(div), [span]);
    }

    #[test]
    fn test_inject_moves_existing_node() {
        let mut doc = Document::parse(r#"<div id="a"><p id="p"></p></div><div id="b"></div>"#);
        let p = doc.first("#p").unwrap();
        let b = doc.first("#b").unwrap();

        doc.inject(p, b, InjectPosition::Bottom).unwrap();
        assert_eq!(doc.parent(p), Some(b));
        assert!(doc.children(doc.first("#a").unwrap()).is_empty());
    }

    #[test]
    fn test_inject_errors() {
        let mut doc = Document::parse(r#"<div id="outer"><div id="inner"></div></div>"#);
        let outer = doc.first("#outer").unwrap();
        let inner = doc.first("#inner").unwrap();
        let loose = doc.create_element("p", [("id", "loose")]).unwrap();
        let other = doc.create_element("p", [("id", "other")]).unwrap();

        assert!(matches!(
            doc.inject(outer, inner, InjectPosition::Bottom),
            Err(Error::HierarchyRequest { .. })
        ));
        assert!(matches!(
            doc.inject(outer, outer, InjectPosition::Top),
            Err(Error::HierarchyRequest { .. })
        ));
        assert!(matches!(
            doc.inject(other, loose, InjectPosition::Before),
            Err(Error::Detached(id)) if id == loose
        ));
        assert!(matches!(
            doc.inject(other, NodeId(9999), InjectPosition::Bottom),
            Err(Error::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_destroy_drops_subtree_events() {
        let mut doc = Document::parse(
            r#"<div id="box"><button id="btn"></button></div><p id="keep"></p>"#,
        );
        let div = doc.first("#box").unwrap();
        let btn = doc.first("#btn").unwrap();
        let keep = doc.first("#keep").unwrap();
        doc.add_event(div, "click", |_| {}).unwrap();
        doc.add_event(btn, "click", |_| {}).unwrap();
        doc.add_event(keep, "click", |_| {}).unwrap();

        doc.destroy(div).unwrap();

        assert!(!doc.is_connected(div));
        assert!(doc.children(div).is_empty());
        assert!(!doc.has_event(div, "click"));
        assert!(!doc.has_event(btn, "click"));
        assert!(doc.has_event(keep, "click"));
        assert!(doc.resolve("#btn").unwrap().is_empty());
    }

    #[test]
    fn test_dispose_keeps_events_and_children() {
        let mut doc = Document::parse(r#"<div id="box"><span></span></div>"#);
        let div = doc.first("#box").unwrap();
        doc.add_event(div, "click", |_| {}).unwrap();

        doc.dispose(div).unwrap();
        doc.dispose(div).unwrap();

        assert!(!doc.is_connected(div));
        assert!(doc.has_event(div, "click"));
        assert_eq!(doc.children(div).len(), 1);
    }

    #[test]
    fn test_elements_within() {
        let doc = Document::parse(r#"<div id="box"><p><a></a></p><a></a></div><a></a>"#);
        let div = doc.first("#box").unwrap();

        assert_eq!(doc.elements_within(div, Some("a")).unwrap().len(), 2);
        assert_eq!(doc.elements_within(div, None).unwrap().len(), 3);
    }
}
