//! The document: tree, event side-table, style formatter and timers.

use std::fmt;

use crate::dom::{self, Dom, Node, NodeData, NodeId};
use crate::error::{Error, Result};
use crate::events::{Event, EventTable, Handler};
use crate::selector::{self, ElementLookup, Matches};
use crate::style::{InlineStyle, StyleFormatter, StyleValue};
use crate::timer::{TimerId, Timers};

/// Callback scheduled with [`Document::delay`].
pub type DelayCallback = Box<dyn FnOnce(&mut Document)>;

/// An HTML document and everything attached to its elements.
///
/// Event handlers live in a side-table owned by the document rather than on
/// the nodes, so destroying an element also drops its registrations.
pub struct Document {
    dom: Dom,
    events: EventTable,
    formatter: StyleFormatter,
    timers: Timers<DelayCallback>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.dom.len())
            .field("events", &self.events)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document (`<html><head></head><body></body></html>`).
    pub fn new() -> Self {
        Self::parse("")
    }

    /// Parse an HTML document.
    pub fn parse(html: &str) -> Self {
        Self::from_dom(dom::parse_html(html))
    }

    pub fn from_dom(dom: Dom) -> Self {
        Self {
            dom,
            events: EventTable::new(),
            formatter: StyleFormatter::new(),
            timers: Timers::new(),
        }
    }

    /// Replace the style formatter used by [`Document::set_style`].
    pub fn with_formatter(mut self, formatter: StyleFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn formatter(&self) -> &StyleFormatter {
        &self.formatter
    }

    /// The underlying tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub(crate) fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventTable {
        &mut self.events
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        self.dom.document()
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Option<NodeId> {
        self.dom
            .children(self.dom.document())
            .find(|&n| self.dom.is_element(n))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.top_level("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.top_level("body")
    }

    fn top_level(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.dom
            .children(html)
            .find(|&n| self.dom.element_name(n).is_some_and(|name| name.as_ref() == tag))
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.dom.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Fail unless `id` is an element of this document's arena.
    pub(crate) fn expect_element(&self, id: NodeId) -> Result<()> {
        match self.node(id)?.data {
            NodeData::Element { .. } => Ok(()),
            _ => Err(Error::NotAnElement(id)),
        }
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.dom.element_name(id).map(|name| name.as_ref())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.dom.parent(id)
    }

    /// Child elements, skipping text and comments.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.dom
            .children(id)
            .filter(|&n| self.dom.is_element(n))
            .collect()
    }

    /// True when `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.dom.is_connected(id)
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> Result<String> {
        Ok(dom::inner_html(&self.dom, self.dom.document())?)
    }

    pub fn inner_html(&self, id: NodeId) -> Result<String> {
        self.node(id)?;
        Ok(dom::inner_html(&self.dom, id)?)
    }

    pub fn outer_html(&self, id: NodeId) -> Result<String> {
        self.node(id)?;
        Ok(dom::outer_html(&self.dom, id)?)
    }

    /// Concatenated descendant text.
    pub fn text(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        Ok(match &node.data {
            NodeData::Text(text) => text.clone(),
            _ => self.dom.collect_text(id),
        })
    }
}

/// Selection.
impl Document {
    /// Resolve a selector shorthand.
    pub fn resolve(&self, selector: &str) -> Result<Matches> {
        selector::resolve(self, selector)
    }

    /// First element matched by `selector`, or [`Error::EmptyResult`].
    pub fn first(&self, selector: &str) -> Result<NodeId> {
        selector::first(self, selector)
    }
}

impl ElementLookup for Document {
    fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.get_by_id(id)
    }

    fn get_by_class_name(&self, class: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        self.dom.get_by_class_name(class, scope)
    }

    fn get_by_tag_name(&self, tag: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        self.dom.get_by_tag_name(tag, scope)
    }
}

/// Inline styles.
impl Document {
    /// Parsed `style` attribute of an element.
    pub fn inline_style(&self, id: NodeId) -> Result<InlineStyle> {
        self.expect_element(id)?;
        Ok(self
            .dom
            .get_attr(id, "style")
            .map(InlineStyle::parse)
            .unwrap_or_default())
    }

    fn write_inline_style(&mut self, id: NodeId, style: &InlineStyle) {
        if style.is_empty() {
            self.dom.remove_attr(id, "style");
        } else {
            self.dom.set_attr(id, "style", style.to_css());
        }
    }

    /// Format `value` for `property` and store it in the element's inline
    /// style. A value that is not a single declaration value (such as
    /// `"red; width: 1px"`) leaves the declaration unchanged.
    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<StyleValue>,
    ) -> Result<()> {
        let mut style = self.inline_style(id)?;
        let property = property.trim().to_ascii_lowercase();
        let formatted = self.formatter.format(&property, value);
        if !style.set(&property, formatted.as_str()) {
            log::debug!("set_style {property}: {formatted:?} left unchanged");
        }
        self.write_inline_style(id, &style);
        Ok(())
    }

    /// [`Document::set_style`] for each pair, in order.
    pub fn set_styles<I, K, V>(&mut self, id: NodeId, styles: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        let mut style = self.inline_style(id)?;
        for (property, value) in styles {
            let property = property.as_ref().trim().to_ascii_lowercase();
            let formatted = self.formatter.format(&property, value);
            if !style.set(&property, formatted.as_str()) {
                log::debug!("set_styles {property}: {formatted:?} left unchanged");
            }
        }
        self.write_inline_style(id, &style);
        Ok(())
    }

    /// Declared inline value of `property`. No cascade is applied.
    pub fn get_style(&self, id: NodeId, property: &str) -> Result<Option<String>> {
        Ok(self.inline_style(id)?.get(property.trim()).map(str::to_string))
    }

    pub fn get_styles<S: AsRef<str>>(
        &self,
        id: NodeId,
        properties: &[S],
    ) -> Result<Vec<(String, Option<String>)>> {
        let style = self.inline_style(id)?;
        Ok(properties
            .iter()
            .map(|p| {
                let p = p.as_ref();
                (p.to_string(), style.get(p.trim()).map(str::to_string))
            })
            .collect())
    }

    /// Delete an inline declaration. Returns whether it existed.
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<bool> {
        self.remove_styles(id, &[property]).map(|n| n > 0)
    }

    /// Delete inline declarations, returning how many existed.
    pub fn remove_styles<S: AsRef<str>>(&mut self, id: NodeId, properties: &[S]) -> Result<usize> {
        let mut style = self.inline_style(id)?;
        let removed = properties
            .iter()
            .filter(|p| style.remove(p.as_ref().trim()).is_some())
            .count();
        if removed > 0 {
            self.write_inline_style(id, &style);
        }
        Ok(removed)
    }
}

/// Events.
impl Document {
    /// Register `handler` for `event` on an element, replacing any handler
    /// already registered for that name.
    pub fn add_event<F>(&mut self, id: NodeId, event: &str, handler: F) -> Result<()>
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.expect_element(id)?;
        self.events.add(id, event, Box::new(handler));
        Ok(())
    }

    pub fn add_events<I, S>(&mut self, id: NodeId, handlers: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, Handler)>,
        S: AsRef<str>,
    {
        self.expect_element(id)?;
        for (event, handler) in handlers {
            self.events.add(id, event.as_ref(), handler);
        }
        Ok(())
    }

    pub fn remove_event(&mut self, id: NodeId, event: &str) -> bool {
        self.events.remove(id, event)
    }

    pub fn remove_events<S: AsRef<str>>(&mut self, id: NodeId, events: &[S]) -> usize {
        events
            .iter()
            .filter(|e| self.events.remove(id, e.as_ref()))
            .count()
    }

    pub fn remove_all_events(&mut self, id: NodeId) -> usize {
        self.events.remove_all(id)
    }

    pub fn has_event(&self, id: NodeId, event: &str) -> bool {
        self.events.contains(id, event)
    }

    /// Registered event names, sorted.
    pub fn events_of(&self, id: NodeId) -> Vec<String> {
        self.events.names(id)
    }

    /// Dispatch `event` at `target`. Handlers run from the outermost ancestor
    /// down to the target. Returns how many handlers ran.
    pub fn dispatch(&mut self, target: NodeId, event: &str) -> Result<usize> {
        self.node(target)?;

        let mut path: Vec<NodeId> = self.dom.ancestors(target).collect();
        path.reverse();
        path.push(target);

        let mut event = Event::new(event, target);
        let ran = self.events.dispatch(&path, &mut event);
        log::debug!("dispatch {} at {target}: {ran} handler(s)", event.name());
        Ok(ran)
    }
}

/// Deferred callbacks.
impl Document {
    /// Run `callback` once the clock has advanced by `delay_ms`.
    pub fn delay<F>(&mut self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&mut Document) + 'static,
    {
        self.timers.schedule(delay_ms, Box::new(callback))
    }

    pub fn cancel_delay(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Advance the clock by `delta_ms`, running every callback that becomes
    /// due, including ones scheduled by earlier callbacks. Returns how many
    /// ran.
    pub fn advance_time(&mut self, delta_ms: u64) -> usize {
        let target = self.timers.now_ms().saturating_add(delta_ms);
        let mut ran = 0;
        while let Some((id, callback)) = self.timers.pop_due(target) {
            log::trace!("timer {} fired at {}ms", id.0, self.timers.now_ms());
            callback(self);
            ran += 1;
        }
        self.timers.set_now(target);
        ran
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_delays(&self) -> usize {
        self.timers.pending()
    }
}
