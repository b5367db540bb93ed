//! # nickel
//!
//! A small convenience layer over an HTML document tree: selector
//! shorthands, inline style get/set with implicit pixel units, event
//! registration, and element creation/injection.
//!
//! ## Quick Start
//!
//! ```
//! use nickel::{Document, InjectPosition};
//!
//! let mut doc = Document::parse(r#"<ul id="menu"><li class="item">Home</li></ul>"#);
//!
//! // Select
//! let menu = doc.first("#menu").unwrap();
//! assert_eq!(doc.resolve("#menu .item").unwrap().len(), 1);
//!
//! // Create and inject
//! let li = doc
//!     .create_element("li", [("class", "item"), ("text", "About")])
//!     .unwrap();
//! doc.inject(li, menu, InjectPosition::Bottom).unwrap();
//!
//! // Style: bare numbers get `px` on length properties
//! doc.set_style(li, "padding-left", 4).unwrap();
//! assert_eq!(doc.get_style(li, "padding-left").unwrap().as_deref(), Some("4px"));
//! ```
//!
//! ## Selectors
//!
//! Only `#id`, `.class`, `tag`, `*` and the two-token `#id .class` form are
//! understood; anything else is [`Error::InvalidSelector`]. See
//! [`selector`] for details.
//!
//! ## Events
//!
//! Handlers are kept in a side-table owned by the [`Document`]:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use nickel::Document;
//!
//! let mut doc = Document::parse(r#"<div id="outer"><button id="go">Go</button></div>"#);
//! let outer = doc.first("#outer").unwrap();
//! let button = doc.first("#go").unwrap();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&clicks);
//! doc.add_event(outer, "click", move |_| counter.set(counter.get() + 1)).unwrap();
//!
//! assert_eq!(doc.dispatch(button, "click").unwrap(), 1);
//! assert_eq!(clicks.get(), 1);
//! ```

pub mod document;
pub mod dom;
pub mod element;
pub mod error;
pub mod events;
pub mod selector;
pub mod style;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{DelayCallback, Document};
pub use dom::NodeId;
pub use element::{ElementKey, InjectPosition};
pub use error::{Error, Result};
pub use events::{Event, EventTable, Handler};
pub use selector::{ElementLookup, Matches, Selector};
pub use style::{InlineStyle, PIXEL_PROPERTIES, StyleFormatter, StyleValue, format_style_value};
pub use timer::TimerId;
