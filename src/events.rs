//! Event registrations kept in a side-table keyed by element.

use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;

/// A registered event handler.
pub type Handler = Box<dyn FnMut(&mut Event)>;

/// An event being dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    target: NodeId,
    current_target: NodeId,
    propagation_stopped: bool,
}

impl Event {
    pub(crate) fn new(name: &str, target: NodeId) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: target,
            propagation_stopped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element the event was dispatched at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The element whose handler is running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Prevent handlers further along the path from running.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Handlers by element, one per event name. Registering a name again
/// replaces the previous handler.
#[derive(Default)]
pub struct EventTable {
    map: HashMap<NodeId, HashMap<String, Handler>>,
}

impl fmt::Debug for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (node, handlers) in &self.map {
            let mut names: Vec<_> = handlers.keys().collect();
            names.sort();
            map.entry(node, &names);
        }
        map.finish()
    }
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaced.
    pub fn add(&mut self, node: NodeId, event: &str, handler: Handler) -> Option<Handler> {
        self.map
            .entry(node)
            .or_default()
            .insert(event.to_string(), handler)
    }

    /// Remove the handler for `event`. Returns whether one was registered.
    pub fn remove(&mut self, node: NodeId, event: &str) -> bool {
        let Some(events) = self.map.get_mut(&node) else {
            return false;
        };
        let removed = events.remove(event).is_some();
        if events.is_empty() {
            self.map.remove(&node);
        }
        removed
    }

    /// Remove every handler of `node`, returning how many there were.
    pub fn remove_all(&mut self, node: NodeId) -> usize {
        self.map.remove(&node).map_or(0, |events| events.len())
    }

    pub fn contains(&self, node: NodeId, event: &str) -> bool {
        self.map
            .get(&node)
            .is_some_and(|events| events.contains_key(event))
    }

    /// Registered event names of `node`, sorted.
    pub fn names(&self, node: NodeId) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .get(&node)
            .map(|events| events.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.map.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Run the handlers for `event` along `path` (outermost first), stopping
    /// when a handler stops propagation. Returns how many handlers ran.
    pub fn dispatch(&mut self, path: &[NodeId], event: &mut Event) -> usize {
        let mut ran = 0;
        for &node in path {
            let Some(handler) = self
                .map
                .get_mut(&node)
                .and_then(|events| events.get_mut(event.name.as_str()))
            else {
                continue;
            };
            event.current_target = node;
            handler(event);
            ran += 1;
            if event.propagation_stopped {
                break;
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> Handler {
        let log = Rc::clone(log);
        let label = label.to_string();
        Box::new(move |event: &mut Event| {
            log.borrow_mut()
                .push(format!("{label}:{}@{}", event.name(), event.current_target()));
        })
    }

    #[test]
    fn test_add_replaces_previous_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut table = EventTable::new();
        let node = NodeId(1);

        assert!(table.add(node, "click", recorder(&log, "first")).is_none());
        assert!(table.add(node, "click", recorder(&log, "second")).is_some());
        assert_eq!(table.len(), 1);

        let mut event = Event::new("click", node);
        table.dispatch(&[node], &mut event);
        assert_eq!(*log.borrow(), ["second:click@1"]);
    }

    #[test]
    fn test_remove_and_remove_all() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut table = EventTable::new();
        let node = NodeId(3);
        table.add(node, "click", recorder(&log, "a"));
        table.add(node, "keyup", recorder(&log, "b"));

        assert_eq!(table.names(node), ["click", "keyup"]);
        assert!(table.remove(node, "click"));
        assert!(!table.remove(node, "click"));
        assert!(!table.contains(node, "click"));

        assert_eq!(table.remove_all(node), 1);
        assert!(table.is_empty());
        assert_eq!(table.remove_all(node), 0);
    }

    #[test]
    fn test_dispatch_order_and_stop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut table = EventTable::new();
        let (outer, middle, inner) = (NodeId(1), NodeId(2), NodeId(3));
        table.add(outer, "click", recorder(&log, "outer"));
        table.add(inner, "click", recorder(&log, "inner"));

        let mut event = Event::new("click", inner);
        assert_eq!(table.dispatch(&[outer, middle, inner], &mut event), 2);
        assert_eq!(*log.borrow(), ["outer:click@1", "inner:click@3"]);

        let mut table = EventTable::new();
        table.add(outer, "click", Box::new(|event: &mut Event| event.stop_propagation()));
        table.add(inner, "click", recorder(&log, "never"));
        let mut event = Event::new("click", inner);
        assert_eq!(table.dispatch(&[outer, inner], &mut event), 1);
        assert!(event.is_propagation_stopped());
        assert_eq!(log.borrow().len(), 2);
    }
}
