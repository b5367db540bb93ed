//! HTML serialization of [`Dom`] subtrees via html5ever's serializer.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{Dom, NodeData, NodeId};

/// A node paired with its tree, serializable by html5ever.
pub struct SerializableNode<'a> {
    dom: &'a Dom,
    node: NodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a Dom, node: NodeId) -> Self {
        Self { dom, node }
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_node(self.dom, self.node, serializer),
            TraversalScope::ChildrenOnly(_) => serialize_children(self.dom, self.node, serializer),
        }
    }
}

fn serialize_children<S: Serializer>(dom: &Dom, id: NodeId, serializer: &mut S) -> io::Result<()> {
    for child in dom.children(id) {
        serialize_node(dom, child, serializer)?;
    }
    Ok(())
}

fn serialize_node<S: Serializer>(dom: &Dom, id: NodeId, serializer: &mut S) -> io::Result<()> {
    let Some(node) = dom.get(id) else {
        return Ok(());
    };
    match &node.data {
        NodeData::Document => serialize_children(dom, id, serializer),
        NodeData::Element { name, attrs, .. } => {
            serializer.start_elem(
                name.clone(),
                attrs.iter().map(|a| (&a.name, a.value.as_str())),
            )?;
            serialize_children(dom, id, serializer)?;
            serializer.end_elem(name.clone())
        }
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::Doctype { name, .. } => serializer.write_doctype(name),
    }
}

/// Serialize the children of `node` (the `innerHTML` of an element).
pub fn inner_html(dom: &Dom, node: NodeId) -> io::Result<String> {
    write_html(dom, node, TraversalScope::ChildrenOnly(None))
}

/// Serialize `node` itself and its subtree (the `outerHTML` of an element).
pub fn outer_html(dom: &Dom, node: NodeId) -> io::Result<String> {
    write_html(dom, node, TraversalScope::IncludeNode)
}

fn write_html(dom: &Dom, node: NodeId, traversal_scope: TraversalScope) -> io::Result<String> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    serialize(&mut bytes, &SerializableNode::new(dom, node), opts)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
