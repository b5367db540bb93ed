//! HTML node tree: arena storage, html5ever parsing and serialization.

mod arena;
mod serialize;
mod tree_sink;

use html5ever::QualName;

pub use arena::{
    Ancestors, Attribute, Children, Descendants, Dom, Node, NodeData, NodeId, attr_name, html_name,
};
pub use serialize::{SerializableNode, inner_html, outer_html};
pub use tree_sink::{DomSink, parse_html, parse_html_fragment};

/// Parse an HTML fragment into `dom` as the content of an element named
/// `context`, returning the detached top-level nodes in order.
///
/// The context decides how the markup is read, so `<td>` survives under a
/// `tr` context and `<li>` under `ul`, the same way `innerHTML` behaves.
pub fn parse_fragment_into(dom: &mut Dom, context: QualName, html: &str) -> Vec<NodeId> {
    let parsed = parse_html_fragment(html, context);

    let Some(root) = parsed
        .children(parsed.document())
        .find(|&n| parsed.is_element(n))
    else {
        return Vec::new();
    };

    let roots: Vec<_> = parsed.children(root).collect();
    roots
        .into_iter()
        .map(|node| dom.import(&parsed, node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_into() {
        let mut dom = Dom::new();
        let nodes = parse_fragment_into(&mut dom, html_name("div"), "<em>one</em> two");

        assert_eq!(nodes.len(), 2);
        assert_eq!(dom.element_name(nodes[0]).unwrap().as_ref(), "em");
        assert_eq!(dom.text_content(nodes[1]), Some(" two"));
        assert!(nodes.iter().all(|&n| dom.parent(n).is_none()));
    }

    #[test]
    fn test_parse_fragment_uses_context() {
        let mut dom = Dom::new();

        let in_list = parse_fragment_into(&mut dom, html_name("ul"), "<li>a</li><li>b</li>");
        assert_eq!(in_list.len(), 2);

        let in_select = parse_fragment_into(&mut dom, html_name("select"), "<option>x</option>");
        assert_eq!(dom.element_name(in_select[0]).unwrap().as_ref(), "option");

        let in_div = parse_fragment_into(&mut dom, html_name("div"), "<td>lost</td>");
        assert_eq!(in_div.len(), 1);
        assert!(dom.is_text(in_div[0]));
    }

    #[test]
    fn test_parse_empty_fragment() {
        let mut dom = Dom::new();
        assert!(parse_fragment_into(&mut dom, html_name("div"), "").is_empty());
    }
}
