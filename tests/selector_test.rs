//! Selector resolution against parsed documents.

use nickel::{Document, Error, Matches, Selector};

const PAGE: &str = concat!(
    r#"<div id="nav">"#,
    r#"<a class="link" id="home">Home</a>"#,
    r#"<a class="link active" id="about">About</a>"#,
    r#"</div>"#,
    r#"<div id="footer"><a class="link" id="legal">Legal</a></div>"#,
    r#"<p class="Link">case differs</p>"#,
);

fn ids(doc: &Document, matches: Matches) -> Vec<String> {
    matches
        .into_iter()
        .map(|n| doc.get(n, "id").unwrap().unwrap_or_default())
        .collect()
}

// ============================================================================
// Single-token forms
// ============================================================================

#[test]
fn test_id_resolves_single_element() {
    let doc = Document::parse(PAGE);
    let matches = doc.resolve("#about").unwrap();
    assert!(matches!(matches, Matches::Element(Some(_))));
    assert_eq!(ids(&doc, matches), ["about"]);
}

#[test]
fn test_missing_id_is_empty_not_error() {
    let doc = Document::parse(PAGE);
    let matches = doc.resolve("#nowhere").unwrap();
    assert_eq!(matches, Matches::Element(None));
    assert!(matches.is_empty());
}

#[test]
fn test_class_in_document_order() {
    let doc = Document::parse(PAGE);
    let matches = doc.resolve(".link").unwrap();
    assert_eq!(ids(&doc, matches), ["home", "about", "legal"]);
}

#[test]
fn test_class_match_is_case_sensitive() {
    let doc = Document::parse(PAGE);
    assert_eq!(doc.resolve(".Link").unwrap().len(), 1);
    assert_eq!(doc.resolve(".active").unwrap().len(), 1);
}

#[test]
fn test_tag_match_is_case_insensitive() {
    let doc = Document::parse(PAGE);
    assert_eq!(doc.resolve("a").unwrap().len(), 3);
    assert_eq!(doc.resolve("A").unwrap().len(), 3);
}

#[test]
fn test_universal_matches_every_element() {
    let doc = Document::parse(PAGE);
    // html, head, body, 2 divs, 3 anchors, p
    assert_eq!(doc.resolve("*").unwrap().len(), 9);
}

// ============================================================================
// Scoped class form
// ============================================================================

#[test]
fn test_class_within_id() {
    let doc = Document::parse(PAGE);
    let matches = doc.resolve("#nav .link").unwrap();
    assert_eq!(ids(&doc, matches), ["home", "about"]);

    let matches = doc.resolve("#footer .link").unwrap();
    assert_eq!(ids(&doc, matches), ["legal"]);
}

#[test]
fn test_class_within_excludes_scope_itself() {
    let doc = Document::parse(r#"<div id="box" class="x"><span class="x"></span></div>"#);
    let matches = doc.resolve("#box .x").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(doc.tag_name(matches.first().unwrap()), Some("span"));
}

#[test]
fn test_class_within_missing_scope_is_empty() {
    let doc = Document::parse(PAGE);
    assert_eq!(
        doc.resolve("#nowhere .link").unwrap(),
        Matches::Collection(Vec::new())
    );
}

// ============================================================================
// Grammar
// ============================================================================

#[test]
fn test_invalid_selectors_are_rejected() {
    let doc = Document::parse(PAGE);
    for selector in [
        "",
        " ",
        "div > a",
        "a b c",
        "#a #b",
        ".a .b",
        "div .a",
        "#nav  .link",
        "a.link",
        "#",
        ".",
        "#*",
        ".*",
        "-foo",
        "[href]",
    ] {
        assert!(
            matches!(doc.resolve(selector), Err(Error::InvalidSelector(ref s)) if s == selector),
            "{selector:?} should be rejected"
        );
    }
}

#[test]
fn test_selector_display_round_trips() {
    for text in ["#main", ".item", "div", "*", "#nav .link"] {
        let selector = Selector::parse(text).unwrap();
        assert_eq!(selector.to_string(), text);
    }
}

// ============================================================================
// first / connectivity
// ============================================================================

#[test]
fn test_first_on_empty_result_is_error() {
    let doc = Document::parse(PAGE);
    assert!(matches!(
        doc.first(".missing"),
        Err(Error::EmptyResult(ref s)) if s == ".missing"
    ));
    assert!(matches!(doc.first("#nowhere"), Err(Error::EmptyResult(_))));
}

#[test]
fn test_detached_elements_are_not_found() {
    let mut doc = Document::parse(PAGE);
    let about = doc.first("#about").unwrap();
    doc.dispose(about).unwrap();

    assert!(doc.resolve("#about").unwrap().is_empty());
    assert_eq!(doc.resolve(".link").unwrap().len(), 2);
    assert!(!doc.is_connected(about));
}

#[test]
fn test_created_element_found_after_inject() {
    let mut doc = Document::parse(PAGE);
    let nav = doc.first("#nav").unwrap();
    let link = doc
        .create_element("a", [("id", "contact"), ("class", "link")])
        .unwrap();

    assert!(doc.resolve("#contact").unwrap().is_empty());
    doc.inject(link, nav, Default::default()).unwrap();
    assert_eq!(doc.first("#contact").unwrap(), link);
    assert_eq!(
        ids(&doc, doc.resolve("#nav .link").unwrap()),
        ["home", "about", "contact"]
    );
}
