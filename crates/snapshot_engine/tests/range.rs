use pretty_assertions::assert_eq;
use snapshot_engine::{
    resolve_for_deletion, resolve_for_extraction, Boundary, Document, Fragment, Range, Removal,
    SelectionRule,
};

const PAGE: &str = r#"<div id="intro"><h2>Intro</h2><p>first</p></div><p class="last">second</p><p>after</p>"#;

#[test]
fn clone_keeps_partially_covered_ancestors_shallow() {
    let doc = Document::parse(PAGE);
    let range = Range::resolve(&doc, &Boundary::after("h2"), &Boundary::after("p.last")).unwrap();

    let fragment = range.clone_contents(&doc);

    assert!(fragment.is_detached());
    assert_eq!(
        fragment.to_html(&doc),
        r#"<div id="intro"><p>first</p></div><p class="last">second</p>"#
    );
}

#[test]
fn clone_leaves_live_document_untouched() {
    let doc = Document::parse(PAGE);
    let before = doc.html();
    let range = Range::resolve(&doc, &Boundary::before("h2"), &Boundary::before("p.last")).unwrap();

    let _ = range.clone_contents(&doc);

    assert_eq!(doc.html(), before);
}

#[test]
fn delete_trims_partial_ancestors_and_drops_covered_nodes() {
    let mut doc = Document::parse(PAGE);
    let range = Range::resolve(&doc, &Boundary::after("h2"), &Boundary::after("p.last")).unwrap();

    let removed = range.delete_contents(&mut doc);

    assert_eq!(removed, 2);
    let body = doc.select_first("body").unwrap().unwrap();
    assert_eq!(
        doc.outer_html(body).unwrap(),
        r#"<body><div id="intro"><h2>Intro</h2></div><p>after</p></body>"#
    );
}

#[test]
fn first_match_anchors_the_boundary() {
    let doc = Document::parse("<p>a</p><hr><p>b</p><hr><p>c</p>");
    let range = Range::resolve(&doc, &Boundary::after("hr"), &Boundary::after("p:last-child")).unwrap();

    assert_eq!(range.clone_contents(&doc).to_html(&doc), "<p>b</p><hr><p>c</p>");
}

#[test]
fn asymmetric_edges_are_independent() {
    let doc = Document::parse("<h1>T</h1><p>A</p><footer>F</footer>");
    let range = Range::resolve(&doc, &Boundary::before("h1"), &Boundary::after("footer")).unwrap();

    assert_eq!(
        range.clone_contents(&doc).to_html(&doc),
        "<h1>T</h1><p>A</p><footer>F</footer>"
    );
}

#[test]
fn query_rules_resolve_to_live_nodes() {
    let doc = Document::parse("<p>a</p><p>b</p>");
    let fragments = resolve_for_extraction(&doc, &SelectionRule::query("p")).unwrap();

    assert_eq!(fragments.len(), 2);
    assert!(fragments.iter().all(|f| matches!(f, Fragment::Node(_))));
    assert_eq!(fragments[1].to_html(&doc), "<p>b</p>");
}

#[test]
fn deletion_targets_match_rule_kind() {
    let mut doc = Document::parse("<h1>T</h1><p>A</p><p>B</p><footer>F</footer>");

    let nodes = resolve_for_deletion(&doc, &SelectionRule::query("p")).unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|r| matches!(r, Removal::Node(_))));

    let ranges = resolve_for_deletion(
        &doc,
        &SelectionRule::range(Boundary::after("h1"), Boundary::before("footer")),
    )
    .unwrap();
    assert_eq!(ranges.len(), 1);
    let removed: usize = ranges.into_iter().map(|r| r.apply(&mut doc)).sum();

    assert_eq!(removed, 2);
    assert!(doc.select("p").unwrap().is_empty());
}
