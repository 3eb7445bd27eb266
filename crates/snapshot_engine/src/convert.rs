use ego_tree::{NodeId, Tree};
use scraper::node::Text;
use scraper::{ElementRef, Node, Selector};

const TASK_CHECKBOX_SELECTOR: &str = r#"li > input[type="checkbox"]"#;

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;

    /// Rewrites a tree in place before any of it is serialized for
    /// [`Converter::to_markdown`]. The default leaves the tree untouched.
    fn prepare(&self, _tree: &mut Tree<Node>) {}
}

/// `html2md` with GitHub-flavoured task items and strikethrough.
///
/// [`Converter::prepare`] turns a checkbox directly inside a list item into a
/// `[x] ` or `[ ] ` marker and renames `strike` to `del`, which `html2md`
/// renders as `~~`. Leading line breaks and all trailing whitespace are
/// trimmed so that each fragment joins cleanly with the next.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        let markdown = html2md::parse_html(html);
        markdown
            .trim_start_matches(['\t', '\r', '\n'])
            .trim_end()
            .to_string()
    }

    fn prepare(&self, tree: &mut Tree<Node>) {
        mark_task_items(tree);
        rename_elements(tree, "strike", "del");
    }
}

fn mark_task_items(tree: &mut Tree<Node>) {
    let checkboxes: Vec<(NodeId, bool)> = matching(tree, TASK_CHECKBOX_SELECTOR)
        .map(|input| (input.id(), input.value().attr("checked").is_some()))
        .collect();

    for (id, checked) in checkboxes {
        if let Some(mut input) = tree.get_mut(id) {
            let marker = if checked { "[x] " } else { "[ ] " };
            input.insert_before(Node::Text(Text {
                text: marker.into(),
            }));
            input.detach();
        }
    }
}

fn rename_elements(tree: &mut Tree<Node>, from: &str, to: &str) {
    let ids: Vec<NodeId> = matching(tree, from).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = tree.get_mut(id) {
            if let Node::Element(element) = node.value() {
                element.name.local = to.into();
            }
        }
    }
}

/// Attached elements matching `selector`; nothing when it does not parse.
fn matching<'a>(
    tree: &'a Tree<Node>,
    selector: &str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let selector = Selector::parse(selector).ok();
    tree.root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |element| selector.as_ref().is_some_and(|s| s.matches(element)))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{Converter, Html2MdConverter};

    fn prepared(html: &str) -> String {
        let mut fragment = Html::parse_fragment(html);
        Html2MdConverter.prepare(&mut fragment.tree);
        fragment.root_element().inner_html()
    }

    #[test]
    fn checkboxes_in_list_items_become_markers() {
        let html = r#"<ul><li><input type="checkbox" checked> done</li><li><input type="checkbox"> todo</li></ul>"#;
        let marked = prepared(html);
        assert!(marked.contains("[x]  done"), "{marked}");
        assert!(marked.contains("[ ]  todo"), "{marked}");
        assert!(!marked.contains("input"));
    }

    #[test]
    fn markup_without_checkboxes_is_untouched() {
        let html = "<p>plain <b>text</b></p>";
        assert_eq!(prepared(html), html);
    }

    #[test]
    fn every_strikethrough_spelling_renders_with_tildes() {
        let html = prepared("<p><del>Old</del> <s>x</s> <strike>y</strike> New</p>");
        let md = Html2MdConverter.to_markdown(&html);
        assert!(md.contains("~~Old~~"), "{md}");
        assert!(md.contains("~~x~~"), "{md}");
        assert!(md.contains("~~y~~"), "{md}");
    }

    #[test]
    fn output_is_trimmed() {
        let md = Html2MdConverter.to_markdown("<p>Hello</p>");
        assert_eq!(md, "Hello");
    }
}
