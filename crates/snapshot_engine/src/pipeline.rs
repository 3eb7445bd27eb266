use engine_logging::{engine_debug, engine_warn};
use snapshot_core::{RuleSet, SelectionRule};

use crate::convert::{Converter, Html2MdConverter};
use crate::document::{Document, Fragment};
use crate::error::FilterError;
use crate::filters::FilterRegistry;
use crate::links::absolutize_links;
use crate::selector::{resolve_for_deletion, resolve_for_extraction};

/// Runs a [`RuleSet`] against raw markup.
///
/// Stage order is fixed:
/// 1. parse the markup,
/// 2. apply the service filters in declaration order,
/// 3. absolutize links against the rule set location,
/// 4. apply every removal rule,
/// 5. collect fragments for every extraction rule, in rule order,
/// 6. fail if nothing was collected,
/// 7. let the converter prepare the trees, convert each fragment to Markdown
///    and join them with `\n`.
pub struct ContentFilter {
    converter: Box<dyn Converter>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::with_converter(Html2MdConverter)
    }

    pub fn with_converter(converter: impl Converter + 'static) -> Self {
        Self {
            converter: Box::new(converter),
        }
    }

    /// Filters `markup` down to the Markdown of everything `rules` select.
    ///
    /// The first failing stage aborts the run; its error is returned as-is.
    pub fn run(
        &self,
        markup: &str,
        rules: &RuleSet,
        filters: &FilterRegistry,
    ) -> Result<String, FilterError> {
        let mut document = Document::parse(markup);

        filters.apply(rules.service_filters.as_slice(), &mut document)?;
        absolutize_links(&mut document, &rules.location)?;
        remove_all(&mut document, &rules.remove)?;

        let mut fragments = extract_all(&document, &rules.select)?;
        if fragments.is_empty() {
            engine_warn!("no extraction rule matched for {}", rules.location);
            return Err(FilterError::NoMatch {
                rules: rules.select.iter().map(ToString::to_string).collect(),
            });
        }

        self.converter.prepare(document.tree_mut());
        for fragment in &mut fragments {
            if let Fragment::Detached(html) = fragment {
                self.converter.prepare(&mut html.tree);
            }
        }

        let markdown: Vec<String> = fragments
            .iter()
            .map(|fragment| self.converter.to_markdown(&fragment.to_html(&document)))
            .collect();
        engine_debug!(
            "serialized {} fragments from {}",
            markdown.len(),
            rules.location
        );
        Ok(markdown.join("\n"))
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// [`ContentFilter::run`] with the default Markdown converter.
pub fn filter_content(
    markup: &str,
    rules: &RuleSet,
    filters: &FilterRegistry,
) -> Result<String, FilterError> {
    ContentFilter::new().run(markup, rules, filters)
}

fn remove_all(document: &mut Document, rules: &[SelectionRule]) -> Result<(), FilterError> {
    for rule in rules {
        let targets = resolve_for_deletion(document, rule)?;
        let removed: usize = targets
            .into_iter()
            .map(|target| target.apply(document))
            .sum();
        engine_debug!("removal rule {rule} dropped {removed} nodes");
    }
    Ok(())
}

fn extract_all(document: &Document, rules: &[SelectionRule]) -> Result<Vec<Fragment>, FilterError> {
    let mut fragments = Vec::new();
    for rule in rules {
        let found = resolve_for_extraction(document, rule)?;
        engine_debug!("extraction rule {rule} yielded {} fragments", found.len());
        fragments.extend(found);
    }
    Ok(fragments)
}
