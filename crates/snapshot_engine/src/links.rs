use engine_logging::engine_debug;
use url::Url;

use crate::document::Document;
use crate::error::FilterError;

/// Hyperlinks that point somewhere other than the current page.
pub const LINKS_TO_CONVERT_SELECTOR: &str = r##"a[href]:not([href^="#"])"##;

/// Rewrites every non-fragment `href` to an absolute URL resolved against
/// `location`. Returns the number of links whose target changed.
///
/// `location` is only parsed once a link needs it, so a page without links
/// never fails on it.
pub fn absolutize_links(document: &mut Document, location: &str) -> Result<usize, FilterError> {
    let links = document.select(LINKS_TO_CONVERT_SELECTOR)?;
    if links.is_empty() {
        return Ok(0);
    }
    let base = Url::parse(location).map_err(|source| FilterError::InvalidLocation {
        location: location.to_string(),
        source,
    })?;

    let mut rewritten = 0;
    for id in links {
        let Some(href) = document.attribute(id, "href").map(str::to_owned) else {
            continue;
        };
        let absolute = resolve_url(&href, &base)?;
        if absolute != href && document.replace_attribute(id, "href", &absolute) {
            rewritten += 1;
        }
    }

    engine_debug!("absolutized {rewritten} links against {base}");
    Ok(rewritten)
}

fn resolve_url(reference: &str, base: &Url) -> Result<String, FilterError> {
    base.join(reference)
        .map(String::from)
        .map_err(|source| FilterError::InvalidLink {
            href: reference.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::resolve_url;
    use url::Url;

    #[test]
    fn resolves_relative_protocol_relative_and_absolute_targets() {
        let base = Url::parse("https://example.org/legal/page").unwrap();
        assert_eq!(resolve_url("/x", &base).unwrap(), "https://example.org/x");
        assert_eq!(
            resolve_url("terms", &base).unwrap(),
            "https://example.org/legal/terms"
        );
        assert_eq!(
            resolve_url("//cdn.example.net/a", &base).unwrap(),
            "https://cdn.example.net/a"
        );
        assert_eq!(
            resolve_url("http://other.test/b?c=d", &base).unwrap(),
            "http://other.test/b?c=d"
        );
    }

    #[test]
    fn unresolvable_target_reports_href() {
        let base = Url::parse("https://example.org/").unwrap();
        let err = resolve_url("http://[::1", &base).unwrap_err();
        assert!(err.to_string().contains("http://[::1"));
    }
}
