//! Notebook extraction from viewer pages.

use scraper::{Html, Selector};

/// Element holding the rendered notebook in an nbviewer page.
const CONTAINER_SELECTOR: &str = "#notebook-container";

/// Serialized children of the notebook container, if the page has one.
#[must_use]
pub fn extract_notebook(page: &str) -> Option<String> {
    let selector = Selector::parse(CONTAINER_SELECTOR).ok()?;
    let document = Html::parse_document(page);
    document
        .select(&selector)
        .next()
        .map(|container| container.inner_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_container_children() {
        let page = r#"<html><body><header>nav</header>
<div id="notebook-container"><div class="cell"><p>Hello</p></div></div>
</body></html>"#;
        assert_eq!(
            extract_notebook(page).as_deref(),
            Some(r#"<div class="cell"><p>Hello</p></div>"#)
        );
    }

    #[test]
    fn test_missing_container() {
        assert_eq!(extract_notebook("<html><body><p>404</p></body></html>"), None);
    }
}
