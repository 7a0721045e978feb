//! The page being snapshotted: a parsed document, its URL and its stylesheets.

use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Whether the rules of a stylesheet could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAccess {
    /// The serialized text of each rule
    Readable(Vec<String>),
    /// Rule access was refused (cross-origin) or the sheet was never loaded
    Denied,
}

/// A stylesheet attached to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    /// Absolute URL the sheet was loaded from, if any
    pub href: Option<String>,
    pub rules: RuleAccess,
}

impl StyleSheet {
    /// A sheet whose rules were read by the host
    pub fn readable<I, S>(href: Option<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            href,
            rules: RuleAccess::Readable(rules.into_iter().map(Into::into).collect()),
        }
    }

    /// A sheet whose rules are not accessible
    pub fn denied(href: Option<String>) -> Self {
        Self {
            href,
            rules: RuleAccess::Denied,
        }
    }
}

/// A parsed page plus the stylesheet state a host observed for it
#[derive(Debug, Clone)]
pub struct Page {
    document: Html,
    url: Url,
    stylesheets: Vec<StyleSheet>,
}

impl Page {
    /// Parse `html` as the document located at `page_url`.
    ///
    /// Every `<link rel="stylesheet" href>` is registered as a stylesheet
    /// with denied rules and an href resolved against `page_url`, so the
    /// exporter will try to fetch it. Links with a blank href load nothing
    /// and are not registered.
    pub fn parse(html: &str, page_url: &str) -> Result<Self> {
        let url = Url::parse(page_url)?;
        Ok(Self::from_document(Html::parse_document(html), url))
    }

    /// Wrap an already parsed document
    pub fn from_document(document: Html, url: Url) -> Self {
        let mut stylesheets = Vec::new();
        if let Ok(link_sel) = Selector::parse("link[rel~=\"stylesheet\"][href]") {
            for node in document.select(&link_sel) {
                if let Some(href) = node.value().attr("href") {
                    if href.trim().is_empty() {
                        continue;
                    }
                    let resolved = url
                        .join(href)
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| href.to_string());
                    stylesheets.push(StyleSheet::denied(Some(resolved)));
                }
            }
        }

        Self {
            document,
            url,
            stylesheets,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The page origin (`scheme://host[:port]`), or `None` when it is opaque
    pub fn origin(&self) -> Option<String> {
        let origin = self.url.origin();
        if origin.is_tuple() {
            Some(origin.ascii_serialization())
        } else {
            None
        }
    }

    pub fn stylesheets(&self) -> &[StyleSheet] {
        &self.stylesheets
    }

    /// Register a stylesheet observed by the host (appended in document order)
    pub fn add_stylesheet(&mut self, sheet: StyleSheet) {
        self.stylesheets.push(sheet);
    }

    /// Replace the stylesheet list
    pub fn set_stylesheets(&mut self, sheets: Vec<StyleSheet>) {
        self.stylesheets = sheets;
    }

    /// Find the element with the given `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse("[id]").ok()?;
        self.document
            .select(&sel)
            .find(|el| el.value().attr("id") == Some(id))
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, selector: &str) -> Result<Option<ElementRef<'_>>> {
        let sel = Selector::parse(selector)
            .map_err(|e| Error::ParseError(format!("invalid selector {:?}: {:?}", selector, e)))?;
        Ok(self.document.select(&sel).next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_stylesheets_are_resolved_and_denied() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/css/app.css">
            <link rel="preload stylesheet" href="theme.css">
            <link rel="icon" href="/favicon.ico">
        </head><body></body></html>"#;
        let page = Page::parse(html, "https://example.com/editor/index.html").unwrap();
        let sheets = page.stylesheets();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].href.as_deref(), Some("https://example.com/css/app.css"));
        assert_eq!(sheets[1].href.as_deref(), Some("https://example.com/editor/theme.css"));
        assert!(sheets.iter().all(|s| s.rules == RuleAccess::Denied));
    }

    #[test]
    fn blank_stylesheet_hrefs_are_not_registered() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="">
            <link rel="stylesheet" href="   ">
            <link rel="stylesheet" href="/app.css">
        </head><body></body></html>"#;
        let page = Page::parse(html, "https://example.com/editor").unwrap();
        let hrefs: Vec<_> = page.stylesheets().iter().map(|s| s.href.as_deref()).collect();
        assert_eq!(hrefs, vec![Some("https://example.com/app.css")]);
    }

    #[test]
    fn origin_drops_path_and_keeps_port() {
        let page = Page::parse("<p>x</p>", "http://localhost:5173/a/b?q=1").unwrap();
        assert_eq!(page.origin().as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn file_urls_have_no_origin() {
        let page = Page::parse("<p>x</p>", "file:///tmp/page.html").unwrap();
        assert!(page.origin().is_none());
    }

    #[test]
    fn element_lookup() {
        let page = Page::parse(
            r#"<body><div id="app"><span id="inner">hi</span></div></body>"#,
            "https://example.com/",
        )
        .unwrap();
        let app = page.element_by_id("app").expect("app root");
        assert_eq!(app.value().name(), "div");
        assert!(page.element_by_id("missing").is_none());

        let span = page.select_first("#app span").unwrap().expect("span");
        assert_eq!(span.text().collect::<String>(), "hi");
        assert!(page.select_first("::::").is_err());
    }

    #[test]
    fn invalid_page_url_is_a_parse_error() {
        let err = Page::parse("<p></p>", "not a url").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
