//! CSS collection: readable stylesheet rules, fetched fallbacks and inline
//! `<style>` elements, concatenated into one block.

use crate::fetch::StylesheetFetcher;
use crate::page::{Page, RuleAccess};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use scraper::Selector;

// What to do for one stylesheet, decided before any await
enum SheetSource {
    Rules(String),
    Fetch(String),
    Skip,
}

/// Concatenate every stylesheet of `page` followed by the text of its inline
/// `<style>` elements.
///
/// Sheets with denied rules are fetched by `href` through `fetcher`, at most
/// `concurrency` at a time; the output keeps sheet order regardless of which
/// request finishes first. A failed fetch is logged and skipped.
pub async fn collect_css(
    page: &Page,
    fetcher: &dyn StylesheetFetcher,
    concurrency: usize,
) -> String {
    let sources: Vec<SheetSource> = page
        .stylesheets()
        .iter()
        .map(|sheet| match (&sheet.rules, &sheet.href) {
            (RuleAccess::Readable(rules), _) => {
                let mut text = String::new();
                for rule in rules {
                    text.push_str(rule);
                    text.push('\n');
                }
                SheetSource::Rules(text)
            }
            (RuleAccess::Denied, Some(href)) => SheetSource::Fetch(href.clone()),
            (RuleAccess::Denied, None) => SheetSource::Skip,
        })
        .collect();

    let inline = inline_styles(page);

    let parts: Vec<String> = stream::iter(sources)
        .map(|source| async move {
            match source {
                SheetSource::Rules(text) => text,
                SheetSource::Fetch(href) => match fetcher.fetch(&href).await {
                    Ok(body) => {
                        debug!("fetched stylesheet {} ({} bytes)", href, body.len());
                        let mut text = body;
                        text.push('\n');
                        text
                    }
                    Err(e) => {
                        warn!("Could not fetch external stylesheet {}: {}", href, e);
                        String::new()
                    }
                },
                SheetSource::Skip => {
                    debug!("skipping inaccessible stylesheet without href");
                    String::new()
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut css = parts.concat();
    css.push_str(&inline);
    css
}

/// Text of every `<style>` element, each followed by a newline
pub fn inline_styles(page: &Page) -> String {
    let mut css = String::new();
    if let Ok(style_sel) = Selector::parse("style") {
        for node in page.document().select(&style_sel) {
            css.push_str(&node.text().collect::<String>());
            css.push('\n');
        }
    }
    css
}
