//! Inline script collection.

use crate::page::Page;
use log::debug;
use scraper::Selector;

/// Whether a script body contains one of the exclusion markers
pub fn is_excluded(script: &str, exclusions: &[String]) -> bool {
    exclusions
        .iter()
        .any(|marker| !marker.is_empty() && script.contains(marker.as_str()))
}

/// Concatenate the bodies of inline (`src`-less) scripts, each followed by a
/// newline. Scripts containing any of `exclusions` are left out so the
/// application does not bootstrap itself a second time in the copy.
pub async fn collect_scripts(page: &Page, exclusions: &[String]) -> String {
    let mut scripts = String::new();
    let Ok(script_sel) = Selector::parse("script") else {
        return scripts;
    };

    for node in page.document().select(&script_sel) {
        if node.value().attr("src").is_some() {
            continue;
        }
        let content = node.text().collect::<String>();
        if is_excluded(&content, exclusions) {
            debug!("skipping bootstrap script ({} bytes)", content.len());
            continue;
        }
        scripts.push_str(&content);
        scripts.push('\n');
    }
    scripts
}
