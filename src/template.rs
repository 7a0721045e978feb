//! Standalone document assembly.

use crate::ExporterConfig;

const STANDALONE_TEMPLATE: &str = include_str!("templates/standalone.html");

/// Everything that goes into one generated document
#[derive(Debug, Clone, Default)]
pub struct DocumentParts<'a> {
    pub css: &'a str,
    pub markup: &'a str,
    pub scripts: &'a str,
    /// Runtime script URL, or `None` to omit the runtime tag
    pub runtime_url: Option<&'a str>,
}

/// Escape text for use in HTML text or a double-quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Substitute `{{name}}` placeholders in one pass.
///
/// Substituted values are never scanned again, so collected CSS or markup
/// that happens to contain `{{…}}` is copied through verbatim. Unknown
/// placeholders are kept as they are.
pub fn fill_template<'v, F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<&'v str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the full standalone HTML document
pub fn render_document(config: &ExporterConfig, parts: &DocumentParts<'_>) -> String {
    let lang = escape_html(&config.document_lang);
    let title = escape_html(&config.document_title);
    let container_id = escape_html(&config.container_id);
    let runtime = parts
        .runtime_url
        .map(|url| format!("<script src=\"{}\"></script>", escape_html(url)))
        .unwrap_or_default();

    fill_template(STANDALONE_TEMPLATE, |name| match name {
        "lang" => Some(lang.as_str()),
        "title" => Some(title.as_str()),
        "runtime" => Some(runtime.as_str()),
        "css" => Some(parts.css),
        "container_id" => Some(container_id.as_str()),
        "markup" => Some(parts.markup),
        "scripts" => Some(parts.scripts),
        _ => None,
    })
}
