//! Markup rewriting for standalone documents.
//!
//! This is a text transform over html5ever's serialization, not a tree edit.
//! Serialized attribute values always use double quotes with inner quotes
//! escaped as `&quot;`, which keeps the attribute patterns below sound. Text
//! content is not protected: a text node that happens to look like
//! ` v-x="…"` or `src="/…"` is rewritten too, and nested `url()` calls are
//! only rewritten up to the first closing parenthesis.

use log::warn;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn attr_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\b(src|href)="/((?:[^/"][^"]*)?)""#).expect("valid regex"))
}

fn css_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"url\(\s*(&quot;|"|')?/((?:[^/)][^)]*?)?)(&quot;|"|')?\s*\)"#)
            .expect("valid regex")
    })
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s+v-[a-z0-9-]+(?:[:.][^\s"'<>/=]+)*="[^"]*""#).expect("valid regex")
    })
}

fn event_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s+@[a-z0-9-]+(?:[:.][^\s"'<>/=]+)*="[^"]*""#).expect("valid regex")
    })
}

fn bound_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s+:([a-z0-9-]+)(?:\.[a-z0-9-]+)*="[^"]*""#).expect("valid regex")
    })
}

/// Rewrite root-relative `src`, `href` and `url()` references to absolute
/// ones under `origin` (`scheme://host[:port]`, no trailing slash).
///
/// Absolute URLs, protocol-relative `//host/…` URLs and document-relative
/// paths are left alone.
pub fn absolutize_root_relative(markup: &str, origin: &str) -> String {
    let origin = origin.trim_end_matches('/');

    let html = attr_url_re().replace_all(markup, |caps: &Captures| {
        format!("{}=\"{}/{}\"", &caps[1], origin, &caps[2])
    });

    css_url_re()
        .replace_all(&html, |caps: &Captures| {
            let open = caps.get(1).map_or("", |m| m.as_str());
            let close = caps.get(3).map_or("", |m| m.as_str());
            format!("url({}{}/{}{})", open, origin, &caps[2], close)
        })
        .into_owned()
}

/// Remove framework directive attributes.
///
/// `v-…="…"` and `@…="…"` disappear together with their leading whitespace;
/// `:name="…"` (with any `.modifier`s) is reduced to the bare attribute
/// `name`.
pub fn strip_directives(markup: &str) -> String {
    let html = directive_re().replace_all(markup, "");
    let html = event_re().replace_all(&html, "");
    bound_re().replace_all(&html, " ${1}").into_owned()
}

/// Prepare serialized root markup for use outside the live application.
///
/// With no origin (opaque page origin such as `file:`) references are left
/// relative and only directives are stripped.
pub fn rewrite_for_standalone(markup: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) => strip_directives(&absolutize_root_relative(markup, origin)),
        None => {
            warn!("page origin is opaque; leaving root-relative references unchanged");
            strip_directives(markup)
        }
    }
}
