//! pagesnap
//!
//! Serializes the rendered state of a single-page application into a
//! standalone, portable HTML document, and provides a small state container
//! for editor content.
//!
//! # Features
//!
//! - **Snapshot exporter**: inlines stylesheets and scripts, rewrites
//!   root-relative resource references to absolute ones and strips framework
//!   directive attributes
//! - **Pluggable I/O**: stylesheet fetching and file saving sit behind the
//!   [`StylesheetFetcher`] and [`DownloadSink`] traits
//! - **Editor store**: passage/question markup plus a preview flag with
//!   change listeners
//!
//! # Example
//!
//! ```no_run
//! use pagesnap::{DirectorySink, DownloadOptions, Exporter, ExporterConfig, Page};
//!
//! # async fn run() -> pagesnap::Result<()> {
//! let html = r#"<html><body><div id="app"><img src="/logo.png"></div></body></html>"#;
//! let page = Page::parse(html, "https://example.com/editor")?;
//!
//! let exporter = Exporter::new(ExporterConfig::default())?;
//! let options = DownloadOptions {
//!     filename: "snapshot.html".to_string(),
//!     include_vue: false,
//!     ..Default::default()
//! };
//!
//! let mut sink = DirectorySink::new(".");
//! exporter
//!     .export(&page, page.element_by_id("app"), &options, &mut sink)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod css;
pub mod exporter;
pub mod fetch;
pub mod page;
pub mod rewrite;
pub mod scripts;
pub mod sink;
pub mod store;
pub mod template;

pub use exporter::{BusyFlag, ExportReport, Exporter};
pub use fetch::{NoopFetcher, StylesheetFetcher};
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use page::{Page, RuleAccess, StyleSheet};
pub use sink::{DataUrlSink, DirectorySink, DownloadSink, MemorySink, SavedFile};
pub use store::{EditorChange, EditorState, EditorStore, ListenerId};

/// Mime type of every exported document
pub const HTML_MIME: &str = "text/html";

/// Per-export options
///
/// Field names deserialize in camelCase so option files written for the
/// browser tooling (`{"filename": "out.html", "includeVue": false}`) load
/// unchanged. Omitted fields take their defaults.
///
/// # Examples
///
/// ```
/// let opts = pagesnap::DownloadOptions::default();
/// assert_eq!(opts.filename, "vue-page.html");
/// assert!(opts.include_vue);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadOptions {
    /// Name of the saved file
    pub filename: String,
    /// Whether to reference the framework runtime script in the output
    pub include_vue: bool,
    /// Whether to inline the page's (non-bootstrap) inline scripts
    pub preserve_interactivity: bool,
    /// Accepted for compatibility; assets are never bundled
    pub include_external_assets: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            filename: "vue-page.html".to_string(),
            include_vue: true,
            preserve_interactivity: true,
            include_external_assets: false,
        }
    }
}

impl DownloadOptions {
    /// Load options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for the exporter
///
/// The defaults reproduce the document layout the browser tooling emits:
/// a Vue 3 runtime from unpkg, a `downloaded-app` container and the
/// `createApp` bootstrap markers excluded from inlined scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// User agent string sent with stylesheet requests
    pub user_agent: String,
    /// Timeout for each stylesheet request in milliseconds
    pub timeout_ms: u64,
    /// Maximum number of stylesheet requests in flight
    pub stylesheet_fetch_concurrency: usize,
    /// Runtime script referenced when `include_vue` is set
    pub runtime_script_url: String,
    /// `<title>` of the generated document
    pub document_title: String,
    /// `lang` attribute of the generated document
    pub document_lang: String,
    /// Id of the `<div>` wrapping the snapshotted markup
    pub container_id: String,
    /// Inline scripts containing any of these substrings are not inlined
    pub script_exclusions: Vec<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) pagesnap/0.1".to_string(),
            timeout_ms: 30000,
            stylesheet_fetch_concurrency: num_cpus::get().max(1),
            runtime_script_url: "https://unpkg.com/vue@3/dist/vue.global.js".to_string(),
            document_title: "Downloaded Vue Page".to_string(),
            document_lang: "en".to_string(),
            container_id: "downloaded-app".to_string(),
            script_exclusions: vec!["createApp".to_string(), "Vue.createApp".to_string()],
        }
    }
}

impl ExporterConfig {
    /// Load a configuration from a JSON document; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        if cfg.stylesheet_fetch_concurrency == 0 {
            return Err(Error::ConfigError(
                "stylesheet_fetch_concurrency must be at least 1".into(),
            ));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = DownloadOptions::default();
        assert_eq!(opts.filename, "vue-page.html");
        assert!(opts.include_vue);
        assert!(opts.preserve_interactivity);
        assert!(!opts.include_external_assets);
    }

    #[test]
    fn test_options_from_camel_case_json() {
        let opts = DownloadOptions::from_json(r#"{"filename":"out.html","includeVue":false}"#)
            .expect("valid options");
        assert_eq!(opts.filename, "out.html");
        assert!(!opts.include_vue);
        assert!(opts.preserve_interactivity);
    }

    #[test]
    fn test_config_partial_json_keeps_defaults() {
        let cfg = ExporterConfig::from_json(r#"{"document_title":"Quiz"}"#).expect("valid config");
        assert_eq!(cfg.document_title, "Quiz");
        assert_eq!(cfg.container_id, "downloaded-app");
        assert_eq!(cfg.script_exclusions.len(), 2);
    }

    #[test]
    fn test_config_rejects_zero_concurrency() {
        let err = ExporterConfig::from_json(r#"{"stylesheet_fetch_concurrency":0}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
