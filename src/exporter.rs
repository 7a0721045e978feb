//! The snapshot exporter: collects styles and scripts, rewrites the root
//! markup and hands the finished document to a download sink.

use crate::css::collect_css;
use crate::fetch::StylesheetFetcher;
use crate::page::Page;
use crate::rewrite::rewrite_for_standalone;
use crate::scripts::collect_scripts;
use crate::sink::DownloadSink;
use crate::template::{render_document, DocumentParts};
use crate::{DownloadOptions, Error, ExporterConfig, Result, HTML_MIME};
use log::{debug, error, info};
use scraper::ElementRef;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared view of the exporter's "export in progress" flag
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// Sets the flag on creation and clears it on drop, whatever the outcome
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        BusyGuard(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Summary of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub bytes: usize,
    /// Hex sha256 of the saved document
    pub sha256: String,
}

/// Produces standalone HTML snapshots of a page.
///
/// Concurrent exports on one exporter are not serialized; they share the
/// busy flag and the first one to finish clears it.
pub struct Exporter {
    config: ExporterConfig,
    fetcher: Arc<dyn StylesheetFetcher>,
    busy: BusyFlag,
}

impl Exporter {
    /// Create an exporter with the default fetcher (HTTP when the `http`
    /// feature is enabled, otherwise offline)
    pub fn new(config: ExporterConfig) -> Result<Self> {
        #[cfg(feature = "http")]
        let fetcher: Arc<dyn StylesheetFetcher> = Arc::new(crate::fetch::HttpFetcher::new(&config)?);
        #[cfg(not(feature = "http"))]
        let fetcher: Arc<dyn StylesheetFetcher> = Arc::new(crate::fetch::NoopFetcher::new());

        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: ExporterConfig, fetcher: Arc<dyn StylesheetFetcher>) -> Self {
        Self {
            config,
            fetcher,
            busy: BusyFlag::default(),
        }
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Whether an export is currently running
    pub fn is_exporting(&self) -> bool {
        self.busy.is_set()
    }

    /// A handle that observes the busy flag from elsewhere
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Build the standalone document for `root` without saving it.
    ///
    /// Fails with [`Error::MissingRoot`] before any stylesheet is fetched when
    /// `root` is `None`.
    pub async fn generate_html(
        &self,
        page: &Page,
        root: Option<ElementRef<'_>>,
        options: &DownloadOptions,
    ) -> Result<String> {
        let root = root.ok_or_else(|| {
            Error::MissingRoot(format!("no root element given for {}", page.url()))
        })?;
        let markup = root.html();

        if options.include_external_assets {
            debug!("include_external_assets is set; assets are referenced, not bundled");
        }

        let scripts = async {
            if options.preserve_interactivity {
                collect_scripts(page, &self.config.script_exclusions).await
            } else {
                String::new()
            }
        };
        let (css, scripts) = futures::join!(
            collect_css(page, self.fetcher.as_ref(), self.config.stylesheet_fetch_concurrency),
            scripts
        );
        debug!("collected {} bytes of css, {} bytes of scripts", css.len(), scripts.len());

        let origin = page.origin();
        let markup = rewrite_for_standalone(&markup, origin.as_deref());

        let runtime_url = if options.include_vue {
            Some(self.config.runtime_script_url.as_str())
        } else {
            None
        };

        Ok(render_document(
            &self.config,
            &DocumentParts {
                css: &css,
                markup: &markup,
                scripts: &scripts,
                runtime_url,
            },
        ))
    }

    /// Generate the document for `root` and save it through `sink` as
    /// `options.filename`.
    ///
    /// The busy flag is set for the duration of the call. Errors are logged
    /// and returned; nothing reaches the sink unless the whole document was
    /// generated.
    pub async fn export<S>(
        &self,
        page: &Page,
        root: Option<ElementRef<'_>>,
        options: &DownloadOptions,
        sink: &mut S,
    ) -> Result<ExportReport>
    where
        S: DownloadSink + ?Sized,
    {
        let _guard = BusyGuard::set(&self.busy.0);

        let result = self.generate_and_save(page, root, options, sink).await;
        match &result {
            Ok(report) => info!("exported {} ({} bytes)", report.filename, report.bytes),
            Err(e) => error!("Export failed: {}", e),
        }
        result
    }

    async fn generate_and_save<S>(
        &self,
        page: &Page,
        root: Option<ElementRef<'_>>,
        options: &DownloadOptions,
        sink: &mut S,
    ) -> Result<ExportReport>
    where
        S: DownloadSink + ?Sized,
    {
        let html = self.generate_html(page, root, options).await?;
        sink.save(&options.filename, HTML_MIME, html.as_bytes())?;
        Ok(ExportReport {
            filename: options.filename.clone(),
            bytes: html.len(),
            sha256: hex::encode(Sha256::digest(html.as_bytes())),
        })
    }
}
