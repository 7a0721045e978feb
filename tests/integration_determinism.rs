//! Repeated exports of an unchanged page produce identical documents

use std::sync::Arc;

use pagesnap::{DownloadOptions, Exporter, ExporterConfig, MemorySink, NoopFetcher, Page, StyleSheet};
use sha2::{Digest, Sha256};

const PAGE: &str = r#"<html><head>
<style>.a{color:red}</style>
<script>var answers = ["b", "d"];</script>
</head><body>
<div id="app" class="editor" data-mode="preview">
  <p v-for="q in questions" :key="q.id" @mouseover="hover(q)">Question</p>
  <img src="/q1.png" :alt="label" width="40" height="40" loading="lazy">
</div>
</body></html>"#;

fn exporter() -> Exporter {
    Exporter::with_fetcher(ExporterConfig::default(), Arc::new(NoopFetcher::new()))
}

#[tokio::test]
async fn same_page_same_digest() {
    let mut page = Page::parse(PAGE, "http://localhost:5173/").unwrap();
    page.add_stylesheet(StyleSheet::readable(None, ["p { margin: 0px; }"]));

    let exporter = exporter();
    let options = DownloadOptions::default();
    let mut digests = Vec::new();
    for _ in 0..3 {
        let mut sink = MemorySink::new();
        let report = exporter
            .export(&page, page.element_by_id("app"), &options, &mut sink)
            .await
            .unwrap();
        let saved = sink.last().unwrap();
        assert_eq!(report.sha256, hex::encode(Sha256::digest(&saved.contents)));
        digests.push(report.sha256);
    }
    assert!(digests.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn reparsed_page_same_document() {
    let a = Page::parse(PAGE, "http://localhost:5173/").unwrap();
    let b = Page::parse(PAGE, "http://localhost:5173/").unwrap();
    let exporter = exporter();
    let options = DownloadOptions::default();

    let doc_a = exporter.generate_html(&a, a.element_by_id("app"), &options).await.unwrap();
    let doc_b = exporter.generate_html(&b, b.element_by_id("app"), &options).await.unwrap();
    assert_eq!(doc_a, doc_b);
    assert!(doc_a.contains(r#"<img src="http://localhost:5173/q1.png" alt width="40" height="40" loading="lazy">"#));
}
