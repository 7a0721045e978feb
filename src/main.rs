use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use pagesnap::{DirectorySink, DownloadOptions, Exporter, ExporterConfig, NoopFetcher, Page};

/// Snapshot a rendered page into a standalone HTML file
#[derive(Parser, Debug)]
#[command(name = "pagesnap", version, about)]
struct Cli {
    /// http(s) URL or path of an HTML file holding the rendered page
    source: String,

    /// Id of the element to snapshot
    #[arg(long, default_value = "app")]
    root: String,

    /// URL the page was served from (defaults to the source URL or file path)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory the document is saved into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Name of the saved file
    #[arg(long)]
    filename: Option<String>,

    /// Leave out the framework runtime script tag
    #[arg(long)]
    no_runtime: bool,

    /// Do not inline the page's inline scripts
    #[arg(long)]
    no_scripts: bool,

    /// JSON file with download options (camelCase keys)
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON file with exporter configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never fetch stylesheets over the network
    #[arg(long)]
    offline: bool,

    /// Print the document instead of saving it
    #[arg(long)]
    stdout: bool,
}

fn is_http(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn load_source(source: &str, config: &ExporterConfig) -> Result<(String, String)> {
    if is_http(source) {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;
        let body = client
            .get(source)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetching {}", source))?
            .text()
            .await?;
        return Ok((body, source.to_string()));
    }

    let path = std::fs::canonicalize(source).with_context(|| format!("resolving {}", source))?;
    let body = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let url = url::Url::from_file_path(&path)
        .map_err(|_| anyhow!("cannot express {} as a file URL", path.display()))?;
    Ok((body, url.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ExporterConfig::from_json(&json)?
        }
        None => ExporterConfig::default(),
    };

    let mut options = match &cli.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            DownloadOptions::from_json(&json)?
        }
        None => DownloadOptions::default(),
    };
    if let Some(name) = &cli.filename {
        options.filename = name.clone();
    }
    if cli.no_runtime {
        options.include_vue = false;
    }
    if cli.no_scripts {
        options.preserve_interactivity = false;
    }

    let (html, source_url) = load_source(&cli.source, &config).await?;
    let page_url = cli.base_url.clone().unwrap_or(source_url);
    let page = Page::parse(&html, &page_url)?;

    let root = page.element_by_id(&cli.root);
    if root.is_none() {
        bail!("no element with id {:?} in {}", cli.root, cli.source);
    }

    let exporter = if cli.offline {
        Exporter::with_fetcher(config, Arc::new(NoopFetcher::new()))
    } else {
        Exporter::new(config)?
    };

    if cli.stdout {
        let doc = exporter.generate_html(&page, root, &options).await?;
        println!("{}", doc);
        return Ok(());
    }

    let mut sink = DirectorySink::new(&cli.out_dir);
    let report = exporter.export(&page, root, &options, &mut sink).await?;
    if let Some(path) = sink.last_saved() {
        println!("{} {}", report.sha256, path.display());
    }
    Ok(())
}
