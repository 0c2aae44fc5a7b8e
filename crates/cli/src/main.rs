// ABOUTME: CLI for migrating a site-builder blog into a WordPress import file.
// ABOUTME: Discovers or reads posts, extracts and normalizes them, and writes WXR (plus optional JSON).

mod discover;
mod source;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use blogport_export::serialize;
use blogport_extract::{load_profile_file, LinkDiscoverer, Migrator, PostRecord, SiteProfile};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::discover::AnchorDiscoverer;
use crate::source::{FileSource, HttpSource};

/// Extract blog posts and write a WordPress (WXR) import file.
#[derive(Parser, Debug)]
#[command(name = "blogport")]
#[command(about = "Migrate blog posts from site-builder HTML into a WordPress import file")]
struct Args {
    /// Site root to discover posts under (https:// is assumed when no scheme is given)
    #[arg(long)]
    site: Option<String>,

    /// Post URL to migrate; repeatable. With --html, the URL each file was saved from
    #[arg(long = "url")]
    urls: Vec<String>,

    /// Saved HTML file to migrate instead of fetching; repeatable
    #[arg(long = "html")]
    html: Vec<PathBuf>,

    /// Site profile JSON replacing the built-in selector chains
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Where to write the WXR document
    #[arg(short = 'o', long, default_value = "wordpress_import.xml")]
    output: PathBuf,

    /// Also write the accepted records as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Re-export records from a previous --json dump without fetching
    #[arg(long = "from-json")]
    from_json: Option<PathBuf>,

    /// Channel title of the export document
    #[arg(long, default_value = "Blog Import")]
    title: String,

    /// Minimum pause between HTTP requests, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 1000)]
    delay_ms: u64,

    /// Maximum number of paginated listing pages to walk
    #[arg(long = "max-pages", default_value_t = 20)]
    max_pages: usize,

    /// Per-request timeout, in seconds
    #[arg(long = "timeout-secs", default_value_t = 10)]
    timeout_secs: u64,

    /// Keep post bodies as extracted instead of normalizing them
    #[arg(long = "no-normalize")]
    no_normalize: bool,

    /// Keep link targets in normalized bodies
    #[arg(long = "keep-links")]
    keep_links: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    validate(args)?;

    let records = match &args.from_json {
        Some(path) => load_records(path)?,
        None => extract(args)?,
    };
    if records.is_empty() {
        bail!("no posts could be extracted");
    }

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote JSON records");
    }

    let document = serialize(&records, &args.title)?;
    fs::write(&args.output, document)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(
        path = %args.output.display(),
        posts = records.len(),
        "wrote WordPress import file"
    );
    Ok(())
}

fn validate(args: &Args) -> Result<()> {
    let fetching = args.site.is_some() || (!args.urls.is_empty() && args.html.is_empty());
    if args.from_json.is_some() && (fetching || !args.html.is_empty()) {
        bail!("--from-json cannot be combined with --site, --url or --html");
    }
    if !args.html.is_empty() {
        if args.site.is_some() {
            bail!("--html cannot be combined with --site");
        }
        if !args.urls.is_empty() && args.urls.len() != args.html.len() {
            bail!("--url must be given once per --html file");
        }
    }
    if args.from_json.is_none() && args.html.is_empty() && !fetching {
        bail!("nothing to migrate: pass --site, --url, --html or --from-json");
    }
    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<PostRecord>> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<PostRecord> =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(path = %path.display(), posts = records.len(), "loaded JSON records");
    Ok(records)
}

fn extract(args: &Args) -> Result<Vec<PostRecord>> {
    let profile = match &args.profile {
        Some(path) => load_profile_file(path)?,
        None => SiteProfile::builtin(),
    };
    let migrator = Migrator::builder()
        .profile(profile)
        .normalize(!args.no_normalize)
        .keep_links(args.keep_links)
        .build();

    let report = if args.html.is_empty() {
        let http = HttpSource::new(
            Duration::from_secs(args.timeout_secs),
            Duration::from_millis(args.delay_ms),
        )?;
        let mut locators = args.urls.clone();
        if let Some(site) = &args.site {
            let root = site_root(site);
            locators.extend(AnchorDiscoverer::new(&http, args.max_pages).discover(&root));
        }
        if locators.is_empty() {
            bail!("no blog post URLs found");
        }
        migrator.run(&http, locators)
    } else {
        let mut files = FileSource::new();
        for (i, path) in args.html.iter().enumerate() {
            let locator = args
                .urls
                .get(i)
                .cloned()
                .unwrap_or_else(|| path.display().to_string());
            files.add(locator, path);
        }
        migrator.run(&files, files.locators())
    };

    tracing::info!(
        attempted = report.attempted(),
        accepted = report.records.len(),
        rejected = report.rejected.len(),
        failed = report.failed.len(),
        "extraction finished"
    );
    Ok(report.records)
}

/// Adds `https://` to a bare host name.
fn site_root(site: &str) -> String {
    let site = site.trim();
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}
