// ABOUTME: The Migrator: turns documents into accepted, normalized PostRecords.
// ABOUTME: Applies the acceptance gate and isolates per-locator fetch failures.

use scraper::Html;
use thiserror::Error;

use crate::dom::normalize_content_with;
use crate::error::SourceError;
use crate::extractors::fields::{
    resolve_body, resolve_category, resolve_date, resolve_title, UNTITLED,
};
use crate::options::{MigrateOptions, MigratorBuilder};
use crate::record::PostRecord;
use crate::source::{dedupe_locators, DocumentSource, LinkDiscoverer};

/// Why a candidate record was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no acceptable title")]
    UntitledPost,
    #[error("body has {len} characters, need more than {min}")]
    ThinContent { len: usize, min: usize },
}

/// Outcome of a run over many locators.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Accepted records in locator order.
    pub records: Vec<PostRecord>,
    pub rejected: Vec<(String, Rejection)>,
    pub failed: Vec<SourceError>,
}

impl MigrationReport {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.rejected.len() + self.failed.len()
    }
}

/// Extracts post records from documents.
#[derive(Debug, Clone)]
pub struct Migrator {
    opts: MigrateOptions,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(MigrateOptions::default())
    }
}

impl Migrator {
    pub fn new(opts: MigrateOptions) -> Self {
        Self { opts }
    }

    pub fn builder() -> MigratorBuilder {
        MigratorBuilder::new()
    }

    pub fn options(&self) -> &MigrateOptions {
        &self.opts
    }

    /// Resolves every field of a document without judging the result.
    ///
    /// The body is the raw serialized container, not yet normalized.
    pub fn extract_record(&self, locator: &str, html: &str) -> PostRecord {
        let doc = Html::parse_document(html);
        let profile = &self.opts.profile;
        PostRecord {
            source_locator: locator.to_string(),
            title: resolve_title(&doc, &profile.title),
            publish_timestamp: resolve_date(&doc, &profile.date),
            category: resolve_category(&doc, &profile.category),
            body: resolve_body(&doc, &profile.body, self.opts.min_content_chars),
        }
    }

    /// The acceptance gate: a real title and a body longer than the minimum.
    pub fn accept(&self, record: &PostRecord) -> Result<(), Rejection> {
        if record.title == UNTITLED {
            return Err(Rejection::UntitledPost);
        }
        let len = record.body.chars().count();
        let min = self.opts.min_content_chars;
        if len <= min {
            return Err(Rejection::ThinContent { len, min });
        }
        Ok(())
    }

    /// Extracts, gates and normalizes one document.
    pub fn process_document(&self, locator: &str, html: &str) -> Result<PostRecord, Rejection> {
        let mut record = self.extract_record(locator, html);
        self.accept(&record)?;
        if self.opts.normalize {
            record.body = normalize_content_with(&record.body, &self.opts.normalize_options);
        }
        Ok(record)
    }

    /// Fetches and processes each locator in order, skipping duplicates.
    ///
    /// Fetch failures and rejections are logged and recorded in the report;
    /// neither stops the run.
    pub fn run<S, I, L>(&self, source: &S, locators: I) -> MigrationReport
    where
        S: DocumentSource + ?Sized,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut report = MigrationReport::default();
        for locator in dedupe_locators(locators) {
            let html = match source.fetch(&locator) {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(error = %err, "fetch failed, skipping");
                    report.failed.push(err);
                    continue;
                }
            };
            match self.process_document(&locator, &html) {
                Ok(record) => {
                    tracing::info!(locator = %locator, title = %record.title, "extracted post");
                    report.records.push(record);
                }
                Err(reason) => {
                    tracing::warn!(locator = %locator, %reason, "skipping document");
                    report.rejected.push((locator, reason));
                }
            }
        }
        report
    }

    /// Discovers locators under `root` and runs over them.
    pub fn discover_and_run<S, D>(&self, source: &S, discoverer: &D, root: &str) -> MigrationReport
    where
        S: DocumentSource + ?Sized,
        D: LinkDiscoverer + ?Sized,
    {
        let locators = discoverer.discover(root);
        tracing::info!(root, found = locators.len(), "discovered candidate posts");
        self.run(source, locators)
    }
}
