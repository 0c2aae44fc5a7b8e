// ABOUTME: Main library entry point for extracting blog posts from site-builder HTML.
// ABOUTME: Re-exports the public API: Migrator, PostRecord, profiles, normalizers and collaborator traits.

//! blogport-extract - pulls structured blog posts out of loosely structured HTML.
//!
//! Fields are resolved through ordered selector chains described by a
//! [`SiteProfile`], dates go through a fixed list of formats, and post bodies
//! are reduced to minimal markup by an idempotent normalizer.
//!
//! # Example
//!
//! ```
//! use blogport_extract::Migrator;
//!
//! let html = format!(
//!     "<h1>Planting Tomatoes</h1><article><p>{}</p></article>",
//!     "Water deeply and often. ".repeat(8)
//! );
//! let record = Migrator::default()
//!     .process_document("https://example.com/post/tomatoes", &html)
//!     .unwrap();
//! assert_eq!(record.title, "Planting Tomatoes");
//! assert!(record.body.contains("<p>Water deeply"));
//! ```

pub mod date;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod source;

pub use crate::date::normalize_date;
pub use crate::dom::{normalize_content, normalize_content_with, NormalizeOptions};
pub use crate::error::{ProfileError, SourceError, SourceErrorCode};
pub use crate::extractors::fields::{UNCATEGORIZED, UNTITLED};
pub use crate::extractors::loader::{load_builtin_profile, load_profile_file, parse_profile};
pub use crate::extractors::profile::{FieldRule, SelectorSpec, SiteProfile};
pub use crate::options::{MigrateOptions, MigratorBuilder};
pub use crate::pipeline::{MigrationReport, Migrator, Rejection};
pub use crate::record::{PostRecord, PublishDate};
pub use crate::source::{dedupe_locators, DocumentSource, LinkDiscoverer};
