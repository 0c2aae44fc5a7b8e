// ABOUTME: Library entry point for exporting extracted posts as a WordPress import file.
// ABOUTME: Re-exports the public API: serialize, serialize_at, ExportOptions, ExportError and slug helpers.

pub mod error;
pub mod slug;
pub mod wxr;

pub use crate::error::ExportError;
pub use crate::slug::{slugify, SlugAllocator, MAX_SLUG_CHARS};
pub use crate::wxr::{cdata, escape_title, resolve_publish_time, serialize, serialize_at, ExportOptions};
