// ABOUTME: DOM manipulation for post bodies: an owned fragment tree plus cleanup passes.
// ABOUTME: normalize_content runs the passes in order and iterates to a fixed point.

//! DOM utilities for post-body normalization.
//!
//! Bodies are copied out of scraper's parse tree into an owned arena
//! ([`tree::Fragment`]) so that passes can unwrap and remove nodes by id
//! without aliasing the parsed document.

pub mod cleaners;
pub mod normalize;
pub mod tree;

pub use normalize::{normalize_content, normalize_content_with, NormalizeOptions};
pub use tree::Fragment;
