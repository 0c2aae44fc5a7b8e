// ABOUTME: Field extraction for blog posts: selector chains, site profiles, and resolvers.
// ABOUTME: Each field is an ordered candidate list evaluated with first-acceptable-wins semantics.

//! Field extraction module.
//!
//! Submodules:
//! - `profile`: serde-backed candidate chains for every field (`SiteProfile`).
//! - `loader`: the built-in profile and profile files on disk.
//! - `compiled`: cache of parsed CSS selectors.
//! - `select`: generic short-circuiting chain evaluation.
//! - `fields`: title, date, category and body resolvers.

pub mod compiled;
pub mod fields;
pub mod loader;
pub mod profile;
pub mod select;
