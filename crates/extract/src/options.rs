// ABOUTME: Configuration for the extraction pipeline: MigrateOptions and MigratorBuilder.
// ABOUTME: MigratorBuilder provides a fluent API for constructing Migrator instances.

use crate::dom::NormalizeOptions;
use crate::extractors::fields::MIN_BODY_CHARS;
use crate::extractors::profile::SiteProfile;
use crate::pipeline::Migrator;

/// Configuration options for a migration run.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// A body must be longer than this many characters to be accepted.
    pub min_content_chars: usize,
    pub profile: SiteProfile,
    /// Run the body normalizer on accepted records.
    pub normalize: bool,
    pub normalize_options: NormalizeOptions,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            min_content_chars: MIN_BODY_CHARS,
            profile: SiteProfile::builtin(),
            normalize: true,
            normalize_options: NormalizeOptions::default(),
        }
    }
}

/// Builder for constructing Migrator instances with custom configuration.
#[derive(Debug, Clone)]
pub struct MigratorBuilder {
    opts: MigrateOptions,
}

impl MigratorBuilder {
    /// Create a new MigratorBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: MigrateOptions::default(),
        }
    }

    /// Set the minimum body length.
    pub fn min_content_chars(mut self, chars: usize) -> Self {
        self.opts.min_content_chars = chars;
        self
    }

    /// Use a custom site profile.
    pub fn profile(mut self, profile: SiteProfile) -> Self {
        self.opts.profile = profile;
        self
    }

    /// Enable or disable body normalization.
    pub fn normalize(mut self, enabled: bool) -> Self {
        self.opts.normalize = enabled;
        self
    }

    /// Keep `href` on links during normalization.
    pub fn keep_links(mut self, keep: bool) -> Self {
        self.opts.normalize_options.keep_links = keep;
        self
    }

    /// Build the Migrator with the configured options.
    pub fn build(self) -> Migrator {
        Migrator::new(self.opts)
    }
}

impl Default for MigratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
