// ABOUTME: Loads site profiles from the embedded default or from JSON files on disk.
// ABOUTME: Provides load_builtin_profile() and load_profile_file() for the pipeline and CLI.

//! Site profile loader.

use std::fs;
use std::path::Path;

use crate::error::ProfileError;
use crate::extractors::compiled::precompile_selectors;
use crate::extractors::profile::SiteProfile;

/// Embedded JSON with the default candidate chains.
const BUILTIN_PROFILE_JSON: &str = include_str!("../../data/default_profile.json");

/// Loads the built-in profile.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed.
pub fn load_builtin_profile() -> SiteProfile {
    let profile: SiteProfile =
        serde_json::from_str(BUILTIN_PROFILE_JSON).expect("failed to parse builtin profile");
    precompile_selectors(profile.selectors());
    profile
}

impl SiteProfile {
    /// The built-in profile for the source platform's blog layout.
    pub fn builtin() -> Self {
        load_builtin_profile()
    }
}

/// Parses a profile from a JSON string.
pub fn parse_profile(json: &str) -> Result<SiteProfile, ProfileError> {
    let profile: SiteProfile = serde_json::from_str(json).map_err(ProfileError::json)?;
    if profile.title.is_empty() && profile.body.is_empty() {
        return Err(ProfileError::invalid(
            "profile must define title or body selectors",
        ));
    }
    precompile_selectors(profile.selectors());
    Ok(profile)
}

/// Reads and parses a profile file.
pub fn load_profile_file(path: impl AsRef<Path>) -> Result<SiteProfile, ProfileError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
    let profile = parse_profile(&json)?;
    tracing::info!(path = %path.display(), name = %profile.name, "loaded site profile");
    Ok(profile)
}
