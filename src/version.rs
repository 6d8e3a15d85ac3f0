use crate::error::{Result, VersionSyncError};
use semver::Version;
use std::path::Path;

/// Parse a version string found in `path` into a semver::Version.
///
/// Partial versions like "1" or "1.2" are padded with zeros, which covers
/// the short release strings common in Python and JS manifests:
/// - "1" -> 1.0.0
/// - "1.2" -> 1.2.0
/// - "1.2.3-rc.1" -> 1.2.3-rc.1
pub fn parse_version(raw: &str, path: impl AsRef<Path>) -> Result<Version> {
    let trimmed = raw.trim();
    Version::parse(&normalize(trimmed)).map_err(|source| VersionSyncError::InvalidVersion {
        path: path.as_ref().to_path_buf(),
        version: raw.to_string(),
        source,
    })
}

fn normalize(version: &str) -> String {
    // Only the release part is padded; pre-release and build suffixes stay put.
    let split_at = version.find(['-', '+']).unwrap_or(version.len());
    let (release, suffix) = version.split_at(split_at);
    match release.split('.').count() {
        1 => format!("{release}.0.0{suffix}"),
        2 => format!("{release}.0{suffix}"),
        _ => version.to_string(),
    }
}

/// The highest version under semver precedence, not string order.
pub fn highest<'a>(versions: impl IntoIterator<Item = &'a Version>) -> Option<&'a Version> {
    versions.into_iter().max()
}
