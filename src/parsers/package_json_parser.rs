use crate::error::{Result, VersionSyncError, read_file, write_file};
use crate::parsers::{Parser, ParserOptions, UpdateOutcome};
use crate::version::parse_version;
use log::debug;
use semver::Version;
use serde_json::Value;
use std::path::Path;

pub struct PackageJsonParser;

impl PackageJsonParser {
    fn parse_document(path: &Path) -> Result<Value> {
        let contents = read_file(path)?;
        serde_json::from_str(&contents).map_err(|e| VersionSyncError::parse(path, "JSON", e))
    }
}

impl Parser for PackageJsonParser {
    fn get_current_version(path: impl AsRef<Path>, _options: &ParserOptions) -> Result<Version> {
        let path = path.as_ref();
        let doc = Self::parse_document(path)?;
        let version = doc
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| VersionSyncError::missing(path, "the 'version' key"))?;
        debug!("Found current version: {}", version);
        parse_version(version, path)
    }

    fn update_version(
        path: impl AsRef<Path>,
        version: &Version,
        _options: &ParserOptions,
    ) -> Result<UpdateOutcome> {
        let path = path.as_ref();
        let mut doc = Self::parse_document(path)?;
        let object = doc.as_object_mut().ok_or_else(|| {
            VersionSyncError::parse(path, "JSON", "top-level value is not an object")
        })?;
        // preserve_order keeps key positions, arbitrary_precision keeps number text.
        object.insert("version".to_string(), Value::String(version.to_string()));

        let mut contents = serde_json::to_string_pretty(&doc)
            .map_err(|e| VersionSyncError::parse(path, "JSON", e))?;
        contents.push('\n');
        write_file(path, &contents)?;
        debug!("Wrote version {} to '{}'", version, path.display());
        Ok(UpdateOutcome::Updated)
    }
}
