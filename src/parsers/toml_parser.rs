use crate::error::{Result, VersionSyncError, read_file, write_file};
use crate::parsers::{Parser, ParserOptions, UpdateOutcome};
use crate::version::parse_version;
use log::{debug, warn};
use semver::Version;
use std::path::Path;
use toml_edit::{DocumentMut, Item, Value};

/// Poetry keeps the version under `[tool.poetry]`, PEP 621 under `[project]`.
const VERSION_TABLES: [&[&str]; 2] = [&["tool", "poetry"], &["project"]];

pub struct TomlParser;

impl TomlParser {
    fn parse_document(path: &Path) -> Result<DocumentMut> {
        let contents = read_file(path)?;
        contents
            .parse::<DocumentMut>()
            .map_err(|e| VersionSyncError::parse(path, "TOML", e))
    }

    fn version_item<'a>(doc: &'a DocumentMut, table: &[&str]) -> Option<&'a Item> {
        let mut item = doc.as_item();
        for key in table {
            item = item.get(*key)?;
        }
        item.get("version")
    }

    fn version_value_mut<'a>(doc: &'a mut DocumentMut, table: &[&str]) -> Option<&'a mut Value> {
        let mut item = doc.as_item_mut();
        for key in table {
            item = item.get_mut(*key)?;
        }
        item.get_mut("version")?.as_value_mut()
    }
}

impl Parser for TomlParser {
    fn get_current_version(path: impl AsRef<Path>, _options: &ParserOptions) -> Result<Version> {
        let path = path.as_ref();
        let doc = Self::parse_document(path)?;

        for table in VERSION_TABLES {
            if let Some(version) = Self::version_item(&doc, table).and_then(Item::as_str) {
                debug!("Found version {} under [{}]", version, table.join("."));
                return parse_version(version, path);
            }
        }

        Err(VersionSyncError::missing(
            path,
            "the 'version' key under [tool.poetry] or [project]",
        ))
    }

    fn update_version(
        path: impl AsRef<Path>,
        version: &Version,
        _options: &ParserOptions,
    ) -> Result<UpdateOutcome> {
        let path = path.as_ref();
        let mut doc = Self::parse_document(path)?;
        let new_version = version.to_string();

        // Both tables are written when both exist.
        let mut updated = false;
        for table in VERSION_TABLES {
            if let Some(value) = Self::version_value_mut(&mut doc, table) {
                let decor = value.decor().clone();
                *value = Value::from(new_version.as_str());
                *value.decor_mut() = decor;
                debug!("Set [{}] version = {}", table.join("."), new_version);
                updated = true;
            }
        }

        if !updated {
            warn!("No version field found in '{}' to update.", path.display());
            return Ok(UpdateOutcome::Skipped);
        }

        write_file(path, &doc.to_string())?;
        Ok(UpdateOutcome::Updated)
    }
}
