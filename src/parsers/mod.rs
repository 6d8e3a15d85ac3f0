use crate::error::{Result, VersionSyncError};
use log::debug;
use semver::Version;
use std::fmt;
use std::path::Path;

pub mod package_json_parser;
pub mod python_parser;
pub mod toml_parser;

use package_json_parser::PackageJsonParser;
use python_parser::PythonParser;
use toml_parser::TomlParser;

pub const DEFAULT_PY_VARS: &str = "version;VERSION;__version__;__VERSION__";

/// Settings shared by every parser for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Variable names that may hold the version in Python source files.
    pub variables: Vec<String>,
}

impl ParserOptions {
    /// Builds options from a `;`-separated list, dropping blank entries.
    pub fn from_py_vars(py_vars: &str) -> Self {
        let variables = py_vars
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        Self { variables }
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::from_py_vars(DEFAULT_PY_VARS)
    }
}

/// What a write did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No field matched, the file was left untouched.
    Skipped,
}

pub trait Parser {
    fn get_current_version(path: impl AsRef<Path>, options: &ParserOptions) -> Result<Version>;
    fn update_version(
        path: impl AsRef<Path>,
        version: &Version,
        options: &ParserOptions,
    ) -> Result<UpdateOutcome>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileKind {
    PyprojectToml,
    PackageJson,
    PythonSource,
}

impl FileKind {
    pub fn classify(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.file_name().and_then(|name| name.to_str());
        let kind = match file_name {
            Some("pyproject.toml") => FileKind::PyprojectToml,
            Some("package.json") => FileKind::PackageJson,
            _ if path.extension().is_some_and(|ext| ext == "py") => FileKind::PythonSource,
            _ => {
                return Err(VersionSyncError::UnsupportedType {
                    path: path.to_path_buf(),
                });
            }
        };
        debug!("Classified '{}' as {}", path.display(), kind);
        Ok(kind)
    }

    pub fn get_current_version(
        self,
        path: impl AsRef<Path>,
        options: &ParserOptions,
    ) -> Result<Version> {
        match self {
            FileKind::PyprojectToml => TomlParser::get_current_version(path, options),
            FileKind::PackageJson => PackageJsonParser::get_current_version(path, options),
            FileKind::PythonSource => PythonParser::get_current_version(path, options),
        }
    }

    pub fn update_version(
        self,
        path: impl AsRef<Path>,
        version: &Version,
        options: &ParserOptions,
    ) -> Result<UpdateOutcome> {
        match self {
            FileKind::PyprojectToml => TomlParser::update_version(path, version, options),
            FileKind::PackageJson => PackageJsonParser::update_version(path, version, options),
            FileKind::PythonSource => PythonParser::update_version(path, version, options),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::PyprojectToml => "pyproject.toml",
            FileKind::PackageJson => "package.json",
            FileKind::PythonSource => "python source",
        };
        f.write_str(name)
    }
}
