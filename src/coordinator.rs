use crate::error::{Result, VersionSyncError};
use crate::parsers::{FileKind, ParserOptions, UpdateOutcome};
use crate::version::highest;
use log::{debug, info};
use semver::Version;
use std::path::{Path, PathBuf};

/// A file given on the command line, tagged with how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl TrackedFile {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            kind: FileKind::classify(path)?,
            path: path.to_path_buf(),
        })
    }
}

/// Versions found in each tracked file, in the order the files were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionReport {
    entries: Vec<(TrackedFile, Version)>,
}

impl VersionReport {
    pub fn entries(&self) -> &[(TrackedFile, Version)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.entries.iter().map(|(_, version)| version)
    }

    pub fn highest(&self) -> Option<&Version> {
        highest(self.versions())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyResult {
    Consistent(Version),
    Inconsistent(Vec<(PathBuf, Version)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub target: Version,
    pub updated: Vec<PathBuf>,
    /// Files a writer found no field in; see the warnings in the log.
    pub skipped: Vec<PathBuf>,
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub files: Vec<PathBuf>,
    pub options: ParserOptions,
    pub sync: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Matched {
        report: VersionReport,
        version: Version,
    },
    Mismatch {
        report: VersionReport,
        /// Every file with the version it holds.
        files: Vec<(PathBuf, Version)>,
    },
    Synced {
        report: VersionReport,
        summary: SyncSummary,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &VersionReport {
        match self {
            RunOutcome::Matched { report, .. }
            | RunOutcome::Mismatch { report, .. }
            | RunOutcome::Synced { report, .. } => report,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Mismatch { .. })
    }
}

/// Reads every file in order, stopping at the first failure.
pub fn collect(files: &[PathBuf], options: &ParserOptions) -> Result<VersionReport> {
    if files.is_empty() {
        return Err(VersionSyncError::EmptyInput);
    }

    let mut report = VersionReport::default();
    for path in files {
        if report.entries.iter().any(|(file, _)| &file.path == path) {
            debug!("Skipping duplicate path '{}'", path.display());
            continue;
        }
        let file = TrackedFile::new(path)?;
        let version = file.kind.get_current_version(&file.path, options)?;
        debug!("'{}' is at {}", file.path.display(), version);
        report.entries.push((file, version));
    }
    Ok(report)
}

pub fn check(report: &VersionReport) -> ConsistencyResult {
    let mut versions = report.versions();
    let Some(first) = versions.next() else {
        return ConsistencyResult::Inconsistent(Vec::new());
    };
    if versions.all(|version| version == first) {
        ConsistencyResult::Consistent(first.clone())
    } else {
        ConsistencyResult::Inconsistent(
            report
                .entries
                .iter()
                .map(|(file, version)| (file.path.clone(), version.clone()))
                .collect(),
        )
    }
}

/// Rewrites every file that is not already at the highest version.
pub fn sync(report: &VersionReport, options: &ParserOptions) -> Result<SyncSummary> {
    let target = report.highest().cloned().ok_or(VersionSyncError::EmptyInput)?;
    info!("Synchronizing to {}", target);

    let mut summary = SyncSummary {
        target,
        updated: Vec::new(),
        skipped: Vec::new(),
    };
    for (file, current) in &report.entries {
        if *current == summary.target {
            debug!("'{}' already at {}", file.path.display(), current);
            continue;
        }
        match file
            .kind
            .update_version(&file.path, &summary.target, options)?
        {
            UpdateOutcome::Updated => {
                info!(
                    "Updated '{}': {} -> {}",
                    file.path.display(),
                    current,
                    summary.target
                );
                summary.updated.push(file.path.clone());
            }
            UpdateOutcome::Skipped => summary.skipped.push(file.path.clone()),
        }
    }
    Ok(summary)
}

pub fn run(config: &SyncConfig) -> Result<RunOutcome> {
    let report = collect(&config.files, &config.options)?;

    if config.sync {
        let summary = sync(&report, &config.options)?;
        return Ok(RunOutcome::Synced { report, summary });
    }

    Ok(match check(&report) {
        ConsistencyResult::Consistent(version) => RunOutcome::Matched { report, version },
        ConsistencyResult::Inconsistent(files) => RunOutcome::Mismatch { report, files },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn report_of(entries: &[(&str, &str)]) -> VersionReport {
        VersionReport {
            entries: entries
                .iter()
                .map(|(path, version)| (TrackedFile::new(path).unwrap(), v(version)))
                .collect(),
        }
    }

    #[test]
    fn test_collect_rejects_empty_input() {
        let err = collect(&[], &ParserOptions::default()).unwrap_err();
        assert!(matches!(err, VersionSyncError::EmptyInput));
    }

    #[test]
    fn test_collect_rejects_unsupported_before_reading() {
        let err = collect(&[PathBuf::from("setup.cfg")], &ParserOptions::default()).unwrap_err();
        assert!(matches!(err, VersionSyncError::UnsupportedType { .. }));
    }

    #[test]
    fn test_collect_skips_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"version": "1.0.0"}"#).unwrap();

        let report = collect(&[path.clone(), path.clone()], &ParserOptions::default()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.entries()[0].0.path, path);
    }

    #[test]
    fn test_check_consistent() {
        let report = report_of(&[("pyproject.toml", "1.2.3"), ("package.json", "1.2.3")]);
        assert_eq!(check(&report), ConsistencyResult::Consistent(v("1.2.3")));
    }

    #[test]
    fn test_check_inconsistent_lists_every_file() {
        let report = report_of(&[
            ("pyproject.toml", "1.0.0"),
            ("package.json", "1.2.3"),
            ("pkg/__init__.py", "1.0.0"),
        ]);
        let ConsistencyResult::Inconsistent(files) = check(&report) else {
            panic!("expected inconsistent result");
        };
        assert_eq!(files.len(), 3);
        assert_eq!(files[1], (PathBuf::from("package.json"), v("1.2.3")));
    }

    #[test]
    fn test_highest_uses_semver_ordering() {
        let report = report_of(&[("package.json", "1.9.0"), ("pyproject.toml", "1.10.0")]);
        assert_eq!(report.highest(), Some(&v("1.10.0")));
    }

    #[test]
    fn test_sync_skips_files_at_target() {
        let dir = TempDir::new().unwrap();
        let pyproject = dir.path().join("pyproject.toml");
        let package_json = dir.path().join("package.json");
        let original = "[project]\nversion = \"2.0.0\"   # keep\n";
        fs::write(&pyproject, original).unwrap();
        fs::write(&package_json, r#"{"version": "1.0.0"}"#).unwrap();

        let options = ParserOptions::default();
        let report = collect(&[pyproject.clone(), package_json.clone()], &options).unwrap();
        let summary = sync(&report, &options).unwrap();

        assert_eq!(summary.target, v("2.0.0"));
        assert_eq!(summary.updated, vec![package_json]);
        assert!(summary.skipped.is_empty());
        assert_eq!(fs::read_to_string(&pyproject).unwrap(), original);
    }

    #[test]
    fn test_run_reports_mismatch() {
        let dir = TempDir::new().unwrap();
        let package_json = dir.path().join("package.json");
        let source = dir.path().join("about.py");
        fs::write(&package_json, r#"{"version": "1.0.0"}"#).unwrap();
        fs::write(&source, "__version__ = \"1.0.1\"\n").unwrap();

        let outcome = run(&SyncConfig {
            files: vec![package_json, source],
            options: ParserOptions::default(),
            sync: false,
        })
        .unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.report().len(), 2);
        let RunOutcome::Mismatch { files, .. } = outcome else {
            panic!("expected a mismatch outcome");
        };
        assert_eq!(
            files.iter().map(|(_, version)| version.to_string()).collect::<Vec<_>>(),
            vec!["1.0.0", "1.0.1"]
        );
    }
}
