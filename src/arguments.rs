use crate::coordinator::SyncConfig;
use crate::parsers::{DEFAULT_PY_VARS, ParserOptions};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Check version consistency between pyproject.toml, package.json and Python files",
    bin_name = "version-sync"
)]
pub struct Arguments {
    /// Variable names used to find versions in Python files, separated by ';'
    #[arg(long, default_value = DEFAULT_PY_VARS)]
    pub py_vars: String,
    /// Update all files to the highest version found
    #[arg(long)]
    pub sync: bool,
    #[arg(long, short)]
    pub verbose: bool,
    /// Paths to the files to check
    pub files: Vec<PathBuf>,
}

impl Arguments {
    pub fn to_config(&self) -> SyncConfig {
        SyncConfig {
            files: self.files.clone(),
            options: ParserOptions::from_py_vars(&self.py_vars),
            sync: self.sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let args = Arguments::parse_from(["version-sync"]);
        assert_eq!(args.py_vars, "version;VERSION;__version__;__VERSION__");
        assert!(!args.sync);
        assert!(!args.verbose);
        assert!(args.files.is_empty());
    }

    #[test]
    fn test_parse_files() {
        let args = Arguments::parse_from(["version-sync", "pyproject.toml", "package.json"]);
        assert_eq!(
            args.files,
            vec![PathBuf::from("pyproject.toml"), PathBuf::from("package.json")]
        );
    }

    #[test]
    fn test_parse_sync_and_py_vars() {
        let args = Arguments::parse_from([
            "version-sync",
            "--py-vars",
            "__version__",
            "--sync",
            "src/pkg/__init__.py",
        ]);
        assert!(args.sync);
        assert_eq!(args.py_vars, "__version__");
        assert_eq!(args.files, vec![PathBuf::from("src/pkg/__init__.py")]);
    }

    #[test]
    fn test_parse_verbose() {
        let args = Arguments::parse_from(["version-sync", "-v"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_to_config() {
        let args = Arguments::parse_from([
            "version-sync",
            "--py-vars",
            "VERSION;__version__",
            "package.json",
        ]);
        let config = args.to_config();
        assert_eq!(config.options.variables, vec!["VERSION", "__version__"]);
        assert_eq!(config.files, vec![PathBuf::from("package.json")]);
        assert!(!config.sync);
    }
}
