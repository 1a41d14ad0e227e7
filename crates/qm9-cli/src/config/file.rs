use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileInputConfig {
    pub pattern: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    pub directory: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileExecutionConfig {
    pub threads: Option<usize>,
    pub strict: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<FileInputConfig>,
    pub output: Option<FileOutputConfig>,
    pub execution: Option<FileExecutionConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_file_reads_all_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qm9.toml");
        fs::write(
            &path,
            r#"
[input]
pattern = "data/QM9/*.xyz"

[output]
directory = "parsed"
summary = "parsed/summary.csv"

[execution]
threads = 8
strict = true
"#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(
            config.input.unwrap().pattern.as_deref(),
            Some("data/QM9/*.xyz")
        );
        let output = config.output.unwrap();
        assert_eq!(output.directory, Some(PathBuf::from("parsed")));
        assert_eq!(output.summary, Some(PathBuf::from("parsed/summary.csv")));
        let execution = config.execution.unwrap();
        assert_eq!(execution.threads, Some(8));
        assert_eq!(execution.strict, Some(true));
    }

    #[test]
    fn from_file_accepts_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert!(config.input.is_none());
        assert!(config.output.is_none());
        assert!(config.execution.is_none());
    }

    #[test]
    fn from_file_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[output]\nfilename-width = 8\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn from_file_reports_missing_file_as_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
