use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Settings for one batch conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Glob pattern selecting the raw QM9 records, e.g. `QM9/*.xyz`.
    pub input_pattern: String,
    /// Directory receiving `mol_{id:06}.xyz` files. Created if missing.
    pub output_dir: PathBuf,
    /// Optional CSV file receiving one row of properties per written molecule.
    pub summary_path: Option<PathBuf>,
    /// Worker threads for parsing; `None` uses one per logical core.
    pub threads: Option<usize>,
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    input_pattern: Option<String>,
    output_dir: Option<PathBuf>,
    summary_path: Option<PathBuf>,
    threads: Option<usize>,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.input_pattern = Some(pattern.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn summary_path(mut self, path: Option<PathBuf>) -> Self {
        self.summary_path = path;
        self
    }

    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConfigError> {
        let input_pattern = self
            .input_pattern
            .ok_or(ConfigError::MissingParameter("input_pattern"))?;
        if input_pattern.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "input_pattern",
                reason: "must not be empty",
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "threads",
                reason: "must be at least 1",
            });
        }
        Ok(ConversionConfig {
            input_pattern,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            summary_path: self.summary_path,
            threads: self.threads,
        })
    }
}
