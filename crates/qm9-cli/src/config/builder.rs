use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use qm9parse::engine::config::ConversionConfigBuilder;
use std::path::PathBuf;
use tracing::debug;

/// Resolves the final configuration of a `convert` run.
///
/// `threads` is the global `-j` flag, which takes precedence like every
/// other command-line value.
pub fn build_config(args: &ConvertArgs, threads: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let input_file = file_config.input.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();
    let execution_file = file_config.execution.take().unwrap_or_default();

    let input_pattern = args
        .input
        .clone()
        .or(input_file.pattern)
        .unwrap_or(defaults.input_pattern);
    let output_dir = args
        .output
        .clone()
        .or(output_file.directory)
        .unwrap_or(defaults.output_directory);
    let summary_path = args
        .summary
        .clone()
        .or(output_file.summary)
        .or(defaults.summary);
    let threads = threads
        .or(execution_file.threads)
        .unwrap_or(defaults.threads);
    let strict = args.strict || execution_file.strict.unwrap_or(false);

    debug!(
        input_pattern = %input_pattern,
        output_dir = %output_dir.display(),
        threads,
        strict,
        "Resolved conversion settings."
    );

    let core_config = ConversionConfigBuilder::new()
        .input_pattern(input_pattern)
        .output_dir(output_dir)
        .summary_path(summary_path)
        .threads(Some(threads))
        .build()?;

    Ok(AppConfig {
        core_config,
        strict,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "input.pattern" => {
                config.input.get_or_insert_with(Default::default).pattern =
                    Some(value_str.to_string());
            }
            "output.directory" => {
                config.output.get_or_insert_with(Default::default).directory =
                    Some(PathBuf::from(value_str));
            }
            "output.summary" => {
                config.output.get_or_insert_with(Default::default).summary =
                    Some(PathBuf::from(value_str));
            }
            "execution.threads" => {
                config
                    .execution
                    .get_or_insert_with(Default::default)
                    .threads = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "execution.strict" => {
                config.execution.get_or_insert_with(Default::default).strict =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
