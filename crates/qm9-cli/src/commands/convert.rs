use crate::cli::ConvertArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use qm9parse::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: ConvertArgs, threads: Option<usize>, quiet: bool) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args, threads)?;
    let config = &app_config.core_config;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Converting records matching '{}' into {}",
        config.input_pattern,
        config.output_dir.display()
    );
    info!("Invoking the core conversion workflow...");
    let report = workflows::convert::run(config, &reporter)?;

    if report.discovered == 0 {
        println!("Warning: no input files matched '{}'.", config.input_pattern);
    }

    println!(
        "Wrote {} of {} molecule(s) to {}",
        report.written.len(),
        report.discovered,
        config.output_dir.display()
    );
    if let Some(summary_path) = &report.summary_path {
        println!("Property summary written to: {}", summary_path.display());
    }

    if !report.is_complete() {
        println!("{} file(s) skipped:", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.path.display(), failure.error);
        }
        if app_config.strict {
            return Err(CliError::IncompleteBatch {
                failed: report.failures.len(),
                total: report.discovered,
            });
        }
        warn!("Some input files were skipped; rerun with --strict to treat this as an error.");
    }

    Ok(())
}
