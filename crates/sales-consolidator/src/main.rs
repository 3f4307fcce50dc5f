mod bootstrap;

use std::io;

use anyhow::Result;
use clap::Parser;
use sales_core::error::SalesError;
use sales_core::models::RunMode;
use sales_core::settings::Settings;
use sales_data::reader::XlsxReader;
use sales_data::writer::XlsxWriter;
use sales_runtime::driver::GroupingDriver;
use sales_runtime::summary;
use tracing::Level;

fn main() -> Result<()> {
    let settings = Settings::parse();
    let mode = settings.run_mode();

    if mode == RunMode::Move && !bootstrap::confirm_move(io::stdin().lock(), io::stdout())? {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    let log_file = bootstrap::setup_logging(settings.effective_log_level(), &settings.output)?;

    tracing::info!("Logger initialized. Log file: {}", log_file.display());
    tracing::info!("Sales Consolidator v{} running in {} mode", env!("CARGO_PKG_VERSION"), mode);
    tracing::debug!(
        "Input: {}, Output: {}",
        settings.input.display(),
        settings.output.display()
    );

    let driver = GroupingDriver::new(XlsxReader, XlsxWriter, &settings.output, mode);
    let counters = match driver.run(&settings.input) {
        Ok(counters) => counters,
        Err(e) => match early_exit_level(&e) {
            Some(level) if level == Level::WARN => {
                tracing::warn!("{}", e);
                return Ok(());
            }
            Some(_) => {
                tracing::error!("{}", e);
                return Ok(());
            }
            None => return Err(e.into()),
        },
    };

    summary::log_summary(&counters, mode);

    if let Some(path) = &settings.summary_json {
        summary::write_summary_json(&counters, path)?;
    }

    Ok(())
}

/// Level at which a run-ending input problem is logged before exiting
/// cleanly. `None` means the error propagates.
fn early_exit_level(err: &SalesError) -> Option<Level> {
    match err {
        SalesError::NoInputFiles(_) => Some(Level::WARN),
        SalesError::InputNotFound(_) => Some(Level::ERROR),
        _ => None,
    }
}
