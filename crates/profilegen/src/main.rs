mod cli;
mod error;
mod logging;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use profilegen_platform::AppPaths;

use crate::cli::Cli;
use crate::settings::AppSettings;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    let (settings, settings_error) = match loaded {
        Ok(settings) => (settings, None),
        Err(e) => (AppSettings::default(), Some(e)),
    };

    logging::init_logging(
        AppPaths::new().ok().map(|paths| paths.log_file()),
        settings.debug_logging,
        cli.verbose,
        settings.max_log_size_bytes,
    );
    if let Some(e) = settings_error {
        log::warn!("{e}; using default settings");
        eprintln!("warning: {e}; using default settings");
    }

    let stdout = std::io::stdout();
    match cli::run(&cli, &settings, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
