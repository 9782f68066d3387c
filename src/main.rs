use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use log::{debug, error};
use nc2arff::cli::{StartupError, env_log_level, parse_job};
use nc2arff::error::{ConvertError, ErrorKind};
use nc2arff::input::JobConfig;
use nc2arff::log::{config_echo, show_farewell_with_timing, show_greeting, show_summary};
use nc2arff::process_conversion_job;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let job = parse_job(env::args_os());
    let level = match &job {
        Ok(config) => config.log_level.clone(),
        Err(_) => env_log_level(),
    };
    init_logging(level.as_deref());

    let config = match job {
        Ok(config) => config,
        Err(StartupError::Args(e)) if e.kind() == ClapErrorKind::DisplayHelp => {
            if let Err(err) = e.print() {
                debug!("Could not print the usage text: {}", err);
            }
            return ExitCode::SUCCESS;
        }
        Err(StartupError::Args(e)) => {
            error!("Could not parse the arguments. {}", e.render());
            return ExitCode::from(ErrorKind::Config.exit_code() as u8);
        }
        Err(StartupError::Config(e)) => return fail(&e),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e.downcast_ref::<ConvertError>().map_or(1, ConvertError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}

fn init_logging(level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    env_logger::Builder::from_env(env).init();
}

fn fail(e: &ConvertError) -> ExitCode {
    error!("{}", e);
    ExitCode::from(e.exit_code() as u8)
}

fn run(config: &JobConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();

    show_greeting();
    config_echo(config);

    let summary = process_conversion_job(config).map_err(|e| {
        if e.kind() == ErrorKind::MalformedInput {
            error!("The WRF file has an incorrect format and could not be loaded");
        }
        e
    });
    let summary = summary.with_context(|| format!("Failed to convert {}", config.input.display()))?;

    show_summary(&summary);
    show_farewell_with_timing(start_time.elapsed());
    Ok(())
}
