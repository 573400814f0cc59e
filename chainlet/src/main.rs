mod config;
mod error;
mod logger;
mod options;
mod runner;
mod style;
mod term;
mod toml_parser;
mod util;

use error::AppError;
use options::Options;
use config::Config;

fn load_dotenv() -> Result<(), AppError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn run_app() -> Result<(), AppError> {
    load_dotenv()?;

    let options = Options::load(std::env::args())?;
    let config: Config = options.try_into()?;

    logger::init(config.log_level.as_deref())?;

    runner::run(config)
}

fn main() {
    if let Err(e) = run_app() {
        tracing::error!(error = %e, "run failed");
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
