mod cli;
mod commands;
mod infra;

use autofix_pricing::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
