mod cli;
mod demo;
mod infra;
mod rate;
mod render;

use walletbeat::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
