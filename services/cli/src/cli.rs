use crate::demo::{run_demo, DemoArgs};
use crate::rate::{run_check, run_rate, run_template, RateArgs, TemplateArgs};
use clap::{Parser, Subcommand};
use tracing::info;
use walletbeat::config::AppConfig;
use walletbeat::error::AppError;
use walletbeat::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "walletbeat",
    about = "Rate wallets against the walletbeat attributes and stage ladders",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rate one or more wallet records (JSON files)
    Rate(RateArgs),
    /// Rate the bundled sample wallets
    Demo(DemoArgs),
    /// Print an unrated wallet record to start research from
    Template(TemplateArgs),
    /// Validate the attribute tree and ladders, and list stage usage
    Check,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, as_of = ?config.rating.as_of, "walletbeat cli starting");

    match cli.command {
        Command::Rate(args) => run_rate(args, &config),
        Command::Demo(args) => run_demo(args, &config),
        Command::Template(args) => run_template(args),
        Command::Check => run_check(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rate_accepts_several_files_and_a_date() {
        let cli = Cli::try_parse_from([
            "walletbeat",
            "rate",
            "a.json",
            "b.json",
            "--as-of",
            "2025-01-01",
            "--json",
        ])
        .expect("arguments parse");
        let Command::Rate(args) = cli.command else {
            panic!("expected the rate command");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.json);
        assert!(args.as_of.is_some());
    }

    #[test]
    fn rate_requires_a_file() {
        assert!(Cli::try_parse_from(["walletbeat", "rate"]).is_err());
    }
}
