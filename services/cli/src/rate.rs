use crate::infra::{engine, load_wallet, rating_settings};
use crate::render::{print_json, render_rated_wallet};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use walletbeat::attributes::AttributeTree;
use walletbeat::config::AppConfig;
use walletbeat::error::AppError;
use walletbeat::ladders::{attribute_stages, validate_ladders};
use walletbeat::{unrated_template, AttributeId, RatedWallet, WalletType};

#[derive(Args, Debug)]
pub(crate) struct RateArgs {
    /// Wallet records to rate
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Emit rated wallets as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Rate as of this date (YYYY-MM-DD). Defaults to WALLETBEAT_AS_OF or today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TemplateKind {
    Software,
    Hardware,
}

impl From<TemplateKind> for WalletType {
    fn from(value: TemplateKind) -> Self {
        match value {
            TemplateKind::Software => WalletType::Software,
            TemplateKind::Hardware => WalletType::Hardware,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    /// Kind of wallet to start from
    #[arg(long, value_enum, default_value_t = TemplateKind::Software)]
    pub(crate) kind: TemplateKind,
}

pub(crate) fn run_rate(args: RateArgs, config: &AppConfig) -> Result<(), AppError> {
    let settings = rating_settings(config, args.as_of);
    let engine = engine(settings)?;
    info!(files = args.files.len(), as_of = %settings.as_of, "rating wallets");

    let rated = args
        .files
        .iter()
        .map(|path| {
            let wallet = load_wallet(path)?;
            Ok(engine.rate_wallet(&wallet)?)
        })
        .collect::<Result<Vec<RatedWallet>, AppError>>()?;

    if args.json {
        print_json(&rated)
    } else {
        for wallet in &rated {
            render_rated_wallet(wallet, settings.as_of);
        }
        Ok(())
    }
}

pub(crate) fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    print_json(&unrated_template(args.kind.into()))
}

pub(crate) fn run_check(config: &AppConfig) -> Result<(), AppError> {
    let settings = rating_settings(config, None);
    let engine = engine(settings)?;
    let tree = engine.tree();
    validate_ladders(tree).map_err(walletbeat::RatingError::from)?;

    println!(
        "Attribute tree: {} nodes, {} attributes",
        tree.len(),
        tree.attributes().len()
    );
    println!("Ladders validated against the tree.\n");
    println!("Stage usage");
    for id in AttributeId::ALL {
        let usage = attribute_stages(id)
            .into_iter()
            .map(|(ladder, stages)| {
                let stages = stages
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} [{stages}]", ladder.label())
            })
            .collect::<Vec<_>>();
        if usage.is_empty() {
            println!("- {id}: not used in any stage");
        } else {
            println!("- {id}: {}", usage.join("; "));
        }
    }

    let unused = unused_attributes(tree);
    if !unused.is_empty() {
        info!(count = unused.len(), "attributes outside every ladder");
    }
    Ok(())
}

fn unused_attributes(tree: &AttributeTree) -> Vec<AttributeId> {
    tree.attributes()
        .into_iter()
        .filter(|id| attribute_stages(*id).is_empty())
        .collect()
}
