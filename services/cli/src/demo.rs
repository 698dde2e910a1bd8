use crate::infra::{engine, parse_wallet, rating_settings};
use crate::render::{print_json, render_rated_wallet};
use chrono::NaiveDate;
use clap::Args;
use std::path::Path;
use walletbeat::config::AppConfig;
use walletbeat::error::AppError;
use walletbeat::{BaseWallet, RatedWallet, RatingEngine};

const SAMPLES: [(&str, &str); 2] = [
    ("data/daybreak.json", include_str!("../data/daybreak.json")),
    ("data/keel.json", include_str!("../data/keel.json")),
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Emit rated sample wallets as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Rate as of this date (YYYY-MM-DD). Defaults to WALLETBEAT_AS_OF or today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn sample_wallets() -> Result<Vec<BaseWallet>, AppError> {
    SAMPLES
        .iter()
        .map(|(path, raw)| parse_wallet(Path::new(path), raw))
        .collect()
}

fn rate_samples(engine: &RatingEngine) -> Result<Vec<RatedWallet>, AppError> {
    sample_wallets()?
        .iter()
        .map(|wallet| Ok(engine.rate_wallet(wallet)?))
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let settings = rating_settings(config, args.as_of);
    let rated = rate_samples(&engine(settings)?)?;

    if args.json {
        return print_json(&rated);
    }

    println!("Walletbeat rating demo");
    println!(
        "{} sample wallets | audits count as recent for {} days",
        rated.len(),
        settings.audit_freshness_days
    );
    for wallet in &rated {
        render_rated_wallet(wallet, settings.as_of);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use walletbeat::{LadderStage, LadderType, RatingSettings};

    fn demo_engine() -> RatingEngine {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        RatingEngine::new(RatingSettings {
            as_of,
            audit_freshness_days: RatingSettings::DEFAULT_AUDIT_FRESHNESS_DAYS,
        })
        .expect("engine builds")
    }

    #[test]
    fn samples_parse() {
        let wallets = sample_wallets().expect("samples parse");
        let ids = wallets
            .iter()
            .map(|wallet| wallet.metadata.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["daybreak", "keel"]);
    }

    #[test]
    fn samples_reach_their_first_stage() {
        let rated = rate_samples(&demo_engine()).expect("samples rate");

        let daybreak = &rated[0];
        assert_eq!(daybreak.stage(LadderType::Software), LadderStage::Stage(1));
        assert_eq!(daybreak.stage(LadderType::Hardware), LadderStage::NotApplicable);

        let keel = &rated[1];
        assert_eq!(keel.stage(LadderType::Hardware), LadderStage::Stage(1));
        assert_eq!(keel.stage(LadderType::Software), LadderStage::NotApplicable);
    }

    #[test]
    fn stale_audits_drop_daybreak_to_stage_zero() {
        let engine = RatingEngine::new(RatingSettings {
            as_of: NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date"),
            audit_freshness_days: RatingSettings::DEFAULT_AUDIT_FRESHNESS_DAYS,
        })
        .expect("engine builds");
        let rated = rate_samples(&engine).expect("samples rate");
        assert_eq!(rated[0].stage(LadderType::Software), LadderStage::Stage(0));
    }
}
