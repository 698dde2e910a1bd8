use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;
use walletbeat::config::AppConfig;
use walletbeat::error::AppError;
use walletbeat::{BaseWallet, RatingEngine, RatingSettings};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Settings for this run: the flag wins over the configured date, which
/// wins over today.
pub(crate) fn rating_settings(config: &AppConfig, as_of: Option<NaiveDate>) -> RatingSettings {
    let mut settings = config.rating.settings(Local::now().date_naive());
    if let Some(as_of) = as_of {
        settings.as_of = as_of;
    }
    settings
}

pub(crate) fn engine(settings: RatingSettings) -> Result<RatingEngine, AppError> {
    Ok(RatingEngine::new(settings)?)
}

pub(crate) fn parse_wallet(path: &Path, raw: &str) -> Result<BaseWallet, AppError> {
    serde_json::from_str(raw).map_err(|source| AppError::catalog(path, source))
}

pub(crate) fn load_wallet(path: &Path) -> Result<BaseWallet, AppError> {
    let raw = fs::read_to_string(path)?;
    parse_wallet(path, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_and_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-01-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"))
        );
        let err = parse_date("01/01/2025").expect_err("rejected");
        assert!(err.contains("01/01/2025"));
    }

    #[test]
    fn malformed_records_name_their_file() {
        let err = parse_wallet(Path::new("broken.json"), "{\"variants\": []}")
            .expect_err("record rejected");
        assert!(matches!(err, AppError::Catalog { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
