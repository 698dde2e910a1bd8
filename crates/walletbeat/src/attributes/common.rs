use super::{Attribute, Rating, Value};
use crate::features::{Feature, VariantContext};

/// Value for an attribute whose research is missing.
pub fn unrated(attribute: &Attribute, wallet_name: &str) -> Value {
    Value::new(
        "unrated",
        Rating::Unrated,
        format!("{} is not rated yet", attribute.display_name),
        format!(
            "Walletbeat has not yet evaluated {wallet_name} on {}.",
            attribute.display_name.to_lowercase()
        ),
    )
    .with_how_to_improve(format!(
        "Contribute research on {wallet_name} to get it rated."
    ))
}

/// Value for an attribute that does not apply, with the reason.
pub fn exempt(attribute: &Attribute, why: impl Into<String>) -> Value {
    Value::new(
        "exempt",
        Rating::Exempt,
        format!("{} does not apply", attribute.display_name),
        why,
    )
}

/// Worst of `values`: any unrated value wins outright, exempt values are
/// ignored unless every value is exempt, then fail < partial < pass.
/// Ties keep the first occurrence. `None` only for an empty slice.
pub fn pick_worst_rating(values: &[Value]) -> Option<Value> {
    if let Some(unrated) = values.iter().find(|value| value.rating == Rating::Unrated) {
        return Some(unrated.clone());
    }

    let worst = values
        .iter()
        .filter_map(|value| value.rating.rank().map(|rank| (rank, value)))
        .fold(None, |worst: Option<(u8, &Value)>, (rank, value)| match worst {
            Some((worst_rank, _)) if worst_rank <= rank => worst,
            _ => Some((rank, value)),
        });

    match worst {
        Some((_, value)) => Some(value.clone()),
        None => values.first().cloned(),
    }
}

/// Best rated value of `values`. When nothing is rated, the first unrated
/// value, else the first exempt one. `None` only for an empty slice.
pub fn pick_best_rating(values: &[Value]) -> Option<Value> {
    let best = values
        .iter()
        .filter_map(|value| value.rating.rank().map(|rank| (rank, value)))
        .fold(None, |best: Option<(u8, &Value)>, (rank, value)| match best {
            Some((best_rank, _)) if best_rank >= rank => best,
            _ => Some((rank, value)),
        });

    if let Some((_, value)) = best {
        return Some(value.clone());
    }

    values
        .iter()
        .find(|value| value.rating == Rating::Unrated)
        .or_else(|| values.first())
        .cloned()
}

/// Splits a resolved feature into its supported payload, or the value the
/// other states rate as. `NotSupported` is rated by `not_supported`.
pub(crate) fn require<'a, T>(
    attribute: &Attribute,
    ctx: &VariantContext<'_>,
    feature: Feature<&'a T>,
    not_supported: impl FnOnce() -> Value,
) -> Result<&'a T, Value> {
    match feature {
        Feature::Supported(value) => Ok(value),
        Feature::NotSupported => Err(not_supported()),
        Feature::Unrated => Err(unrated(attribute, ctx.wallet_name)),
        Feature::NotApplicable => Err(not_applicable(attribute, ctx)),
    }
}

/// Exempt value for a feature researched as not applicable to this variant.
pub(crate) fn not_applicable(attribute: &Attribute, ctx: &VariantContext<'_>) -> Value {
    exempt(
        attribute,
        format!(
            "{} does not apply to the {} version of {}.",
            attribute.display_name,
            ctx.variant.name(false),
            ctx.wallet_name
        ),
    )
}

/// Pass when `passed == total`, partial when some passed, fail otherwise.
pub(crate) fn rating_from_count(passed: usize, total: usize) -> Rating {
    if total > 0 && passed >= total {
        Rating::Pass
    } else if passed > 0 {
        Rating::Partial
    } else {
        Rating::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(id: &str, rating: Rating) -> Value {
        Value::new(id, rating, id, "")
    }

    #[test]
    fn worst_prefers_unrated_over_everything() {
        let values = [
            value("a", Rating::Fail),
            value("b", Rating::Unrated),
            value("c", Rating::Pass),
        ];
        let worst = pick_worst_rating(&values).expect("non-empty");
        assert_eq!(worst.id, "b");
    }

    #[test]
    fn worst_ignores_exempt_unless_alone() {
        let values = [value("a", Rating::Exempt), value("b", Rating::Partial)];
        assert_eq!(pick_worst_rating(&values).expect("non-empty").id, "b");

        let only_exempt = [value("a", Rating::Exempt), value("b", Rating::Exempt)];
        let worst = pick_worst_rating(&only_exempt).expect("non-empty");
        assert_eq!(worst.rating, Rating::Exempt);
        assert_eq!(worst.id, "a");
    }

    #[test]
    fn worst_orders_fail_below_partial_below_pass() {
        let values = [
            value("pass", Rating::Pass),
            value("fail", Rating::Fail),
            value("partial", Rating::Partial),
        ];
        assert_eq!(pick_worst_rating(&values).expect("non-empty").id, "fail");
    }

    #[test]
    fn best_falls_back_to_unrated_then_exempt() {
        let values = [value("a", Rating::Fail), value("b", Rating::Partial)];
        assert_eq!(pick_best_rating(&values).expect("non-empty").id, "b");

        let unrated = [value("a", Rating::Exempt), value("b", Rating::Unrated)];
        assert_eq!(
            pick_best_rating(&unrated).expect("non-empty").rating,
            Rating::Unrated
        );

        let exempt = [value("a", Rating::Exempt)];
        assert_eq!(
            pick_best_rating(&exempt).expect("non-empty").rating,
            Rating::Exempt
        );
    }

    #[test]
    fn empty_slices_yield_nothing() {
        assert!(pick_worst_rating(&[]).is_none());
        assert!(pick_best_rating(&[]).is_none());
    }

    #[test]
    fn count_ratings() {
        assert_eq!(rating_from_count(2, 2), Rating::Pass);
        assert_eq!(rating_from_count(1, 2), Rating::Partial);
        assert_eq!(rating_from_count(0, 2), Rating::Fail);
    }
}
