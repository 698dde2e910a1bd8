use super::common::{exempt, require, unrated};
use super::{Attribute, AttributeId, Rating, Reconciliation, Value};
use crate::features::{
    Feature, FeeDisplayLevel, LicenseFreedom, Licensing, MonetizationStrategy, VariantContext,
};
use crate::variants::ALL_VARIANTS;

pub(super) static SOURCE_VISIBILITY: Attribute = Attribute {
    id: AttributeId::SourceVisibility,
    display_name: "Source visibility",
    question: "Is the source code for the wallet visible to the public?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_source_visibility,
};

pub(super) static OPEN_SOURCE: Attribute = Attribute {
    id: AttributeId::OpenSource,
    display_name: "Open source",
    question: "Is the wallet licensed under a free and open-source software license?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_open_source,
};

pub(super) static FUNDING: Attribute = Attribute {
    id: AttributeId::Funding,
    display_name: "Funding transparency",
    question: "Is it clear how the wallet is funded?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_funding,
};

pub(super) static FEE_TRANSPARENCY: Attribute = Attribute {
    id: AttributeId::FeeTransparency,
    display_name: "Fee transparency",
    question: "Are fees shown to the user before signing?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_fee_transparency,
};

/// Shared licensing, with the non-supported states already rated.
fn licensing<'a>(attribute: &Attribute, ctx: &VariantContext<'a>) -> Result<&'a Licensing, Value> {
    match ctx.features.transparency.licensing.as_ref() {
        Feature::Supported(licensing) => Ok(licensing),
        Feature::Unrated => Err(unrated(attribute, ctx.wallet_name)),
        Feature::NotApplicable => Err(exempt(
            attribute,
            format!("{} has no code of its own to license.", ctx.wallet_name),
        )),
        Feature::NotSupported => Err(Value::new(
            "no_license",
            Rating::Fail,
            "No license",
            format!("{} publishes no license for its code.", ctx.wallet_name),
        )),
    }
}

fn evaluate_source_visibility(ctx: &VariantContext<'_>) -> Value {
    let licensing = match licensing(&SOURCE_VISIBILITY, ctx) {
        Ok(licensing) => licensing,
        Err(value) => return value,
    };

    let licenses = licensing.licenses();
    let visible = licenses
        .iter()
        .filter(|license| license.source_visible())
        .count();
    let references = licensing.references().iter().cloned();

    if visible == licenses.len() {
        return Value::new(
            "source_public",
            Rating::Pass,
            "Source code visible",
            format!("The source code of {} is public.", ctx.wallet_name),
        )
        .with_references(references);
    }

    if visible == 0 {
        return Value::new(
            "source_private",
            Rating::Fail,
            "Source code private",
            format!("The source code of {} is not public.", ctx.wallet_name),
        )
        .with_how_to_improve(format!(
            "{} should publish its source code.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    let private_part = match licensing {
        Licensing::SeparateCoreAndApp { core_license, .. } if !core_license.source_visible() => {
            "core"
        }
        _ => "app",
    };
    Value::new(
        "source_partially_private",
        Rating::Partial,
        "Source code partially visible",
        format!(
            "Part of {}'s source code is public, but its {private_part} code is private.",
            ctx.wallet_name
        ),
    )
    .with_how_to_improve(format!(
        "{} should publish its {private_part} code as well.",
        ctx.wallet_name
    ))
    .with_references(references)
}

fn evaluate_open_source(ctx: &VariantContext<'_>) -> Value {
    let licensing = match licensing(&OPEN_SOURCE, ctx) {
        Ok(licensing) => licensing,
        Err(value) => return value,
    };

    let licenses = licensing.licenses();
    let references = licensing.references().iter().cloned();
    let names = licenses
        .iter()
        .map(|license| license.label())
        .collect::<Vec<_>>()
        .join(" and ");
    let least_free = licenses
        .iter()
        .map(|license| license.freedom())
        .min()
        .unwrap_or(LicenseFreedom::NotFoss);

    let value = match (least_free, licenses.len()) {
        (LicenseFreedom::Foss, _) => Value::new(
            "foss",
            Rating::Pass,
            "Open source",
            format!("{} is licensed under {names}.", ctx.wallet_name),
        ),
        (LicenseFreedom::FutureFoss, _) => Value::new(
            "future_foss",
            Rating::Partial,
            "Open source in the future",
            format!(
                "{} is licensed under {names}, which becomes open source after a delay.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should switch to a FOSS license now.",
            ctx.wallet_name
        )),
        (LicenseFreedom::NotFoss, 1) => Value::new(
            "proprietary",
            Rating::Fail,
            "Proprietary",
            format!(
                "{} is licensed under {names}, which is not open source.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should adopt a FOSS license.",
            ctx.wallet_name
        )),
        (LicenseFreedom::NotFoss, _) => Value::new(
            "mixed_including_proprietary",
            Rating::Fail,
            "Partially proprietary",
            format!(
                "{} is licensed under {names}; part of its code is not open source.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should license all of its code under a FOSS license.",
            ctx.wallet_name
        )),
    };

    value.with_references(references)
}

fn evaluate_funding(ctx: &VariantContext<'_>) -> Value {
    let undisclosed = || {
        Value::new(
            "funding_undisclosed",
            Rating::Fail,
            "Funding undisclosed",
            format!("{} does not disclose how it is funded.", ctx.wallet_name),
        )
    };
    let monetization = match require(
        &FUNDING,
        ctx,
        ctx.features.transparency.monetization.as_ref(),
        undisclosed,
    ) {
        Ok(monetization) => monetization,
        Err(value) => return value,
    };
    let references = monetization.references.iter().cloned();

    if monetization.uses(MonetizationStrategy::HiddenConvenienceFees) {
        return Value::new(
            "hidden_convenience_fees",
            Rating::Fail,
            "Hidden fees",
            format!(
                "{} charges convenience fees that are not shown to users.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should disclose its convenience fees before users sign.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    if monetization.strategies.is_empty() {
        return unrated(&FUNDING, ctx.wallet_name);
    }

    let strategies = monetization
        .active_strategies()
        .iter()
        .map(|strategy| strategy.label())
        .collect::<Vec<_>>();
    let strategies = if strategies.is_empty() {
        "no listed source".to_string()
    } else {
        strategies.join(", ")
    };

    if monetization.uses(MonetizationStrategy::VentureCapital)
        || !monetization.revenue_breakdown_public
    {
        return Value::new(
            "funding_partially_transparent",
            Rating::Partial,
            "Funding partially transparent",
            format!(
                "{} is funded through {strategies}, without a public revenue breakdown or with outside investors to answer to.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should publish a breakdown of its revenue sources.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    Value::new(
        "funding_transparent",
        Rating::Pass,
        "Funding transparent",
        format!(
            "{} is funded through {strategies} and publishes its revenue breakdown.",
            ctx.wallet_name
        ),
    )
    .with_references(references)
}

fn evaluate_fee_transparency(ctx: &VariantContext<'_>) -> Value {
    let hidden = || {
        Value::new(
            "fees_hidden",
            Rating::Fail,
            "Fees hidden",
            format!(
                "{} does not show fees before the user signs.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should show a full fee breakdown before signing.",
            ctx.wallet_name
        ))
    };

    let fees = match require(
        &FEE_TRANSPARENCY,
        ctx,
        ctx.resolve(&ctx.features.transparency.operation_fees),
        hidden,
    ) {
        Ok(fees) => fees,
        Err(value) => return value,
    };
    let references = fees.references.iter().cloned();

    if fees.fully_sponsored {
        return Value::new(
            "fees_sponsored",
            Rating::Pass,
            "Fees sponsored",
            format!("{} sponsors all fees for basic operations.", ctx.wallet_name),
        )
        .with_references(references);
    }

    match fees.by_default.max(fees.after_single_action) {
        FeeDisplayLevel::Comprehensive if fees.by_default == FeeDisplayLevel::Comprehensive => {
            Value::new(
                "fees_comprehensive",
                Rating::Pass,
                "Fees fully shown",
                format!(
                    "{} shows a full fee breakdown by default.",
                    ctx.wallet_name
                ),
            )
            .with_references(references)
        }
        FeeDisplayLevel::Comprehensive | FeeDisplayLevel::Aggregated => Value::new(
            "fees_aggregated",
            Rating::Partial,
            "Fees partially shown",
            format!(
                "{} shows fees, but not fully itemised by default.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should itemise all fees by default.",
            ctx.wallet_name
        ))
        .with_references(references),
        FeeDisplayLevel::None => hidden().with_references(references),
    }
}
