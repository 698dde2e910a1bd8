use super::common::{not_applicable, rating_from_count, require, unrated};
use super::guardians;
use super::{Attribute, AttributeId, Rating, Reconciliation, Value};
use crate::features::{
    Feature, KeyGeneration, KeyReconstruction, RpcEndpointConfiguration, VariantContext,
};
use crate::variants::{ALL_VARIANTS, HARDWARE_VARIANTS, SOFTWARE_AND_EMBEDDED_VARIANTS};

pub(super) static ACCOUNT_PORTABILITY: Attribute = Attribute {
    id: AttributeId::AccountPortability,
    display_name: "Account portability",
    question: "Can the user move their account to another wallet?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AnyVariantSuffices,
    evaluate: evaluate_account_portability,
};

pub(super) static L1_PROVIDER_INDEPENDENCE: Attribute = Attribute {
    id: AttributeId::L1ProviderIndependence,
    display_name: "Own node support",
    question: "Can the wallet be used with the user's own L1 node?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_l1_provider_independence,
};

pub(super) static CHAIN_CONFIGURABILITY: Attribute = Attribute {
    id: AttributeId::ChainConfigurability,
    display_name: "Chain configurability",
    question: "Can the user configure custom chains and their RPC endpoints?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_chain_configurability,
};

pub(super) static TRANSACTION_INCLUSION: Attribute = Attribute {
    id: AttributeId::TransactionInclusion,
    display_name: "Transaction inclusion",
    question: "Can the user get transactions included without relying on the wallet's infrastructure?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_transaction_inclusion,
};

pub(super) static INTEROPERABILITY: Attribute = Attribute {
    id: AttributeId::Interoperability,
    display_name: "Interoperability",
    question: "Does the hardware wallet work with third-party software without supplier linkage?",
    applies_to: HARDWARE_VARIANTS,
    reconciliation: Reconciliation::NotApplicableIfNoVariantMatches,
    evaluate: evaluate_interoperability,
};

pub(super) static ACCOUNT_UNRUGGABILITY: Attribute = Attribute {
    id: AttributeId::AccountUnruggability,
    display_name: "Account unruggability",
    question: "Can the user keep their account safe from being taken over by a third party?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_account_unruggability,
};

fn evaluate_account_portability(ctx: &VariantContext<'_>) -> Value {
    let locked_in = || {
        Value::new(
            "no_account_export",
            Rating::Fail,
            "Account locked in",
            format!(
                "The account in {} cannot be exported to another wallet.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should let users export their seed phrase or private keys.",
            ctx.wallet_name
        ))
    };

    let portability = match require(
        &ACCOUNT_PORTABILITY,
        ctx,
        ctx.resolve(&ctx.features.self_sovereignty.account_portability),
        locked_in,
    ) {
        Ok(portability) => portability,
        Err(value) => return value,
    };

    if !portability.can_export() {
        return locked_in().with_references(portability.references.iter().cloned());
    }

    Value::new(
        "account_export",
        Rating::Pass,
        "Account portable",
        format!(
            "{} lets users export their account to another wallet.",
            ctx.wallet_name
        ),
    )
    .with_references(portability.references.iter().cloned())
}

fn no_self_hosted_node(ctx: &VariantContext<'_>) -> Value {
    Value::new(
        "no_self_hosted_node",
        Rating::Fail,
        "No own node support",
        format!(
            "{} cannot be pointed at the user's own L1 node.",
            ctx.wallet_name
        ),
    )
    .with_how_to_improve(format!(
        "{} should let users configure the L1 RPC endpoint before any request is made.",
        ctx.wallet_name
    ))
}

fn evaluate_l1_provider_independence(ctx: &VariantContext<'_>) -> Value {
    let chains = match require(
        &L1_PROVIDER_INDEPENDENCE,
        ctx,
        ctx.resolve(&ctx.features.self_sovereignty.chain_configurability),
        || no_self_hosted_node(ctx),
    ) {
        Ok(chains) => chains,
        Err(value) => return value,
    };
    let references = chains.references.iter().cloned();

    let l1 = match require(&L1_PROVIDER_INDEPENDENCE, ctx, chains.l1.as_ref(), || {
        no_self_hosted_node(ctx)
    }) {
        Ok(l1) => l1,
        Err(value) => return value.with_references(references),
    };

    if !l1.basic_operations_with_endpoint_only {
        return Value::new(
            "self_hosted_node_basic_operations_broken",
            Rating::Partial,
            "Own node support is incomplete",
            format!(
                "{} accepts a custom L1 RPC endpoint, but basic operations still need other services.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should support account creation, balance lookups and token sends through the custom endpoint alone.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    match l1.rpc_endpoint_configuration {
        RpcEndpointConfiguration::YesBeforeAnySensitiveRequest => Value::new(
            "self_hosted_node",
            Rating::Pass,
            "Supports own node",
            format!(
                "{} can use the user's own L1 node before making any sensitive request.",
                ctx.wallet_name
            ),
        )
        .with_references(references),
        RpcEndpointConfiguration::YesAfterOtherSensitiveRequests => Value::new(
            "self_hosted_node_after_requests",
            Rating::Partial,
            "Own node supported after setup",
            format!(
                "{} can use the user's own L1 node, but only after sensitive requests went to its default provider.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should allow configuring the endpoint during onboarding.",
            ctx.wallet_name
        ))
        .with_references(references),
        RpcEndpointConfiguration::No => no_self_hosted_node(ctx).with_references(references),
    }
}

fn evaluate_chain_configurability(ctx: &VariantContext<'_>) -> Value {
    let fixed_chains = || {
        Value::new(
            "no_chain_configurability",
            Rating::Fail,
            "Chains not configurable",
            format!(
                "{} does not let users configure chains or their endpoints.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should let users add custom chains and RPC endpoints.",
            ctx.wallet_name
        ))
    };

    let chains = match require(
        &CHAIN_CONFIGURABILITY,
        ctx,
        ctx.resolve(&ctx.features.self_sovereignty.chain_configurability),
        fixed_chains,
    ) {
        Ok(chains) => chains,
        Err(value) => return value,
    };

    let non_l1 = match &chains.non_l1 {
        Feature::Unrated => None,
        Feature::Supported(non_l1) => Some(
            non_l1.rpc_endpoint_configuration != RpcEndpointConfiguration::No,
        ),
        Feature::NotApplicable | Feature::NotSupported => Some(false),
    };
    let custom = match &chains.custom_chain_rpc_endpoint {
        Feature::Unrated => None,
        feature => Some(feature.is_supported()),
    };

    let (Some(non_l1), Some(custom)) = (non_l1, custom) else {
        return unrated(&CHAIN_CONFIGURABILITY, ctx.wallet_name);
    };

    let rating = rating_from_count(usize::from(non_l1) + usize::from(custom), 2);
    let value = match rating {
        Rating::Pass => Value::new(
            "chains_configurable",
            Rating::Pass,
            "Chains configurable",
            format!(
                "{} supports custom chains and custom endpoints for existing L2s.",
                ctx.wallet_name
            ),
        ),
        Rating::Partial => Value::new(
            "chains_partially_configurable",
            Rating::Partial,
            "Chains partially configurable",
            format!(
                "{} supports {} but not {}.",
                ctx.wallet_name,
                if custom { "custom chains" } else { "custom L2 endpoints" },
                if custom { "custom L2 endpoints" } else { "custom chains" },
            ),
        ),
        _ => fixed_chains(),
    };

    value.with_references(chains.references.iter().cloned())
}

fn evaluate_transaction_inclusion(ctx: &VariantContext<'_>) -> Value {
    let censorable = || {
        Value::new(
            "no_alternative_inclusion",
            Rating::Fail,
            "Relies on wallet infrastructure",
            format!(
                "Transactions from {} can only be submitted through its own infrastructure.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should support self-broadcasting and L2 forced inclusion.",
            ctx.wallet_name
        ))
    };

    let submission = match require(
        &TRANSACTION_INCLUSION,
        ctx,
        ctx.resolve(&ctx.features.self_sovereignty.transaction_submission),
        censorable,
    ) {
        Ok(submission) => submission,
        Err(value) => return value,
    };

    let references = submission.references.iter().cloned();
    match rating_from_count(submission.routes(), 2) {
        Rating::Pass => Value::new(
            "full_inclusion_routes",
            Rating::Pass,
            "Censorship-resistant inclusion",
            format!(
                "{} can self-broadcast L1 transactions and force-include L2 transactions.",
                ctx.wallet_name
            ),
        )
        .with_references(references),
        Rating::Partial => Value::new(
            "partial_inclusion_routes",
            Rating::Partial,
            "Partial inclusion routes",
            format!(
                "{} offers {} but not {}.",
                ctx.wallet_name,
                if submission.self_broadcast {
                    "L1 self-broadcasting"
                } else {
                    "L2 forced inclusion"
                },
                if submission.self_broadcast {
                    "L2 forced inclusion"
                } else {
                    "L1 self-broadcasting"
                },
            ),
        )
        .with_references(references),
        _ => censorable().with_references(references),
    }
}

fn evaluate_interoperability(ctx: &VariantContext<'_>) -> Value {
    let closed = || {
        Value::new(
            "no_interoperability",
            Rating::Fail,
            "Not interoperable",
            format!(
                "{} only works with its manufacturer's software.",
                ctx.wallet_name
            ),
        )
    };

    let interop = match require(
        &INTEROPERABILITY,
        ctx,
        ctx.resolve(&ctx.features.self_sovereignty.interoperability),
        closed,
    ) {
        Ok(interop) => interop,
        Err(value) => return value,
    };

    let rating = rating_from_count(interop.passed_checks(), 2);
    let value = match rating {
        Rating::Fail => closed(),
        rating => Value::new(
            "interoperability",
            rating,
            "Interoperability",
            format!(
                "{} passes {} of 2 interoperability checks.",
                ctx.wallet_name,
                interop.passed_checks()
            ),
        ),
    };

    let value = if rating == Rating::Pass {
        value
    } else {
        value.with_how_to_improve(format!(
            "{} should work with third-party wallets and require no supplier account.",
            ctx.wallet_name
        ))
    };
    value.with_references(interop.references.iter().cloned())
}

fn evaluate_account_unruggability(ctx: &VariantContext<'_>) -> Value {
    let keys = match ctx.resolve(&ctx.features.security.keys_handling) {
        Feature::Unrated => return unrated(&ACCOUNT_UNRUGGABILITY, ctx.wallet_name),
        Feature::NotApplicable => return not_applicable(&ACCOUNT_UNRUGGABILITY, ctx),
        Feature::NotSupported => None,
        Feature::Supported(keys) => Some(keys),
    };
    let policy = match ctx.resolve(&ctx.features.security.account_recovery) {
        Feature::Unrated => return unrated(&ACCOUNT_UNRUGGABILITY, ctx.wallet_name),
        Feature::Supported(recovery) => recovery.guardian_policy.as_ref(),
        Feature::NotApplicable | Feature::NotSupported => None,
    };
    let references = keys
        .into_iter()
        .flat_map(|keys| keys.references.iter().cloned());
    let how_to_improve = format!(
        "{} should make sure no third party can reassemble the user's keys on its own.",
        ctx.wallet_name
    );

    if let Some(keys) = keys {
        if keys.key_generation == KeyGeneration::OffUserDevice {
            return Value::new(
                "key_off_device",
                Rating::Fail,
                "Keys generated off device",
                format!(
                    "{} generates private keys outside the user's device, so whoever generated them can use them.",
                    ctx.wallet_name
                ),
            )
            .with_how_to_improve(how_to_improve)
            .with_references(references);
        }
        if keys.key_reconstruction == KeyReconstruction::MultipartyWithoutUserDevice {
            return Value::new(
                "multiparty_reconstructed_without_user_device",
                Rating::Fail,
                "Keys reassembled without the user",
                format!(
                    "{} lets the key shares be reassembled without the user's device taking part.",
                    ctx.wallet_name
                ),
            )
            .with_how_to_improve(how_to_improve)
            .with_references(references);
        }
    }

    let Some(policy) = policy else {
        return Value::new(
            "pass_no_guardian_recovery",
            Rating::Pass,
            "Unruggable account",
            format!(
                "Only the user holds the keys to their {} account.",
                ctx.wallet_name
            ),
        )
        .with_references(references);
    };

    let takeovers = guardians::outcomes(policy)
        .into_iter()
        .filter(|outcome| outcome.taken_over)
        .map(|outcome| outcome.scenario.description())
        .collect::<Vec<_>>();
    let value = match takeovers.as_slice() {
        [] => Value::new(
            "guardian_policy_unruggable",
            Rating::Pass,
            "Unruggable account",
            format!(
                "No guardian of a {} account can take it over on its own.",
                ctx.wallet_name
            ),
        ),
        [scenario] => Value::new(
            "guardian_policy_ruggable_specific_scenario",
            Rating::Fail,
            "Ruggable account",
            format!("{scenario}: the account can then be taken over."),
        )
        .with_how_to_improve(how_to_improve),
        many => Value::new(
            "guardian_policy_ruggable_multiple_scenarios",
            Rating::Fail,
            "Ruggable account",
            format!(
                "A {} account can be taken over in {} scenarios: {}.",
                ctx.wallet_name,
                many.len(),
                many.join("; ")
            ),
        )
        .with_how_to_improve(how_to_improve),
    };
    value.with_references(references)
}
