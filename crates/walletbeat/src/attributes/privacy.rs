use super::common::{exempt, require, unrated};
use super::{Attribute, AttributeId, Rating, Reconciliation, Value};
use crate::features::{
    ExposedAccountsBehavior, Feature, LeakedInfo, MultiAddressHandling, VariantContext,
};
use crate::variants::{ALL_VARIANTS, SOFTWARE_VARIANTS};

pub(super) static ADDRESS_CORRELATION: Attribute = Attribute {
    id: AttributeId::AddressCorrelation,
    display_name: "Wallet address privacy",
    question: "Can the wallet address be linked to the user's identity?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_address_correlation,
};

pub(super) static MULTI_ADDRESS_CORRELATION: Attribute = Attribute {
    id: AttributeId::MultiAddressCorrelation,
    display_name: "Multi-address privacy",
    question: "Can the user's addresses be linked to one another?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_multi_address_correlation,
};

pub(super) static PRIVATE_TRANSFERS: Attribute = Attribute {
    id: AttributeId::PrivateTransfers,
    display_name: "Private transfers",
    question: "Can the user send funds without revealing sender, recipient and amount onchain?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_private_transfers,
};

pub(super) static APP_ISOLATION: Attribute = Attribute {
    id: AttributeId::AppIsolation,
    display_name: "App isolation",
    question: "Do connected apps each see their own account by default?",
    applies_to: SOFTWARE_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_app_isolation,
};

pub(super) static DAPP_ISOLATION: Attribute = Attribute {
    id: AttributeId::DappIsolation,
    display_name: "dApp isolation",
    question: "Does the wallet keep dApps from correlating the user's accounts?",
    applies_to: SOFTWARE_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_dapp_isolation,
};

fn evaluate_address_correlation(ctx: &VariantContext<'_>) -> Value {
    let private = || {
        Value::new(
            "no_address_linkage",
            Rating::Pass,
            "Address not linked to identity",
            format!(
                "{} does not share the wallet address with third parties alongside identifying information.",
                ctx.wallet_name
            ),
        )
    };

    let collection = match require(
        &ADDRESS_CORRELATION,
        ctx,
        ctx.resolve(&ctx.features.privacy.data_collection),
        private,
    ) {
        Ok(collection) => collection,
        Err(value) => return value,
    };

    let leaked = collection.leaked();
    if leaked.is_empty() {
        return private().with_references(collection.references.iter().cloned());
    }

    let labels = leaked
        .iter()
        .map(|info| info.label())
        .collect::<Vec<_>>()
        .join(", ");
    let identifying = leaked.iter().copied().any(LeakedInfo::is_identifying);
    let value = if identifying {
        Value::new(
            "address_linked_to_identity",
            Rating::Fail,
            "Address linked to identity",
            format!(
                "{} lets third parties link the wallet address to the user's {labels}.",
                ctx.wallet_name
            ),
        )
    } else {
        Value::new(
            "address_linked_to_pseudonym",
            Rating::Partial,
            "Address linked to pseudonymous data",
            format!(
                "{} lets third parties link the wallet address to the user's {labels}.",
                ctx.wallet_name
            ),
        )
    };

    value
        .with_how_to_improve(format!(
            "{} should stop sending the wallet address together with user data.",
            ctx.wallet_name
        ))
        .with_references(collection.references.iter().cloned())
}

fn evaluate_multi_address_correlation(ctx: &VariantContext<'_>) -> Value {
    let single_address = || {
        exempt(
            &MULTI_ADDRESS_CORRELATION,
            format!("{} only handles a single address.", ctx.wallet_name),
        )
    };

    let handling = match ctx.resolve(&ctx.features.privacy.multi_address) {
        Feature::Unrated => return unrated(&MULTI_ADDRESS_CORRELATION, ctx.wallet_name),
        Feature::NotApplicable | Feature::NotSupported => return single_address(),
        Feature::Supported(handling) => *handling,
    };

    match handling {
        MultiAddressHandling::ActiveAddressOnly => Value::new(
            "active_address_only",
            Rating::Pass,
            "Active address only",
            format!(
                "{} only fetches data for the active address.",
                ctx.wallet_name
            ),
        ),
        MultiAddressHandling::SeparateRequestPerAddress {
            separate_circuits: true,
        } => Value::new(
            "isolated_requests",
            Rating::Pass,
            "Isolated per-address requests",
            format!(
                "{} queries each address in its own request over a separate circuit.",
                ctx.wallet_name
            ),
        ),
        MultiAddressHandling::SeparateRequestPerAddress {
            separate_circuits: false,
        } => Value::new(
            "separate_requests_same_origin",
            Rating::Partial,
            "Separate requests from one origin",
            format!(
                "{} queries each address separately, but from the same network origin.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should proxy each address's requests through a distinct circuit.",
            ctx.wallet_name
        )),
        MultiAddressHandling::SingleRequestWithMultipleAddresses => Value::new(
            "single_request_all_addresses",
            Rating::Fail,
            "Addresses bundled together",
            format!(
                "{} sends all addresses in one request, letting the provider link them.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should query addresses separately or only the active one.",
            ctx.wallet_name
        )),
    }
}

fn evaluate_private_transfers(ctx: &VariantContext<'_>) -> Value {
    let no_private_transfers = || {
        Value::new(
            "no_private_transfers",
            Rating::Fail,
            "No private transfers",
            format!(
                "Transfers made with {} are fully visible onchain.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should integrate a privacy-preserving transfer mechanism.",
            ctx.wallet_name
        ))
    };

    let privacy = match require(
        &PRIVATE_TRANSFERS,
        ctx,
        ctx.resolve(&ctx.features.privacy.transaction_privacy),
        no_private_transfers,
    ) {
        Ok(privacy) => privacy,
        Err(value) => return value,
    };

    if privacy.technologies.is_empty() {
        return no_private_transfers();
    }

    let technologies = privacy
        .technologies
        .iter()
        .map(|technology| technology.label())
        .collect::<Vec<_>>()
        .join(", ");
    let references = privacy.references.iter().cloned();

    if privacy.private_by_default {
        Value::new(
            "private_by_default",
            Rating::Pass,
            "Private by default",
            format!(
                "{} makes transfers private by default using {technologies}.",
                ctx.wallet_name
            ),
        )
        .with_references(references)
    } else {
        Value::new(
            "private_opt_in",
            Rating::Partial,
            "Opt-in private transfers",
            format!(
                "{} supports private transfers using {technologies}, but only on request.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should make private transfers the default.",
            ctx.wallet_name
        ))
        .with_references(references)
    }
}

fn evaluate_dapp_isolation(ctx: &VariantContext<'_>) -> Value {
    let isolation = match ctx.resolve(&ctx.features.privacy.dapp_isolation) {
        Feature::Unrated => return unrated(&DAPP_ISOLATION, ctx.wallet_name),
        Feature::NotApplicable => {
            return exempt(
                &DAPP_ISOLATION,
                format!("{} does not support connecting to dApps.", ctx.wallet_name),
            )
        }
        Feature::NotSupported => {
            return Value::new(
                "no_dapp_isolation",
                Rating::Fail,
                "No dApp isolation",
                format!(
                    "{} exposes the same accounts to every dApp.",
                    ctx.wallet_name
                ),
            )
        }
        Feature::Supported(isolation) => isolation,
    };
    let references = isolation.references.iter().cloned();

    if !isolation.create_in_connection_flow {
        return Value::new(
            "no_account_creation_in_connection_flow",
            Rating::Fail,
            "No per-dApp account option",
            format!(
                "{} cannot create a dApp-specific account while connecting to a dApp.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should offer a new dApp-specific account in the connection flow, as the default.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    if !isolation.reuse_last_connected_addresses {
        return Value::new(
            "no_reuse_last_connection_addresses",
            Rating::Fail,
            "No per-dApp account persistence",
            format!(
                "{} does not remember which addresses were last exposed to a dApp.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should reconnect dApps with the addresses the user last selected.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    let value = match isolation.default_behavior {
        ExposedAccountsBehavior::AllAccounts => Value::new(
            "all_accounts_exposed",
            Rating::Fail,
            "All accounts exposed",
            format!(
                "{} exposes every account to connecting dApps by default.",
                ctx.wallet_name
            ),
        ),
        ExposedAccountsBehavior::ActiveAccountOnly => Value::new(
            "active_account_exposed",
            Rating::Fail,
            "Active account exposed",
            format!(
                "{} exposes the active account to every dApp by default.",
                ctx.wallet_name
            ),
        ),
        ExposedAccountsBehavior::NoDefault => Value::new(
            "no_default_accounts",
            Rating::Partial,
            "User picks accounts",
            format!(
                "{} asks which accounts to expose without suggesting an isolated one.",
                ctx.wallet_name
            ),
        ),
        ExposedAccountsBehavior::DappSpecificAccount => Value::new(
            "dapp_specific_account",
            Rating::Pass,
            "Isolated per-dApp accounts",
            format!(
                "{} defaults to a dApp-specific account when connecting.",
                ctx.wallet_name
            ),
        ),
    };

    value.with_references(references)
}

/// Lower is more exposing.
fn exposure_rank(behavior: ExposedAccountsBehavior) -> u8 {
    match behavior {
        ExposedAccountsBehavior::AllAccounts => 0,
        ExposedAccountsBehavior::ActiveAccountOnly => 1,
        ExposedAccountsBehavior::NoDefault => 2,
        ExposedAccountsBehavior::DappSpecificAccount => 3,
    }
}

fn evaluate_app_isolation(ctx: &VariantContext<'_>) -> Value {
    let no_connections = || {
        exempt(
            &APP_ISOLATION,
            format!("{} does not support connecting to apps.", ctx.wallet_name),
        )
    };
    let isolation = match ctx.resolve(&ctx.features.privacy.app_isolation) {
        Feature::Unrated => return unrated(&APP_ISOLATION, ctx.wallet_name),
        Feature::NotApplicable | Feature::NotSupported => return no_connections(),
        Feature::Supported(isolation) => isolation,
    };
    // The most exposing RPC decides.
    let Some(exposure) = isolation
        .exposures()
        .into_iter()
        .min_by_key(|behavior| exposure_rank(*behavior))
    else {
        return no_connections();
    };
    let references = isolation.references.iter().cloned();
    let how_to_improve = format!(
        "{} should default to a new app-specific account when an app connects.",
        ctx.wallet_name
    );

    if !isolation.create_in_connection_flow {
        return Value::new(
            "no_account_creation_in_connection_flow",
            Rating::Fail,
            "No per-app account option",
            format!(
                "{} cannot create an app-specific account while connecting to an app.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }

    if !isolation.reuse_last_connected_addresses {
        return Value::new(
            "no_reuse_last_connection_addresses",
            Rating::Fail,
            "No per-app account persistence",
            format!(
                "{} does not reconnect apps with the addresses they last saw.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }

    let value = match exposure {
        ExposedAccountsBehavior::AllAccounts => Value::new(
            "all_accounts_exposed",
            Rating::Fail,
            "All accounts exposed",
            format!(
                "{} hands every account to a connecting app.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve),
        ExposedAccountsBehavior::ActiveAccountOnly => Value::new(
            "active_account_only",
            Rating::Fail,
            "Active account exposed",
            format!(
                "{} hands the active account to every connecting app.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve),
        ExposedAccountsBehavior::NoDefault => Value::new(
            "no_default_behavior",
            Rating::Partial,
            "User picks accounts",
            format!(
                "{} asks which accounts to share but does not suggest an isolated one.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve),
        ExposedAccountsBehavior::DappSpecificAccount => Value::new(
            "app_specific_account",
            Rating::Pass,
            "Isolated per-app accounts",
            format!(
                "{} gives each connecting app its own account by default.",
                ctx.wallet_name
            ),
        ),
    };
    value.with_references(references)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        AppIsolation, DappIsolation, DataCollection, DataCollector, RatingSettings,
        VariantFeature, WalletFeatures,
    };
    use crate::variants::Variant;
    use chrono::NaiveDate;

    fn rate(features: &WalletFeatures, attribute: &Attribute) -> Value {
        let settings =
            RatingSettings::new(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"));
        let ctx = VariantContext::new(Variant::Browser, "Sample", features, &settings);
        (attribute.evaluate)(&ctx)
    }

    fn collected(leaks: Vec<LeakedInfo>) -> VariantFeature<DataCollection> {
        VariantFeature::supported(DataCollection {
            collectors: vec![DataCollector {
                entity: "Provider".to_string(),
                leaks,
            }],
            references: Vec::new(),
        })
    }

    #[test]
    fn address_correlation_distinguishes_identity_from_pseudonyms() {
        let mut features = WalletFeatures::default();
        features.privacy.data_collection = collected(Vec::new());
        assert_eq!(rate(&features, &ADDRESS_CORRELATION).rating, Rating::Pass);

        features.privacy.data_collection = collected(vec![LeakedInfo::IpAddress]);
        assert_eq!(rate(&features, &ADDRESS_CORRELATION).rating, Rating::Partial);

        features.privacy.data_collection =
            collected(vec![LeakedInfo::IpAddress, LeakedInfo::Email]);
        assert_eq!(rate(&features, &ADDRESS_CORRELATION).rating, Rating::Fail);
    }

    #[test]
    fn single_address_wallets_are_exempt_from_multi_address_correlation() {
        let mut features = WalletFeatures::default();
        features.privacy.multi_address = VariantFeature::all(Feature::NotSupported);
        assert_eq!(
            rate(&features, &MULTI_ADDRESS_CORRELATION).rating,
            Rating::Exempt
        );

        features.privacy.multi_address =
            VariantFeature::supported(MultiAddressHandling::SingleRequestWithMultipleAddresses);
        assert_eq!(
            rate(&features, &MULTI_ADDRESS_CORRELATION).rating,
            Rating::Fail
        );
    }

    #[test]
    fn dapp_isolation_checks_connection_flow_before_default_behavior() {
        let isolated = DappIsolation {
            default_behavior: ExposedAccountsBehavior::DappSpecificAccount,
            user_customizable: true,
            create_in_connection_flow: true,
            reuse_last_connected_addresses: true,
            references: Vec::new(),
        };
        let mut features = WalletFeatures::default();
        features.privacy.dapp_isolation = VariantFeature::supported(isolated.clone());
        assert_eq!(rate(&features, &DAPP_ISOLATION).rating, Rating::Pass);

        features.privacy.dapp_isolation = VariantFeature::supported(DappIsolation {
            create_in_connection_flow: false,
            ..isolated.clone()
        });
        assert_eq!(
            rate(&features, &DAPP_ISOLATION).id,
            "no_account_creation_in_connection_flow"
        );

        features.privacy.dapp_isolation = VariantFeature::supported(DappIsolation {
            default_behavior: ExposedAccountsBehavior::NoDefault,
            ..isolated
        });
        assert_eq!(rate(&features, &DAPP_ISOLATION).rating, Rating::Partial);

        features.privacy.dapp_isolation = VariantFeature::all(Feature::NotApplicable);
        assert_eq!(rate(&features, &DAPP_ISOLATION).rating, Rating::Exempt);
    }

    #[test]
    fn app_isolation_rates_the_most_exposing_rpc() {
        let isolated = AppIsolation {
            eth_accounts: Feature::Supported(ExposedAccountsBehavior::DappSpecificAccount),
            erc7846_wallet_connect: Feature::NotSupported,
            create_in_connection_flow: true,
            reuse_last_connected_addresses: true,
            references: Vec::new(),
        };
        let mut features = WalletFeatures::default();
        features.privacy.app_isolation = VariantFeature::supported(isolated.clone());
        assert_eq!(rate(&features, &APP_ISOLATION).id, "app_specific_account");

        features.privacy.app_isolation = VariantFeature::supported(AppIsolation {
            erc7846_wallet_connect: Feature::Supported(ExposedAccountsBehavior::NoDefault),
            ..isolated.clone()
        });
        let value = rate(&features, &APP_ISOLATION);
        assert_eq!(value.rating, Rating::Partial);
        assert_eq!(value.id, "no_default_behavior");

        features.privacy.app_isolation = VariantFeature::supported(AppIsolation {
            reuse_last_connected_addresses: false,
            ..isolated
        });
        assert_eq!(
            rate(&features, &APP_ISOLATION).id,
            "no_reuse_last_connection_addresses"
        );
    }

    #[test]
    fn app_isolation_without_connection_rpcs_is_exempt() {
        let mut features = WalletFeatures::default();
        assert_eq!(rate(&features, &APP_ISOLATION).rating, Rating::Unrated);

        features.privacy.app_isolation = VariantFeature::supported(AppIsolation::default());
        assert_eq!(rate(&features, &APP_ISOLATION).rating, Rating::Exempt);

        features.privacy.app_isolation = VariantFeature::all(Feature::NotApplicable);
        assert_eq!(rate(&features, &APP_ISOLATION).rating, Rating::Exempt);
    }
}
