use super::common::{exempt, rating_from_count, require};
use super::security::MULTI_VENDOR_MANUFACTURERS;
use super::{Attribute, AttributeId, Rating, Reconciliation, Value};
use crate::features::{Feature, TransactionBatching, VariantContext, VendorApp};
use crate::variants::{BROWSER_VARIANTS, HARDWARE_VARIANTS, SOFTWARE_AND_EMBEDDED_VARIANTS};

pub(super) static ADDRESS_RESOLUTION: Attribute = Attribute {
    id: AttributeId::AddressResolution,
    display_name: "Address resolution",
    question: "Can the user send funds to human-readable names?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AnyVariantSuffices,
    evaluate: evaluate_address_resolution,
};

pub(super) static BROWSER_INTEGRATION: Attribute = Attribute {
    id: AttributeId::BrowserIntegration,
    display_name: "Browser integration",
    question: "Does the browser extension implement the standard provider interfaces?",
    applies_to: BROWSER_VARIANTS,
    reconciliation: Reconciliation::NotApplicableIfNoVariantMatches,
    evaluate: evaluate_browser_integration,
};

pub(super) static ACCOUNT_ABSTRACTION: Attribute = Attribute {
    id: AttributeId::AccountAbstraction,
    display_name: "Account abstraction",
    question: "Does the wallet support smart contract accounts?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AnyVariantSuffices,
    evaluate: evaluate_account_abstraction,
};

pub(super) static TRANSACTION_BATCHING: Attribute = Attribute {
    id: AttributeId::TransactionBatching,
    display_name: "Transaction batching",
    question: "Can the wallet submit several calls as one transaction?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AnyVariantSuffices,
    evaluate: evaluate_transaction_batching,
};

pub(super) static HW_APP_CONNECTION_SUPPORT: Attribute = Attribute {
    id: AttributeId::HwAppConnectionSupport,
    display_name: "App connection support",
    question: "Can the hardware wallet connect to apps through verifiable software?",
    applies_to: HARDWARE_VARIANTS,
    reconciliation: Reconciliation::NotApplicableIfNoVariantMatches,
    evaluate: evaluate_hw_app_connection_support,
};

pub(super) static HARDWARE_WALLET_INTEROPERABILITY: Attribute = Attribute {
    id: AttributeId::HardwareWalletInteroperability,
    display_name: "Hardware wallet interoperability",
    question: "Does the wallet work with hardware wallets from several major manufacturers?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_hardware_wallet_interoperability,
};

fn evaluate_address_resolution(ctx: &VariantContext<'_>) -> Value {
    let raw_addresses = || {
        Value::new(
            "no_address_resolution",
            Rating::Fail,
            "Raw addresses only",
            format!(
                "{} requires recipients to be entered as raw hex addresses.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should resolve ENS names and chain-specific addresses.",
            ctx.wallet_name
        ))
    };

    let resolution = match require(
        &ADDRESS_RESOLUTION,
        ctx,
        ctx.resolve(&ctx.features.ecosystem.address_resolution),
        raw_addresses,
    ) {
        Ok(resolution) => resolution,
        Err(value) => return value,
    };
    let references = resolution.references.iter().cloned();

    match (resolution.ens, resolution.chain_specific) {
        (true, true) => Value::new(
            "ens_and_chain_specific",
            Rating::Pass,
            "Resolves names across chains",
            format!(
                "{} resolves ENS names and chain-specific addresses.",
                ctx.wallet_name
            ),
        )
        .with_references(references),
        (false, false) => raw_addresses().with_references(references),
        (ens, _) => Value::new(
            "partial_address_resolution",
            Rating::Partial,
            "Partial name resolution",
            format!(
                "{} resolves {} only.",
                ctx.wallet_name,
                if ens {
                    "ENS names"
                } else {
                    "chain-specific addresses"
                }
            ),
        )
        .with_how_to_improve(format!(
            "{} should support both ENS names and chain-specific addresses.",
            ctx.wallet_name
        ))
        .with_references(references),
    }
}

fn evaluate_browser_integration(ctx: &VariantContext<'_>) -> Value {
    let no_provider = || {
        Value::new(
            "no_provider_standards",
            Rating::Fail,
            "No standard provider",
            format!(
                "{} does not implement the standard browser provider interfaces.",
                ctx.wallet_name
            ),
        )
    };

    let integration = match require(
        &BROWSER_INTEGRATION,
        ctx,
        ctx.resolve(&ctx.features.ecosystem.browser_integration),
        no_provider,
    ) {
        Ok(integration) => integration,
        Err(value) => return value,
    };

    let standards = integration.standards();
    let supported = standards
        .iter()
        .filter(|(_, supported)| *supported)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    let missing = standards
        .iter()
        .filter(|(_, supported)| !*supported)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    let references = integration.references.iter().cloned();

    match rating_from_count(supported.len(), standards.len()) {
        Rating::Pass => Value::new(
            "all_provider_standards",
            Rating::Pass,
            "Standard provider",
            format!("{} implements {}.", ctx.wallet_name, supported.join(", ")),
        )
        .with_references(references),
        Rating::Partial => Value::new(
            "some_provider_standards",
            Rating::Partial,
            "Partial provider standards",
            format!(
                "{} implements {} but not {}.",
                ctx.wallet_name,
                supported.join(", "),
                missing.join(", ")
            ),
        )
        .with_how_to_improve(format!(
            "{} should implement {}.",
            ctx.wallet_name,
            missing.join(", ")
        ))
        .with_references(references),
        _ => no_provider().with_references(references),
    }
}

fn evaluate_account_abstraction(ctx: &VariantContext<'_>) -> Value {
    let eoa_only = || {
        Value::new(
            "eoa_only",
            Rating::Fail,
            "EOA only",
            format!("{} only supports externally owned accounts.", ctx.wallet_name),
        )
        .with_how_to_improve(format!(
            "{} should support ERC-4337 or EIP-7702 smart accounts.",
            ctx.wallet_name
        ))
    };

    let accounts = match require(
        &ACCOUNT_ABSTRACTION,
        ctx,
        ctx.resolve(&ctx.features.ecosystem.account_support),
        eoa_only,
    ) {
        Ok(accounts) => accounts,
        Err(value) => return value,
    };

    if !accounts.smart_accounts() {
        return eoa_only().with_references(accounts.references.iter().cloned());
    }

    let standards = [("ERC-4337", accounts.erc4337), ("EIP-7702", accounts.eip7702)]
        .into_iter()
        .filter(|(_, supported)| *supported)
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" and ");
    Value::new(
        "smart_accounts",
        Rating::Pass,
        "Smart accounts",
        format!("{} supports {standards} accounts.", ctx.wallet_name),
    )
    .with_references(accounts.references.iter().cloned())
}

fn evaluate_transaction_batching(ctx: &VariantContext<'_>) -> Value {
    let no_batching = || {
        Value::new(
            "no_batching",
            Rating::Fail,
            "No batching",
            format!(
                "{} submits every call as its own transaction.",
                ctx.wallet_name
            ),
        )
    };

    match require(
        &TRANSACTION_BATCHING,
        ctx,
        ctx.resolve(&ctx.features.ecosystem.transaction_batching),
        no_batching,
    ) {
        Ok(TransactionBatching::Atomic) => Value::new(
            "atomic_batching",
            Rating::Pass,
            "Atomic batching",
            format!("{} batches calls atomically.", ctx.wallet_name),
        ),
        Ok(TransactionBatching::NonAtomic) => Value::new(
            "non_atomic_batching",
            Rating::Partial,
            "Non-atomic batching",
            format!(
                "{} batches calls, but they may land independently.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should make batches atomic.",
            ctx.wallet_name
        )),
        Err(value) => value,
    }
}

fn evaluate_hw_app_connection_support(ctx: &VariantContext<'_>) -> Value {
    if let Feature::Supported(accounts) = ctx.resolve(&ctx.features.ecosystem.account_support) {
        if accounts.only_erc4337() {
            return exempt(
                &HW_APP_CONNECTION_SUPPORT,
                format!(
                    "{} signs ERC-4337 user operations only and connects through its smart account.",
                    ctx.wallet_name
                ),
            );
        }
    }

    let unconnected = || {
        Value::new(
            "no_app_connection",
            Rating::Fail,
            "No app connection",
            format!("{} cannot connect to apps.", ctx.wallet_name),
        )
        .with_how_to_improve(format!(
            "{} should work with open-source software wallets such as MetaMask or Rabby.",
            ctx.wallet_name
        ))
    };
    let support = match require(
        &HW_APP_CONNECTION_SUPPORT,
        ctx,
        ctx.resolve(&ctx.features.ecosystem.app_connection_support),
        unconnected,
    ) {
        Ok(support) => support,
        Err(value) => return value,
    };
    let references = support.references.iter().cloned();

    if !support.software_wallets.is_empty() {
        let wallets = support
            .software_wallets
            .iter()
            .map(|wallet| wallet.label())
            .collect::<Vec<_>>()
            .join(", ");
        return Value::new(
            "verifiable_universal_app_connection",
            Rating::Pass,
            "Connects through software wallets",
            format!("{} connects to apps through {wallets}.", ctx.wallet_name),
        )
        .with_references(references);
    }

    let how_to_improve = format!(
        "{} should also connect through third-party software wallets.",
        ctx.wallet_name
    );
    if support.vendor_apps.contains(&VendorApp::OpenSource) {
        return Value::new(
            "limited_verifiable_app_connection",
            Rating::Partial,
            "Vendor app only",
            format!(
                "{} connects to apps only through its vendor's open-source app.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }
    if support.vendor_apps.contains(&VendorApp::ClosedSource) {
        return Value::new(
            "unverifiable_app_connection",
            Rating::Partial,
            "Closed vendor app only",
            format!(
                "{} connects to apps only through its vendor's closed-source app.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }
    unconnected().with_references(references)
}

fn evaluate_hardware_wallet_interoperability(ctx: &VariantContext<'_>) -> Value {
    let no_hardware = || {
        exempt(
            &HARDWARE_WALLET_INTEROPERABILITY,
            format!(
                "{} does not connect to any major hardware wallet directly.",
                ctx.wallet_name
            ),
        )
    };
    let support = match require(
        &HARDWARE_WALLET_INTEROPERABILITY,
        ctx,
        ctx.resolve(&ctx.features.security.hardware_wallet_support),
        no_hardware,
    ) {
        Ok(support) => support,
        Err(value) => return value,
    };
    let major = support
        .direct_manufacturers()
        .into_iter()
        .filter(|manufacturer| manufacturer.is_major())
        .collect::<Vec<_>>();
    let names = major
        .iter()
        .map(|manufacturer| manufacturer.label())
        .collect::<Vec<_>>()
        .join(", ");
    let references = support.references.iter().cloned();
    let how_to_improve = format!(
        "{} should support at least {MULTI_VENDOR_MANUFACTURERS} major hardware wallet manufacturers.",
        ctx.wallet_name
    );

    match major.len() {
        0 => no_hardware(),
        1 => Value::new(
            "single_hardware_wallet_support",
            Rating::Fail,
            "Single hardware vendor",
            format!("{} only works with {names} hardware wallets.", ctx.wallet_name),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references),
        count if count < MULTI_VENDOR_MANUFACTURERS => Value::new(
            "insufficient_hardware_wallet_interoperability",
            Rating::Partial,
            "Few hardware vendors",
            format!("{} works with {names} hardware wallets.", ctx.wallet_name),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references),
        _ => Value::new(
            "comprehensive_hardware_wallet_interoperability",
            Rating::Pass,
            "Many hardware vendors",
            format!("{} works with {names} hardware wallets.", ctx.wallet_name),
        )
        .with_references(references),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        AccountSupport, AddressResolution, AppConnectionSupport, BrowserIntegration,
        HardwareWalletConnection, HardwareWalletManufacturer, HardwareWalletSupport,
        RatingSettings, SoftwareWalletIntegration, VariantFeature, WalletFeatures,
    };
    use crate::variants::Variant;
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, BTreeSet};

    fn rate(features: &WalletFeatures, attribute: &Attribute) -> Value {
        rate_variant(features, attribute, Variant::Browser)
    }

    fn rate_variant(features: &WalletFeatures, attribute: &Attribute, variant: Variant) -> Value {
        let settings =
            RatingSettings::new(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"));
        let ctx = VariantContext::new(variant, "Sample", features, &settings);
        (attribute.evaluate)(&ctx)
    }

    #[test]
    fn browser_integration_counts_standards() {
        let mut features = WalletFeatures::default();
        features.ecosystem.browser_integration = VariantFeature::supported(BrowserIntegration {
            eip1193: true,
            eip2700: true,
            eip6963: false,
            references: Vec::new(),
        });
        let value = rate(&features, &BROWSER_INTEGRATION);
        assert_eq!(value.rating, Rating::Partial);
        assert!(value.details.contains("EIP-6963"));
    }

    #[test]
    fn address_resolution_prefers_both_schemes() {
        let mut features = WalletFeatures::default();
        features.ecosystem.address_resolution = VariantFeature::supported(AddressResolution {
            ens: true,
            chain_specific: false,
            references: Vec::new(),
        });
        assert_eq!(rate(&features, &ADDRESS_RESOLUTION).rating, Rating::Partial);
    }

    #[test]
    fn account_abstraction_requires_smart_accounts() {
        let mut features = WalletFeatures::default();
        features.ecosystem.account_support = VariantFeature::supported(AccountSupport {
            eoa: true,
            ..AccountSupport::default()
        });
        assert_eq!(rate(&features, &ACCOUNT_ABSTRACTION).rating, Rating::Fail);

        features.ecosystem.account_support = VariantFeature::supported(AccountSupport {
            eip7702: true,
            ..AccountSupport::default()
        });
        assert_eq!(rate(&features, &ACCOUNT_ABSTRACTION).rating, Rating::Pass);

        features.ecosystem.transaction_batching = VariantFeature::all(Feature::NotSupported);
        assert_eq!(rate(&features, &TRANSACTION_BATCHING).rating, Rating::Fail);
    }

    #[test]
    fn app_connection_prefers_third_party_software_wallets() {
        let mut features = WalletFeatures::default();
        let connection = AppConnectionSupport {
            vendor_apps: BTreeSet::from([VendorApp::ClosedSource]),
            software_wallets: BTreeSet::from([SoftwareWalletIntegration::Rabby]),
            references: Vec::new(),
        };
        features.ecosystem.app_connection_support = VariantFeature::supported(connection.clone());
        let value = rate_variant(&features, &HW_APP_CONNECTION_SUPPORT, Variant::Hardware);
        assert_eq!(value.rating, Rating::Pass);
        assert!(value.details.contains("Rabby"));

        features.ecosystem.app_connection_support =
            VariantFeature::supported(AppConnectionSupport {
                software_wallets: BTreeSet::new(),
                ..connection.clone()
            });
        assert_eq!(
            rate_variant(&features, &HW_APP_CONNECTION_SUPPORT, Variant::Hardware).id,
            "unverifiable_app_connection"
        );

        features.ecosystem.app_connection_support =
            VariantFeature::supported(AppConnectionSupport {
                vendor_apps: BTreeSet::from([VendorApp::ClosedSource, VendorApp::OpenSource]),
                software_wallets: BTreeSet::new(),
                ..connection
            });
        assert_eq!(
            rate_variant(&features, &HW_APP_CONNECTION_SUPPORT, Variant::Hardware).id,
            "limited_verifiable_app_connection"
        );

        features.ecosystem.app_connection_support =
            VariantFeature::supported(AppConnectionSupport::default());
        assert_eq!(
            rate_variant(&features, &HW_APP_CONNECTION_SUPPORT, Variant::Hardware).rating,
            Rating::Fail
        );
    }

    fn hardware_support(
        wallets: &[(HardwareWalletManufacturer, HardwareWalletConnection)],
    ) -> VariantFeature<HardwareWalletSupport> {
        VariantFeature::supported(HardwareWalletSupport {
            wallets: wallets
                .iter()
                .map(|(manufacturer, connection)| (*manufacturer, vec![*connection]))
                .collect::<BTreeMap<_, _>>(),
            references: Vec::new(),
        })
    }

    #[test]
    fn interoperability_counts_major_vendors_reached_directly() {
        use HardwareWalletConnection::{Qr, Usb, WalletConnect};
        use HardwareWalletManufacturer::{GridPlus, KeepKey, Keystone, Ledger, Trezor};

        let mut features = WalletFeatures::default();
        features.security.hardware_wallet_support =
            hardware_support(&[(Ledger, Usb), (KeepKey, Usb)]);
        assert_eq!(
            rate(&features, &HARDWARE_WALLET_INTEROPERABILITY).id,
            "single_hardware_wallet_support"
        );

        features.security.hardware_wallet_support =
            hardware_support(&[(Ledger, Usb), (Trezor, Usb), (Keystone, WalletConnect)]);
        assert_eq!(
            rate(&features, &HARDWARE_WALLET_INTEROPERABILITY).rating,
            Rating::Partial
        );

        features.security.hardware_wallet_support =
            hardware_support(&[(Ledger, Usb), (Trezor, Usb), (Keystone, Qr), (GridPlus, Usb)]);
        assert_eq!(
            rate(&features, &HARDWARE_WALLET_INTEROPERABILITY).id,
            "comprehensive_hardware_wallet_interoperability"
        );

        features.security.hardware_wallet_support = VariantFeature::all(Feature::NotSupported);
        assert_eq!(
            rate(&features, &HARDWARE_WALLET_INTEROPERABILITY).rating,
            Rating::Exempt
        );
    }
}
