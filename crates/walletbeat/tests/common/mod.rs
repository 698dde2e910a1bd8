#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use walletbeat::features::{
    AccountPortability, AccountRecovery, AccountSupport, AddressResolution,
    AppConnectionSupport, AppIsolation, AppSigning, BrowserIntegration, BugBountyAvailability,
    BugBountyProgram, CalldataDecoding, CalldataDisplay, ChainConfigurability, CoverageBreadth,
    DappIsolation, DataCollection, DataDecoded, DataExtraction, ExposedAccountsBehavior, Feature,
    FeeDisplayLevel, Guardian, GuardianPolicy, HardwareLegibility, HardwareMessageSigning,
    HardwareWalletConnection, HardwareWalletManufacturer, HardwareWalletSupport, Interoperability,
    InteroperabilityCheck, KeyGeneration, KeyReconstruction, KeysHandling, LegalProtection,
    License, Licensing, LightClient, MessageSigning, Monetization, MonetizationStrategy,
    MultiAddressHandling, OperationFees, PrivateTransferTechnology, RpcEndpointConfiguration,
    SecurityAudit, SingleChainConfigurability, SoftwareLegibility, SoftwareWalletIntegration,
    TransactionBatching, TransactionDetailsDisplay, TransactionLegibility, TransactionPrivacy,
    TransactionSubmission, VariantFeature, WalletFeatures,
};
use walletbeat::{BaseWallet, RatingSettings, Variant, VariantSet, WalletMetadata};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn settings() -> RatingSettings {
    RatingSettings::new(date(2025, 1, 1))
}

pub fn wallet(id: &str, variants: &[Variant], features: WalletFeatures) -> BaseWallet {
    BaseWallet {
        metadata: WalletMetadata::new(id, id.to_uppercase()),
        variants: VariantSet::new(variants.iter().copied()).expect("non-empty variants"),
        features,
    }
}

fn fresh_audit() -> SecurityAudit {
    SecurityAudit {
        auditor: "Least Authority".to_string(),
        date: date(2024, 6, 1),
        variants: None,
        unaddressed_flaws: Vec::new(),
        report: None,
    }
}

fn comprehensive_bug_bounty() -> BugBountyProgram {
    BugBountyProgram {
        availability: BugBountyAvailability::Active,
        coverage_breadth: CoverageBreadth::Full,
        minimum_reward: Some(1_000),
        maximum_reward: Some(250_000),
        legal_protection: LegalProtection::SafeHarbor,
        url: Some("https://bounty.example.org".to_string()),
        references: Vec::new(),
    }
}

fn open_chain(configuration: RpcEndpointConfiguration) -> Feature<SingleChainConfigurability> {
    Feature::Supported(SingleChainConfigurability {
        rpc_endpoint_configuration: configuration,
        basic_operations_with_endpoint_only: true,
    })
}

fn transparent_funding() -> Monetization {
    Monetization {
        strategies: BTreeMap::from([
            (MonetizationStrategy::Donations, true),
            (MonetizationStrategy::EcosystemGrants, true),
        ]),
        revenue_breakdown_public: true,
        references: Vec::new(),
    }
}

/// Passkey, password and email account; any two restore the account.
fn two_of_three_recovery() -> AccountRecovery {
    AccountRecovery {
        guardian_policy: Some(GuardianPolicy {
            optional_guardians: vec![
                Guardian::Passkey,
                Guardian::WalletPassword,
                Guardian::UserExternalAccount {
                    entity: "Mailbox".to_string(),
                    description: "email account".to_string(),
                },
            ],
            optional_guardians_minimum_configurable: 3,
            optional_guardians_needed_for_recovery: 2,
            ..GuardianPolicy::default()
        }),
        references: Vec::new(),
    }
}

fn verifiable_extraction() -> DataExtraction {
    DataExtraction {
        eyes: true,
        qr_code: true,
        hashes: true,
    }
}

/// Software wallet meeting every criterion of every software stage.
pub fn exemplary_software_features() -> WalletFeatures {
    let mut features = WalletFeatures::default();

    features.security.public_security_audits = Feature::Supported(vec![fresh_audit()]);
    features.security.hardware_wallet_support = VariantFeature::supported(HardwareWalletSupport {
        wallets: BTreeMap::from([
            (
                HardwareWalletManufacturer::Ledger,
                vec![HardwareWalletConnection::WebHid],
            ),
            (
                HardwareWalletManufacturer::Trezor,
                vec![HardwareWalletConnection::WebUsb],
            ),
            (
                HardwareWalletManufacturer::Keystone,
                vec![HardwareWalletConnection::Qr],
            ),
        ]),
        references: Vec::new(),
    });
    features.security.chain_verification = VariantFeature::supported(LightClient::Helios);
    features.security.bug_bounty_program = VariantFeature::supported(comprehensive_bug_bounty());
    features.security.account_recovery = VariantFeature::supported(two_of_three_recovery());
    features.security.keys_handling = VariantFeature::supported(KeysHandling {
        key_generation: KeyGeneration::OnUserDevice,
        key_reconstruction: KeyReconstruction::NonMultiparty,
        references: Vec::new(),
    });
    features.security.transaction_legibility =
        VariantFeature::supported(TransactionLegibility::Software(SoftwareLegibility {
            calldata_display: CalldataDisplay {
                raw_hex: true,
                copy_hex_to_clipboard: true,
                formatted: true,
            },
            transaction_details: TransactionDetailsDisplay::FULL,
            message_signing: Some(MessageSigning {
                eip712_struct: true,
                ..MessageSigning::default()
            }),
            references: Vec::new(),
        }));

    features.privacy.data_collection = VariantFeature::supported(DataCollection::default());
    features.privacy.multi_address =
        VariantFeature::supported(MultiAddressHandling::ActiveAddressOnly);
    features.privacy.transaction_privacy = VariantFeature::supported(TransactionPrivacy {
        technologies: vec![PrivateTransferTechnology::StealthAddresses],
        private_by_default: true,
        references: Vec::new(),
    });
    features.privacy.dapp_isolation = VariantFeature::supported(DappIsolation {
        default_behavior: ExposedAccountsBehavior::DappSpecificAccount,
        user_customizable: true,
        create_in_connection_flow: true,
        reuse_last_connected_addresses: true,
        references: Vec::new(),
    });
    features.privacy.app_isolation = VariantFeature::supported(AppIsolation {
        eth_accounts: Feature::Supported(ExposedAccountsBehavior::DappSpecificAccount),
        erc7846_wallet_connect: Feature::NotSupported,
        create_in_connection_flow: true,
        reuse_last_connected_addresses: true,
        references: Vec::new(),
    });

    features.self_sovereignty.account_portability = VariantFeature::supported(AccountPortability {
        seed_phrase_export: true,
        private_key_export: true,
        references: Vec::new(),
    });
    features.self_sovereignty.chain_configurability =
        VariantFeature::supported(ChainConfigurability {
            l1: open_chain(RpcEndpointConfiguration::YesBeforeAnySensitiveRequest),
            non_l1: open_chain(RpcEndpointConfiguration::YesBeforeAnySensitiveRequest),
            custom_chain_rpc_endpoint: Feature::Supported(()),
            references: Vec::new(),
        });
    features.self_sovereignty.transaction_submission =
        VariantFeature::supported(TransactionSubmission {
            self_broadcast: true,
            l2_forced_inclusion: true,
            references: Vec::new(),
        });

    features.transparency.licensing = Feature::Supported(Licensing::SingleRepo {
        license: License::Gpl3,
        references: Vec::new(),
    });
    features.transparency.monetization = Feature::Supported(transparent_funding());
    features.transparency.operation_fees = VariantFeature::supported(OperationFees {
        by_default: FeeDisplayLevel::Comprehensive,
        after_single_action: FeeDisplayLevel::Comprehensive,
        fully_sponsored: false,
        references: Vec::new(),
    });

    features.ecosystem.address_resolution = VariantFeature::supported(AddressResolution {
        ens: true,
        chain_specific: true,
        references: Vec::new(),
    });
    features.ecosystem.browser_integration = VariantFeature::supported(BrowserIntegration {
        eip1193: true,
        eip2700: true,
        eip6963: true,
        references: Vec::new(),
    });
    features.ecosystem.account_support = VariantFeature::supported(AccountSupport {
        eoa: true,
        erc4337: true,
        ..AccountSupport::default()
    });
    features.ecosystem.transaction_batching =
        VariantFeature::supported(TransactionBatching::Atomic);

    features
}

/// Hardware wallet meeting every criterion of every hardware stage.
pub fn exemplary_hardware_features() -> WalletFeatures {
    let mut features = WalletFeatures::default();
    features.security.public_security_audits = Feature::Supported(vec![fresh_audit()]);
    features.security.bug_bounty_program = VariantFeature::supported(comprehensive_bug_bounty());
    features.security.transaction_legibility =
        VariantFeature::supported(TransactionLegibility::Hardware(HardwareLegibility {
            calldata_decoding: BTreeMap::from([
                (CalldataDecoding::EthUsdcTransfer, DataDecoded::OnDevice),
                (CalldataDecoding::SafeAaveSupplyNested, DataDecoded::OnDevice),
            ]),
            transaction_details: TransactionDetailsDisplay::FULL,
            data_extraction: verifiable_extraction(),
            message_signing: Some(HardwareMessageSigning {
                decoded: DataDecoded::OnDevice,
                provides: MessageSigning {
                    eip712_struct: true,
                    ..MessageSigning::default()
                },
            }),
            references: Vec::new(),
        }));
    features.security.hardware_wallet_app_signing = VariantFeature::supported(AppSigning {
        message_extraction: verifiable_extraction(),
        message_decoding: BTreeSet::from([CalldataDecoding::SafeAaveSupplyNested]),
        calldata_extraction: verifiable_extraction(),
        calldata_decoding: BTreeSet::from([
            CalldataDecoding::EthUsdcTransfer,
            CalldataDecoding::SafeAaveApproveSupplyBatchMultisend,
        ]),
        transaction_details: TransactionDetailsDisplay::FULL,
        references: Vec::new(),
    });
    features.ecosystem.app_connection_support = VariantFeature::supported(AppConnectionSupport {
        vendor_apps: BTreeSet::new(),
        software_wallets: BTreeSet::from([
            SoftwareWalletIntegration::Metamask,
            SoftwareWalletIntegration::Rabby,
        ]),
        references: Vec::new(),
    });
    features.self_sovereignty.account_portability = VariantFeature::supported(AccountPortability {
        seed_phrase_export: true,
        private_key_export: false,
        references: Vec::new(),
    });
    features.self_sovereignty.interoperability = VariantFeature::supported(Interoperability {
        interoperability: InteroperabilityCheck::Pass,
        no_supplier_linkage: InteroperabilityCheck::Pass,
        references: Vec::new(),
    });
    features.transparency.licensing = Feature::Supported(Licensing::SingleRepo {
        license: License::Apache2,
        references: Vec::new(),
    });
    features.transparency.monetization = Feature::Supported(transparent_funding());
    features
}
