//! Maintainer-authored feature records describing how a wallet implements
//! each tracked capability, and their per-variant resolution.

pub mod ecosystem;
pub mod privacy;
pub mod security;
pub mod self_sovereignty;
pub mod transparency;

pub use ecosystem::{
    AccountSupport, AddressResolution, AppConnectionSupport, BrowserIntegration,
    EcosystemFeatures, SoftwareWalletIntegration, TransactionBatching, VendorApp,
};
pub use privacy::{
    AppIsolation, DappIsolation, DataCollection, DataCollector, ExposedAccountsBehavior,
    LeakedInfo, MultiAddressHandling, PrivacyFeatures, PrivateTransferTechnology,
    TransactionPrivacy,
};
pub use security::{
    AccountRecovery, AppSigning, BugBountyAvailability, BugBountyProgram, CalldataDecoding,
    CalldataDisplay, CoverageBreadth, DataDecoded, DataExtraction, DetailDisplay, Guardian,
    GuardianPolicy, HardwareLegibility, HardwareMessageSigning, HardwareWalletConnection,
    HardwareWalletManufacturer, HardwareWalletSupport, KeyGeneration, KeyReconstruction,
    KeysHandling, LegalProtection, LightClient, MessageSigning, SecretReconstitution,
    SecurityAudit, SecurityFeatures, SoftwareLegibility, TransactionDetailsDisplay,
    TransactionLegibility,
};
pub use self_sovereignty::{
    AccountPortability, ChainConfigurability, Interoperability, InteroperabilityCheck,
    RpcEndpointConfiguration, SelfSovereigntyFeatures, SingleChainConfigurability,
    TransactionSubmission,
};
pub use transparency::{
    FeeDisplayLevel, License, LicenseFreedom, Licensing, Monetization, MonetizationStrategy,
    OperationFees, TransparencyFeatures,
};

use crate::variants::{Variant, WalletType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Research state of a single feature field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature<T> {
    /// Not researched yet.
    Unrated,
    /// The capability does not apply to this wallet (or variant).
    NotApplicable,
    NotSupported,
    Supported(T),
}

impl<T> Default for Feature<T> {
    fn default() -> Self {
        Self::Unrated
    }
}

impl<T> Feature<T> {
    pub fn as_ref(&self) -> Feature<&T> {
        match self {
            Feature::Unrated => Feature::Unrated,
            Feature::NotApplicable => Feature::NotApplicable,
            Feature::NotSupported => Feature::NotSupported,
            Feature::Supported(value) => Feature::Supported(value),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Feature::Supported(_))
    }

    pub fn is_unrated(&self) -> bool {
        matches!(self, Feature::Unrated)
    }

    pub fn supported(&self) -> Option<&T> {
        match self {
            Feature::Supported(value) => Some(value),
            _ => None,
        }
    }
}

/// A feature either shared by every variant or spelled out per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFeature<T> {
    All(Feature<T>),
    PerVariant(BTreeMap<Variant, Feature<T>>),
}

impl<T> Default for VariantFeature<T> {
    fn default() -> Self {
        Self::All(Feature::Unrated)
    }
}

impl<T> VariantFeature<T> {
    pub fn all(feature: Feature<T>) -> Self {
        Self::All(feature)
    }

    pub fn supported(value: T) -> Self {
        Self::All(Feature::Supported(value))
    }

    /// Resolves the feature for one variant. Variants missing from a
    /// per-variant map resolve to `Unrated`.
    pub fn resolve(&self, variant: Variant) -> Feature<&T> {
        match self {
            VariantFeature::All(feature) => feature.as_ref(),
            VariantFeature::PerVariant(map) => map
                .get(&variant)
                .map(Feature::as_ref)
                .unwrap_or(Feature::Unrated),
        }
    }
}

/// Pointer to a source backing a claim about a wallet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Reference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            explanation: None,
        }
    }
}

/// The full feature record for one wallet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletFeatures {
    pub security: SecurityFeatures,
    pub privacy: PrivacyFeatures,
    pub self_sovereignty: SelfSovereigntyFeatures,
    pub transparency: TransparencyFeatures,
    pub ecosystem: EcosystemFeatures,
}

/// Knobs that influence evaluation but are not part of a wallet record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Reference date for time-sensitive attributes.
    pub as_of: chrono::NaiveDate,
    /// Maximum age of a security audit that still counts as recent.
    pub audit_freshness_days: u32,
}

impl RatingSettings {
    pub const DEFAULT_AUDIT_FRESHNESS_DAYS: u32 = 365;

    pub fn new(as_of: chrono::NaiveDate) -> Self {
        Self {
            as_of,
            audit_freshness_days: Self::DEFAULT_AUDIT_FRESHNESS_DAYS,
        }
    }
}

/// Per-variant view handed to attribute evaluation functions.
#[derive(Debug, Clone, Copy)]
pub struct VariantContext<'a> {
    pub variant: Variant,
    pub wallet_type: WalletType,
    pub wallet_name: &'a str,
    pub features: &'a WalletFeatures,
    pub settings: &'a RatingSettings,
}

impl<'a> VariantContext<'a> {
    pub fn new(
        variant: Variant,
        wallet_name: &'a str,
        features: &'a WalletFeatures,
        settings: &'a RatingSettings,
    ) -> Self {
        Self {
            variant,
            wallet_type: variant.wallet_type(),
            wallet_name,
            features,
            settings,
        }
    }

    pub fn resolve<T>(&self, feature: &'a VariantFeature<T>) -> Feature<&'a T> {
        feature.resolve(self.variant)
    }

    /// Audits whose scope covers this variant. `Unrated` if audits were
    /// never researched.
    pub fn security_audits(&self) -> Feature<Vec<&'a SecurityAudit>> {
        match &self.features.security.public_security_audits {
            Feature::Unrated => Feature::Unrated,
            Feature::NotApplicable => Feature::NotApplicable,
            Feature::NotSupported => Feature::NotSupported,
            Feature::Supported(audits) => Feature::Supported(
                audits
                    .iter()
                    .filter(|audit| audit.covers(self.variant))
                    .collect(),
            ),
        }
    }
}
