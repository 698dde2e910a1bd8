//! Static attribute definitions, their outcome values and the catalog
//! registry keyed by [`AttributeId`].

pub mod common;
mod ecosystem;
mod guardians;
mod privacy;
mod security;
mod self_sovereignty;
mod transparency;
pub mod tree;

pub use common::{exempt, pick_best_rating, pick_worst_rating, unrated};
pub use security::{
    INDIRECT_MULTI_VENDOR_SUPPORT, MULTI_VENDOR_MANUFACTURERS, MULTI_VENDOR_SUPPORT,
};
pub use tree::{AttributeTree, NodeId, NodeKind, TreeBuilder, TreeError, TreeNode};

use crate::features::{Reference, VariantContext};
use crate::variants::Variant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an attribute evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Pass,
    Partial,
    Fail,
    Exempt,
    Unrated,
}

impl Rating {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Pass,
            Self::Partial,
            Self::Fail,
            Self::Exempt,
            Self::Unrated,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Partial => "Partial",
            Self::Fail => "Fail",
            Self::Exempt => "Exempt",
            Self::Unrated => "Unrated",
        }
    }

    pub const fn score(self) -> Option<f64> {
        match self {
            Self::Pass => Some(1.0),
            Self::Partial => Some(0.5),
            Self::Fail => Some(0.0),
            Self::Exempt | Self::Unrated => None,
        }
    }

    /// Rank among rated outcomes; `None` for exempt and unrated.
    pub(crate) const fn rank(self) -> Option<u8> {
        match self {
            Self::Pass => Some(2),
            Self::Partial => Some(1),
            Self::Fail => Some(0),
            Self::Exempt | Self::Unrated => None,
        }
    }

    /// Rating of an aggregate score.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Self::Unrated,
            Some(score) if score >= 1.0 => Self::Pass,
            Some(score) if score <= 0.0 => Self::Fail,
            Some(_) => Self::Partial,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rated outcome of one attribute (or group) for a wallet.
///
/// The score is derived from the rating at construction, so an unrated or
/// exempt value never carries a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub id: String,
    pub rating: Rating,
    score: Option<f64>,
    pub display_name: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_to_improve: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Value {
    pub fn new(
        id: impl Into<String>,
        rating: Rating,
        display_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            rating,
            score: rating.score(),
            display_name: display_name.into(),
            details: details.into(),
            how_to_improve: None,
            references: Vec::new(),
        }
    }

    /// Group value carrying a weighted score; the rating follows the score.
    pub fn aggregate(
        id: impl Into<String>,
        score: Option<f64>,
        display_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let rating = Rating::from_score(score);
        Self {
            score,
            ..Self::new(id, rating, display_name, details)
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn with_how_to_improve(mut self, how_to_improve: impl Into<String>) -> Self {
        self.how_to_improve = Some(how_to_improve.into());
        self
    }

    pub fn with_references<I>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = Reference>,
    {
        self.references.extend(references);
        self.references.sort();
        self.references.dedup();
        self
    }
}

/// How per-variant values are folded into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    /// Worst variant decides.
    AllVariantsMustPass,
    /// Best rated variant decides.
    AnyVariantSuffices,
    /// Worst variant decides; dropped from the tree when no variant matches.
    NotApplicableIfNoVariantMatches,
}

/// Top-level attribute groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Privacy,
    SelfSovereignty,
    Transparency,
    Ecosystem,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Security,
            Self::Privacy,
            Self::SelfSovereignty,
            Self::Transparency,
            Self::Ecosystem,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Privacy => "privacy",
            Self::SelfSovereignty => "self_sovereignty",
            Self::Transparency => "transparency",
            Self::Ecosystem => "ecosystem",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Privacy => "Privacy",
            Self::SelfSovereignty => "Self-sovereignty",
            Self::Transparency => "Transparency",
            Self::Ecosystem => "Ecosystem",
        }
    }

    pub fn attributes(self) -> impl Iterator<Item = AttributeId> {
        AttributeId::ALL
            .into_iter()
            .filter(move |id| id.category() == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    SecurityAudits,
    HardwareWalletSupport,
    ChainVerification,
    BugBountyProgram,
    AccountRecovery,
    TransactionLegibility,
    HardwareWalletAppSigning,
    AddressCorrelation,
    MultiAddressCorrelation,
    PrivateTransfers,
    DappIsolation,
    AppIsolation,
    AccountPortability,
    L1ProviderIndependence,
    ChainConfigurability,
    TransactionInclusion,
    Interoperability,
    AccountUnruggability,
    SourceVisibility,
    OpenSource,
    Funding,
    FeeTransparency,
    AddressResolution,
    BrowserIntegration,
    AccountAbstraction,
    TransactionBatching,
    HwAppConnectionSupport,
    HardwareWalletInteroperability,
}

impl AttributeId {
    pub const ALL: [Self; 28] = [
        Self::SecurityAudits,
        Self::HardwareWalletSupport,
        Self::ChainVerification,
        Self::BugBountyProgram,
        Self::AccountRecovery,
        Self::TransactionLegibility,
        Self::HardwareWalletAppSigning,
        Self::AddressCorrelation,
        Self::MultiAddressCorrelation,
        Self::PrivateTransfers,
        Self::DappIsolation,
        Self::AppIsolation,
        Self::AccountPortability,
        Self::L1ProviderIndependence,
        Self::ChainConfigurability,
        Self::TransactionInclusion,
        Self::Interoperability,
        Self::AccountUnruggability,
        Self::SourceVisibility,
        Self::OpenSource,
        Self::Funding,
        Self::FeeTransparency,
        Self::AddressResolution,
        Self::BrowserIntegration,
        Self::AccountAbstraction,
        Self::TransactionBatching,
        Self::HwAppConnectionSupport,
        Self::HardwareWalletInteroperability,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SecurityAudits => "security_audits",
            Self::HardwareWalletSupport => "hardware_wallet_support",
            Self::ChainVerification => "chain_verification",
            Self::BugBountyProgram => "bug_bounty_program",
            Self::AccountRecovery => "account_recovery",
            Self::TransactionLegibility => "transaction_legibility",
            Self::HardwareWalletAppSigning => "hardware_wallet_app_signing",
            Self::AddressCorrelation => "address_correlation",
            Self::MultiAddressCorrelation => "multi_address_correlation",
            Self::PrivateTransfers => "private_transfers",
            Self::DappIsolation => "dapp_isolation",
            Self::AppIsolation => "app_isolation",
            Self::AccountPortability => "account_portability",
            Self::L1ProviderIndependence => "l1_provider_independence",
            Self::ChainConfigurability => "chain_configurability",
            Self::TransactionInclusion => "transaction_inclusion",
            Self::Interoperability => "interoperability",
            Self::AccountUnruggability => "account_unruggability",
            Self::SourceVisibility => "source_visibility",
            Self::OpenSource => "open_source",
            Self::Funding => "funding",
            Self::FeeTransparency => "fee_transparency",
            Self::AddressResolution => "address_resolution",
            Self::BrowserIntegration => "browser_integration",
            Self::AccountAbstraction => "account_abstraction",
            Self::TransactionBatching => "transaction_batching",
            Self::HwAppConnectionSupport => "hw_app_connection_support",
            Self::HardwareWalletInteroperability => "hardware_wallet_interoperability",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::SecurityAudits
            | Self::HardwareWalletSupport
            | Self::ChainVerification
            | Self::BugBountyProgram
            | Self::AccountRecovery
            | Self::TransactionLegibility
            | Self::HardwareWalletAppSigning => Category::Security,
            Self::AddressCorrelation
            | Self::MultiAddressCorrelation
            | Self::PrivateTransfers
            | Self::DappIsolation
            | Self::AppIsolation => Category::Privacy,
            Self::AccountPortability
            | Self::L1ProviderIndependence
            | Self::ChainConfigurability
            | Self::TransactionInclusion
            | Self::Interoperability
            | Self::AccountUnruggability => Category::SelfSovereignty,
            Self::SourceVisibility
            | Self::OpenSource
            | Self::Funding
            | Self::FeeTransparency => Category::Transparency,
            Self::AddressResolution
            | Self::BrowserIntegration
            | Self::AccountAbstraction
            | Self::TransactionBatching
            | Self::HwAppConnectionSupport
            | Self::HardwareWalletInteroperability => Category::Ecosystem,
        }
    }

    /// Static definition backing this id.
    pub fn attribute(self) -> &'static Attribute {
        match self {
            Self::SecurityAudits => &security::SECURITY_AUDITS,
            Self::HardwareWalletSupport => &security::HARDWARE_WALLET_SUPPORT,
            Self::ChainVerification => &security::CHAIN_VERIFICATION,
            Self::BugBountyProgram => &security::BUG_BOUNTY_PROGRAM,
            Self::AccountRecovery => &security::ACCOUNT_RECOVERY,
            Self::TransactionLegibility => &security::TRANSACTION_LEGIBILITY,
            Self::HardwareWalletAppSigning => &security::HARDWARE_WALLET_APP_SIGNING,
            Self::AddressCorrelation => &privacy::ADDRESS_CORRELATION,
            Self::MultiAddressCorrelation => &privacy::MULTI_ADDRESS_CORRELATION,
            Self::PrivateTransfers => &privacy::PRIVATE_TRANSFERS,
            Self::DappIsolation => &privacy::DAPP_ISOLATION,
            Self::AppIsolation => &privacy::APP_ISOLATION,
            Self::AccountPortability => &self_sovereignty::ACCOUNT_PORTABILITY,
            Self::L1ProviderIndependence => &self_sovereignty::L1_PROVIDER_INDEPENDENCE,
            Self::ChainConfigurability => &self_sovereignty::CHAIN_CONFIGURABILITY,
            Self::TransactionInclusion => &self_sovereignty::TRANSACTION_INCLUSION,
            Self::Interoperability => &self_sovereignty::INTEROPERABILITY,
            Self::AccountUnruggability => &self_sovereignty::ACCOUNT_UNRUGGABILITY,
            Self::SourceVisibility => &transparency::SOURCE_VISIBILITY,
            Self::OpenSource => &transparency::OPEN_SOURCE,
            Self::Funding => &transparency::FUNDING,
            Self::FeeTransparency => &transparency::FEE_TRANSPARENCY,
            Self::AddressResolution => &ecosystem::ADDRESS_RESOLUTION,
            Self::BrowserIntegration => &ecosystem::BROWSER_INTEGRATION,
            Self::AccountAbstraction => &ecosystem::ACCOUNT_ABSTRACTION,
            Self::TransactionBatching => &ecosystem::TRANSACTION_BATCHING,
            Self::HwAppConnectionSupport => &ecosystem::HW_APP_CONNECTION_SUPPORT,
            Self::HardwareWalletInteroperability => &ecosystem::HARDWARE_WALLET_INTEROPERABILITY,
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static definition of a rated property.
#[derive(Debug)]
pub struct Attribute {
    pub id: AttributeId,
    pub display_name: &'static str,
    pub question: &'static str,
    pub applies_to: &'static [Variant],
    pub reconciliation: Reconciliation,
    /// Rates one variant. Must not fail: missing data is `Unrated`.
    pub evaluate: fn(&VariantContext<'_>) -> Value,
}

impl Attribute {
    pub fn applies_to(&self, variant: Variant) -> bool {
        self.applies_to.contains(&variant)
    }
}
