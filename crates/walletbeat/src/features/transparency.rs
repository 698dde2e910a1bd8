use super::{Feature, Reference, VariantFeature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum License {
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-3.0")]
    Gpl3,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "MIT-C")]
    MitWithClause,
    /// Converts to a FOSS license after a delay.
    #[serde(rename = "BUSL-1.1")]
    Busl11,
    #[serde(rename = "proprietary_source_available")]
    ProprietarySourceAvailable,
    #[serde(rename = "unlicensed_visible")]
    UnlicensedVisible,
    #[serde(rename = "proprietary")]
    Proprietary,
}

/// How free a license is, ordered from least to most free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LicenseFreedom {
    NotFoss,
    FutureFoss,
    Foss,
}

impl License {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Apache2 => "Apache 2.0",
            Self::Gpl3 => "GPL 3.0",
            Self::Bsd3Clause => "BSD 3-Clause",
            Self::Mit => "MIT",
            Self::MitWithClause => "MIT with additional clause",
            Self::Busl11 => "Business Source License 1.1",
            Self::ProprietarySourceAvailable => "proprietary (source available)",
            Self::UnlicensedVisible => "unlicensed (source visible)",
            Self::Proprietary => "proprietary",
        }
    }

    pub const fn freedom(self) -> LicenseFreedom {
        match self {
            Self::Apache2 | Self::Gpl3 | Self::Bsd3Clause | Self::Mit | Self::MitWithClause => {
                LicenseFreedom::Foss
            }
            Self::Busl11 => LicenseFreedom::FutureFoss,
            Self::ProprietarySourceAvailable | Self::UnlicensedVisible | Self::Proprietary => {
                LicenseFreedom::NotFoss
            }
        }
    }

    pub const fn source_visible(self) -> bool {
        !matches!(self, Self::Proprietary)
    }
}

/// Repository and license layout of the wallet's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Licensing {
    /// One repository under one license.
    SingleRepo {
        license: License,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
    /// Core logic and the wallet app ship under distinct licenses.
    SeparateCoreAndApp {
        core_license: License,
        app_license: License,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
}

impl Licensing {
    /// Distinct licenses in play, app license first.
    pub fn licenses(&self) -> Vec<License> {
        match self {
            Licensing::SingleRepo { license, .. } => vec![*license],
            Licensing::SeparateCoreAndApp {
                core_license,
                app_license,
                ..
            } if core_license == app_license => vec![*app_license],
            Licensing::SeparateCoreAndApp {
                core_license,
                app_license,
                ..
            } => vec![*app_license, *core_license],
        }
    }

    pub fn references(&self) -> &[Reference] {
        match self {
            Licensing::SingleRepo { references, .. }
            | Licensing::SeparateCoreAndApp { references, .. } => references,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonetizationStrategy {
    SelfFunded,
    Donations,
    EcosystemGrants,
    VentureCapital,
    PublicOffering,
    GovernanceToken,
    Subscription,
    TransparentConvenienceFees,
    HiddenConvenienceFees,
}

impl MonetizationStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfFunded => "self-funded",
            Self::Donations => "donations",
            Self::EcosystemGrants => "ecosystem grants",
            Self::VentureCapital => "venture capital",
            Self::PublicOffering => "public offering",
            Self::GovernanceToken => "governance token",
            Self::Subscription => "subscription",
            Self::TransparentConvenienceFees => "transparent convenience fees",
            Self::HiddenConvenienceFees => "hidden convenience fees",
        }
    }
}

/// Funding sources. Strategies missing from the map are unrated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monetization {
    pub strategies: BTreeMap<MonetizationStrategy, bool>,
    pub revenue_breakdown_public: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Monetization {
    pub fn uses(&self, strategy: MonetizationStrategy) -> bool {
        self.strategies.get(&strategy).copied().unwrap_or(false)
    }

    pub fn active_strategies(&self) -> Vec<MonetizationStrategy> {
        self.strategies
            .iter()
            .filter(|(_, used)| **used)
            .map(|(strategy, _)| *strategy)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeDisplayLevel {
    #[default]
    None,
    Aggregated,
    Comprehensive,
}

/// How fees of basic operations are presented before signing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationFees {
    pub by_default: FeeDisplayLevel,
    /// Level reachable with one extra click or tap.
    pub after_single_action: FeeDisplayLevel,
    pub fully_sponsored: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyFeatures {
    /// Shared by every variant.
    pub licensing: Feature<Licensing>,
    /// Shared by every variant.
    pub monetization: Feature<Monetization>,
    pub operation_fees: VariantFeature<OperationFees>,
}
