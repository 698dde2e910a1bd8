use super::{Reference, VariantFeature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Human-readable name resolution when entering a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressResolution {
    /// ENS names resolve on L1.
    pub ens: bool,
    /// Chain-specific (ERC-7828 style) addresses resolve.
    pub chain_specific: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// Provider standards a browser extension implements for dApps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserIntegration {
    pub eip1193: bool,
    pub eip2700: bool,
    pub eip6963: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl BrowserIntegration {
    /// Supported standards, as `(name, supported)` pairs.
    pub fn standards(&self) -> [(&'static str, bool); 3] {
        [
            ("EIP-1193", self.eip1193),
            ("EIP-2700", self.eip2700),
            ("EIP-6963", self.eip6963),
        ]
    }
}

/// Account types a wallet can create or operate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSupport {
    pub eoa: bool,
    pub erc4337: bool,
    pub eip7702: bool,
    pub multisig: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl AccountSupport {
    pub fn smart_accounts(&self) -> bool {
        self.erc4337 || self.eip7702
    }

    /// ERC-4337 accounts and nothing else.
    pub fn only_erc4337(&self) -> bool {
        self.erc4337 && !self.eoa && !self.eip7702 && !self.multisig
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionBatching {
    /// All calls succeed or revert together.
    Atomic,
    /// Calls are submitted together but may land independently.
    NonAtomic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorApp {
    ClosedSource,
    OpenSource,
}

/// Third-party software wallets a hardware wallet pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftwareWalletIntegration {
    Metamask,
    Rabby,
    Frame,
    Ambire,
    Other,
}

impl SoftwareWalletIntegration {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Metamask => "MetaMask",
            Self::Rabby => "Rabby",
            Self::Frame => "Frame",
            Self::Ambire => "Ambire",
            Self::Other => "other software wallets",
        }
    }
}

/// Routes a hardware wallet offers for connecting to apps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConnectionSupport {
    pub vendor_apps: BTreeSet<VendorApp>,
    pub software_wallets: BTreeSet<SoftwareWalletIntegration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemFeatures {
    pub address_resolution: VariantFeature<AddressResolution>,
    pub browser_integration: VariantFeature<BrowserIntegration>,
    pub account_support: VariantFeature<AccountSupport>,
    pub transaction_batching: VariantFeature<TransactionBatching>,
    pub app_connection_support: VariantFeature<AppConnectionSupport>,
}
