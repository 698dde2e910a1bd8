use super::{Feature, Reference, VariantFeature};
use serde::{Deserialize, Serialize};

/// Information a third party may learn together with the wallet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakedInfo {
    IpAddress,
    TrackingIdentifier,
    Pseudonym,
    LegalName,
    Email,
    Phone,
    PhysicalAddress,
    Face,
    CexAccount,
    GovernmentId,
    SocialAccount,
}

impl LeakedInfo {
    pub const fn label(self) -> &'static str {
        match self {
            Self::IpAddress => "IP address",
            Self::TrackingIdentifier => "tracking identifier",
            Self::Pseudonym => "pseudonym",
            Self::LegalName => "legal name",
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::PhysicalAddress => "physical address",
            Self::Face => "face scan",
            Self::CexAccount => "exchange account",
            Self::GovernmentId => "government ID",
            Self::SocialAccount => "social media account",
        }
    }

    /// True when the information ties the address to a real-world identity.
    pub const fn is_identifying(self) -> bool {
        !matches!(
            self,
            Self::IpAddress | Self::TrackingIdentifier | Self::Pseudonym
        )
    }
}

/// Third parties that receive the wallet address, and what they learn
/// alongside it. An empty list means no third party sees the address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCollection {
    pub collectors: Vec<DataCollector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCollector {
    pub entity: String,
    #[serde(default)]
    pub leaks: Vec<LeakedInfo>,
}

impl DataCollection {
    /// Every kind of information linked to the address, deduplicated.
    pub fn leaked(&self) -> Vec<LeakedInfo> {
        let mut leaked: Vec<LeakedInfo> = self
            .collectors
            .iter()
            .flat_map(|collector| collector.leaks.iter().copied())
            .collect();
        leaked.sort();
        leaked.dedup();
        leaked
    }
}

/// How a wallet refreshes data for several addresses at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MultiAddressHandling {
    /// Only the active address is ever queried.
    ActiveAddressOnly,
    SingleRequestWithMultipleAddresses,
    SeparateRequestPerAddress {
        /// Requests leave through distinct proxy circuits.
        #[serde(default)]
        separate_circuits: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivateTransferTechnology {
    StealthAddresses,
    PrivacyPools,
    TornadoCashNova,
    Railgun,
}

impl PrivateTransferTechnology {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StealthAddresses => "stealth addresses",
            Self::PrivacyPools => "Privacy Pools",
            Self::TornadoCashNova => "Tornado Cash Nova",
            Self::Railgun => "Railgun",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPrivacy {
    pub technologies: Vec<PrivateTransferTechnology>,
    /// Transfers are private without the user opting in.
    pub private_by_default: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposedAccountsBehavior {
    AllAccounts,
    ActiveAccountOnly,
    DappSpecificAccount,
    /// The user must pick accounts; nothing is preselected.
    NoDefault,
}

/// Account isolation between connected dApps. Wallets without dApp
/// connection support record this feature as `not_applicable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappIsolation {
    pub default_behavior: ExposedAccountsBehavior,
    #[serde(default)]
    pub user_customizable: bool,
    /// A new dApp-specific account can be created while connecting.
    #[serde(default)]
    pub create_in_connection_flow: bool,
    /// Reconnecting reuses the addresses last exposed to that dApp.
    #[serde(default)]
    pub reuse_last_connected_addresses: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// Account isolation between connected apps, per connection RPC. Wallets
/// that cannot connect to apps record this feature as `not_applicable`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIsolation {
    /// Accounts returned by `eth_accounts`.
    pub eth_accounts: Feature<ExposedAccountsBehavior>,
    /// Accounts returned by the ERC-7846 `wallet_connect` RPC.
    pub erc7846_wallet_connect: Feature<ExposedAccountsBehavior>,
    pub create_in_connection_flow: bool,
    pub reuse_last_connected_addresses: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl AppIsolation {
    /// Default exposure of every supported connection RPC.
    pub fn exposures(&self) -> Vec<ExposedAccountsBehavior> {
        [&self.eth_accounts, &self.erc7846_wallet_connect]
            .into_iter()
            .filter_map(|feature| feature.supported().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyFeatures {
    pub data_collection: VariantFeature<DataCollection>,
    pub multi_address: VariantFeature<MultiAddressHandling>,
    pub transaction_privacy: VariantFeature<TransactionPrivacy>,
    pub dapp_isolation: VariantFeature<DappIsolation>,
    pub app_isolation: VariantFeature<AppIsolation>,
}
