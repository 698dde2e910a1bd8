use super::{Feature, Reference, VariantFeature};
use serde::{Deserialize, Serialize};

/// Whether users can move their account to another wallet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPortability {
    pub seed_phrase_export: bool,
    pub private_key_export: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl AccountPortability {
    pub fn can_export(&self) -> bool {
        self.seed_phrase_export || self.private_key_export
    }
}

/// When a user can swap in their own RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcEndpointConfiguration {
    YesBeforeAnySensitiveRequest,
    YesAfterOtherSensitiveRequests,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleChainConfigurability {
    pub rpc_endpoint_configuration: RpcEndpointConfiguration,
    /// Account creation, balance lookups and token sends keep working with
    /// no connectivity other than the configured endpoint.
    #[serde(default)]
    pub basic_operations_with_endpoint_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfigurability {
    pub l1: Feature<SingleChainConfigurability>,
    pub non_l1: Feature<SingleChainConfigurability>,
    pub custom_chain_rpc_endpoint: Feature<()>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// Routes a user has to get a transaction included without the wallet's
/// default infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSubmission {
    /// L1 transactions can be broadcast through a user-chosen node.
    pub self_broadcast: bool,
    /// L2 transactions can be force-included through L1.
    pub l2_forced_inclusion: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl TransactionSubmission {
    pub fn routes(&self) -> usize {
        usize::from(self.self_broadcast) + usize::from(self.l2_forced_inclusion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteroperabilityCheck {
    Pass,
    Partial,
    Fail,
}

/// Hardware wallet interoperability with third-party software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interoperability {
    /// Works with third-party software wallets.
    pub interoperability: InteroperabilityCheck,
    /// Usable without an account or link to the manufacturer.
    pub no_supplier_linkage: InteroperabilityCheck,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Interoperability {
    pub fn passed_checks(&self) -> usize {
        [self.interoperability, self.no_supplier_linkage]
            .into_iter()
            .filter(|check| *check == InteroperabilityCheck::Pass)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfSovereigntyFeatures {
    pub account_portability: VariantFeature<AccountPortability>,
    pub chain_configurability: VariantFeature<ChainConfigurability>,
    pub transaction_submission: VariantFeature<TransactionSubmission>,
    pub interoperability: VariantFeature<Interoperability>,
}
