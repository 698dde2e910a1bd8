use super::{Feature, Reference, VariantFeature};
use crate::variants::Variant;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A published third-party security audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAudit {
    pub auditor: String,
    pub date: NaiveDate,
    /// Variants the audit covered. `None` means the whole wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
    /// Findings still open at publication time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unaddressed_flaws: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Reference>,
}

impl SecurityAudit {
    pub fn covers(&self, variant: Variant) -> bool {
        self.variants
            .as_ref()
            .map_or(true, |variants| variants.contains(&variant))
    }

    pub fn has_unaddressed_flaws(&self) -> bool {
        !self.unaddressed_flaws.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareWalletManufacturer {
    Ledger,
    Trezor,
    GridPlus,
    Keystone,
    KeepKey,
    Firefly,
    OneKey,
    BitBox,
    Other,
}

impl HardwareWalletManufacturer {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ledger => "Ledger",
            Self::Trezor => "Trezor",
            Self::GridPlus => "GridPlus",
            Self::Keystone => "Keystone",
            Self::KeepKey => "KeepKey",
            Self::Firefly => "Firefly",
            Self::OneKey => "OneKey",
            Self::BitBox => "BitBox",
            Self::Other => "other",
        }
    }

    /// Manufacturers with enough market share to matter for interoperability.
    pub const fn is_major(self) -> bool {
        matches!(self, Self::Ledger | Self::Trezor | Self::Keystone | Self::GridPlus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareWalletConnection {
    Usb,
    Qr,
    WebUsb,
    WebHid,
    Bluetooth,
    WalletConnect,
}

/// Hardware wallets a software wallet can drive, keyed by manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareWalletSupport {
    pub wallets: BTreeMap<HardwareWalletManufacturer, Vec<HardwareWalletConnection>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl HardwareWalletSupport {
    /// Manufacturers with at least one connection method.
    pub fn supported_manufacturers(&self) -> Vec<HardwareWalletManufacturer> {
        self.wallets
            .iter()
            .filter(|(_, connections)| !connections.is_empty())
            .map(|(manufacturer, _)| *manufacturer)
            .collect()
    }

    /// Manufacturers reachable without going through WalletConnect.
    pub fn direct_manufacturers(&self) -> Vec<HardwareWalletManufacturer> {
        self.wallets
            .iter()
            .filter(|(_, connections)| {
                connections
                    .iter()
                    .any(|connection| *connection != HardwareWalletConnection::WalletConnect)
            })
            .map(|(manufacturer, _)| *manufacturer)
            .collect()
    }

    /// True when every supported manufacturer is reachable only through
    /// WalletConnect.
    pub fn only_wallet_connect(&self) -> bool {
        let mut supported = self
            .wallets
            .values()
            .filter(|connections| !connections.is_empty())
            .peekable();
        supported.peek().is_some()
            && supported.all(|connections| {
                connections
                    .iter()
                    .all(|connection| *connection == HardwareWalletConnection::WalletConnect)
            })
    }
}

/// Light client used to verify L1 chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightClient {
    Helios,
    Nimbus,
    Lodestar,
    Other,
}

impl LightClient {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Helios => "Helios",
            Self::Nimbus => "Nimbus",
            Self::Lodestar => "Lodestar",
            Self::Other => "a light client",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugBountyAvailability {
    Active,
    Inactive,
    #[default]
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageBreadth {
    Full,
    Partial,
    AppOnly,
    FirmwareOnly,
    HardwareOnly,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalProtection {
    SafeHarbor,
    LegalAssurance,
    #[default]
    None,
}

impl LegalProtection {
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BugBountyProgram {
    pub availability: BugBountyAvailability,
    pub coverage_breadth: CoverageBreadth,
    /// Rewards in USD.
    pub minimum_reward: Option<u64>,
    pub maximum_reward: Option<u64>,
    pub legal_protection: LegalProtection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl BugBountyProgram {
    pub fn exists(&self) -> bool {
        self.availability != BugBountyAvailability::Never
    }

    pub fn has_reward_range(&self) -> bool {
        matches!(
            (self.minimum_reward, self.maximum_reward),
            (Some(min), Some(max)) if min > 0 && max > 0
        )
    }
}

/// Holder of one share of an account's recovery secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Guardian {
    /// A share kept on the user's own device.
    SelfCustody,
    Passkey,
    WalletPassword,
    /// A zero-knowledge proof of an identity document.
    Zkid { description: String },
    /// A share held by the wallet's own infrastructure.
    WalletProvider { entity: String },
    /// A share unlocked through one of the user's external accounts.
    UserExternalAccount { entity: String, description: String },
}

impl Guardian {
    /// Third party that holds or gates this share.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::WalletProvider { entity } | Self::UserExternalAccount { entity, .. } => {
                Some(entity)
            }
            Self::SelfCustody | Self::Passkey | Self::WalletPassword | Self::Zkid { .. } => None,
        }
    }

    /// Guardians that live on the user's everyday device.
    pub fn on_user_device(&self) -> bool {
        matches!(self, Self::SelfCustody | Self::Passkey)
    }

    /// How this guardian's share gets lost.
    pub fn loss_description(&self) -> String {
        match self {
            Self::SelfCustody => "User accidentally wipes their device".to_string(),
            Self::Passkey => "User loses access to their passkey device".to_string(),
            Self::WalletPassword => "User forgets their wallet password".to_string(),
            Self::Zkid { description } => format!("User loses their {description}"),
            Self::WalletProvider { entity } => {
                format!("{entity} loses its data or goes out of business")
            }
            Self::UserExternalAccount { description, .. } => {
                format!("User loses access to their {description}")
            }
        }
    }
}

/// Where the recovery secret is put back together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretReconstitution {
    #[default]
    ClientSide,
    Entity { entity: String },
}

/// A recovery secret split across guardians: every required guardian plus
/// a threshold of the optional ones can restore the account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianPolicy {
    pub required_guardians: Vec<Guardian>,
    pub optional_guardians: Vec<Guardian>,
    /// Fewest optional guardians the wallet lets a user configure.
    pub optional_guardians_minimum_configurable: usize,
    pub optional_guardians_needed_for_recovery: usize,
    pub secret_reconstitution: SecretReconstitution,
}

impl GuardianPolicy {
    pub fn guardians(&self) -> impl Iterator<Item = &Guardian> {
        self.required_guardians
            .iter()
            .chain(self.optional_guardians.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecovery {
    /// Minimum guardian policy users must set up. `None` when recovery
    /// relies on the user's own backup only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_policy: Option<GuardianPolicy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyGeneration {
    OnUserDevice,
    MultipartyIncludingUserDevice,
    OffUserDevice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyReconstruction {
    NonMultiparty,
    OnUserDevice,
    MultipartyIncludingUserDevice,
    MultipartyWithoutUserDevice,
}

/// Where private key material is generated and reassembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysHandling {
    pub key_generation: KeyGeneration,
    pub key_reconstruction: KeyReconstruction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailDisplay {
    ShownByDefault,
    /// Behind a click or a setting.
    ShownOptionally,
    #[default]
    NotInUi,
}

impl DetailDisplay {
    pub fn is_shown(self) -> bool {
        self != Self::NotInUi
    }
}

/// Essential transaction fields shown before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDetailsDisplay {
    pub gas: DetailDisplay,
    pub nonce: DetailDisplay,
    pub from: DetailDisplay,
    pub to: DetailDisplay,
    pub chain: DetailDisplay,
    pub value: DetailDisplay,
}

impl TransactionDetailsDisplay {
    pub const FULL: Self = Self {
        gas: DetailDisplay::ShownByDefault,
        nonce: DetailDisplay::ShownByDefault,
        from: DetailDisplay::ShownByDefault,
        to: DetailDisplay::ShownByDefault,
        chain: DetailDisplay::ShownByDefault,
        value: DetailDisplay::ShownByDefault,
    };

    pub fn fields(&self) -> [(&'static str, DetailDisplay); 6] {
        [
            ("gas", self.gas),
            ("nonce", self.nonce),
            ("from", self.from),
            ("to", self.to),
            ("chain", self.chain),
            ("value", self.value),
        ]
    }

    pub fn shown_count(&self) -> usize {
        self.fields()
            .iter()
            .filter(|(_, display)| display.is_shown())
            .count()
    }

    /// Fields missing from the signing screen unless the user asks.
    pub fn hidden_by_default(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, display)| *display != DetailDisplay::ShownByDefault)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalldataDisplay {
    pub raw_hex: bool,
    pub copy_hex_to_clipboard: bool,
    /// Decoded into a structured form such as JSON.
    pub formatted: bool,
}

/// What the signer shows when asked to sign a typed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSigning {
    pub eip712_struct: bool,
    pub domain_hash: bool,
    pub message_hash: bool,
    pub safe_hash: bool,
}

impl MessageSigning {
    /// The user can check the message by its struct, its hash pair or its
    /// Safe hash.
    pub fn is_legible(&self) -> bool {
        self.eip712_struct || (self.domain_hash && self.message_hash) || self.safe_hash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataDecoded {
    OnDevice,
    OffDevice,
}

/// Reference transactions a hardware signer is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalldataDecoding {
    EthUsdcTransfer,
    UsdcApproval,
    ZksyncUsdcTransfer,
    AaveSupply,
    SafeAaveSupplyNested,
    SafeAaveApproveSupplyBatchMultisend,
}

impl CalldataDecoding {
    /// Nested Safe transactions; decoding them counts as complex decoding.
    pub const fn is_complex(self) -> bool {
        matches!(
            self,
            Self::SafeAaveSupplyNested | Self::SafeAaveApproveSupplyBatchMultisend
        )
    }
}

/// Ways a user can get signing data off a hardware device to compare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataExtraction {
    pub eyes: bool,
    pub qr_code: bool,
    pub hashes: bool,
}

impl DataExtraction {
    pub fn any(&self) -> bool {
        self.eyes || self.qr_code || self.hashes
    }

    pub fn all(&self) -> bool {
        self.eyes && self.qr_code && self.hashes
    }

    /// Extraction that does not rely on reading data by eye.
    pub fn machine_readable(&self) -> bool {
        self.qr_code || self.hashes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareMessageSigning {
    pub decoded: DataDecoded,
    pub provides: MessageSigning,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareLegibility {
    pub calldata_display: CalldataDisplay,
    pub transaction_details: TransactionDetailsDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_signing: Option<MessageSigning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareLegibility {
    /// Reference transactions the device decodes, and where.
    pub calldata_decoding: BTreeMap<CalldataDecoding, DataDecoded>,
    pub transaction_details: TransactionDetailsDisplay,
    pub data_extraction: DataExtraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_signing: Option<HardwareMessageSigning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl HardwareLegibility {
    pub fn decodes_complex_on_device(&self) -> bool {
        self.calldata_decoding
            .iter()
            .any(|(decoding, at)| decoding.is_complex() && *at == DataDecoded::OnDevice)
    }

    pub fn decodes_anything(&self) -> bool {
        !self.calldata_decoding.is_empty()
    }
}

/// How clearly a signer presents what is being signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionLegibility {
    Software(SoftwareLegibility),
    Hardware(HardwareLegibility),
}

/// What a hardware wallet shows on its own screen when signing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSigning {
    pub message_extraction: DataExtraction,
    /// Reference messages decoded on the device.
    pub message_decoding: BTreeSet<CalldataDecoding>,
    pub calldata_extraction: DataExtraction,
    /// Reference transactions decoded on the device.
    pub calldata_decoding: BTreeSet<CalldataDecoding>,
    pub transaction_details: TransactionDetailsDisplay,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl AppSigning {
    pub fn decodes_complex_messages(&self) -> bool {
        self.message_decoding.iter().any(|decoding| decoding.is_complex())
    }

    pub fn decodes_complex_calldata(&self) -> bool {
        self.calldata_decoding.iter().any(|decoding| decoding.is_complex())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityFeatures {
    /// Shared by every variant; each audit declares its own variant scope.
    pub public_security_audits: Feature<Vec<SecurityAudit>>,
    pub hardware_wallet_support: VariantFeature<HardwareWalletSupport>,
    pub chain_verification: VariantFeature<LightClient>,
    pub bug_bounty_program: VariantFeature<BugBountyProgram>,
    pub account_recovery: VariantFeature<AccountRecovery>,
    pub keys_handling: VariantFeature<KeysHandling>,
    pub transaction_legibility: VariantFeature<TransactionLegibility>,
    pub hardware_wallet_app_signing: VariantFeature<AppSigning>,
}
