use super::{CriteriaGroup, Criterion, CriterionRating, Ladder, LadderType, Requirement, Stage};
use crate::attributes::{AttributeId, INDIRECT_MULTI_VENDOR_SUPPORT, MULTI_VENDOR_SUPPORT};
use crate::variants::{WalletType, BROWSER_VARIANTS, SOFTWARE_VARIANTS};

/// Criterion over every software variant the wallet ships.
const fn software(
    id: &'static str,
    attribute: AttributeId,
    requirement: Requirement,
    description: &'static str,
    rationale: &'static str,
) -> Criterion {
    Criterion {
        id,
        description,
        rationale,
        attribute,
        requirement,
        variants: Some(SOFTWARE_VARIANTS),
        if_not_applicable: CriterionRating::Fail,
    }
}

pub(super) static SOFTWARE_LADDER: Ladder = Ladder {
    ladder_type: LadderType::Software,
    audience: &[WalletType::Software],
    stages: &[STAGE_ZERO, STAGE_ONE, STAGE_TWO],
};

const STAGE_ZERO: Stage = Stage {
    label: "Stage 0",
    groups: &[CriteriaGroup {
        id: "reviewability",
        description: "The wallet's source code can be reviewed by the public.",
        criteria: &[software(
            "source_available",
            AttributeId::SourceVisibility,
            Requirement::Pass,
            "The wallet's source code is publicly available.",
            "Source code must be public before anything else about the wallet can be verified.",
        )],
    }],
};

const STAGE_ONE: Stage = Stage {
    label: "Stage 1",
    groups: &[
        CriteriaGroup {
            id: "security",
            description: "The wallet provides a basic level of security.",
            criteria: &[
                software(
                    "security_audit_1y",
                    AttributeId::SecurityAudits,
                    Requirement::Pass,
                    "The wallet passed a security audit within the freshness window.",
                    "Regular third-party audits catch flaws before attackers do.",
                ),
                software(
                    "hardware_wallet_subset",
                    AttributeId::HardwareWalletSupport,
                    Requirement::OneOf(&[MULTI_VENDOR_SUPPORT, INDIRECT_MULTI_VENDOR_SUPPORT]),
                    "The wallet supports hardware wallets from at least three manufacturers.",
                    "Offloading keys to a separate device shows the developer takes key security seriously.",
                ),
                software(
                    "chain_verification",
                    AttributeId::ChainVerification,
                    Requirement::Pass,
                    "The wallet verifies the integrity of the L1 chain.",
                    "Wallets should verify chain data the way browsers verify HTTPS certificates.",
                ),
            ],
        },
        CriteriaGroup {
            id: "privacy",
            description: "The wallet offers a minimal level of privacy to its users.",
            criteria: &[software(
                "private_transfers",
                AttributeId::PrivateTransfers,
                Requirement::AtLeastPartial,
                "Token transfers can be made privately.",
                "Public transfers expose balances and counterparties to anyone watching the chain.",
            )],
        },
        CriteriaGroup {
            id: "self_sovereignty",
            description: "The wallet lets the user stay in control of their account.",
            criteria: &[
                software(
                    "account_portability",
                    AttributeId::AccountPortability,
                    Requirement::Pass,
                    "The user can freely export their account to another wallet.",
                    "Users must never be locked into a single wallet.",
                ),
                software(
                    "support_own_node",
                    AttributeId::L1ProviderIndependence,
                    Requirement::AtLeastPartial,
                    "The wallet can be used with the user's own L1 node.",
                    "A self-hosted node removes the RPC provider from the trust model.",
                ),
            ],
        },
        CriteriaGroup {
            id: "transparency",
            description: "The wallet is transparent about how it is built.",
            criteria: &[software(
                "foss",
                AttributeId::OpenSource,
                Requirement::Pass,
                "The wallet is released under a free and open-source license.",
                "Open licensing lets the community fork the wallet if it goes astray.",
            )],
        },
        CriteriaGroup {
            id: "ecosystem",
            description: "The wallet plays well with the rest of the ecosystem.",
            criteria: &[
                software(
                    "address_resolution",
                    AttributeId::AddressResolution,
                    Requirement::AtLeastPartial,
                    "The wallet can send funds to human-readable addresses.",
                    "Raw hex addresses are error-prone to copy and verify.",
                ),
                Criterion {
                    id: "browser_integration",
                    description: "The wallet complies with web browser integration standards.",
                    rationale: "Shared provider standards keep wallets interchangeable for dapps.",
                    attribute: AttributeId::BrowserIntegration,
                    requirement: Requirement::Pass,
                    variants: Some(BROWSER_VARIANTS),
                    if_not_applicable: CriterionRating::Exempt,
                },
            ],
        },
    ],
};

const STAGE_TWO: Stage = Stage {
    label: "Stage 2",
    groups: &[
        CriteriaGroup {
            id: "security",
            description: "The wallet provides a strong level of security.",
            criteria: &[software(
                "bug_bounty_program",
                AttributeId::BugBountyProgram,
                Requirement::Pass,
                "The wallet runs a funded bug bounty program.",
                "Rewards make reporting an exploit more attractive than using it.",
            )],
        },
        CriteriaGroup {
            id: "privacy",
            description: "The wallet protects the user's identity.",
            criteria: &[
                software(
                    "address_privacy",
                    AttributeId::AddressCorrelation,
                    Requirement::Pass,
                    "The wallet address is not linked to personal information.",
                    "Linking an address to an identity exposes its full transaction history.",
                ),
                software(
                    "multi_address_correlation",
                    AttributeId::MultiAddressCorrelation,
                    Requirement::Pass,
                    "Multiple wallet addresses are not correlatable with one another.",
                    "Separate addresses only help if third parties cannot join them back up.",
                ),
            ],
        },
        CriteriaGroup {
            id: "self_sovereignty",
            description: "The wallet works without trusted intermediaries.",
            criteria: &[
                software(
                    "transaction_inclusion",
                    AttributeId::TransactionInclusion,
                    Requirement::Pass,
                    "The user can get transactions included without intermediaries.",
                    "Censorship by an RPC provider or sequencer must not strand funds.",
                ),
                software(
                    "support_own_chains",
                    AttributeId::ChainConfigurability,
                    Requirement::Pass,
                    "The user can point the wallet at their own chain endpoints.",
                    "Every chain the wallet talks to should be reachable through infrastructure the user picks.",
                ),
            ],
        },
        CriteriaGroup {
            id: "transparency",
            description: "The wallet is transparent about its business model.",
            criteria: &[
                software(
                    "funding",
                    AttributeId::Funding,
                    Requirement::Pass,
                    "The wallet discloses how it is funded.",
                    "Hidden revenue streams create incentives that may not align with users.",
                ),
                software(
                    "fee_transparency",
                    AttributeId::FeeTransparency,
                    Requirement::Pass,
                    "The wallet shows the fees it charges before signing.",
                    "Users should know what an operation costs before committing to it.",
                ),
            ],
        },
        CriteriaGroup {
            id: "ecosystem",
            description: "The wallet supports the ecosystem's newer account standards.",
            criteria: &[
                software(
                    "account_abstraction",
                    AttributeId::AccountAbstraction,
                    Requirement::Pass,
                    "The wallet is account abstraction ready.",
                    "Smart accounts enable recovery and spending policies EOAs cannot offer.",
                ),
                software(
                    "transaction_batching",
                    AttributeId::TransactionBatching,
                    Requirement::Pass,
                    "The wallet supports atomic batched transactions.",
                    "Batching removes the risk of half-completed multi-step operations.",
                ),
            ],
        },
    ],
};
