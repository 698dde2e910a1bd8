use super::{CriteriaGroup, Criterion, CriterionRating, Ladder, LadderType, Requirement, Stage};
use crate::attributes::AttributeId;
use crate::variants::{WalletType, HARDWARE_VARIANTS};

const fn device(
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
        variants: Some(HARDWARE_VARIANTS),
        if_not_applicable: CriterionRating::Fail,
    }
}

pub(super) static HARDWARE_LADDER: Ladder = Ladder {
    ladder_type: LadderType::Hardware,
    audience: &[WalletType::Hardware],
    stages: &[STAGE_ZERO, STAGE_ONE, STAGE_TWO],
};

const STAGE_ZERO: Stage = Stage {
    label: "Stage 0",
    groups: &[CriteriaGroup {
        id: "reviewability",
        description: "The device firmware can be reviewed by the public.",
        criteria: &[device(
            "firmware_source_available",
            AttributeId::SourceVisibility,
            Requirement::Pass,
            "The firmware source code is publicly available.",
            "Closed firmware cannot be checked for key exfiltration.",
        )],
    }],
};

const STAGE_ONE: Stage = Stage {
    label: "Stage 1",
    groups: &[
        CriteriaGroup {
            id: "security",
            description: "The device has been independently reviewed.",
            criteria: &[
                device(
                    "security_audit",
                    AttributeId::SecurityAudits,
                    Requirement::AtLeastPartial,
                    "The device has had a third-party security audit.",
                    "Hardware and firmware flaws are rarely found by their own authors.",
                ),
                device(
                    "bug_bounty_exists",
                    AttributeId::BugBountyProgram,
                    Requirement::AtLeastPartial,
                    "The manufacturer runs some form of bug bounty.",
                    "Researchers need a sanctioned channel to report device flaws.",
                ),
                device(
                    "app_signing",
                    AttributeId::HardwareWalletAppSigning,
                    Requirement::AtLeastPartial,
                    "The device shows part of what apps ask it to sign.",
                    "A device that signs blindly cannot protect against a compromised computer.",
                ),
            ],
        },
        CriteriaGroup {
            id: "self_sovereignty",
            description: "The user is not tied to the manufacturer.",
            criteria: &[
                device(
                    "seed_portability",
                    AttributeId::AccountPortability,
                    Requirement::Pass,
                    "Keys on the device can be restored into another wallet.",
                    "A lost or discontinued device must not mean lost funds.",
                ),
                device(
                    "software_interoperability",
                    AttributeId::Interoperability,
                    Requirement::AtLeastPartial,
                    "The device works with third-party software wallets.",
                    "Forcing a companion app makes the manufacturer a gatekeeper.",
                ),
                device(
                    "app_connection",
                    AttributeId::HwAppConnectionSupport,
                    Requirement::AtLeastPartial,
                    "The device can connect to apps.",
                    "A signer that cannot reach apps pushes users towards hot wallets.",
                ),
            ],
        },
    ],
};

const STAGE_TWO: Stage = Stage {
    label: "Stage 2",
    groups: &[
        CriteriaGroup {
            id: "security",
            description: "The device provides a strong level of security.",
            criteria: &[
                device(
                    "security_audit_fresh",
                    AttributeId::SecurityAudits,
                    Requirement::Pass,
                    "The device passed a recent audit with no unaddressed flaws.",
                    "Audits age as firmware changes.",
                ),
                device(
                    "bug_bounty_program",
                    AttributeId::BugBountyProgram,
                    Requirement::Pass,
                    "The device is covered by a funded, comprehensive bug bounty.",
                    "Rewards and legal cover make disclosure more attractive than exploitation.",
                ),
                device(
                    "full_app_signing",
                    AttributeId::HardwareWalletAppSigning,
                    Requirement::Pass,
                    "The device decodes nested app requests and exports them for cross-checking.",
                    "Multisig and batched calls are where blind signing does the most damage.",
                ),
                device(
                    "transaction_legibility",
                    AttributeId::TransactionLegibility,
                    Requirement::Pass,
                    "Every transaction detail is legible on the device screen.",
                    "The device screen is the only display an attacker cannot tamper with.",
                ),
            ],
        },
        CriteriaGroup {
            id: "self_sovereignty",
            description: "The device is fully open to the wider ecosystem.",
            criteria: &[
                device(
                    "full_interoperability",
                    AttributeId::Interoperability,
                    Requirement::Pass,
                    "The device passes every interoperability check.",
                    "Users should be free to pair the device with any wallet software.",
                ),
                device(
                    "verifiable_app_connection",
                    AttributeId::HwAppConnectionSupport,
                    Requirement::Pass,
                    "The device connects to apps through third-party software wallets.",
                    "Open software wallets can be audited where a vendor app cannot.",
                ),
            ],
        },
        CriteriaGroup {
            id: "transparency",
            description: "The manufacturer is transparent about code and funding.",
            criteria: &[
                device(
                    "foss",
                    AttributeId::OpenSource,
                    Requirement::Pass,
                    "The firmware is released under a free and open-source license.",
                    "Open licensing lets the community maintain devices the vendor abandons.",
                ),
                device(
                    "funding",
                    AttributeId::Funding,
                    Requirement::ScoreAtLeast(0.5),
                    "The manufacturer discloses how it is funded.",
                    "Device sales alone rarely explain a manufacturer's incentives.",
                ),
            ],
        },
    ],
};
