use super::common::{exempt, not_applicable, require, unrated};
use super::guardians;
use super::{Attribute, AttributeId, Rating, Reconciliation, Value};
use crate::features::{
    BugBountyAvailability, CoverageBreadth, DataDecoded, Feature, HardwareLegibility,
    SoftwareLegibility, TransactionLegibility, VariantContext,
};
use crate::variants::{ALL_VARIANTS, HARDWARE_VARIANTS, SOFTWARE_AND_EMBEDDED_VARIANTS};

pub(super) static SECURITY_AUDITS: Attribute = Attribute {
    id: AttributeId::SecurityAudits,
    display_name: "Security audits",
    question: "Has the wallet recently been audited by an independent auditor?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_security_audits,
};

pub(super) static HARDWARE_WALLET_SUPPORT: Attribute = Attribute {
    id: AttributeId::HardwareWalletSupport,
    display_name: "Hardware wallet support",
    question: "Does the wallet support connecting to hardware wallets?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_hardware_wallet_support,
};

pub(super) static CHAIN_VERIFICATION: Attribute = Attribute {
    id: AttributeId::ChainVerification,
    display_name: "Chain verification",
    question: "Does the wallet verify the integrity of the L1 chain?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_chain_verification,
};

pub(super) static BUG_BOUNTY_PROGRAM: Attribute = Attribute {
    id: AttributeId::BugBountyProgram,
    display_name: "Bug bounty program",
    question: "Does the wallet maintain an active bug bounty program?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_bug_bounty_program,
};

pub(super) static ACCOUNT_RECOVERY: Attribute = Attribute {
    id: AttributeId::AccountRecovery,
    display_name: "Account recovery",
    question: "Can the user regain access to their account if they lose their keys?",
    applies_to: SOFTWARE_AND_EMBEDDED_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_account_recovery,
};

pub(super) static TRANSACTION_LEGIBILITY: Attribute = Attribute {
    id: AttributeId::TransactionLegibility,
    display_name: "Transaction legibility",
    question: "When signing a transaction, does the wallet show transaction details clearly?",
    applies_to: ALL_VARIANTS,
    reconciliation: Reconciliation::AllVariantsMustPass,
    evaluate: evaluate_transaction_legibility,
};

pub(super) static HARDWARE_WALLET_APP_SIGNING: Attribute = Attribute {
    id: AttributeId::HardwareWalletAppSigning,
    display_name: "Hardware wallet app signing",
    question: "Can the user verify on the device itself what an app asks them to sign?",
    applies_to: HARDWARE_VARIANTS,
    reconciliation: Reconciliation::NotApplicableIfNoVariantMatches,
    evaluate: evaluate_hardware_wallet_app_signing,
};

/// Manufacturers a wallet must support to count as multi-vendor.
pub const MULTI_VENDOR_MANUFACTURERS: usize = 3;
/// Value ids of hardware wallet support covering at least
/// `MULTI_VENDOR_MANUFACTURERS` manufacturers.
pub const MULTI_VENDOR_SUPPORT: &str = "multi_vendor_hardware_wallet_support";
pub const INDIRECT_MULTI_VENDOR_SUPPORT: &str =
    "indirect_multi_vendor_hardware_wallet_support";

fn evaluate_security_audits(ctx: &VariantContext<'_>) -> Value {
    let audits = match ctx.security_audits() {
        Feature::Unrated => return unrated(&SECURITY_AUDITS, ctx.wallet_name),
        Feature::NotApplicable => return not_applicable(&SECURITY_AUDITS, ctx),
        Feature::NotSupported => Vec::new(),
        Feature::Supported(audits) => audits,
    };

    let Some(latest) = audits.iter().max_by_key(|audit| audit.date) else {
        return Value::new(
            "never_audited",
            Rating::Fail,
            "No public audits",
            format!(
                "{} has not published any third-party security audit.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should get audited by an independent security firm and publish the report.",
            ctx.wallet_name
        ));
    };

    let age_days = ctx.settings.as_of.signed_duration_since(latest.date).num_days();
    let recent = age_days <= i64::from(ctx.settings.audit_freshness_days);
    let references = latest.report.iter().cloned();

    match (recent, latest.has_unaddressed_flaws()) {
        (true, false) => Value::new(
            "audited_recently",
            Rating::Pass,
            "Audited recently",
            format!(
                "{} was audited by {} on {}, with all findings addressed.",
                ctx.wallet_name, latest.auditor, latest.date
            ),
        )
        .with_references(references),
        (true, true) => Value::new(
            "audit_flaws_unaddressed",
            Rating::Partial,
            "Audit findings unaddressed",
            format!(
                "{} was audited by {} on {}, but {} finding(s) remain open.",
                ctx.wallet_name,
                latest.auditor,
                latest.date,
                latest.unaddressed_flaws.len()
            ),
        )
        .with_how_to_improve(format!(
            "{} should address the open findings of its latest audit.",
            ctx.wallet_name
        ))
        .with_references(references),
        (false, _) => Value::new(
            "audit_stale",
            Rating::Partial,
            "Audit outdated",
            format!(
                "The latest audit of {} dates from {}, {} days before {}.",
                ctx.wallet_name, latest.date, age_days, ctx.settings.as_of
            ),
        )
        .with_how_to_improve(format!(
            "{} should commission a fresh audit.",
            ctx.wallet_name
        ))
        .with_references(references),
    }
}

fn no_hardware_wallet_support(ctx: &VariantContext<'_>) -> Value {
    Value::new(
        "no_hardware_wallet_support",
        Rating::Fail,
        "No hardware wallet support",
        format!("{} does not support hardware wallets.", ctx.wallet_name),
    )
    .with_how_to_improve(format!(
        "{} should add support for popular hardware wallets.",
        ctx.wallet_name
    ))
}

fn evaluate_hardware_wallet_support(ctx: &VariantContext<'_>) -> Value {
    let support = match require(
        &HARDWARE_WALLET_SUPPORT,
        ctx,
        ctx.resolve(&ctx.features.security.hardware_wallet_support),
        || no_hardware_wallet_support(ctx),
    ) {
        Ok(support) => support,
        Err(value) => return value,
    };

    let manufacturers = support.supported_manufacturers();
    if manufacturers.is_empty() {
        return no_hardware_wallet_support(ctx);
    }

    let names = manufacturers
        .iter()
        .map(|manufacturer| manufacturer.label())
        .collect::<Vec<_>>()
        .join(", ");
    let references = support.references.iter().cloned();
    let multi_vendor = manufacturers.len() >= MULTI_VENDOR_MANUFACTURERS;

    if support.only_wallet_connect() {
        let id = if multi_vendor {
            INDIRECT_MULTI_VENDOR_SUPPORT
        } else {
            "indirect_hardware_wallet_support"
        };
        return Value::new(
            id,
            Rating::Partial,
            "Indirect hardware wallet support",
            format!(
                "{} reaches {names} only through WalletConnect, which requires additional software.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should integrate hardware wallets directly.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    let id = if multi_vendor {
        MULTI_VENDOR_SUPPORT
    } else {
        "direct_hardware_wallet_support"
    };
    Value::new(
        id,
        Rating::Pass,
        "Supports hardware wallets",
        format!("{} supports {names}.", ctx.wallet_name),
    )
    .with_references(references)
}

fn evaluate_chain_verification(ctx: &VariantContext<'_>) -> Value {
    let no_verification = || {
        Value::new(
            "no_chain_verification",
            Rating::Fail,
            "No chain verification",
            format!(
                "{} trusts its RPC provider for L1 chain state.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should verify L1 state with an embedded light client.",
            ctx.wallet_name
        ))
    };

    match require(
        &CHAIN_VERIFICATION,
        ctx,
        ctx.resolve(&ctx.features.security.chain_verification),
        no_verification,
    ) {
        Ok(client) => Value::new(
            "light_client",
            Rating::Pass,
            "Verifies the L1 chain",
            format!(
                "{} verifies L1 chain state using {}.",
                ctx.wallet_name,
                client.label()
            ),
        ),
        Err(value) => value,
    }
}

fn evaluate_bug_bounty_program(ctx: &VariantContext<'_>) -> Value {
    let no_program = || {
        Value::new(
            "no_bug_bounty",
            Rating::Fail,
            "No bug bounty program",
            format!("{} has no bug bounty program.", ctx.wallet_name),
        )
        .with_how_to_improve(format!(
            "{} should reward researchers who responsibly disclose vulnerabilities.",
            ctx.wallet_name
        ))
    };

    let program = match require(
        &BUG_BOUNTY_PROGRAM,
        ctx,
        ctx.resolve(&ctx.features.security.bug_bounty_program),
        no_program,
    ) {
        Ok(program) => program,
        Err(value) => return value,
    };

    if !program.exists() {
        return no_program();
    }

    let active = program.availability == BugBountyAvailability::Active;
    let full_coverage = program.coverage_breadth == CoverageBreadth::Full;
    let rewarded = program.has_reward_range();
    let protected = program.legal_protection.is_protected();
    let references = program.references.iter().cloned();

    if active && full_coverage && rewarded && protected {
        return Value::new(
            "comprehensive_bug_bounty",
            Rating::Pass,
            "Comprehensive bug bounty program",
            format!(
                "{} runs an active bug bounty covering all components, with rewards and legal protection for researchers.",
                ctx.wallet_name
            ),
        )
        .with_references(references);
    }

    let missing = [
        (!active, "the program is not active"),
        (!full_coverage, "coverage is not complete"),
        (!rewarded, "the reward range is unclear"),
        (!protected, "researchers have no legal protection"),
    ]
    .into_iter()
    .filter(|(missing, _)| *missing)
    .map(|(_, reason)| reason)
    .collect::<Vec<_>>();

    if active || full_coverage || rewarded || protected {
        return Value::new(
            "limited_bug_bounty",
            Rating::Partial,
            "Limited bug bounty program",
            format!(
                "{} has a bug bounty program, but {}.",
                ctx.wallet_name,
                missing.join(" and ")
            ),
        )
        .with_how_to_improve(format!(
            "{} should expand its bug bounty program.",
            ctx.wallet_name
        ))
        .with_references(references);
    }

    Value::new(
        "ineffective_bug_bounty",
        Rating::Fail,
        "Ineffective bug bounty program",
        format!(
            "{} lists a bug bounty program, but {}.",
            ctx.wallet_name,
            missing.join(" and ")
        ),
    )
    .with_references(references)
}

fn evaluate_account_recovery(ctx: &VariantContext<'_>) -> Value {
    let no_guardians = || {
        Value::new(
            "no_guardian_recovery",
            Rating::Fail,
            "No account recovery mechanism",
            format!(
                "{} has no guardian-based recovery. Losing the seed phrase means losing the account.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should let users recover their account through guardians.",
            ctx.wallet_name
        ))
    };

    let recovery = match require(
        &ACCOUNT_RECOVERY,
        ctx,
        ctx.resolve(&ctx.features.security.account_recovery),
        no_guardians,
    ) {
        Ok(recovery) => recovery,
        Err(value) => return value,
    };
    let references = recovery.references.iter().cloned();
    let Some(policy) = &recovery.guardian_policy else {
        return no_guardians().with_references(references);
    };

    let failures = guardians::outcomes(policy)
        .into_iter()
        .filter(|outcome| !outcome.recoverable())
        .map(|outcome| {
            (
                outcome.scenario.description(),
                outcome.unrecoverable.unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();

    let value = match failures.as_slice() {
        [] => Value::new(
            "guardian_policy_recoverable",
            Rating::Pass,
            "Account recoverable in all likely scenarios",
            format!(
                "{} can recover the account whichever single guardian or provider fails.",
                ctx.wallet_name
            ),
        ),
        [(scenario, reason)] => Value::new(
            "guardian_policy_nonrecoverable_specific_scenario",
            Rating::Fail,
            "Account may be lost",
            format!("{scenario}: {reason}"),
        )
        .with_how_to_improve(format!(
            "{} should require enough independent guardians to survive this case.",
            ctx.wallet_name
        )),
        many => Value::new(
            "guardian_policy_nonrecoverable_multiple_scenarios",
            Rating::Fail,
            "Account may be lost",
            format!(
                "{} cannot recover the account in {} scenarios: {}.",
                ctx.wallet_name,
                many.len(),
                many.iter()
                    .map(|(scenario, _)| scenario.to_lowercase())
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
        )
        .with_how_to_improve(format!(
            "{} should diversify its guardians so no single failure locks users out.",
            ctx.wallet_name
        )),
    };
    value.with_references(references)
}

fn evaluate_transaction_legibility(ctx: &VariantContext<'_>) -> Value {
    let illegible = || {
        Value::new(
            "no_transaction_legibility",
            Rating::Fail,
            "No transaction legibility",
            format!(
                "{} does not show what a transaction does before it is signed.",
                ctx.wallet_name
            ),
        )
    };

    match require(
        &TRANSACTION_LEGIBILITY,
        ctx,
        ctx.resolve(&ctx.features.security.transaction_legibility),
        illegible,
    ) {
        Ok(TransactionLegibility::Software(legibility)) => software_legibility(ctx, legibility),
        Ok(TransactionLegibility::Hardware(legibility)) => hardware_legibility(ctx, legibility),
        Err(value) => value,
    }
}

fn software_legibility(ctx: &VariantContext<'_>, legibility: &SoftwareLegibility) -> Value {
    let calldata = legibility.calldata_display;
    let shown = legibility.transaction_details.shown_count();
    let signing_legible = legibility
        .message_signing
        .is_some_and(|signing| signing.is_legible());
    let signing_illegible = legibility.message_signing.is_some() && !signing_legible;

    let mut gaps = Vec::new();
    if !calldata.raw_hex {
        gaps.push("raw calldata is not shown".to_string());
    }
    if !calldata.copy_hex_to_clipboard {
        gaps.push("calldata cannot be copied".to_string());
    }
    if !calldata.formatted {
        gaps.push("calldata is not decoded".to_string());
    }
    let hidden = legibility
        .transaction_details
        .fields()
        .into_iter()
        .filter(|(_, display)| !display.is_shown())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    if !hidden.is_empty() {
        gaps.push(format!("{} are never shown", hidden.join(", ")));
    }
    if !signing_legible {
        gaps.push("typed messages cannot be verified".to_string());
    }

    let rating = if !calldata.raw_hex
        || (!calldata.copy_hex_to_clipboard && !calldata.formatted)
        || shown < 3
        || signing_illegible
    {
        Rating::Fail
    } else if gaps.is_empty() {
        Rating::Pass
    } else {
        Rating::Partial
    };

    let references = legibility.references.iter().cloned();
    let value = match rating {
        Rating::Pass => Value::new(
            "software_full_transaction_legibility",
            Rating::Pass,
            "Full transaction legibility",
            format!(
                "{} shows raw and decoded calldata, every transaction detail and verifiable message hashes.",
                ctx.wallet_name
            ),
        ),
        Rating::Partial => Value::new(
            "software_partial_transaction_legibility",
            Rating::Partial,
            "Partial transaction legibility",
            format!("In {}, {}.", ctx.wallet_name, gaps.join("; ")),
        ),
        _ => Value::new(
            "software_no_transaction_legibility",
            Rating::Fail,
            "Poor transaction legibility",
            format!("In {}, {}.", ctx.wallet_name, gaps.join("; ")),
        ),
    };
    match rating {
        Rating::Pass => value.with_references(references),
        _ => value
            .with_how_to_improve(format!(
                "{} should show copyable, decoded calldata and every transaction detail before signing.",
                ctx.wallet_name
            ))
            .with_references(references),
    }
}

fn hardware_legibility(ctx: &VariantContext<'_>, legibility: &HardwareLegibility) -> Value {
    let complex_on_device = legibility.decodes_complex_on_device();
    let full_details = legibility.transaction_details.is_full();
    let extraction = legibility.data_extraction;
    let signing_legible = legibility.message_signing.is_some_and(|signing| {
        signing.decoded == DataDecoded::OnDevice && signing.provides.is_legible()
    });
    let signing_illegible = legibility.message_signing.is_some() && !signing_legible;
    let references = legibility.references.iter().cloned();

    if complex_on_device && full_details && extraction.all() && signing_legible {
        return Value::new(
            "hardware_full_transaction_legibility",
            Rating::Pass,
            "Full transaction legibility",
            format!(
                "{} decodes nested transactions on the device, shows every detail and lets users extract signing data.",
                ctx.wallet_name
            ),
        )
        .with_references(references);
    }

    let how_to_improve = format!(
        "{} should decode complex calldata on the device and show every transaction detail by default.",
        ctx.wallet_name
    );

    if (!legibility.decodes_anything() && !full_details && !extraction.any()) || signing_illegible {
        return Value::new(
            "hardware_no_transaction_legibility",
            Rating::Fail,
            "Blind signing",
            format!(
                "{} asks users to sign data they cannot read or verify on the device.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }

    if legibility.decodes_anything() && !full_details {
        let hidden = legibility.transaction_details.hidden_by_default();
        return Value::new(
            "hardware_partial_transaction_legibility",
            Rating::Partial,
            "Partial transaction legibility",
            format!(
                "{} decodes some calldata, but {} are not shown by default.",
                ctx.wallet_name,
                hidden.join(", ")
            ),
        )
        .with_how_to_improve(how_to_improve)
        .with_references(references);
    }

    Value::new(
        "hardware_basic_transaction_legibility",
        Rating::Partial,
        "Basic transaction legibility",
        format!(
            "{} shows some transaction data on the device, but not enough to verify complex transactions.",
            ctx.wallet_name
        ),
    )
    .with_how_to_improve(how_to_improve)
    .with_references(references)
}

fn evaluate_hardware_wallet_app_signing(ctx: &VariantContext<'_>) -> Value {
    let blind = || {
        Value::new(
            "no_app_signing",
            Rating::Fail,
            "No app signing",
            format!(
                "{} cannot show what apps ask it to sign in a verifiable way.",
                ctx.wallet_name
            ),
        )
        .with_how_to_improve(format!(
            "{} should decode app requests on the device and offer QR or hash extraction.",
            ctx.wallet_name
        ))
    };

    if let Feature::Supported(accounts) = ctx.resolve(&ctx.features.ecosystem.account_support) {
        if accounts.only_erc4337() {
            return exempt(
                &HARDWARE_WALLET_APP_SIGNING,
                format!(
                    "{} only signs ERC-4337 user operations, which apps do not request directly.",
                    ctx.wallet_name
                ),
            );
        }
    }

    let signing = match require(
        &HARDWARE_WALLET_APP_SIGNING,
        ctx,
        ctx.resolve(&ctx.features.security.hardware_wallet_app_signing),
        blind,
    ) {
        Ok(signing) => signing,
        Err(value) => return value,
    };
    let references = signing.references.iter().cloned();
    let full_details = signing.transaction_details.is_full();

    if signing.message_extraction.machine_readable()
        && signing.decodes_complex_messages()
        && signing.calldata_extraction.machine_readable()
        && signing.decodes_complex_calldata()
        && full_details
    {
        return Value::new(
            "full_app_signing",
            Rating::Pass,
            "Full app signing",
            format!(
                "{} decodes nested app requests on the device and exports them for cross-checking.",
                ctx.wallet_name
            ),
        )
        .with_references(references);
    }

    if (!signing.message_extraction.any() || !signing.calldata_extraction.any()) && !full_details
    {
        return blind().with_references(references);
    }

    let (id, display_name) =
        if signing.message_decoding.is_empty() || signing.calldata_decoding.is_empty() {
            ("partial_app_signing", "Partial app signing")
        } else {
            ("basic_app_signing", "Basic app signing")
        };
    Value::new(
        id,
        Rating::Partial,
        display_name,
        format!(
            "{} shows part of what apps ask it to sign, but not enough to verify every request.",
            ctx.wallet_name
        ),
    )
    .with_how_to_improve(format!(
        "{} should decode nested Safe transactions on the device and show every transaction detail.",
        ctx.wallet_name
    ))
    .with_references(references)
}
