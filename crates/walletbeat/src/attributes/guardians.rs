//! What-if analysis of guardian recovery policies: which guardians can lose
//! their share together, which third parties can turn against the user, and
//! whether the account survives each case.

use crate::features::{Guardian, GuardianPolicy, SecretReconstitution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scenario<'a> {
    /// These guardians lose their shares at the same time.
    DataLoss {
        lost: Vec<&'a Guardian>,
        description: String,
    },
    /// This entity acts against the user.
    EntityTurnsEvil { entity: &'a str },
}

impl Scenario<'_> {
    pub(crate) fn description(&self) -> String {
        match self {
            Scenario::DataLoss { description, .. } => description.clone(),
            Scenario::EntityTurnsEvil { entity } => {
                format!("{entity} turns evil or is compromised")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Outcome<'a> {
    pub(crate) scenario: Scenario<'a>,
    /// Why recovery becomes impossible, if it does.
    pub(crate) unrecoverable: Option<&'static str>,
    pub(crate) taken_over: bool,
}

impl Outcome<'_> {
    pub(crate) fn recoverable(&self) -> bool {
        self.unrecoverable.is_none()
    }
}

/// Every scenario the policy is exposed to, with its outcome.
pub(crate) fn outcomes(policy: &GuardianPolicy) -> Vec<Outcome<'_>> {
    let guardians: Vec<&Guardian> = policy.guardians().collect();
    data_loss_scenarios(&guardians)
        .into_iter()
        .chain(evil_entity_scenarios(&guardians))
        .map(|scenario| evaluate(policy, scenario))
        .collect()
}

fn data_loss_scenarios<'a>(guardians: &[&'a Guardian]) -> Vec<Scenario<'a>> {
    let mut scenarios: Vec<Scenario<'a>> = guardians
        .iter()
        .map(|guardian| Scenario::DataLoss {
            lost: vec![*guardian],
            description: guardian.loss_description(),
        })
        .collect();

    let same_device: Vec<&Guardian> = guardians
        .iter()
        .copied()
        .filter(|guardian| guardian.on_user_device())
        .collect();
    if same_device.len() > 1 {
        scenarios.push(Scenario::DataLoss {
            lost: same_device,
            description: "User loses the device that also holds their passkey".to_string(),
        });
    }

    for entity in entities(guardians) {
        let held: Vec<&Guardian> = guardians
            .iter()
            .copied()
            .filter(|guardian| guardian.entity() == Some(entity))
            .collect();
        if held.len() > 1 {
            scenarios.push(Scenario::DataLoss {
                lost: held,
                description: format!("{entity} loses all of its data"),
            });
        }
    }
    scenarios
}

fn evil_entity_scenarios<'a>(guardians: &[&'a Guardian]) -> Vec<Scenario<'a>> {
    entities(guardians)
        .into_iter()
        .map(|entity| Scenario::EntityTurnsEvil { entity })
        .collect()
}

/// Distinct third parties, in first-seen order.
fn entities<'a>(guardians: &[&'a Guardian]) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for entity in guardians.iter().filter_map(|guardian| guardian.entity()) {
        if !seen.contains(&entity) {
            seen.push(entity);
        }
    }
    seen
}

fn evaluate<'a>(policy: &GuardianPolicy, scenario: Scenario<'a>) -> Outcome<'a> {
    let (unrecoverable, taken_over) = match &scenario {
        Scenario::DataLoss { lost, .. } => (data_loss(policy, lost), false),
        Scenario::EntityTurnsEvil { entity } => evil_entity(policy, entity),
    };
    Outcome {
        scenario,
        unrecoverable,
        taken_over,
    }
}

fn data_loss(policy: &GuardianPolicy, lost: &[&Guardian]) -> Option<&'static str> {
    // Guardians are compared by slot, so two equal guardians are two shares.
    let is_lost = |guardian: &Guardian| lost.iter().any(|gone| std::ptr::eq(*gone, guardian));

    if policy.required_guardians.iter().any(is_lost) {
        return Some("A required guardian is gone, so recovery is no longer possible.");
    }

    let lost_optional = policy
        .optional_guardians
        .iter()
        .filter(|guardian| is_lost(guardian))
        .count();
    let tolerable = policy
        .optional_guardians_minimum_configurable
        .saturating_sub(policy.optional_guardians_needed_for_recovery);
    (lost_optional > tolerable).then_some("Not enough recovery shares are left.")
}

fn evil_entity(policy: &GuardianPolicy, entity: &str) -> (Option<&'static str>, bool) {
    let held_by = |guardian: &&Guardian| guardian.entity() == Some(entity);
    let evil_required = policy.required_guardians.iter().filter(held_by).count();
    let evil_optional = policy.optional_guardians.iter().filter(held_by).count();
    let needed = policy.optional_guardians_needed_for_recovery;

    let unrecoverable = if evil_required > 0 {
        Some("A required guardian can block the recovery process.")
    } else if matches!(
        &policy.secret_reconstitution,
        SecretReconstitution::Entity { entity: reconstitutor } if reconstitutor == entity
    ) {
        Some("The party reassembling the secret can block the recovery process.")
    } else if policy
        .optional_guardians_minimum_configurable
        .saturating_sub(evil_optional)
        < needed
    {
        Some("Not enough honest guardians are left to recover the account.")
    } else {
        None
    };

    let taken_over = evil_required == policy.required_guardians.len() && evil_optional >= needed;
    (unrecoverable, taken_over)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(entity: &str) -> Guardian {
        Guardian::WalletProvider {
            entity: entity.to_string(),
        }
    }

    fn two_of_three() -> GuardianPolicy {
        GuardianPolicy {
            optional_guardians: vec![
                Guardian::Passkey,
                Guardian::WalletPassword,
                Guardian::UserExternalAccount {
                    entity: "Mailbox".to_string(),
                    description: "email account".to_string(),
                },
            ],
            optional_guardians_minimum_configurable: 3,
            optional_guardians_needed_for_recovery: 2,
            ..GuardianPolicy::default()
        }
    }

    #[test]
    fn two_of_three_survives_every_single_failure() {
        let policy = two_of_three();
        let outcomes = outcomes(&policy);
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(Outcome::recoverable));
        assert!(outcomes.iter().all(|outcome| !outcome.taken_over));
    }

    #[test]
    fn shared_device_and_shared_entity_fail_together() {
        let policy = GuardianPolicy {
            optional_guardians: vec![
                Guardian::SelfCustody,
                Guardian::Passkey,
                provider("Acme"),
                provider("Acme"),
            ],
            optional_guardians_minimum_configurable: 4,
            optional_guardians_needed_for_recovery: 3,
            ..GuardianPolicy::default()
        };
        let unrecoverable = outcomes(&policy)
            .into_iter()
            .filter(|outcome| !outcome.recoverable())
            .map(|outcome| outcome.scenario.description())
            .collect::<Vec<_>>();
        assert_eq!(
            unrecoverable,
            [
                "User loses the device that also holds their passkey",
                "Acme loses all of its data",
                "Acme turns evil or is compromised",
            ]
        );
    }

    #[test]
    fn provider_holding_enough_shares_can_take_over() {
        let policy = GuardianPolicy {
            optional_guardians: vec![provider("Acme"), Guardian::WalletPassword],
            optional_guardians_minimum_configurable: 2,
            optional_guardians_needed_for_recovery: 1,
            ..GuardianPolicy::default()
        };
        let outcome = outcomes(&policy)
            .into_iter()
            .find(|outcome| matches!(outcome.scenario, Scenario::EntityTurnsEvil { .. }))
            .expect("evil provider scenario");
        assert!(outcome.taken_over);
        assert!(outcome.recoverable());
    }

    #[test]
    fn required_guardian_loss_is_unrecoverable() {
        let policy = GuardianPolicy {
            required_guardians: vec![provider("Acme")],
            optional_guardians: vec![Guardian::Passkey],
            optional_guardians_minimum_configurable: 1,
            optional_guardians_needed_for_recovery: 1,
            secret_reconstitution: SecretReconstitution::ClientSide,
        };
        let outcomes = outcomes(&policy);
        assert!(!outcomes[0].recoverable());
        assert!(!outcomes[1].recoverable());
        let evil = outcomes.last().expect("evil scenario");
        assert_eq!(
            evil.unrecoverable,
            Some("A required guardian can block the recovery process.")
        );
        assert!(!evil.taken_over);
    }
}
