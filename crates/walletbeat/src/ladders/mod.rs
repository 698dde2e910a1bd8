//! Maturity ladders: ordered stages of gated criteria evaluated against a
//! rated attribute tree.

mod hardware;
mod software;

use crate::attributes::{AttributeId, AttributeTree, Rating, Value};
use crate::variants::{Variant, VariantSet, WalletType};
use crate::wallet::RatedAttributeTree;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderType {
    Software,
    Hardware,
}

impl LadderType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Software, Self::Hardware]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Software => "Software wallet stages",
            Self::Hardware => "Hardware wallet stages",
        }
    }

    pub fn ladder(self) -> &'static Ladder {
        match self {
            Self::Software => &software::SOFTWARE_LADDER,
            Self::Hardware => &hardware::HARDWARE_LADDER,
        }
    }

    /// Ladder meant for wallets of the given type, if any.
    pub fn for_wallet_type(wallet_type: WalletType) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|ladder_type| ladder_type.ladder().audience.contains(&wallet_type))
    }
}

/// What a criterion needs from its attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Pass,
    AtLeastPartial,
    ScoreAtLeast(f64),
    /// The value must carry one of these ids, whatever its rating.
    OneOf(&'static [&'static str]),
}

impl Requirement {
    fn satisfied_by(self, value: &Value) -> bool {
        match self {
            Requirement::Pass => value.rating == Rating::Pass,
            Requirement::AtLeastPartial => {
                matches!(value.rating, Rating::Pass | Rating::Partial)
            }
            Requirement::ScoreAtLeast(threshold) => {
                value.score().is_some_and(|score| score >= threshold)
            }
            Requirement::OneOf(ids) => ids.contains(&value.id.as_str()),
        }
    }

    fn describe(self) -> String {
        match self {
            Requirement::Pass => "a passing rating".to_string(),
            Requirement::AtLeastPartial => "at least a partial rating".to_string(),
            Requirement::ScoreAtLeast(threshold) => format!("a score of at least {threshold}"),
            Requirement::OneOf(ids) => format!("one of {}", ids.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionRating {
    Pass,
    Fail,
    Exempt,
    Unrated,
}

impl CriterionRating {
    /// Exempt criteria do not block a stage; unrated ones do.
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Pass | Self::Exempt)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Exempt => "exempt",
            Self::Unrated => "unrated",
        }
    }
}

/// A single gate of a stage, expressed against one attribute.
#[derive(Debug, Serialize)]
pub struct Criterion {
    pub id: &'static str,
    pub description: &'static str,
    pub rationale: &'static str,
    pub attribute: AttributeId,
    pub requirement: Requirement,
    /// Variants the criterion looks at; `None` reads the reconciled value.
    pub variants: Option<&'static [Variant]>,
    /// Outcome when the attribute is absent or no variant is in scope.
    pub if_not_applicable: CriterionRating,
}

#[derive(Debug, Serialize)]
pub struct CriteriaGroup {
    pub id: &'static str,
    pub description: &'static str,
    pub criteria: &'static [Criterion],
}

#[derive(Debug, Serialize)]
pub struct Stage {
    pub label: &'static str,
    pub groups: &'static [CriteriaGroup],
}

impl Stage {
    pub fn criteria(&self) -> impl Iterator<Item = &'static Criterion> {
        self.groups.iter().flat_map(|group| group.criteria.iter())
    }
}

#[derive(Debug, Serialize)]
pub struct Ladder {
    pub ladder_type: LadderType,
    pub audience: &'static [WalletType],
    pub stages: &'static [Stage],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderStage {
    NotApplicable,
    QualifiedForNoStages,
    Stage(usize),
}

impl LadderStage {
    pub fn label(self) -> String {
        match self {
            LadderStage::NotApplicable => "not applicable".to_string(),
            LadderStage::QualifiedForNoStages => "no stage".to_string(),
            LadderStage::Stage(index) => format!("stage {index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionResult {
    pub id: &'static str,
    pub attribute: AttributeId,
    pub rating: CriterionRating,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub index: usize,
    pub label: &'static str,
    pub satisfied: bool,
    pub criteria: Vec<CriterionResult>,
}

/// One ladder's verdict for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletLadderEvaluation {
    pub ladder_type: LadderType,
    pub stage: LadderStage,
    /// Every stage is evaluated, including those beyond the reached one.
    pub stages: Vec<StageResult>,
}

/// Places a rated wallet on a ladder.
pub fn evaluate_ladder(
    ladder: &Ladder,
    tree: &RatedAttributeTree,
    variants: &VariantSet,
) -> WalletLadderEvaluation {
    let wallet_types = variants.wallet_types();
    if !ladder
        .audience
        .iter()
        .any(|wallet_type| wallet_types.contains(wallet_type))
    {
        debug!(ladder = ?ladder.ladder_type, "ladder not applicable to wallet types");
        return WalletLadderEvaluation {
            ladder_type: ladder.ladder_type,
            stage: LadderStage::NotApplicable,
            stages: Vec::new(),
        };
    }

    let stages: Vec<StageResult> = ladder
        .stages
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let criteria: Vec<CriterionResult> = stage
                .criteria()
                .map(|criterion| evaluate_criterion(criterion, tree, variants))
                .collect();
            StageResult {
                index,
                label: stage.label,
                satisfied: criteria.iter().all(|result| result.rating.is_satisfied()),
                criteria,
            }
        })
        .collect();

    let reached = stages.iter().take_while(|stage| stage.satisfied).count();
    let stage = match reached {
        0 => LadderStage::QualifiedForNoStages,
        reached => LadderStage::Stage(reached - 1),
    };
    debug!(ladder = ?ladder.ladder_type, stage = ?stage, "ladder evaluated");

    WalletLadderEvaluation {
        ladder_type: ladder.ladder_type,
        stage,
        stages,
    }
}

fn result(criterion: &Criterion, rating: CriterionRating, explanation: String) -> CriterionResult {
    CriterionResult {
        id: criterion.id,
        attribute: criterion.attribute,
        rating,
        explanation,
    }
}

/// Rates one criterion from the rated tree alone.
pub fn evaluate_criterion(
    criterion: &Criterion,
    tree: &RatedAttributeTree,
    variants: &VariantSet,
) -> CriterionResult {
    let not_applicable = |why: String| result(criterion, criterion.if_not_applicable, why);

    let Some(node) = tree.attribute_node(criterion.attribute) else {
        return not_applicable(format!(
            "{} does not apply to this wallet.",
            criterion.attribute
        ));
    };

    let Some(scope) = criterion.variants else {
        return rate_values(criterion, std::iter::once(&node.value));
    };

    let in_scope: Vec<&Value> = variants
        .in_scope(scope)
        .into_iter()
        .filter_map(|variant| node.per_variant.get(&variant))
        .collect();
    if in_scope.is_empty() {
        return not_applicable(format!(
            "No variant of this wallet is in scope for {}.",
            criterion.id
        ));
    }
    rate_values(criterion, in_scope.into_iter())
}

fn rate_values<'a>(
    criterion: &Criterion,
    values: impl Iterator<Item = &'a Value>,
) -> CriterionResult {
    let values: Vec<&Value> = values.collect();
    if let Some(value) = values.iter().find(|value| value.rating == Rating::Unrated) {
        return result(
            criterion,
            CriterionRating::Unrated,
            format!("{} is not rated yet.", value.display_name),
        );
    }

    let rated: Vec<&&Value> = values
        .iter()
        .filter(|value| value.rating != Rating::Exempt)
        .collect();
    if rated.is_empty() {
        return result(
            criterion,
            CriterionRating::Exempt,
            format!("{} does not apply.", criterion.attribute),
        );
    }

    match rated
        .iter()
        .find(|value| !criterion.requirement.satisfied_by(value))
    {
        Some(value) => result(
            criterion,
            CriterionRating::Fail,
            format!(
                "{} ({}) falls short of {}.",
                value.display_name,
                value.rating,
                criterion.requirement.describe()
            ),
        ),
        None => result(
            criterion,
            CriterionRating::Pass,
            criterion.description.to_string(),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LadderError {
    #[error("{ladder:?} ladder has no stages")]
    NoStages { ladder: LadderType },
    #[error("criterion `{criterion}` references attribute `{attribute}` missing from the tree")]
    UnknownAttribute {
        criterion: &'static str,
        attribute: AttributeId,
    },
    #[error("criterion `{criterion}` appears twice in stage {stage} of the {ladder:?} ladder")]
    DuplicateCriterion {
        ladder: LadderType,
        stage: usize,
        criterion: &'static str,
    },
    #[error("criterion `{criterion}` has threshold {threshold} outside [0, 1]")]
    InvalidThreshold {
        criterion: &'static str,
        threshold: f64,
    },
}

/// Checks every ladder against the attribute tree it will be read from.
pub fn validate_ladders(tree: &AttributeTree) -> Result<(), LadderError> {
    for ladder_type in LadderType::ordered() {
        let ladder = ladder_type.ladder();
        if ladder.stages.is_empty() {
            return Err(LadderError::NoStages {
                ladder: ladder_type,
            });
        }

        for (index, stage) in ladder.stages.iter().enumerate() {
            let mut ids = BTreeSet::new();
            for criterion in stage.criteria() {
                if !ids.insert(criterion.id) {
                    return Err(LadderError::DuplicateCriterion {
                        ladder: ladder_type,
                        stage: index,
                        criterion: criterion.id,
                    });
                }
                if !tree.contains(criterion.attribute) {
                    return Err(LadderError::UnknownAttribute {
                        criterion: criterion.id,
                        attribute: criterion.attribute,
                    });
                }
                if let Requirement::ScoreAtLeast(threshold) = criterion.requirement {
                    if !(0.0..=1.0).contains(&threshold) {
                        return Err(LadderError::InvalidThreshold {
                            criterion: criterion.id,
                            threshold,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Where a criterion sits in the ladders.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CriterionUsage {
    pub ladder: LadderType,
    pub stage: usize,
    pub criterion: &'static Criterion,
}

/// Every criterion that reads `attribute`, in ladder then stage order.
pub fn attribute_criteria(attribute: AttributeId) -> Vec<CriterionUsage> {
    LadderType::ordered()
        .into_iter()
        .flat_map(|ladder| {
            ladder
                .ladder()
                .stages
                .iter()
                .enumerate()
                .flat_map(move |(stage, definition)| {
                    definition
                        .criteria()
                        .filter(move |criterion| criterion.attribute == attribute)
                        .map(move |criterion| CriterionUsage {
                            ladder,
                            stage,
                            criterion,
                        })
                })
        })
        .collect()
}

/// Stage indices per ladder that read `attribute`.
pub fn attribute_stages(attribute: AttributeId) -> BTreeMap<LadderType, Vec<usize>> {
    let mut stages: BTreeMap<LadderType, Vec<usize>> = BTreeMap::new();
    for usage in attribute_criteria(attribute) {
        let entry = stages.entry(usage.ladder).or_default();
        if entry.last() != Some(&usage.stage) {
            entry.push(usage.stage);
        }
    }
    stages
}

pub fn is_attribute_used_in_stages(attribute: AttributeId) -> bool {
    !attribute_criteria(attribute).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladders_validate_against_standard_tree() {
        validate_ladders(&AttributeTree::standard()).expect("ladders validate");
    }

    #[test]
    fn ladders_target_distinct_wallet_types() {
        assert_eq!(
            LadderType::for_wallet_type(WalletType::Software),
            Some(LadderType::Software)
        );
        assert_eq!(
            LadderType::for_wallet_type(WalletType::Hardware),
            Some(LadderType::Hardware)
        );
        assert_eq!(LadderType::for_wallet_type(WalletType::Embedded), None);
    }

    #[test]
    fn usage_queries_agree_with_ladder_definitions() {
        for attribute in AttributeId::ALL {
            let mut expected: BTreeMap<LadderType, Vec<usize>> = BTreeMap::new();
            for ladder in LadderType::ordered() {
                for (index, stage) in ladder.ladder().stages.iter().enumerate() {
                    if stage.criteria().any(|criterion| criterion.attribute == attribute) {
                        expected.entry(ladder).or_default().push(index);
                    }
                }
            }
            assert_eq!(attribute_stages(attribute), expected, "{attribute}");
            assert_eq!(
                is_attribute_used_in_stages(attribute),
                !expected.is_empty(),
                "{attribute}"
            );
        }
    }

    #[test]
    fn source_visibility_gates_stage_zero_of_both_ladders() {
        let stages = attribute_stages(AttributeId::SourceVisibility);
        assert_eq!(stages.get(&LadderType::Software), Some(&vec![0]));
        assert_eq!(stages.get(&LadderType::Hardware), Some(&vec![0]));
    }

    #[test]
    fn score_requirements_compare_against_threshold() {
        let partial = Value::new("p", Rating::Partial, "P", "");
        assert!(Requirement::ScoreAtLeast(0.5).satisfied_by(&partial));
        assert!(!Requirement::ScoreAtLeast(0.75).satisfied_by(&partial));
        assert!(Requirement::AtLeastPartial.satisfied_by(&partial));
        assert!(!Requirement::Pass.satisfied_by(&partial));
    }

    #[test]
    fn id_requirements_ignore_the_rating() {
        let requirement = Requirement::OneOf(&["wide", "wider"]);
        assert!(requirement.satisfied_by(&Value::new("wider", Rating::Partial, "W", "")));
        assert!(!requirement.satisfied_by(&Value::new("narrow", Rating::Pass, "N", "")));
    }
}
