use serde::{Deserialize, Serialize};

/// One child's contribution to a weighted aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScore {
    /// `None` for unrated children.
    pub score: Option<f64>,
    pub weight: f64,
}

impl WeightedScore {
    pub fn new(score: Option<f64>, weight: f64) -> Self {
        Self { score, weight }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("cannot aggregate an empty set of scores")]
    Empty,
    #[error("weight {weight} at position {index} must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("score {score} at position {index} is outside [0, 1]")]
    ScoreOutOfRange { index: usize, score: f64 },
    #[error("total weight is zero while at least one score is rated")]
    ZeroTotalWeight,
}

/// Weighted mean of child scores.
///
/// Unrated children count as zero but keep their weight, so missing research
/// drags an aggregate down instead of being silently ignored. Returns
/// `Ok(None)` only when every child is unrated. Exempt children must be
/// filtered out by the caller.
pub fn weighted_score(scores: &[WeightedScore]) -> Result<Option<f64>, ScoreError> {
    if scores.is_empty() {
        return Err(ScoreError::Empty);
    }

    for (index, entry) in scores.iter().enumerate() {
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            return Err(ScoreError::InvalidWeight {
                index,
                weight: entry.weight,
            });
        }
        if let Some(score) = entry.score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ScoreError::ScoreOutOfRange { index, score });
            }
        }
    }

    if scores.iter().all(|entry| entry.score.is_none()) {
        return Ok(None);
    }

    let total_weight: f64 = scores.iter().map(|entry| entry.weight).sum();
    if total_weight == 0.0 {
        return Err(ScoreError::ZeroTotalWeight);
    }

    let weighted_sum: f64 = scores
        .iter()
        .map(|entry| entry.score.unwrap_or(0.0) * entry.weight)
        .sum();

    Ok(Some((weighted_sum / total_weight).clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(score: Option<f64>, weight: f64) -> WeightedScore {
        WeightedScore::new(score, weight)
    }

    #[test]
    fn unrated_children_keep_their_weight() {
        let result = weighted_score(&[ws(Some(1.0), 1.0), ws(Some(0.5), 1.0), ws(None, 2.0)])
            .expect("valid input");
        assert_eq!(result, Some(0.375));
    }

    #[test]
    fn all_unrated_yields_none() {
        let result = weighted_score(&[ws(None, 1.0), ws(None, 3.0)]).expect("valid input");
        assert_eq!(result, None);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(weighted_score(&[]), Err(ScoreError::Empty));
    }

    #[test]
    fn invalid_weights_and_scores_are_rejected() {
        assert_eq!(
            weighted_score(&[ws(Some(1.0), -1.0)]),
            Err(ScoreError::InvalidWeight {
                index: 0,
                weight: -1.0
            })
        );
        assert!(matches!(
            weighted_score(&[ws(Some(1.0), 1.0), ws(Some(0.2), f64::NAN)]),
            Err(ScoreError::InvalidWeight { index: 1, .. })
        ));
        assert_eq!(
            weighted_score(&[ws(Some(1.5), 1.0)]),
            Err(ScoreError::ScoreOutOfRange {
                index: 0,
                score: 1.5
            })
        );
    }

    #[test]
    fn zero_total_weight_with_rated_child_is_an_error() {
        assert_eq!(
            weighted_score(&[ws(Some(1.0), 0.0), ws(None, 0.0)]),
            Err(ScoreError::ZeroTotalWeight)
        );
    }

    #[test]
    fn result_stays_within_bounds() {
        let grids: [&[WeightedScore]; 4] = [
            &[ws(Some(0.0), 1.0)],
            &[ws(Some(1.0), 5.0), ws(Some(1.0), 0.5)],
            &[ws(Some(0.5), 2.0), ws(None, 1.0), ws(Some(0.0), 0.0)],
            &[ws(Some(1.0), 1e9), ws(Some(0.0), 1e-9)],
        ];
        for scores in grids {
            let result = weighted_score(scores)
                .expect("valid input")
                .expect("some score rated");
            assert!((0.0..=1.0).contains(&result), "{result} out of bounds");
        }
    }

    #[test]
    fn raising_one_child_never_lowers_the_aggregate() {
        let steps = [None, Some(0.0), Some(0.5), Some(1.0)];
        let mut previous = 0.0;
        for step in steps {
            let result = weighted_score(&[ws(Some(0.5), 1.0), ws(step, 2.0)])
                .expect("valid input")
                .unwrap_or(0.0);
            assert!(result >= previous, "{result} < {previous}");
            previous = result;
        }
    }

    #[test]
    fn removing_an_exempt_child_changes_only_the_denominator() {
        let with_all = weighted_score(&[ws(Some(1.0), 1.0), ws(Some(0.0), 1.0)])
            .expect("valid input");
        let exempt_removed = weighted_score(&[ws(Some(1.0), 1.0)]).expect("valid input");
        assert_eq!(with_all, Some(0.5));
        assert_eq!(exempt_removed, Some(1.0));
    }
}
