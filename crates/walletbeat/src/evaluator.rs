//! Runs one attribute against every in-scope variant of a wallet and folds
//! the per-variant values into one.

use crate::attributes::{exempt, pick_best_rating, pick_worst_rating, unrated};
use crate::attributes::{Attribute, Reconciliation, Value};
use crate::features::{RatingSettings, VariantContext};
use crate::variants::Variant;
use crate::wallet::BaseWallet;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeOutcome {
    Rated {
        value: Value,
        per_variant: BTreeMap<Variant, Value>,
    },
    /// The attribute is dropped from this wallet's rated tree.
    Excluded,
}

impl AttributeOutcome {
    pub fn value(&self) -> Option<&Value> {
        match self {
            AttributeOutcome::Rated { value, .. } => Some(value),
            AttributeOutcome::Excluded => None,
        }
    }
}

pub fn evaluate_attribute(
    attribute: &Attribute,
    wallet: &BaseWallet,
    settings: &RatingSettings,
) -> AttributeOutcome {
    let name = wallet.metadata.display_name.as_str();
    let in_scope = wallet.variants.in_scope(attribute.applies_to);

    if in_scope.is_empty() {
        trace!(attribute = %attribute.id, "no variant in scope");
        if attribute.reconciliation == Reconciliation::NotApplicableIfNoVariantMatches {
            return AttributeOutcome::Excluded;
        }
        return AttributeOutcome::Rated {
            value: exempt(
                attribute,
                format!(
                    "{} does not apply to this wallet's variants.",
                    attribute.display_name
                ),
            ),
            per_variant: BTreeMap::new(),
        };
    }

    let per_variant: BTreeMap<Variant, Value> = in_scope
        .into_iter()
        .map(|variant| {
            let ctx = VariantContext::new(variant, name, &wallet.features, settings);
            let value = (attribute.evaluate)(&ctx);
            trace!(
                attribute = %attribute.id,
                variant = variant.label(),
                rating = %value.rating,
                "variant evaluated"
            );
            (variant, value)
        })
        .collect();

    let values: Vec<Value> = per_variant.values().cloned().collect();
    let reconciled = match attribute.reconciliation {
        Reconciliation::AnyVariantSuffices => pick_best_rating(&values),
        Reconciliation::AllVariantsMustPass | Reconciliation::NotApplicableIfNoVariantMatches => {
            pick_worst_rating(&values)
        }
    };
    let value = reconciled.unwrap_or_else(|| unrated(attribute, name));
    trace!(attribute = %attribute.id, rating = %value.rating, "attribute reconciled");

    AttributeOutcome::Rated { value, per_variant }
}
