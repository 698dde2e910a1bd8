//! Rates crypto wallets from maintainer-authored feature records: per-variant
//! attribute evaluation, weighted aggregation up an attribute tree, and
//! placement on staged maturity ladders.

pub mod attributes;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod ladders;
pub mod score;
pub mod telemetry;
pub mod variants;
pub mod wallet;

pub use attributes::{AttributeId, AttributeTree, Rating, Value};
pub use engine::{rate_wallet, RatingEngine, RatingError};
pub use features::{RatingSettings, WalletFeatures};
pub use ladders::{LadderStage, LadderType, WalletLadderEvaluation};
pub use variants::{Variant, VariantSet, WalletType};
pub use wallet::{
    get_wallet_stage_and_ladder, unrated_template, BaseWallet, RatedWallet, StageLookup,
    WalletMetadata,
};
