use chrono::NaiveDate;
use serde::Serialize;
use walletbeat::error::AppError;
use walletbeat::ladders::CriterionRating;
use walletbeat::wallet::RatedNode;
use walletbeat::{get_wallet_stage_and_ladder, LadderType, Rating, RatedWallet};

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

fn score_label(node: &RatedNode) -> String {
    match node.value.score() {
        Some(score) => format!("{:.0}%", score * 100.0),
        None => "n/a".to_string(),
    }
}

fn unrated_marker(node: &RatedNode) -> &'static str {
    if node.has_unrated_component {
        " (incomplete)"
    } else {
        ""
    }
}

pub(crate) fn render_rated_wallet(wallet: &RatedWallet, as_of: NaiveDate) {
    let variants = wallet
        .variants
        .iter()
        .map(|variant| variant.label())
        .collect::<Vec<_>>()
        .join(", ");

    println!("\n{} ({})", wallet.metadata.display_name, wallet.metadata.id);
    println!(
        "Variants: {variants} | primary type: {} | rated as of {as_of}",
        wallet.primary_type.label()
    );

    let root = wallet.tree.root();
    println!(
        "Overall: {} | {}{}",
        wallet.overall_rating().label(),
        score_label(root),
        unrated_marker(root)
    );

    for group in wallet.tree.children(root) {
        println!(
            "\n{} [{} | {}]{}",
            group.display_name,
            group.value.rating.label(),
            score_label(group),
            unrated_marker(group)
        );
        for child in wallet.tree.children(group) {
            println!(
                "  - {}: {} ({})",
                child.display_name,
                child.value.rating.label(),
                child.value.details
            );
            if matches!(child.value.rating, Rating::Partial | Rating::Fail) {
                if let Some(improve) = &child.value.how_to_improve {
                    println!("      how to improve: {improve}");
                }
            }
        }
    }

    match get_wallet_stage_and_ladder(wallet) {
        Some(lookup) => {
            println!(
                "\n{} ladder: {}",
                lookup.ladder_type.label(),
                lookup.stage.label()
            );
            for stage in &lookup.evaluation.stages {
                let status = if stage.satisfied { "met" } else { "not met" };
                println!("  {} ({status})", stage.label);
                for criterion in stage
                    .criteria
                    .iter()
                    .filter(|criterion| !criterion.rating.is_satisfied())
                {
                    println!(
                        "    - {} [{}]: {}",
                        criterion.id,
                        criterion.rating.label(),
                        criterion.explanation
                    );
                }
            }
        }
        None => println!("\nNo stage ladder applies to this wallet."),
    }

    for ladder_type in LadderType::ordered() {
        if let Some(evaluation) = wallet.ladders.get(&ladder_type) {
            let blocked = evaluation
                .stages
                .iter()
                .flat_map(|stage| stage.criteria.iter())
                .filter(|criterion| criterion.rating == CriterionRating::Unrated)
                .count();
            if blocked > 0 {
                println!(
                    "{} ladder: {blocked} criteria await research",
                    ladder_type.label()
                );
            }
        }
    }
}
