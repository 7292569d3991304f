//! Scoring stage: run a scorer over every processed petition and persist the
//! evaluations.
//!
//! Each record gets its own artifact plus an entry in the aggregate list. A
//! scorer failure on one petition skips that record; the run keeps going so a
//! single flaky response never costs a whole batch.

use std::path::Path;

use anyhow::Context;
use petiscore_ai::Scorer;
use petiscore_core::{EvaluationRecord, GOLD_RATING, LOW_RATING_MAX, RatingStats};
use petiscore_store::{EvaluationArtifact, Workspace};
use tracing::warn;

pub async fn run(workspace: &Workspace, scorer: &dyn Scorer) -> anyhow::Result<()> {
    workspace.ensure_layout()?;
    let petitions = workspace
        .load_manifest()
        .context("loading processed-petition manifest")?;

    eprintln!(
        "Scoring {} petitions with the {} scorer...",
        petitions.len(),
        scorer.method()
    );

    let mut records = Vec::new();
    for (i, petition) in petitions.iter().enumerate() {
        eprintln!(
            "\n[{}/{}] request_id={} rating={}",
            i + 1,
            petitions.len(),
            petition.request_id,
            petition.rating
        );

        let txt_path = workspace.text_path(petition.request_id, petition.rating);
        let text = match std::fs::read_to_string(&txt_path) {
            Ok(text) => text,
            Err(e) => {
                warn!(request_id = petition.request_id, error = %e, "cannot read extracted text");
                continue;
            }
        };

        match scorer.evaluate(&text).await {
            Ok(evaluation) => {
                eprintln!("  Score: {}/100", evaluation.score);
                let record = EvaluationRecord {
                    request_id: petition.request_id,
                    customer_rating: petition.rating,
                    ai_score: evaluation.score,
                    evaluation: evaluation.clone(),
                    text_length: petition.text_length,
                    method: Some(scorer.method().to_string()),
                };
                workspace.save_evaluation(&EvaluationArtifact {
                    request_id: petition.request_id,
                    customer_rating: petition.rating,
                    evaluation,
                    metadata: petition.clone(),
                    method: scorer.method().to_string(),
                })?;
                records.push(record);
            }
            Err(e) => {
                warn!(request_id = petition.request_id, error = %e, "scoring failed, skipping");
            }
        }

        tokio::time::sleep(scorer.pause()).await;
    }

    workspace
        .save_all_evaluations(&records)
        .context("writing aggregate evaluations")?;

    eprintln!(
        "\nScored {} out of {} petitions",
        records.len(),
        petitions.len()
    );
    eprintln!(
        "Evaluations saved to: {}",
        workspace.all_evaluations_path().display()
    );
    print_preview(&records);

    Ok(())
}

/// Score one extracted text file and print the evaluation JSON to stdout.
pub async fn run_one(file: &Path, scorer: &dyn Scorer) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let evaluation = scorer
        .evaluate(&text)
        .await
        .context("scoring the petition")?;
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

fn print_preview(records: &[EvaluationRecord]) {
    let gold: Vec<u32> = records
        .iter()
        .filter(|r| r.customer_rating == GOLD_RATING)
        .map(|r| r.ai_score)
        .collect();
    let low: Vec<u32> = records
        .iter()
        .filter(|r| r.customer_rating <= LOW_RATING_MAX)
        .map(|r| r.ai_score)
        .collect();

    if let Some(stats) = RatingStats::from_scores(&gold) {
        eprintln!(
            "\nRating 5: avg {:.1} (min {}, max {})",
            stats.ai_score_avg, stats.ai_score_min, stats.ai_score_max
        );
    }
    if let Some(stats) = RatingStats::from_scores(&low) {
        eprintln!(
            "Rating 1-3: avg {:.1} (min {}, max {})",
            stats.ai_score_avg, stats.ai_score_min, stats.ai_score_max
        );
    }
}
