//! Reporter stage: render the calibration report and persist the summary.

use anyhow::Context;
use petiscore_core::{
    CalibrationSummary, EvaluationRecord, RatingStats, TOP_ISSUES, gold_standard_check,
    group_by_rating, low_quality_check, rating_score_correlation, top_issues,
};
use petiscore_store::Workspace;

const RULE: &str = "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

pub fn run(workspace: &Workspace) -> anyhow::Result<()> {
    let records = workspace
        .load_all_evaluations()
        .context("loading aggregate evaluations")?;

    print_report(&records);

    let summary = CalibrationSummary::build(&records);
    workspace.ensure_layout()?;
    workspace
        .save_summary(&summary)
        .context("writing calibration summary")?;
    println!("\nSummary saved to: {}", workspace.summary_path().display());

    Ok(())
}

fn print_report(records: &[EvaluationRecord]) {
    println!("{RULE}");
    println!("PETISCORE - CALIBRATION REPORT");
    println!("{RULE}");
    println!("\nTotal petitions evaluated: {}", records.len());

    let buckets = group_by_rating(records);

    println!("\n{THIN_RULE}");
    println!("RESULTS BY CUSTOMER RATING");
    println!("{THIN_RULE}");
    for (rating, bucket) in buckets.iter().rev() {
        let scores: Vec<u32> = bucket.iter().map(|r| r.ai_score).collect();
        let Some(stats) = RatingStats::from_scores(&scores) else {
            continue;
        };
        println!("\nCustomer Rating {rating} ({} petitions):", stats.count);
        println!("  Range: {}-{}", stats.ai_score_min, stats.ai_score_max);
        println!("  Average: {:.1}", stats.ai_score_avg);
        println!("  Median: {:.1}", stats.ai_score_median);
        if stats.count > 1 {
            println!("  Std Dev: {:.1}", stats.ai_score_stdev);
        }
        println!("  Individual scores:");
        for record in bucket {
            println!("    - Request {}: {}/100", record.request_id, record.ai_score);
        }
    }

    println!("\n{THIN_RULE}");
    println!("CORRELATION ANALYSIS");
    println!("{THIN_RULE}");
    println!(
        "\nPearson Correlation (Customer Rating vs AI Score): {:.3}",
        rating_score_correlation(records)
    );

    if let Some(check) = gold_standard_check(records) {
        println!("\nRating 5 petitions (Gold Standard):");
        println!("  Count: {}", check.count);
        println!("  Average: {:.1}", check.mean_score);
        println!(
            "  Scores >= 85: {}/{} ({:.0}%)",
            check.at_or_above_target,
            check.count,
            check.at_target_pct()
        );
        if check.passed {
            println!("  Target: >=85 average score: PASS");
        } else {
            println!("  Target: >=85 average score: FAIL (adjust needed)");
        }
    }

    if let Some(check) = low_quality_check(records) {
        println!("\nRating 1-3 petitions (Low Quality):");
        println!("  Count: {}", check.count);
        println!("  Average: {:.1}", check.mean_score);
        if check.passed {
            println!("  Target: <85 average score: PASS");
        } else {
            println!("  Target: <85 average score: FAIL (adjust needed)");
        }
    }

    println!("\n{THIN_RULE}");
    println!("COMMON ISSUES BY RATING");
    println!("{THIN_RULE}");
    for (rating, bucket) in buckets.iter().rev() {
        let issues = top_issues(bucket, TOP_ISSUES);
        if issues.is_empty() {
            continue;
        }
        println!("\nCustomer Rating {rating}:");
        for (issue, count) in issues {
            println!("  - {issue} ({count}x)");
        }
    }

    println!("\n{RULE}");
    println!("END OF REPORT");
    println!("{RULE}");
}
