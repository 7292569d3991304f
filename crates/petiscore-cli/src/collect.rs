//! Collector stage: query the operations database and persist the metadata
//! list.

use std::collections::BTreeMap;

use anyhow::Context;
use petiscore_core::GOLD_RATING;
use petiscore_store::{Db, Workspace};

const LOW_RATINGS: &[i32] = &[1, 2, 3];

pub async fn run(
    workspace: &Workspace,
    database_url: &str,
    gold_limit: i64,
    low_limit: i64,
) -> anyhow::Result<()> {
    workspace.ensure_layout()?;

    let db = Db::connect(database_url)
        .await
        .context("connecting to the operations database")?;

    eprintln!("Collecting rating 5 petitions...");
    let gold = db.petitions_by_rating(&[GOLD_RATING], gold_limit).await?;

    eprintln!("Collecting low rating petitions (1-3)...");
    let low = db.petitions_by_rating(LOW_RATINGS, low_limit).await?;

    db.close().await;

    let gold_count = gold.len();
    let low_count = low.len();
    let mut all = gold;
    all.extend(low);

    workspace
        .save_metadata(&all)
        .context("writing petition metadata")?;

    eprintln!("\nCollected {} petitions:", all.len());
    eprintln!("  - Rating 5: {gold_count}");
    eprintln!("  - Rating 1-3: {low_count}");
    eprintln!("\nMetadata saved to: {}", workspace.metadata_path().display());

    let mut distribution: BTreeMap<i32, usize> = BTreeMap::new();
    for petition in &all {
        *distribution.entry(petition.rating).or_default() += 1;
    }
    eprintln!("\nRating distribution:");
    for (rating, count) in distribution.iter().rev() {
        eprintln!("  Rating {rating}: {count} petitions");
    }

    Ok(())
}
