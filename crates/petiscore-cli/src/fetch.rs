//! Downloader/extractor stage: pull each collected document, extract its
//! text, and write the processed-petition manifest.
//!
//! Both the document and the extracted text act as a cache: existing files
//! are never re-fetched or re-extracted. A failure on one petition skips
//! that record and the run continues.

use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

use anyhow::Context;
use petiscore_core::{PetitionRecord, ProcessedPetition};
use petiscore_fetch::{FetchClient, extract_text};
use petiscore_store::Workspace;
use tracing::warn;

/// Politeness delay after each network fetch.
const DOWNLOAD_DELAY: Duration = Duration::from_millis(500);

pub async fn run(workspace: &Workspace) -> anyhow::Result<()> {
    workspace.ensure_layout()?;
    let petitions = workspace
        .load_metadata()
        .context("loading collected metadata")?;

    eprintln!("Processing {} petitions...", petitions.len());
    let client = FetchClient::new();

    let mut processed = Vec::new();
    for (i, petition) in petitions.iter().enumerate() {
        eprintln!(
            "\n[{}/{}] request_id={} rating={}",
            i + 1,
            petitions.len(),
            petition.request_id,
            petition.rating
        );
        match process_one(workspace, &client, petition).await {
            Ok(entry) => processed.push(entry),
            Err(e) => {
                warn!(request_id = petition.request_id, error = %e, "skipping petition");
            }
        }
    }

    workspace
        .save_manifest(&processed)
        .context("writing processed-petition manifest")?;

    eprintln!(
        "\nSuccessfully processed {} out of {} petitions",
        processed.len(),
        petitions.len()
    );
    eprintln!("Manifest saved to: {}", workspace.manifest_path().display());
    print_summary(&processed);

    Ok(())
}

async fn process_one(
    workspace: &Workspace,
    client: &FetchClient,
    petition: &PetitionRecord,
) -> anyhow::Result<ProcessedPetition> {
    let docx_path = workspace.docx_path(petition.request_id, petition.rating);
    if docx_path.exists() {
        eprintln!("  Document already cached");
    } else {
        eprintln!("  Downloading from {}...", petition.url);
        client.download_to(&petition.url, &docx_path).await?;
        tokio::time::sleep(DOWNLOAD_DELAY).await;
    }

    let txt_path = workspace.text_path(petition.request_id, petition.rating);
    let text = if txt_path.exists() {
        eprintln!("  Text already extracted");
        fs::read_to_string(&txt_path)?
    } else {
        eprintln!("  Extracting text...");
        let text = extract_text(&docx_path)?;
        fs::write(&txt_path, &text)?;
        text
    };
    let text_length = text.chars().count();
    eprintln!("  {text_length} chars of text");

    Ok(ProcessedPetition {
        request_id: petition.request_id,
        rating: petition.rating,
        docx_file: format!("{}.docx", petition.file_stem()),
        txt_file: format!("{}.txt", petition.file_stem()),
        text_length,
        url: petition.url.clone(),
        remark: petition.remark.clone(),
        rating_text: petition.rating_text.clone(),
    })
}

fn print_summary(processed: &[ProcessedPetition]) {
    let mut by_rating: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for entry in processed {
        by_rating.entry(entry.rating).or_default().push(entry.text_length);
    }
    if by_rating.is_empty() {
        return;
    }
    eprintln!("\nProcessed petitions by rating:");
    for (rating, lengths) in by_rating.iter().rev() {
        let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        eprintln!(
            "  Rating {rating}: {} petitions (avg {avg:.0} chars)",
            lengths.len()
        );
    }
}
