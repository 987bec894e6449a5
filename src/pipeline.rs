// ABOUTME: Orchestration for the cranio-deck application
// ABOUTME: Resolves images, assembles slides and references in order, then writes the PPTX

use crate::config::Config;
use crate::dataset::{reference_entry, SyndromeRecord, DECK_SUBTITLE, DECK_TITLE, GENERAL_REFERENCES, SYNDROMES};
use crate::deck::Deck;
use crate::errors::Result;
use crate::pptx::{write_pptx, PptxConfig};
use crate::resolver::Resolver;
use crate::utils;
use log::info;
use std::path::PathBuf;

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output_path: PathBuf,
    pub slide_count: usize,
    pub images_resolved: usize,
    /// Reference lines in the order they appear on the last slide
    pub references: Vec<String>,
}

/// Build the in-memory deck and its reference list for `records`.
///
/// Every record gets a slide; only records with a resolved image get a reference line.
pub fn assemble_deck(records: &[SyndromeRecord], resolver: &Resolver) -> (Deck, Vec<String>) {
    let mut deck = Deck::new();
    deck.add_title_slide(DECK_TITLE, DECK_SUBTITLE);

    let mut references = Vec::new();
    for record in records {
        info!("Processing {}", record.name);
        let resolved = resolver.resolve(record);

        deck.add_record_slide(record, &resolved);

        if let Some(source) = resolved.source() {
            references.push(reference_entry(record.name, source));
        }
    }

    references.extend(GENERAL_REFERENCES.iter().map(|r| r.to_string()));
    deck.add_references_slide(&references);

    (deck, references)
}

/// Run the whole pipeline over the built-in dataset.
pub fn build_presentation(config: &Config) -> Result<BuildSummary> {
    build_presentation_from(SYNDROMES, config)
}

/// Run the whole pipeline over the given records.
pub fn build_presentation_from(records: &[SyndromeRecord], config: &Config) -> Result<BuildSummary> {
    utils::prepare_images_dir(&config.images_dir)?;

    let resolver = Resolver::new(config)?;
    let (deck, references) = assemble_deck(records, &resolver);

    let pptx_config = PptxConfig {
        title: DECK_TITLE.to_string(),
        ..PptxConfig::default()
    };
    write_pptx(&deck, &config.output_path, &pptx_config)?;

    let images_resolved = references.len() - GENERAL_REFERENCES.len();
    info!(
        "Built {} slides with {} of {} images",
        deck.slide_count(),
        images_resolved,
        records.len()
    );

    Ok(BuildSummary {
        output_path: config.output_path.clone(),
        slide_count: deck.slide_count(),
        images_resolved,
        references,
    })
}
