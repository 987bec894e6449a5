// ABOUTME: Library module for the cranio-deck program.
// ABOUTME: Contains the syndrome dataset, image resolver, slide builder and PPTX writer.

// Reexport modules
pub mod config;
pub mod dataset;
pub mod deck;
pub mod errors;
pub mod pipeline;
pub mod pptx;
pub mod resolver;
pub mod template;
pub mod utils;

// Reexport common types and functions
pub use config::Config;
pub use dataset::{SyndromeRecord, SYNDROMES};
pub use deck::{Deck, Slide};
pub use errors::{DeckError, Result};
pub use pipeline::{assemble_deck, build_presentation, build_presentation_from, BuildSummary};
pub use pptx::{write_pptx, PptxConfig};
pub use resolver::{ResolvedImage, Resolver};
