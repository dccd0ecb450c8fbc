//! Text extraction from HTML documents
//!
//! This module turns raw markup into readable text:
//! - Character reference decoding
//! - Structural recognizers for dialogue and section markup
//! - The extractor that combines them, with a tag-stripping fallback

mod entities;
pub mod recognizers;
mod structure;

pub use entities::{decode_entities, lookup_named};
pub use structure::{
    content_region, fallback_text, strip_non_content, ExtractedText, ExtractionStrategy,
    Extractor,
};
