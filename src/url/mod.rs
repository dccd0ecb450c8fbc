//! URL handling module for Folio
//!
//! This module resolves links found in index pages and turns URLs and display
//! names into document identifiers.

mod naming;
mod resolve;

pub use naming::{document_name_from_url, is_safe_identifier, slugify, title_case};
pub use resolve::resolve_link;
