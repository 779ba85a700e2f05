//! Structured fields scraped from an entry's embedded HTML.

mod extractor;

pub use extractor::{extract, ExtractionError, PostData};
