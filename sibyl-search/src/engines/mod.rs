//! Retrieval backend implementations.

pub mod arxiv;
pub mod duckduckgo;
pub mod wikipedia;

pub use arxiv::ArxivEngine;
pub use duckduckgo::DuckDuckGoEngine;
pub use wikipedia::WikipediaEngine;
