//! Fuzzy search ranking.
//!
//! Raw hits from the indexed-search collaborator come in unordered; this
//! crate scores them against the query ([`Scorer`]), optionally attaches a
//! content snippet to each ([`SnippetExtractor`]), and returns them in rank
//! order, all as one cancellable operation driven by the
//! [`SearchOrchestrator`].

pub mod error;
pub mod orchestrator;
pub mod render;
pub mod score;
pub mod snippet;

pub use crate::orchestrator::{Handle, SearchOrchestrator, SearchOutcome};
pub use crate::render::{ContentRenderer, RenderMode};
pub use crate::score::Scorer;
pub use crate::snippet::SnippetExtractor;
