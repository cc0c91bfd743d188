//! Search hit and result types.
//!
//! Raw hits come from an external indexed-search collaborator; scoring and
//! snippet attachment happen in `lectern-search`. Nothing here is persisted:
//! a [`ScoredResult`] lives for exactly one search operation.

use crate::entry::PackageId;
use crate::error::{ErrorKind, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One raw text-search hit, as produced by the indexed-search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub package_id: PackageId,
    /// Content path within the package.
    pub path: String,
    pub title: String,
    /// Pre-rendered match fragment (markup), when the index provides one.
    pub match_markup: Option<String>,
    /// Relevance confidence in `0..=1`, when the index provides one.
    pub probability: Option<f64>,
}

/// A hit annotated with its rank score and, optionally, an extracted snippet.
///
/// Lower score is better. Created fresh per search operation and discarded
/// once the caller consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub hit: SearchHit,
    pub score: f64,
    pub snippet: Option<String>,
}

impl ScoredResult {
    pub fn new(hit: SearchHit, score: f64) -> Self {
        Self { hit, score, snippet: None }
    }
}

/// How (and whether) a snippet should be extracted for each search hit.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnippetMode {
    /// No snippets at all.
    #[display("disabled")]
    Disabled,
    /// First paragraph of the hit's content, via the renderer.
    #[display("first-paragraph")]
    FirstParagraph,
    /// First sentence of the hit's content, via the renderer.
    #[display("first-sentence")]
    FirstSentence,
    /// Plain-text rendition of the index's own match markup; no renderer call.
    #[display("matches")]
    Matches,
}

impl FromStr for SnippetMode {
    type Err = crate::error::Error;
    fn from_str(value: &str) -> Result<Self> {
        Ok(match value {
            "disabled" => Self::Disabled,
            "first-paragraph" => Self::FirstParagraph,
            "first-sentence" => Self::FirstSentence,
            "matches" => Self::Matches,
            other => return Err(exn::Exn::from(ErrorKind::InvalidSnippetMode(other.to_string()))),
        })
    }
}
