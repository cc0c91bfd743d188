//! Content rendering: the snippet source.

pub(crate) mod error;
#[cfg(feature = "mock")]
mod mock;

pub use self::error::{Error, ErrorKind, Result};
#[cfg(feature = "mock")]
pub use self::mock::MockRenderer;

use async_trait::async_trait;
use lectern_model::PackageId;
use scraper::Html;

/// Which excerpt the renderer should extract from the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    FirstParagraph,
    FirstSentence,
}

/// Extracts a short plain-text excerpt of a package's content.
///
/// Implemented over the archive reader, which is outside this subsystem; a
/// failure (missing content, decode error) is per-hit and non-fatal; the
/// hit simply goes without a snippet.
#[async_trait]
pub trait ContentRenderer: Send + Sync {
    /// Extract an excerpt of the content at `path` inside `package`.
    async fn render(&self, package: &PackageId, path: &str, mode: RenderMode) -> Result<String>;
}

/// Flatten a pre-rendered match fragment into plain text.
///
/// The indexed-search collaborator hands back match context as an HTML
/// fragment (typically the matched words wrapped in `<b>`); search result
/// rows want it as plain text with collapsed whitespace.
pub fn markup_to_text(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let text: Vec<&str> = html.root_element().text().collect();
    // Collapse runs of whitespace left behind by the removed tags.
    text.concat().split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<b>Paris</b> is the capital", "Paris is the capital")]
    #[case("plain text, no markup", "plain text, no markup")]
    #[case("  <p>spread \n across</p>\t<p>blocks</p> ", "spread across blocks")]
    #[case("five &lt; six &amp; seven", "five < six & seven")]
    #[case("", "")]
    fn test_markup_to_text(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(markup_to_text(fragment), expected);
    }
}
