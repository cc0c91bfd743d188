//! Concurrent snippet extraction.

use crate::render::{ContentRenderer, RenderMode, markup_to_text};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use lectern_model::{ScoredResult, SnippetMode};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// Renderer calls hit the archive reader's decompression path; a small pool
// keeps a large result batch from saturating it.
pub(crate) const MAX_EXTRACT_CONCURRENCY: usize = 8;

/// Attaches snippets to scored results, fanning render calls out over a
/// bounded worker pool.
///
/// The single `.await` of [`extract`](Self::extract) is the join barrier:
/// it returns once every dispatched task has completed or declined to start
/// due to cancellation. A task that fails leaves its hit's snippet unset and
/// never aborts its siblings.
pub struct SnippetExtractor {
    renderer: Arc<dyn ContentRenderer>,
}

impl SnippetExtractor {
    pub fn new(renderer: Arc<dyn ContentRenderer>) -> Self {
        Self { renderer }
    }

    /// Attach a snippet to each result in place, per `mode`.
    ///
    /// `cancel` is polled at every task's entry: once signalled, tasks that
    /// have not started yet exit without touching the renderer. Tasks
    /// already in flight run to completion; it is the caller's job to
    /// discard the batch afterwards.
    pub async fn extract(&self, results: &mut [ScoredResult], mode: SnippetMode, cancel: &CancellationToken) {
        match mode {
            SnippetMode::Disabled => {},
            SnippetMode::Matches => {
                // Purely local reformatting of the index's own match
                // fragment; no renderer, no concurrency needed.
                for result in results.iter_mut() {
                    if cancel.is_cancelled() {
                        return;
                    }
                    if let Some(markup) = &result.hit.match_markup {
                        result.snippet = Some(markup_to_text(markup));
                    }
                }
            },
            SnippetMode::FirstParagraph => self.extract_rendered(results, RenderMode::FirstParagraph, cancel).await,
            SnippetMode::FirstSentence => self.extract_rendered(results, RenderMode::FirstSentence, cancel).await,
        }
    }

    async fn extract_rendered(&self, results: &mut [ScoredResult], mode: RenderMode, cancel: &CancellationToken) {
        let mut pending: Vec<_> = results
            .iter()
            .enumerate()
            .map(|(index, result)| {
                let renderer = self.renderer.clone();
                let cancel = cancel.clone();
                let package = result.hit.package_id.clone();
                let path = result.hit.path.clone();
                async move {
                    if cancel.is_cancelled() {
                        return (index, None);
                    }
                    match renderer.render(&package, &path, mode).await {
                        Ok(excerpt) => (index, Some(excerpt)),
                        Err(error) => {
                            tracing::debug!(%package, path, %error, "snippet extraction failed");
                            (index, None)
                        },
                    }
                }
            })
            .collect();

        let mut processing = FuturesUnordered::new();
        processing.extend(pending.drain(..MAX_EXTRACT_CONCURRENCY.min(pending.len())));
        while let Some((index, snippet)) = processing.next().await {
            if let Some(snippet) = snippet {
                results[index].snippet = Some(snippet);
            }
            // Pop-n-push, but FIFO instead of LIFO.
            if !pending.is_empty() {
                processing.push(pending.remove(0));
            }
        }
    }
}
