//! The cancellable "rank a batch of hits" operation.

use crate::error::{ErrorKind, Result};
use crate::render::ContentRenderer;
use crate::score::Scorer;
use crate::snippet::SnippetExtractor;
use lectern_model::{ScoredResult, SearchHit, SnippetMode};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a submitted search operation ended.
///
/// Cancellation is not a failure: a superseded query is the caller getting
/// exactly what it asked for, and is reported as its own variant so it can
/// be discarded silently.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The operation ran to completion; results are in rank order.
    Ranked(Vec<ScoredResult>),
    /// The operation was superseded or explicitly cancelled. Never carries
    /// partial results.
    Cancelled,
}

/// Composes scoring and snippet extraction into one cancellable operation,
/// with single-flight semantics per logical query slot.
///
/// One orchestrator is one slot (e.g. one interactive search box):
/// [`submit`](Self::submit)ting a new query cancels whatever operation the
/// slot was still running, so stale results can never arrive after newer
/// ones. Concurrent searches want separate orchestrators.
pub struct SearchOrchestrator {
    renderer: Arc<dyn ContentRenderer>,
    slot: Mutex<Option<CancellationToken>>,
}

/// A submitted search operation.
///
/// Exposes [`cancel`](Self::cancel) and the eventual ordered results via
/// [`results`](Self::results).
pub struct Handle {
    cancel: CancellationToken,
    task: JoinHandle<SearchOutcome>,
}

impl Handle {
    /// Cancel the operation. Scoring stops at the next hit boundary and
    /// extraction tasks that have not started yet never will.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the operation to finish or acknowledge cancellation.
    pub async fn results(self) -> Result<SearchOutcome> {
        match self.task.await {
            Ok(outcome) => Ok(outcome),
            Err(join) if join.is_cancelled() => Ok(SearchOutcome::Cancelled),
            Err(_) => Err(exn::Exn::from(ErrorKind::Task)),
        }
    }
}

impl SearchOrchestrator {
    pub fn new(renderer: Arc<dyn ContentRenderer>) -> Self {
        Self { renderer, slot: Mutex::new(None) }
    }

    /// Start ranking a batch of raw hits for `query`.
    ///
    /// Supersedes the slot's previous operation, if any: its token is
    /// cancelled before the new task starts, and its caller will see
    /// [`SearchOutcome::Cancelled`].
    pub fn submit(&self, hits: Vec<SearchHit>, query: &str, mode: SnippetMode) -> Handle {
        let cancel = CancellationToken::new();
        if let Some(superseded) = self.slot.lock().expect("lock poisoned").replace(cancel.clone()) {
            superseded.cancel();
        }
        let extractor = SnippetExtractor::new(self.renderer.clone());
        // Lower-case once; the scorer itself never normalises case.
        let query = query.to_lowercase();
        let task = tokio::spawn(run(extractor, hits, query, mode, cancel.clone()));
        Handle { cancel, task }
    }
}

async fn run(
    extractor: SnippetExtractor,
    hits: Vec<SearchHit>,
    query: String,
    mode: SnippetMode,
    cancel: CancellationToken,
) -> SearchOutcome {
    // The scorer, and with it the distance memoization cache, lives for
    // exactly this one operation.
    let mut scorer = Scorer::new();
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        // Hit-level cancellation check: a superseded query stops scoring
        // promptly instead of working through the whole batch.
        if cancel.is_cancelled() {
            return SearchOutcome::Cancelled;
        }
        let score = scorer.score(&query, &hit.title.to_lowercase(), hit.probability);
        results.push(ScoredResult::new(hit, score));
    }

    extractor.extract(&mut results, mode, &cancel).await;
    if cancel.is_cancelled() {
        // In-flight extraction tasks were allowed to finish, but their
        // output is discarded along with the whole batch.
        return SearchOutcome::Cancelled;
    }

    // Score ascending, then longer snippet (more context wins the tie), and
    // the sort being stable keeps equal-rank results in input order.
    results.sort_by(|a, b| {
        a.score.total_cmp(&b.score).then_with(|| {
            let a_len = a.snippet.as_ref().map_or(0, String::len);
            let b_len = b.snippet.as_ref().map_or(0, String::len);
            b_len.cmp(&a_len)
        })
    });
    SearchOutcome::Ranked(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MockRenderer, RenderMode};
    use async_trait::async_trait;
    use lectern_model::PackageId;

    fn hit(title: &str, path: &str, probability: Option<f64>) -> SearchHit {
        SearchHit {
            package_id: PackageId::from("pkg"),
            path: path.to_string(),
            title: title.to_string(),
            match_markup: None,
            probability,
        }
    }

    fn orchestrator() -> (Arc<MockRenderer>, SearchOrchestrator) {
        let renderer = Arc::new(MockRenderer::default());
        (renderer.clone(), SearchOrchestrator::new(renderer))
    }

    async fn ranked(handle: Handle) -> Vec<ScoredResult> {
        match handle.results().await.unwrap() {
            SearchOutcome::Ranked(results) => results,
            SearchOutcome::Cancelled => panic!("operation was unexpectedly cancelled"),
        }
    }

    #[tokio::test]
    async fn test_confident_close_match_ranks_first() {
        let (_, orchestrator) = orchestrator();
        let hits = vec![hit("Parris", "b", None), hit("Paris", "a", Some(0.9))];
        let results = ranked(orchestrator.submit(hits, "Paris", SnippetMode::Disabled)).await;
        assert_eq!(results[0].hit.title, "Paris");
        assert_eq!(results[1].hit.title, "Parris");
        assert!(results[0].score < results[1].score);
    }

    #[tokio::test]
    async fn test_query_and_titles_are_case_insensitive() {
        let (_, orchestrator) = orchestrator();
        let results = ranked(orchestrator.submit(vec![hit("PARIS", "a", None)], "paris", SnippetMode::Disabled)).await;
        assert_eq!(results[0].score, 0.0);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_input_order() {
        let (_, orchestrator) = orchestrator();
        let hits = vec![hit("Paris", "first", None), hit("Paris", "second", None), hit("Paris", "third", None)];
        let results = ranked(orchestrator.submit(hits, "paris", SnippetMode::Disabled)).await;
        let paths: Vec<&str> = results.iter().map(|r| r.hit.path.as_str()).collect();
        assert_eq!(paths, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_longer_snippet_wins_score_ties() {
        let (_, orchestrator) = orchestrator();
        let mut short = hit("Paris", "short", None);
        short.match_markup = Some("<b>Paris</b>".to_string());
        let mut long = hit("Paris", "long", None);
        long.match_markup = Some("<b>Paris</b> is the capital of France".to_string());
        let results = ranked(orchestrator.submit(vec![short, long], "paris", SnippetMode::Matches)).await;
        assert_eq!(results[0].hit.path, "long");
        assert_eq!(results[1].hit.path, "short");
    }

    #[tokio::test]
    async fn test_cancel_before_scoring_yields_cancelled() {
        let (renderer, orchestrator) = orchestrator();
        let hits: Vec<SearchHit> = (0..100).map(|i| hit("Paris", &format!("p{i}"), None)).collect();
        let handle = orchestrator.submit(hits, "paris", SnippetMode::FirstParagraph);
        handle.cancel();
        assert!(matches!(handle.results().await.unwrap(), SearchOutcome::Cancelled));
        // No extraction task ever reached the renderer.
        assert_eq!(renderer.calls(), 0);
    }

    /// Renderer that cancels the operation from inside its first render
    /// call, simulating a new query arriving mid-extraction.
    #[derive(Default)]
    struct CancellingRenderer {
        cancel: Mutex<Option<CancellationToken>>,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl ContentRenderer for CancellingRenderer {
        async fn render(&self, _package: &PackageId, _path: &str, _mode: RenderMode) -> crate::render::Result<String> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if let Some(cancel) = self.cancel.lock().unwrap().take() {
                cancel.cancel();
            }
            Ok("Excerpt.".to_string())
        }
    }

    #[tokio::test]
    async fn test_cancel_during_extraction_discards_the_batch() {
        let renderer = Arc::new(CancellingRenderer::default());
        let orchestrator = SearchOrchestrator::new(renderer.clone());
        let hits: Vec<SearchHit> = (0..64).map(|i| hit("Paris", &format!("p{i}"), None)).collect();
        let handle = orchestrator.submit(hits, "paris", SnippetMode::FirstParagraph);
        *renderer.cancel.lock().unwrap() = Some(handle.cancel.clone());
        assert!(matches!(handle.results().await.unwrap(), SearchOutcome::Cancelled));
        // Only tasks already in flight when the token flipped got to run.
        assert!(renderer.calls.load(std::sync::atomic::Ordering::SeqCst) < 64);
    }

    #[tokio::test]
    async fn test_new_submission_supersedes_the_previous_one() {
        let (_, orchestrator) = orchestrator();
        let first = orchestrator.submit(vec![hit("Paris", "a", None)], "paris", SnippetMode::Disabled);
        let second = orchestrator.submit(vec![hit("Berlin", "b", None)], "berlin", SnippetMode::Disabled);
        assert!(matches!(first.results().await.unwrap(), SearchOutcome::Cancelled));
        let results = ranked(second).await;
        assert_eq!(results[0].hit.title, "Berlin");
    }
}
