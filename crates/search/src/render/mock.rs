//! In-memory content renderer for testing.

use super::{ContentRenderer, ErrorKind, RenderMode, Result};
use async_trait::async_trait;
use lectern_model::PackageId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory [`ContentRenderer`] for testing.
///
/// Maps `(package id, content path)` to a canned excerpt and counts how many
/// render calls were actually made. Cancellation tests use the counter to
/// prove that not-yet-started extraction tasks never reached the renderer.
/// Unknown paths fail with [`ErrorKind::NotFound`], exercising the
/// missing-snippet path.
#[derive(Debug, Default)]
pub struct MockRenderer {
    excerpts: HashMap<(PackageId, String), String>,
    calls: AtomicUsize,
}

impl MockRenderer {
    /// Create a renderer with canned excerpts.
    pub fn with_excerpts<P, S, T>(excerpts: impl IntoIterator<Item = ((P, S), T)>) -> Self
    where
        P: Into<PackageId>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            excerpts: excerpts.into_iter().map(|((p, s), t)| ((p.into(), s.into()), t.into())).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many render calls have been made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentRenderer for MockRenderer {
    async fn render(&self, package: &PackageId, path: &str, _mode: RenderMode) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.excerpts
            .get(&(package.clone(), path.to_string()))
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(format!("{package}/{path}"))))
    }
}
