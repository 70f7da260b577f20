//! Per-request scratch directories

use launchpad_core::{ErrorContext, LaunchpadError, LaunchpadResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A uniquely named directory that lives for one request.
///
/// Call [`ScratchDir::cleanup`] when done. If the guard is dropped without
/// it, the directory is removed synchronously as a fallback.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    /// Create `<root>/repo-<unix millis>-<counter>`; the directory itself is
    /// left absent so `git clone` can create it.
    pub async fn allocate(root: &Path) -> LaunchpadResult<Self> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| LaunchpadError::Repository {
                message: format!("Failed to create scratch root {}: {}", root.display(), e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("scratch_dir").with_operation("allocate"),
            })?;

        let name = format!(
            "repo-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let path = root.join(name);
        debug!(path = %path.display(), "Allocated scratch directory");

        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory. Failures are logged, never returned.
    pub async fn cleanup(mut self) {
        self.removed = true;
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed scratch directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove scratch directory"
            ),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.removed && self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(path = %self.path.display(), error = %e, "Failed to remove scratch directory");
            }
        }
    }
}
