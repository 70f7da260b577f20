//! Repository metadata extraction
//!
//! Reads a fixed set of well-known files plus a bounded directory tree from a
//! snapshot. Every individual read is optional.

use launchpad_core::RepositoryMetadataBundle;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::filter::sanitize_key;
use crate::tree::{render_tree, TreeOptions};

pub const PACKAGE_MANIFESTS: &[&str] = &["package.json"];
pub const CONTAINERFILES: &[&str] = &["Dockerfile"];
pub const ENV_SAMPLES: &[&str] = &[".env", ".env.example", ".env.local"];
pub const READMES: &[&str] = &["README.md", "readme.md", "README.txt"];
pub const OTHER_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "Pipfile",
    "Procfile",
    "go.mod",
    "Cargo.toml",
];

/// Builds a [`RepositoryMetadataBundle`] from a local snapshot
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    tree_options: TreeOptions,
}

impl MetadataExtractor {
    pub fn new(tree_options: TreeOptions) -> Self {
        Self { tree_options }
    }

    pub async fn extract(&self, root: &Path) -> RepositoryMetadataBundle {
        let mut other_manifests = BTreeMap::new();
        for name in OTHER_MANIFESTS {
            if let Some(content) = read_optional(&root.join(name)).await {
                other_manifests.insert(sanitize_key(name), content);
            }
        }

        RepositoryMetadataBundle {
            package_manifest: first_readable(root, PACKAGE_MANIFESTS).await,
            containerfile: first_readable(root, CONTAINERFILES).await,
            env_file_sample: first_readable(root, ENV_SAMPLES).await,
            readme: first_readable(root, READMES).await,
            file_tree: self.file_tree(root.to_path_buf()).await,
            other_manifests,
        }
    }

    async fn file_tree(&self, root: PathBuf) -> String {
        let options = self.tree_options;
        let rendered =
            tokio::task::spawn_blocking(move || render_tree(&root, options)).await;

        match rendered {
            Ok(Ok(tree)) => tree,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to generate file tree");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, "File tree task failed");
                String::new()
            }
        }
    }
}

/// Convenience wrapper using the default tree limits
pub async fn extract_metadata(root: &Path) -> RepositoryMetadataBundle {
    MetadataExtractor::default().extract(root).await
}

async fn first_readable(root: &Path, candidates: &[&str]) -> Option<String> {
    for name in candidates {
        if let Some(content) = read_optional(&root.join(name)).await {
            return Some(content);
        }
    }
    None
}

/// Read a snapshot file as text. Symlinks are not followed, so a repository
/// cannot point a well-known name at a file outside the snapshot.
async fn read_optional(path: &Path) -> Option<String> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.file_type().is_symlink() => {
            warn!(path = %path.display(), "Ignoring symlinked metadata file");
            return None;
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring unreadable file");
            return None;
        }
    }

    match tokio::fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring unreadable file");
            None
        }
    }
}
