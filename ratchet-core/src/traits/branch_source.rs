//! Current version-control branch lookup.

use std::path::Path;

/// Supplies the current branch name, one of the task-id discovery sources.
pub trait BranchSource: Send + Sync {
    fn current_branch(&self, root: &Path) -> Option<String>;
}

/// Reads the HEAD shorthand of the repository containing `root`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitBranchSource;

impl BranchSource for GitBranchSource {
    fn current_branch(&self, root: &Path) -> Option<String> {
        let repo = match git2::Repository::discover(root) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::debug!(error = %e, "no git repository, skipping branch source");
                return None;
            }
        };
        let head = repo.head().ok()?;
        head.shorthand().map(str::to_string)
    }
}
