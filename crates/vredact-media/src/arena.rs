//! Job-scoped working arenas.
//!
//! Each job owns a freshly allocated directory under a configurable root.
//! The directory is removed when the arena is dropped, on success and on
//! error alike, so concurrent jobs can never collide on chunk file names.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::MediaResult;

/// An isolated working directory for one job.
#[derive(Debug)]
pub struct JobArena {
    dir: TempDir,
}

impl JobArena {
    /// Allocate a new arena under `root`, creating the root if needed.
    pub fn create(root: impl AsRef<Path>) -> MediaResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("job-").tempdir_in(root)?;
        debug!("Allocated job arena at {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the arena directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for a named artifact inside the arena.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_creates_and_removes_dir() {
        let root = tempfile::tempdir().unwrap();
        let arena_path;
        {
            let arena = JobArena::create(root.path()).unwrap();
            arena_path = arena.path().to_path_buf();
            assert!(arena_path.exists());
            std::fs::write(arena.artifact_path("segment_000.ts"), b"x").unwrap();
        }
        // Dropping the arena removes the directory and its contents.
        assert!(!arena_path.exists());
    }

    #[test]
    fn test_two_arenas_are_disjoint() {
        let root = tempfile::tempdir().unwrap();
        let a = JobArena::create(root.path()).unwrap();
        let b = JobArena::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
        // Same local name, different physical paths.
        assert_ne!(
            a.artifact_path("segment_000.ts"),
            b.artifact_path("segment_000.ts")
        );
    }
}
