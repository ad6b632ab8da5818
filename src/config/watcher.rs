//! Config file watcher.
//!
//! Change notifications are logged only. Components built from the config at
//! startup keep the values they were constructed with.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::ConfigError;

/// Keeps the underlying OS watch alive until dropped.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `path` for modifications.
    pub fn watch(path: &Path) -> Result<Self, ConfigError> {
        let watched = path.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_change(&event.kind) => {
                tracing::info!(path = %watched.display(), "Config file changed");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Config watch error: {}", e),
        })?;

        watcher.watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "Watching config file");

        Ok(Self {
            path: path.to_path_buf(),
            _watcher: watcher,
        })
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};

    #[test]
    fn test_watch_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let watcher = ConfigWatcher::watch(file.path()).unwrap();

        assert_eq!(watcher.path(), file.path());
    }

    #[test]
    fn test_watch_missing_file_fails() {
        let result = ConfigWatcher::watch(Path::new("does/not/exist.yml"));

        assert!(matches!(result, Err(ConfigError::Watch(_))));
    }

    #[test]
    fn test_only_changes_are_reported() {
        assert!(is_change(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_change(&EventKind::Access(AccessKind::Any)));
    }
}
