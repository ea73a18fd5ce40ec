use crate::model::Manager;
use async_trait::async_trait;
use std::path::PathBuf;

/// Scans an explicit installs directory, reporting packages under `manager`.
///
/// Used for `scan --path` and for pointing the aggregator at fixture trees.
pub struct DirectoryScanner {
    manager: Manager,
    path: PathBuf,
}

impl DirectoryScanner {
    pub fn new(manager: Manager, path: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            path: path.into(),
        }
    }
}

#[async_trait]
impl super::Scanner for DirectoryScanner {
    fn name(&self) -> &'static str {
        "Installs Directory"
    }

    fn manager(&self) -> Manager {
        self.manager
    }

    fn installs_dir(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }

    // An explicit directory is read wherever the manager itself runs.
    fn is_supported(&self) -> bool {
        true
    }
}
