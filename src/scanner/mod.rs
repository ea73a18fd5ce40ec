//! Version manager scanners.
//!
//! This module provides the [`Scanner`] trait and implementations for
//! discovering tool versions installed by version managers.
//!
//! # Available Scanners
//!
//! | Scanner | Manager | Installs directory |
//! |---------|---------|--------------------|
//! | [`MiseScanner`] | mise | `$MISE_DATA_DIR/installs` or `~/.local/share/mise/installs` |
//! | [`AsdfScanner`] | asdf | `$ASDF_DATA_DIR/installs` or `~/.asdf/installs` |
//! | [`DirectoryScanner`] | any | an explicit path |
//!
//! Every scanner reads the same `<installs>/<tool>/<version>` layout through
//! [`walk_installs`].
//!
//! # Example
//!
//! ```no_run
//! use mise_osquery_extension::scanner::{all_scanners, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     for scanner in all_scanners() {
//!         if scanner.is_supported() {
//!             let packages = scanner.scan().await?;
//!             println!("{}: {} installs", scanner.name(), packages.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod asdf;
mod directory;
mod error;
mod mise;
mod walker;

pub use asdf::AsdfScanner;
pub use directory::DirectoryScanner;
pub use error::ScanError;
pub use mise::MiseScanner;
pub use walker::walk_installs;

use crate::model::{Manager, Package, Platform};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Trait for scanning the tool versions installed by one version manager.
///
/// Implementors only need to say which manager they report as and where its
/// installs directory is; [`scan`](Self::scan) walks that directory on the
/// blocking thread pool.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Returns the manager label attached to every package this scanner emits.
    fn manager(&self) -> Manager;

    /// Returns the directory holding `<tool>/<version>` installs, or `None`
    /// when it cannot be determined (no override and no home directory).
    fn installs_dir(&self) -> Option<PathBuf>;

    /// Returns true if this scanner is supported on the current platform.
    fn is_supported(&self) -> bool {
        self.manager()
            .supported_platforms()
            .contains(&Platform::current())
    }

    /// Scans for installed tool versions.
    ///
    /// # Errors
    ///
    /// Returns an error if the installs directory exists but cannot be read.
    async fn scan(&self) -> Result<Vec<Package>> {
        let Some(dir) = self.installs_dir() else {
            return Ok(Vec::new());
        };

        let manager = self.manager();
        let packages =
            tokio::task::spawn_blocking(move || walk_installs(&dir, manager)).await??;
        Ok(packages)
    }
}

/// Returns the fixed set of manager scanners.
///
/// # Example
///
/// ```
/// use mise_osquery_extension::scanner::all_scanners;
///
/// let scanners = all_scanners();
/// assert_eq!(scanners.len(), 2);
/// ```
pub fn all_scanners() -> Vec<Arc<dyn Scanner>> {
    vec![Arc::new(MiseScanner), Arc::new(AsdfScanner)]
}

/// Returns the scanner for a specific manager.
///
/// # Example
///
/// ```
/// use mise_osquery_extension::{Manager, scanner::get_scanner};
///
/// let scanner = get_scanner(Manager::Asdf);
/// assert_eq!(scanner.name(), "asdf Installs");
/// ```
pub fn get_scanner(manager: Manager) -> Arc<dyn Scanner> {
    match manager {
        Manager::Mise => Arc::new(MiseScanner),
        Manager::Asdf => Arc::new(AsdfScanner),
    }
}
