//! Installs directory resolution.
//!
//! Each manager keeps its installed tools under `<data dir>/installs`. The
//! data dir comes from the manager's override variable when set, otherwise
//! from a fixed location under the home directory:
//!
//! | Manager | Override | Default |
//! |---------|----------|---------|
//! | mise | `MISE_DATA_DIR` | `~/.local/share/mise` |
//! | asdf | `ASDF_DATA_DIR` | `~/.asdf` |
//!
//! Unlike a plain `exists()` probe, these functions do not check the
//! filesystem. A missing directory is handled by the walker.

use crate::model::Manager;
use std::ffi::OsString;
use std::path::PathBuf;

const INSTALLS_DIR: &str = "installs";

/// Returns the installs directory for `manager` from the process environment.
///
/// Returns `None` when no override is set and the home directory cannot be
/// determined.
pub fn installs_dir(manager: Manager) -> Option<PathBuf> {
    resolve_installs_dir(
        manager,
        std::env::var_os(manager.data_dir_env()),
        dirs::home_dir(),
    )
}

/// Pure form of [`installs_dir`]: an empty override counts as unset.
pub fn resolve_installs_dir(
    manager: Manager,
    data_dir_override: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(data_dir) = data_dir_override.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(data_dir).join(INSTALLS_DIR));
    }

    let home = home?;
    Some(manager.default_data_dir(&home).join(INSTALLS_DIR))
}
