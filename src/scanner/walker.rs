use super::ScanError;
use crate::model::{Manager, Package};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Lists `<base>/<tool>/<version>` directories and returns one package per version.
///
/// A missing `base` is not an error; managers that were never used simply have
/// nothing installed. Only a `base` that exists but cannot be listed fails the
/// walk. Tools whose version directories cannot be listed are skipped.
pub fn walk_installs(base: &Path, manager: Manager) -> Result<Vec<Package>, ScanError> {
    let mut packages = Vec::new();

    let tool_entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(packages),
        Err(e) => {
            return Err(ScanError::ReadInstallsDir {
                path: base.to_path_buf(),
                source: e,
            })
        }
    };

    for tool_entry in tool_entries.flatten() {
        if !is_dir_entry(&tool_entry) {
            continue;
        }

        let tool = tool_entry.file_name().to_string_lossy().to_string();
        let tool_path = tool_entry.path();

        let version_entries = match fs::read_dir(&tool_path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(manager = %manager, tool = %tool, error = %e, "skipping unreadable tool directory");
                continue;
            }
        };

        for version_entry in version_entries.flatten() {
            if !is_dir_entry(&version_entry) {
                continue;
            }

            let version = version_entry.file_name().to_string_lossy().to_string();
            let install_path = version_entry.path();

            // The entry may have been removed or replaced since it was listed.
            let still_dir = fs::metadata(&install_path)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !still_dir {
                continue;
            }

            packages.push(Package::new(&tool, version, manager, install_path));
        }
    }

    debug!(manager = %manager, base = ?base, count = packages.len(), "walked installs directory");
    Ok(packages)
}

fn is_dir_entry(entry: &fs::DirEntry) -> bool {
    entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_installs(root: &Path, pairs: &[(&str, &str)]) -> PathBuf {
        let installs = root.join("installs");
        for (tool, version) in pairs {
            fs::create_dir_all(installs.join(tool).join(version)).unwrap();
        }
        fs::create_dir_all(&installs).unwrap();
        installs
    }

    fn sorted(mut packages: Vec<Package>) -> Vec<Package> {
        packages.sort_by(|a, b| (&a.tool, &a.version).cmp(&(&b.tool, &b.version)));
        packages
    }

    #[test]
    fn test_walk_node_and_python() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("node", "20.10.0"), ("python", "3.12.0")]);

        let packages = sorted(walk_installs(&installs, Manager::Mise).unwrap());

        assert_eq!(
            packages,
            vec![
                Package::new(
                    "node",
                    "20.10.0",
                    Manager::Mise,
                    installs.join("node").join("20.10.0")
                ),
                Package::new(
                    "python",
                    "3.12.0",
                    Manager::Mise,
                    installs.join("python").join("3.12.0")
                ),
            ]
        );
    }

    #[test]
    fn test_walk_counts_every_version() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(
            tmp.path(),
            &[
                ("node", "18.19.0"),
                ("node", "20.10.0"),
                ("ruby", "3.3.0"),
                ("go", "1.22.1"),
            ],
        );

        let packages = walk_installs(&installs, Manager::Asdf).unwrap();

        assert_eq!(packages.len(), 4);
        assert!(packages.iter().all(|p| p.manager == Manager::Asdf));
        assert!(packages
            .iter()
            .all(|p| p.install_path == installs.join(&p.tool).join(&p.version)));
    }

    #[test]
    fn test_walk_missing_base_is_empty() {
        let tmp = TempDir::new().unwrap();
        let packages = walk_installs(&tmp.path().join("nope"), Manager::Mise).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_walk_skips_file_at_tool_level() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("node", "20.10.0")]);
        fs::write(installs.join(".mise-lock"), "").unwrap();

        let packages = walk_installs(&installs, Manager::Mise).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].tool, "node");
    }

    #[test]
    fn test_walk_skips_file_at_version_level() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("node", "20.10.0")]);
        fs::write(installs.join("node").join(".mise.backend"), "core:node").unwrap();

        let packages = walk_installs(&installs, Manager::Mise).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].version, "20.10.0");
    }

    #[test]
    fn test_walk_tool_without_versions() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("python", "3.12.0")]);
        fs::create_dir_all(installs.join("ruby")).unwrap();

        let packages = walk_installs(&installs, Manager::Mise).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].tool, "python");
    }

    #[test]
    fn test_walk_base_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("installs");
        fs::write(&base, "not a directory").unwrap();

        let err = walk_installs(&base, Manager::Asdf).unwrap_err();
        assert!(matches!(err, ScanError::ReadInstallsDir { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_unreadable_tool() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("node", "20.10.0"), ("ruby", "3.3.0")]);
        let ruby = installs.join("ruby");
        fs::set_permissions(&ruby, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory; nothing to check then.
        if fs::read_dir(&ruby).is_ok() {
            fs::set_permissions(&ruby, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = walk_installs(&installs, Manager::Mise);
        fs::set_permissions(&ruby, fs::Permissions::from_mode(0o755)).unwrap();

        let packages = result.unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].tool, "node");
        assert_eq!(packages[0].version, "20.10.0");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlinked_version() {
        let tmp = TempDir::new().unwrap();
        let installs = make_installs(tmp.path(), &[("node", "20.10.0")]);
        std::os::unix::fs::symlink(
            installs.join("node").join("20.10.0"),
            installs.join("node").join("20"),
        )
        .unwrap();

        let packages = walk_installs(&installs, Manager::Mise).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].version, "20.10.0");
    }
}
