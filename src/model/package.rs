use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    Mise,
    Asdf,
}

impl Manager {
    pub fn all() -> &'static [Manager] {
        &[Manager::Mise, Manager::Asdf]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Manager::Mise => "mise",
            Manager::Asdf => "asdf",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Manager::Mise => "mise",
            Manager::Asdf => "asdf-vm",
        }
    }

    /// Environment variable that relocates the manager's data directory.
    pub fn data_dir_env(&self) -> &'static str {
        match self {
            Manager::Mise => "MISE_DATA_DIR",
            Manager::Asdf => "ASDF_DATA_DIR",
        }
    }

    /// Data directory used when no override is set.
    pub fn default_data_dir(&self, home: &Path) -> PathBuf {
        match self {
            Manager::Mise => home.join(".local").join("share").join("mise"),
            Manager::Asdf => home.join(".asdf"),
        }
    }

    pub fn supported_platforms(&self) -> &'static [Platform] {
        match self {
            Manager::Mise => &[Platform::Linux, Platform::MacOS, Platform::Windows],
            Manager::Asdf => &[Platform::Linux, Platform::MacOS],
        }
    }
}

impl std::fmt::Display for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Manager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mise" | "rtx" => Ok(Manager::Mise),
            "asdf" | "asdf-vm" => Ok(Manager::Asdf),
            _ => Err(format!("Unknown manager: {}. Use: mise, asdf", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        return Platform::Linux;
        #[cfg(target_os = "macos")]
        return Platform::MacOS;
        #[cfg(target_os = "windows")]
        return Platform::Windows;
    }
}

/// One installed tool version found under a manager's installs directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub tool: String,
    pub version: String,
    pub manager: Manager,
    pub install_path: PathBuf,
}

impl Package {
    pub fn new(
        tool: impl Into<String>,
        version: impl Into<String>,
        manager: Manager,
        install_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
            manager,
            install_path: install_path.into(),
        }
    }

    pub fn install_path_lossy(&self) -> String {
        self.install_path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_labels() {
        assert_eq!(Manager::Mise.as_str(), "mise");
        assert_eq!(Manager::Asdf.as_str(), "asdf");
        assert_eq!(Manager::Asdf.to_string(), "asdf");
    }

    #[test]
    fn test_manager_from_str() {
        assert_eq!("MISE".parse::<Manager>(), Ok(Manager::Mise));
        assert_eq!("asdf".parse::<Manager>(), Ok(Manager::Asdf));
        assert!("nvm".parse::<Manager>().is_err());
    }

    #[test]
    fn test_default_data_dirs() {
        let home = Path::new("/home/dev");
        assert_eq!(
            Manager::Mise.default_data_dir(home),
            PathBuf::from("/home/dev/.local/share/mise")
        );
        assert_eq!(
            Manager::Asdf.default_data_dir(home),
            PathBuf::from("/home/dev/.asdf")
        );
    }

    #[test]
    fn test_manager_serializes_lowercase() {
        let package = Package::new("node", "20.10.0", Manager::Mise, "/x/node/20.10.0");
        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["manager"], "mise");
        assert_eq!(json["install_path"], "/x/node/20.10.0");
    }
}
