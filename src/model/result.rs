use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Manager, Package};

/// A scanner that could not complete and contributed no packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub manager: Manager,
    pub scanner: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub packages: Vec<Package>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<ScanFailure>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(packages: Vec<Package>, failures: Vec<ScanFailure>) -> Self {
        Self {
            packages,
            failures,
            scanned_at: Utc::now(),
        }
    }

    pub fn count_for(&self, manager: Manager) -> usize {
        self.packages
            .iter()
            .filter(|p| p.manager == manager)
            .count()
    }
}
