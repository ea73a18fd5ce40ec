//! The `mise_packages` osquery table.
//!
//! This is the piece an osquery extension host registers: a fixed schema of
//! four text columns and a `generate` callback that returns one row per
//! installed tool version. Generation never fails; if a manager cannot be
//! scanned, its rows are simply missing and the reason goes to the log.
//!
//! # Example
//!
//! ```no_run
//! use mise_osquery_extension::table::PackagesTable;
//!
//! #[tokio::main]
//! async fn main() {
//!     let table = PackagesTable::new();
//!     for row in table.generate().await {
//!         println!("{} {}", row["tool"], row["version"]);
//!     }
//! }
//! ```

use crate::aggregate::scan_all;
use crate::model::Package;
use crate::scanner::{all_scanners, Scanner};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub const TABLE_NAME: &str = "mise_packages";

/// Name the extension registers under with osquery.
pub const EXTENSION_NAME: &str = "mise_packages_extension";

pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Text,
        }
    }
}

pub fn columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::text("tool"),
        ColumnDefinition::text("version"),
        ColumnDefinition::text("manager"),
        ColumnDefinition::text("install_path"),
    ]
}

/// Renders the schema the way osquery's `.schema` shows it.
pub fn create_table_statement() -> String {
    let cols: Vec<String> = columns()
        .iter()
        .map(|c| format!("`{}` {}", c.name, c.column_type.as_sql()))
        .collect();
    format!("CREATE TABLE {}({});", TABLE_NAME, cols.join(", "))
}

/// Maps a package onto the table's columns without transforming any field.
pub fn package_to_row(package: &Package) -> Row {
    let mut row = Row::new();
    row.insert("tool".to_string(), package.tool.clone());
    row.insert("version".to_string(), package.version.clone());
    row.insert("manager".to_string(), package.manager.as_str().to_string());
    row.insert("install_path".to_string(), package.install_path_lossy());
    row
}

pub struct PackagesTable {
    scanners: Vec<Arc<dyn Scanner>>,
}

impl PackagesTable {
    pub fn new() -> Self {
        Self::with_scanners(all_scanners())
    }

    pub fn with_scanners(scanners: Vec<Arc<dyn Scanner>>) -> Self {
        Self { scanners }
    }

    pub fn name(&self) -> &'static str {
        TABLE_NAME
    }

    pub fn columns(&self) -> Vec<ColumnDefinition> {
        columns()
    }

    /// Scans every manager and returns the table rows.
    pub async fn generate(&self) -> Vec<Row> {
        debug!("Table query called for {}", TABLE_NAME);
        let result = scan_all(self.scanners.clone()).await;
        debug!(count = result.packages.len(), "Found packages");
        result.packages.iter().map(package_to_row).collect()
    }
}

impl Default for PackagesTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Manager;
    use crate::scanner::DirectoryScanner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_columns() {
        let names: Vec<&str> = columns().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["tool", "version", "manager", "install_path"]);
        assert!(columns().iter().all(|c| c.column_type == ColumnType::Text));
    }

    #[test]
    fn test_create_table_statement() {
        assert_eq!(
            create_table_statement(),
            "CREATE TABLE mise_packages(`tool` TEXT, `version` TEXT, `manager` TEXT, `install_path` TEXT);"
        );
    }

    #[test]
    fn test_package_to_row_is_verbatim() {
        let package = Package::new(
            "python",
            "3.12.0",
            Manager::Asdf,
            "/home/dev/.asdf/installs/python/3.12.0",
        );

        let row = package_to_row(&package);

        assert_eq!(row.len(), 4);
        assert_eq!(row["tool"], "python");
        assert_eq!(row["version"], "3.12.0");
        assert_eq!(row["manager"], "asdf");
        assert_eq!(row["install_path"], "/home/dev/.asdf/installs/python/3.12.0");
    }

    #[tokio::test]
    async fn test_generate_rows() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("node").join("20.10.0")).unwrap();

        let table = PackagesTable::with_scanners(vec![Arc::new(DirectoryScanner::new(
            Manager::Mise,
            tmp.path(),
        ))]);
        let rows = table.generate().await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tool"], "node");
        assert_eq!(rows[0]["manager"], "mise");
    }

    #[tokio::test]
    async fn test_generate_never_fails() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("installs");
        fs::write(&broken, "").unwrap();

        let table =
            PackagesTable::with_scanners(vec![Arc::new(DirectoryScanner::new(Manager::Asdf, broken))]);

        assert!(table.generate().await.is_empty());
    }
}
