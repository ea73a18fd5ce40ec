//! Core data types for discovered tool installations and scan results.
//!
//! - [`Package`] - One installed tool version
//! - [`Manager`] - The version manager that installed it (mise, asdf)
//! - [`Platform`] - Operating system platform
//! - [`ScanResult`] - Combined output of a scan, including per-manager failures
//!
//! # Example
//!
//! ```
//! use mise_osquery_extension::{Manager, Package, ScanResult};
//!
//! let package = Package::new("node", "20.10.0", Manager::Mise, "/opt/mise/installs/node/20.10.0");
//! let result = ScanResult::new(vec![package], Vec::new());
//!
//! println!("Found {} installs", result.packages.len());
//! ```

mod package;
mod result;

pub use package::*;
pub use result::*;
