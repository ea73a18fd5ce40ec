pub mod aggregate;
pub mod config;
pub mod extension;
pub mod model;
pub mod output;
pub mod platform;
pub mod scanner;
pub mod table;

pub use aggregate::{scan_all, scan_all_managers, scan_sequential};
pub use config::Config;
pub use model::{Manager, Package, Platform, ScanFailure, ScanResult};
pub use scanner::Scanner;
