//! Runs every manager scanner and combines their packages.
//!
//! Both entry points are infallible. A scanner that errors or panics is
//! logged, recorded in [`ScanResult::failures`] and contributes no packages;
//! the remaining scanners are unaffected. Packages are not sorted or
//! deduplicated, and their order across managers is unspecified.

use crate::model::{Package, ScanFailure, ScanResult};
use crate::scanner::{all_scanners, ScanError, Scanner};
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

/// Scans all known managers concurrently.
pub async fn scan_all_managers() -> ScanResult {
    scan_all(all_scanners()).await
}

/// Spawns one task per scanner and waits for all of them.
pub async fn scan_all(scanners: Vec<Arc<dyn Scanner>>) -> ScanResult {
    let handles: Vec<_> = scanners.iter().map(spawn_scanner).collect();
    let outcomes = join_all(handles).await;

    let mut packages = Vec::new();
    let mut failures = Vec::new();

    for (scanner, outcome) in scanners.iter().zip(outcomes) {
        let outcome = flatten_join(scanner.as_ref(), outcome);
        collect(scanner.as_ref(), outcome, &mut packages, &mut failures);
    }

    ScanResult::new(packages, failures)
}

/// Scans one manager at a time, in the given order.
pub async fn scan_sequential(scanners: Vec<Arc<dyn Scanner>>) -> ScanResult {
    let mut packages = Vec::new();
    let mut failures = Vec::new();

    for scanner in &scanners {
        let outcome = flatten_join(scanner.as_ref(), spawn_scanner(scanner).await);
        collect(scanner.as_ref(), outcome, &mut packages, &mut failures);
    }

    ScanResult::new(packages, failures)
}

// Each scanner gets its own task so a panic surfaces as a JoinError.
fn spawn_scanner(scanner: &Arc<dyn Scanner>) -> JoinHandle<anyhow::Result<Vec<Package>>> {
    let scanner = Arc::clone(scanner);
    tokio::spawn(async move { run_scanner(scanner.as_ref()).await })
}

fn flatten_join(
    scanner: &dyn Scanner,
    outcome: Result<anyhow::Result<Vec<Package>>, JoinError>,
) -> anyhow::Result<Vec<Package>> {
    outcome
        .map_err(|e| {
            anyhow::Error::new(ScanError::TaskAborted {
                manager: scanner.manager().to_string(),
                reason: e.to_string(),
            })
        })
        .and_then(|r| r)
}

async fn run_scanner(scanner: &dyn Scanner) -> anyhow::Result<Vec<Package>> {
    if !scanner.is_supported() {
        debug!(scanner = scanner.name(), "skipping unsupported scanner");
        return Ok(Vec::new());
    }
    scanner.scan().await
}

fn collect(
    scanner: &dyn Scanner,
    outcome: anyhow::Result<Vec<Package>>,
    packages: &mut Vec<Package>,
    failures: &mut Vec<ScanFailure>,
) {
    match outcome {
        Ok(found) => {
            debug!(scanner = scanner.name(), count = found.len(), "scanner finished");
            packages.extend(found);
        }
        Err(e) => {
            let error = format!("{:#}", e);
            warn!(scanner = scanner.name(), %error, "Error scanning {}", scanner.manager());
            failures.push(ScanFailure {
                manager: scanner.manager(),
                scanner: scanner.name().to_string(),
                error,
            });
        }
    }
}
