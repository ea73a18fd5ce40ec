use crate::model::{Manager, ScanResult};
use anyhow::Result;
use std::fmt::{self, Write};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Tool")]
    tool: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Install Path")]
    install_path: String,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Error")]
    error: String,
}

pub fn print_cli_table(result: &ScanResult) -> Result<()> {
    print!("{}", render_table(result)?);
    Ok(())
}

pub(crate) fn render_table(result: &ScanResult) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, result)?;
    Ok(out)
}

fn write_report(out: &mut impl Write, result: &ScanResult) -> fmt::Result {
    writeln!(out)?;
    writeln!(
        out,
        "Scan completed at: {}",
        result.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    if result.packages.is_empty() {
        writeln!(out, "No installed tools found.")?;
    } else {
        let summary: Vec<String> = Manager::all()
            .iter()
            .map(|m| format!("{} {}", result.count_for(*m), m.as_str()))
            .collect();
        writeln!(
            out,
            "Found {} installed tool versions ({}):",
            result.packages.len(),
            summary.join(", ")
        )?;
        writeln!(out)?;

        let rows: Vec<PackageRow> = result
            .packages
            .iter()
            .map(|p| PackageRow {
                manager: p.manager.as_str().to_string(),
                tool: truncate(&p.tool, 30),
                version: truncate(&p.version, 30),
                install_path: p.install_path_lossy(),
            })
            .collect();

        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
    }

    if !result.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "{} manager(s) could not be scanned:", result.failures.len())?;
        writeln!(out)?;

        let rows: Vec<FailureRow> = result
            .failures
            .iter()
            .map(|f| FailureRow {
                manager: f.manager.display_name().to_string(),
                error: truncate(&f.error, 80),
            })
            .collect();

        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
