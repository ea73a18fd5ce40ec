use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mise_osquery_extension::{
    aggregate::{scan_all, scan_sequential},
    config::Config,
    extension::ExtensionOptions,
    model::{Manager, ScanResult},
    output::{format_result_to_string, print_result, OutputFormat},
    platform::installs_dir,
    scanner::{get_scanner, DirectoryScanner, Scanner},
    table::{self, PackagesTable},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mise-osquery-extension")]
#[command(
    author,
    version,
    about = "List tool versions installed by mise and asdf, as an osquery table"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan installed tool versions
    Scan {
        /// Only scan this manager (mise, asdf)
        #[arg(short, long)]
        manager: Option<String>,

        /// Scan this installs directory instead of the manager's default (needs --manager)
        #[arg(short, long, requires = "manager")]
        path: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scan managers one after another
        #[arg(long)]
        no_parallel: bool,
    },

    /// Print the rows the mise_packages table returns, as JSON
    Query,

    /// Print the mise_packages table schema
    Schema,

    /// Resolve osquery extension settings and show what gets registered
    Extension {
        /// Path to the osquery extensions socket
        #[arg(long)]
        socket: Option<String>,

        /// Timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Ping interval in seconds
        #[arg(long, default_value_t = 3)]
        interval: u64,

        /// Socket path as passed by `osqueryi --extension`
        socket_path: Option<String>,
    },

    /// List supported managers and where they keep installs
    ListManagers,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {:#}", e);
            Config::default()
        }
    };

    match cli.command {
        Commands::Scan {
            manager,
            path,
            format,
            output,
            no_parallel,
        } => {
            let format = format.unwrap_or_else(|| config.default_format.clone());
            let parallel = !no_parallel && config.parallel;
            run_scan(&config, manager, path, format, output, parallel).await
        }
        Commands::Query => {
            let rows = PackagesTable::with_scanners(config.enabled_scanners())
                .generate()
                .await;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        Commands::Schema => {
            println!("-- extension: {}", table::EXTENSION_NAME);
            println!("{}", table::create_table_statement());
            Ok(())
        }
        Commands::Extension {
            socket,
            timeout,
            interval,
            socket_path,
        } => {
            let options = ExtensionOptions::from_env(socket.as_deref(), socket_path.as_deref())?
                .with_timeout_secs(timeout)
                .with_interval_secs(interval)
                .with_verbose(verbose);
            tracing::debug!(socket = ?options.socket, source = options.socket_source.as_str(), "Resolved osquery socket");
            println!("{}", options.registration_summary());
            Ok(())
        }
        Commands::ListManagers => {
            list_managers();
            Ok(())
        }
        Commands::Config { init, path } => handle_config(init, path),
    }
}

async fn run_scan(
    config: &Config,
    manager_filter: Option<String>,
    path: Option<PathBuf>,
    format: String,
    output_file: Option<PathBuf>,
    parallel: bool,
) -> Result<()> {
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table && output_file.is_none();

    let scanners: Vec<Arc<dyn Scanner>> = match (manager_filter, path) {
        (Some(name), Some(path)) => {
            let manager = Manager::from_str(&name).map_err(|e| anyhow::anyhow!(e))?;
            vec![Arc::new(DirectoryScanner::new(manager, path))]
        }
        (Some(name), None) => {
            let manager = Manager::from_str(&name).map_err(|e| anyhow::anyhow!(e))?;
            vec![get_scanner(manager)]
        }
        _ => config.enabled_scanners(),
    };

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Scanning {} manager(s)...", scanners.len()));
        Some(pb)
    } else {
        None
    };

    let result: ScanResult = if parallel && scanners.len() > 1 {
        scan_all(scanners).await
    } else {
        scan_sequential(scanners).await
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if let Some(path) = output_file {
        let content = format_result_to_string(&result, format)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write results to {:?}", path))?;
        eprintln!("Results written to: {}", path.display());
    } else {
        print_result(&result, format)?;
    }

    Ok(())
}

fn list_managers() {
    println!("Supported managers:");
    println!();

    for manager in Manager::all() {
        let scanner = get_scanner(*manager);
        let supported = if scanner.is_supported() { "yes" } else { "no" };
        let location = installs_dir(*manager)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(home directory not found)".to_string());

        println!(
            "  {:<8} {:<12} [supported: {}]",
            manager.as_str(),
            manager.display_name(),
            supported
        );
        println!("  {:<8} Installs: {}", "", location);
        println!("  {:<8} Override: ${}", "", manager.data_dir_env());
        println!();
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'mise-osquery-extension config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
