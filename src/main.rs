//! structure-diff: structural diff of project storage and vault snapshots
//!
//! Compares source and destination environment snapshots and writes a
//! plain-text report for review before promotion.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};
use structure_diff::{cli, config, LinkProject};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "structure-diff")]
#[command(version)]
#[command(about = "Structural diff of storage and vault snapshots across environments", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Report written / no encrypted secure values found
    1  scan-secrets found secure values outside the vault
    2  Usage error
    other non-zero  Error occurred

WORKDIR LAYOUT:
    <workdir>/source/<env>/<project>.json
    <workdir>/destination/<env>/<project>.json

EXAMPLES:
    # Compare storage structures, report in ./reports
    structure-diff storage snapshots.zip --output-dir reports

    # Compare vault variable names
    structure-diff vault snapshots/

    # Check exported configurations for encrypted values
    structure-diff scan-secrets configs/")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory reports and artifacts are written to
    #[arg(long, global = true, env = "STRUCTURE_DIFF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare bucket and table structures between environments
    Storage {
        /// Workdir directory or zip archive
        workdir: PathBuf,

        /// Report file name inside the output directory
        #[arg(long)]
        report: Option<String>,

        /// Project id used in links to removed resources
        #[arg(long, value_enum)]
        link_project: Option<LinkProject>,

        /// Also compare resources of development branches
        #[arg(long)]
        all_branches: bool,
    },

    /// Compare vault variable names between environments
    Vault {
        /// Workdir directory or zip archive
        workdir: PathBuf,

        /// Report file name inside the output directory
        #[arg(long)]
        report: Option<String>,
    },

    /// Scan exported configurations for secure values not in the vault
    ScanSecrets {
        /// Directory with configuration JSON files
        dir: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the JSON Schema of the configuration file
    ConfigSchema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .structure-diff.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let (mut app_config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    if let Some(dir) = &cli.output_dir {
        app_config.output.dir.clone_from(dir);
    }
    if cli.quiet {
        app_config.behavior.quiet = true;
    }

    let exit_code = match cli.command {
        Commands::Storage {
            workdir,
            report,
            link_project,
            all_branches,
        } => {
            if let Some(name) = report {
                app_config.output.storage_report = name;
            }
            if let Some(policy) = link_project {
                app_config.storage.link_project = policy;
            }
            if all_branches {
                app_config.storage.default_branch_only = false;
            }
            cli::run_storage(&workdir, &app_config)?
        }

        Commands::Vault { workdir, report } => {
            if let Some(name) = report {
                app_config.output.vault_report = name;
            }
            cli::run_vault(&workdir, &app_config)?
        }

        Commands::ScanSecrets { dir } => cli::run_scan_secrets(&dir, app_config.behavior.quiet)?,

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "structure-diff", &mut io::stdout());
            0
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            0
        }

        Commands::Config { action } => {
            run_config_action(&action, &app_config, loaded_from.as_deref(), cli.config.as_deref())?;
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn run_config_action(
    action: &ConfigAction,
    app_config: &config::AppConfig,
    loaded_from: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            match loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(app_config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            eprintln!("Config file search paths (in order):");
            for path in config::config_search_dirs() {
                eprintln!("  {}", path.display());
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in config::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".structure-diff.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
