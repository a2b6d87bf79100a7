//! shell: command-line front end for constant-thickness surface shells.
//!
//! Reads OBJ files whose objects become groups, shells those groups and
//! writes the result back out. Suitable for scripting and batch pipelines.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=surface_shell=info` - One summary line per shell
//! - `RUST_LOG=surface_shell=debug` - Per-stage detail
//! - `RUST_LOG=mesh_graph::timing=debug` - Performance timing
//! - `RUST_LOG=trace` - Per-vertex offset cases
//!
//! # Example
//!
//! ```bash
//! # 3mm shell of every object in the file
//! shell shell panel.obj -o panel-shell.obj --thickness 3
//!
//! # Parameters from a file, thickness overridden on the command line
//! RUST_LOG=surface_shell=debug shell shell panel.obj -o out.obj --config shell.toml -t -2
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{info, offset, shell};

/// shell - Build constant-thickness shells from polygon surfaces.
///
/// Every object of the input OBJ file is treated as one group.
#[derive(Parser)]
#[command(name = "shell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// How results are printed
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Print nothing but errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log more: -v info, -vv debug, -vvv trace
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Coloured text for people
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display groups and surface statistics
    Info {
        /// Input OBJ file
        input: PathBuf,
    },

    /// Show how each vertex would be offset, without building anything
    Offset {
        /// Input OBJ file
        input: PathBuf,

        /// Shell thickness in mm (negative offsets along the face normals)
        #[arg(long, short, allow_negative_numbers = true)]
        thickness: f64,

        /// Only this group
        #[arg(long)]
        group: Option<String>,

        /// List every offset point
        #[arg(long)]
        detailed: bool,
    },

    /// Shell every group and save the result
    Shell {
        /// Input OBJ file
        input: PathBuf,

        /// Where to write the result (OBJ)
        #[arg(short, long)]
        output: PathBuf,

        /// Shell thickness in mm; overrides the config file
        #[arg(long, short, allow_negative_numbers = true)]
        thickness: Option<f64>,

        /// TOML file with shell parameters
        #[arg(long)]
        config: Option<PathBuf>,

        /// Name of the created shell groups
        #[arg(long)]
        group_name: Option<String>,

        /// Only this group
        #[arg(long)]
        group: Option<String>,
    },
}

/// Log directives for a `-v` count.
fn verbosity_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "mesh_graph=info,surface_shell=info",
        2 => "mesh_graph=debug,surface_shell=debug",
        _ => "trace",
    }
}

/// Log to stderr. `RUST_LOG`, when set and valid, wins over `-v`.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(verbosity_directives(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Offset {
            input,
            thickness,
            group,
            detailed,
        } => offset::run(input, *thickness, group.as_deref(), *detailed, &cli),
        Commands::Shell {
            input,
            output,
            thickness,
            config,
            group_name,
            group,
        } => shell::run(
            input,
            output,
            shell::Overrides {
                thickness: *thickness,
                config: config.as_deref(),
                group_name: group_name.as_deref(),
                group: group.as_deref(),
            },
            &cli,
        ),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            report_error(e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Print an error, with its code and suggestion when it comes from the
/// shell or mesh layers.
fn report_error(e: &anyhow::Error) {
    if let Some(shell_err) = e.downcast_ref::<surface_shell::ShellError>() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        let cause = shell_err.root_cause();
        if !std::ptr::eq(cause, shell_err) {
            eprintln!("  {}: {}", "Caused by".yellow(), cause);
        }
        eprintln!("  {}: {}", "Code".cyan(), cause.code());
        eprintln!(
            "  {}: {}",
            "Suggestion".green(),
            cause.recovery_suggestion()
        );
    } else if let Some(mesh_err) = e.downcast_ref::<mesh_graph::MeshError>() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
        eprintln!(
            "  {}: {}",
            "Suggestion".green(),
            mesh_err.recovery_suggestion()
        );
        if let Some(location) = mesh_err.location() {
            eprintln!("  {}: {}", "Location".yellow(), location);
        }
    } else {
        eprintln!("{}: {}", "Error".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {}: {}", "Caused by".yellow(), cause);
        }
    }
}
