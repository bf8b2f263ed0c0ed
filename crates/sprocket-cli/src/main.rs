//! Sprocket CLI tool
//!
//! Runs block projects, and shows the IR and generated code their green-flag
//! scripts compile to.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use sprocket_engine::ExecutionMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprocket")]
#[command(about = "Cooperative block-script runner with first-class tasks", long_about = None)]
#[command(version)]
struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    /// Log engine activity (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a project from the green flag until it goes idle
    Run {
        /// Project file (JSON)
        project: PathBuf,
        /// Execution mode (interpreted or compiled)
        #[arg(short, long)]
        mode: Option<ExecutionMode>,
        /// Tick budget
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Engine options file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the lowered IR of every green-flag script
    Ir {
        /// Project file (JSON)
        project: PathBuf,
    },

    /// Disassemble the generated code of every green-flag script
    Emit {
        /// Project file (JSON)
        project: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "sprocket=debug,sprocket_engine=debug",
        _ => "sprocket=trace,sprocket_engine=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let color = output::resolve_color_choice(cli.color.as_deref());

    match cli.command {
        Commands::Run {
            project,
            mode,
            max_ticks,
            config,
        } => commands::run::execute(commands::run::RunArgs {
            project,
            mode,
            max_ticks,
            config,
            color,
        }),
        Commands::Ir { project } => commands::ir::execute(&project, color),
        Commands::Emit { project } => commands::emit::execute(&project, color),
    }
}
