//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cssx")]
#[command(about = "Compile CSSX stylesheets to CSS and HTML", version)]
pub struct Cli {
    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (default: ./cssx.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a file and write `<stem>.css` and `<stem>.html`
    Build {
        input: PathBuf,
        /// Output directory (overrides `[output] dir`)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Report diagnostics without writing anything
    Check {
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Rebuild whenever the file changes
    #[cfg(feature = "watch")]
    Watch {
        input: PathBuf,
        /// Output directory (overrides `[output] dir`)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

/// How diagnostics are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `file:line:col: CODE: message`
    Text,
    /// The whole compile result as JSON
    Json,
}
