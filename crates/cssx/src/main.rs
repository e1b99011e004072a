//! The `cssx` command-line tool.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cssx::{CompileResult, Compiler, Error, ProjectConfig, Result};
use tracing::level_filters::LevelFilter;

use crate::cli::{Cli, Commands, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::ERROR
    } else {
        match cli.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether every compile succeeded.
fn run(cli: Cli) -> Result<bool> {
    let mut project = load_config(cli.config.as_deref())?;
    let compiler = Compiler::new(project.compiler.clone());

    match cli.command {
        Commands::Build {
            input,
            out_dir,
            format,
        } => {
            if let Some(dir) = out_dir {
                project.output.dir = dir;
            }
            build(&compiler, &project, &input, format)
        }
        Commands::Check { input, format } => {
            let result = compiler.compile_file(&input)?;
            report(&result, format)?;
            Ok(result.success)
        }
        #[cfg(feature = "watch")]
        Commands::Watch { input, out_dir } => {
            if let Some(dir) = out_dir {
                project.output.dir = dir;
            }
            watch(&compiler, &project, &input)
        }
    }
}

/// An explicit `--config` must exist; otherwise `./cssx.toml` is optional.
fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    match path {
        Some(path) => {
            if !path.is_file() {
                let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
                return Err(Error::io(path, missing));
            }
            ProjectConfig::load(path)
        }
        None => ProjectConfig::discover("."),
    }
}

fn build(compiler: &Compiler, project: &ProjectConfig, input: &Path, format: OutputFormat) -> Result<bool> {
    let result = compiler.compile_file(input)?;
    report(&result, format)?;

    let written = result.write_outputs(&stem_of(input), &project.output)?;
    if result.success && format == OutputFormat::Text {
        for path in &written {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(result.success)
}

fn report(result: &CompileResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => eprint!("{}", result.render_diagnostics()),
        OutputFormat::Json => println!("{}", result.to_json()?),
    }
    Ok(())
}

fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

#[cfg(feature = "watch")]
fn watch(compiler: &Compiler, project: &ProjectConfig, input: &Path) -> Result<bool> {
    use std::time::Duration;

    use cssx::watch::{ChangeKind, SourceWatcher};

    let mut watcher = SourceWatcher::new()?;
    watcher.watch(input)?;

    if let Err(e) = build(compiler, project, input, OutputFormat::Text) {
        tracing::error!("{e}");
    }
    tracing::info!("waiting for changes, press Ctrl-C to stop");

    loop {
        for change in watcher.wait(Duration::from_millis(500)) {
            match change.kind {
                ChangeKind::Modified => {
                    tracing::info!(path = %change.path.display(), "source changed, rebuilding");
                    if let Err(e) = build(compiler, project, input, OutputFormat::Text) {
                        tracing::error!("{e}");
                    }
                }
                ChangeKind::Removed => {
                    tracing::warn!(path = %change.path.display(), "source removed");
                }
            }
        }
    }
}
