//! Command-line interface for amdsense.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::complete::CompletionService;
use crate::config::{Config, DEFAULT_CONFIG_NAMES};
use crate::context::{find_previous_word, Position};
use crate::inspect::{collect_sources, Inspector};
use crate::report::{self, CompletionReport, FilesReport, Format};
use crate::resolve::SymbolFileIndex;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding the log filter (falls back to `RUST_LOG`).
pub const LOG_ENV: &str = "AMDSENSE_LOG";

const CONFIG_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Code completion engine for AMD-style `sap.ui.define` modules.
///
/// Amdsense parses JavaScript modules, even while they are half typed, and
/// suggests the members reachable from the word before the cursor: the
/// current object, a declared dependency, a helper or a store.
#[derive(Parser)]
#[command(name = "amdsense")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest members for a cursor position in a file
    Complete(CompleteArgs),
    /// Print dependencies, members and store accessors of source files
    Inspect(InspectArgs),
    /// List the helper and store files discovered in a workspace
    Files(FilesArgs),
    /// Create a new amdsense config file from the template
    Init(InitArgs),
}

/// Arguments for the complete command.
#[derive(Parser)]
pub struct CompleteArgs {
    /// Source file being edited
    pub file: PathBuf,

    /// Cursor line (0-based)
    #[arg(short, long)]
    pub line: usize,

    /// Cursor column in characters (0-based)
    #[arg(short = 'c', long)]
    pub column: usize,

    /// Workspace root (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Files or directories to inspect
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Include `_`-prefixed members
    #[arg(long)]
    pub include_protected: bool,
}

/// Arguments for the files command.
#[derive(Parser)]
pub struct FilesArgs {
    /// Workspace root (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAMES[0])]
    pub output: PathBuf,
}

/// Install the stderr log subscriber.
///
/// `AMDSENSE_LOG` wins over `RUST_LOG`; without either, `verbose` selects
/// debug output for this crate and warnings otherwise.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if let Ok(value) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(value)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("amdsense=debug")
    } else {
        EnvFilter::new("warn")
    };

    // A second initialization (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn workspace_root(root: Option<&Path>) -> anyhow::Result<PathBuf> {
    let root = match root {
        Some(r) => r.to_path_buf(),
        None => std::env::current_dir()?,
    };
    root.canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access workspace root {}: {}", root.display(), e))
}

fn load_config(explicit: Option<&Path>, root: &Path) -> anyhow::Result<Config> {
    let (config, path) = Config::load(explicit, root)?;
    match path {
        Some(p) => tracing::debug!(config = %p.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }
    Ok(config)
}

/// Run the complete command.
pub fn run_complete(args: &CompleteArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", args.file.display(), e);
            return Ok(EXIT_ERROR);
        }
    };

    let root = workspace_root(args.root.as_deref())?;
    let config = match load_config(args.config.as_deref(), &root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let service = CompletionService::new(config, &root)?;
    if let Err(e) = service.refresh_files() {
        tracing::warn!(error = %e, "helper and store discovery failed");
    }

    let position = Position::new(args.line, args.column);
    let word = find_previous_word(&source, position);
    let suggestions = service.complete(&source, position);
    let found = !suggestions.is_empty();

    let report = CompletionReport::new(&args.file, position, word, suggestions);
    match format {
        Format::Json => report::write_json(&report)?,
        Format::Pretty => report::write_completion_pretty(&report),
    }

    if found {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the inspect command.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let cwd = std::env::current_dir()?;
    let config = match load_config(args.config.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = match collect_sources(&args.paths) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if files.is_empty() {
        eprintln!("Warning: no files to inspect");
        return Ok(EXIT_SUCCESS);
    }

    let inspector = Inspector::new(config, args.include_protected);
    let symbols = inspector.inspect_files(&files);

    match format {
        Format::Json => report::write_json(&report::inspect_report(&symbols))?,
        Format::Pretty => report::write_inspect_pretty(&symbols, &cwd),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the files command.
pub fn run_files(args: &FilesArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let root = workspace_root(args.root.as_deref())?;
    let config = match load_config(args.config.as_deref(), &root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let index = SymbolFileIndex::discover(&root, &config.discovery)?;
    let report = FilesReport::new(&root, &index);
    match format {
        Format::Json => report::write_json(&report)?,
        Format::Pretty => report::write_files_pretty(&report),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Map your module prefixes under resource_roots in {}", args.output.display());
    println!("  2. Run: amdsense files --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
