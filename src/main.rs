//! Confpatch CLI
//!
//! Entry point for the `confpatch` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use confpatch::settings::{default_repo_path, default_user_path};
use confpatch::{build_patch, discover, EffectiveSettings, Patcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "confpatch")]
#[command(about = "Format-preserving edits of defineConfig() config files", version)]
struct Cli {
    /// Path to settings file (default: .confpatch.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Spaces per indent level in new text
    #[arg(long, global = true)]
    indent: Option<u64>,

    /// Quote style for new strings
    #[arg(long, global = true, value_enum)]
    quote: Option<QuoteArg>,

    /// Log debug events to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum QuoteArg {
    Single,
    Double,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or update properties
    Update {
        /// Config file to edit
        file: PathBuf,

        /// Patch file (.json or .toml)
        #[arg(long, short = 'p')]
        patch: Option<PathBuf>,

        /// Set KEY (dotted path) to VALUE (JSON, or a plain string)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,

        /// Set KEY (dotted path) to a call expression
        #[arg(long = "call", value_name = "KEY=EXPR")]
        calls: Vec<String>,

        /// Replace the whole config object with the patch
        #[arg(long)]
        overwrite: bool,

        /// Rewrite the file instead of printing the result
        #[arg(long, short = 'w')]
        write: bool,
    },

    /// Remove properties by dotted path
    Remove {
        /// Config file to edit
        file: PathBuf,

        /// Dotted path of a property to remove (repeatable)
        #[arg(long = "path", value_name = "KEY", required = true)]
        paths: Vec<String>,

        /// Rewrite the file instead of printing the result
        #[arg(long, short = 'w')]
        write: bool,
    },

    /// Print the config object as JSON
    Show {
        /// Config file to read
        file: PathBuf,
    },

    /// List config files below a directory
    Find {
        /// Directory to search (default: current directory)
        dir: Option<PathBuf>,
    },

    /// Print the effective settings with their sources
    Settings,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };
    let patcher = Patcher::new(settings.print_options());

    match cli.command {
        Commands::Update {
            file,
            patch,
            sets,
            calls,
            overwrite,
            write,
        } => run_update(&patcher, &file, patch.as_deref(), &sets, &calls, overwrite, write),
        Commands::Remove { file, paths, write } => run_remove(&patcher, &file, &paths, write),
        Commands::Show { file } => run_show(&patcher, &file),
        Commands::Find { dir } => run_find(&settings, dir),
        Commands::Settings => run_settings(&settings),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CONFPATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<EffectiveSettings, String> {
    let repo_path = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(format!("settings file not found: {}", path.display()))
        }
        Some(path) => path.clone(),
        None => default_repo_path(),
    };

    let mut print = serde_json::Map::new();
    if let Some(indent) = cli.indent {
        print.insert("indent".to_string(), indent.into());
    }
    if let Some(quote) = cli.quote {
        let name = match quote {
            QuoteArg::Single => "single",
            QuoteArg::Double => "double",
        };
        print.insert("quote".to_string(), name.into());
    }
    let cli_overrides = (!print.is_empty()).then(|| serde_json::json!({ "print": print }));

    let user_path = default_user_path();
    EffectiveSettings::build(user_path.as_deref(), Some(&repo_path), cli_overrides)
        .map_err(|e| e.to_string())
}

fn read_source(file: &Path) -> String {
    match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn emit(file: &Path, original: &str, updated: String, write: bool) {
    if !write {
        print!("{}", updated);
        return;
    }
    if updated == original {
        eprintln!("{}: unchanged", file.display());
        return;
    }
    if let Err(e) = fs::write(file, updated) {
        eprintln!("Error writing {}: {}", file.display(), e);
        process::exit(1);
    }
    eprintln!("{}: updated", file.display());
}

fn run_update(
    patcher: &Patcher,
    file: &Path,
    patch_file: Option<&Path>,
    sets: &[String],
    calls: &[String],
    overwrite: bool,
    write: bool,
) {
    let patch = match build_patch(patch_file, sets, calls) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let original = read_source(file);
    match patcher.add_or_update(&original, &patch, overwrite) {
        Ok(updated) => emit(file, &original, updated, write),
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn run_remove(patcher: &Patcher, file: &Path, paths: &[String], write: bool) {
    let original = read_source(file);
    match patcher.remove_properties(&original, paths) {
        Ok(updated) => emit(file, &original, updated, write),
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn run_show(patcher: &Patcher, file: &Path) {
    let original = read_source(file);
    let value = match patcher.read_config(&original) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&value.to_json()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_find(settings: &EffectiveSettings, dir: Option<PathBuf>) {
    let root = dir.unwrap_or_else(|| PathBuf::from("."));
    match discover(&root, &settings.discover_settings()) {
        Ok(found) => {
            for path in found {
                println!("{}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_settings(settings: &EffectiveSettings) {
    match settings.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
