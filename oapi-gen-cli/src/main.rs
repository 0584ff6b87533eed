//! # oapi-gen
//!
//! CLI tool for generating OpenAPI component schemas from Go and Rust model
//! files.
//!
//! ## Usage
//!
//! ```bash
//! # Print the document for ./models/*.go to stdout
//! oapi-gen generate
//!
//! # Read another pattern and write JSON to a file
//! oapi-gen generate --pattern 'api/**/*.go' --output openapi.json --format json
//!
//! # Watch mode for development
//! oapi-gen generate --output openapi.yaml --watch
//!
//! # Initialize configuration
//! oapi-gen init
//!
//! # Check that a written document is up-to-date
//! oapi-gen validate --path openapi.yaml
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oapi_gen_cli::{
    config::{CliArgs, Config, ConfigManager, OutputFormat, CONFIG_FILENAME},
    error::CliError,
    generator::SchemaGenerator,
    scanner::SourceScanner,
    watcher::FileWatcher,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "oapi-gen")]
#[command(author, version, about = "Generate OpenAPI component schemas from model types", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the OpenAPI document from model files
    Generate {
        /// Glob pattern selecting model files
        #[arg(short, long)]
        pattern: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Struct tag key supplying Go field names
        #[arg(long)]
        tag: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Fail on response name templates without %s
        #[arg(long)]
        strict_templates: bool,
    },

    /// Initialize a new oapi-gen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that a generated document is up-to-date
    Validate {
        /// Path to the generated document
        #[arg(long)]
        path: PathBuf,

        /// Glob pattern selecting model files
        #[arg(short, long)]
        pattern: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("oapi_gen=debug,oapi_gen_cli=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "oapi_gen=warn,oapi_gen_cli=warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            pattern,
            output,
            format,
            tag,
            config,
            dry_run,
            watch,
            strict_templates,
        } => {
            let args = CliArgs {
                pattern,
                output,
                format,
                tag,
                strict_templates,
            };
            cmd_generate(args, config, dry_run, watch)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            path,
            pattern,
            config,
        } => cmd_validate(path, pattern, config),
    }
}

/// Generate command implementation.
fn cmd_generate(args: CliArgs, config_path: Option<PathBuf>, dry_run: bool, watch: bool) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);

    if watch {
        run_watch_mode(&config, dry_run)
    } else {
        run_generate(&config, dry_run)
    }
}

/// Run generation once.
fn run_generate(config: &Config, dry_run: bool) -> Result<(), CliError> {
    eprintln!("{}", "Scanning for model files...".cyan());

    let generator = SchemaGenerator::new(config.clone())?;
    let files = generator.discover()?;

    if files.is_empty() {
        eprintln!(
            "{} No files match {}",
            "Warning:".yellow(),
            config.input.pattern
        );
    } else {
        eprintln!("  Found {} source file(s)", files.len().to_string().green());
    }

    let output = generator.generate(&files)?;
    eprintln!(
        "  Generated {} schema(s)",
        output.registry.len().to_string().green()
    );

    let Some(output_path) = &config.output.path else {
        print!("{}", output.content);
        return Ok(());
    };

    let writer = FileWriter::new(dry_run);
    match writer.write(output_path, &output.content)? {
        WriteResult::Written { path, bytes } => {
            eprintln!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            eprintln!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            print!("{}", content);
        }
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(config: &Config, dry_run: bool) -> Result<(), CliError> {
    let root = SourceScanner::new(&config.input.pattern).base_dir();

    eprintln!("{}", "Starting watch mode...".cyan());
    eprintln!("  Watching: {}", root.display());
    eprintln!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(config, dry_run) {
        print_error(&e);
    }

    let watcher = FileWatcher::new(root);
    let (_debouncer, rx) = watcher.watch()?;

    eprintln!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        match event.path() {
            Some(path) => eprintln!("\n{} {}", "File changed:".cyan(), path.display()),
            None => {
                eprintln!("{} {:?}", "Watch error:".red(), event);
                continue;
            }
        }

        if let Err(e) = run_generate(config, dry_run) {
            print_error(&e);
        }

        eprintln!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        eprintln!("  Use --force to overwrite");
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Configuration file already exists: {}", output.display()),
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    eprintln!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(document_path: PathBuf, pattern: Option<String>, config_path: Option<PathBuf>) -> Result<(), CliError> {
    eprintln!("{}", "Validating document...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let mut config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            pattern,
            ..Default::default()
        },
    );
    if document_path.extension().is_some_and(|ext| ext == "json") {
        config.output.format = OutputFormat::Json;
    }

    let generator = SchemaGenerator::new(config)?;
    match generator.check_document(&document_path) {
        Ok(()) => {
            eprintln!("{} Document is up-to-date", "✓".green());
            Ok(())
        }
        Err(e @ CliError::Validation(_)) => {
            eprintln!("{} Document is out of date", "✗".red());
            eprintln!("  Run 'oapi-gen generate' to update");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
