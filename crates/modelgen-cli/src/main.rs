//! modelgen CLI.
//!
//! Generates plain TypeScript model interfaces from TypeORM entity classes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};

use modelgen_compiler::config::CONFIG_FILE_NAME;
use modelgen_compiler::{CompileResult, Compiler, CompilerConfig};

mod ui;

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(version)]
#[command(about = "modelgen - projects TypeORM entities onto plain TypeScript models")]
struct Cli {
    /// Config file (JSON, camelCase keys)
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model files
    Generate {
        #[command(flatten)]
        args: SourceArgs,
    },

    /// Parse and project entities without writing anything
    Check {
        #[command(flatten)]
        args: SourceArgs,
    },

    /// Watch the entity sources and regenerate on change
    Watch {
        #[command(flatten)]
        args: SourceArgs,
    },
}

/// Overrides for the config file.
#[derive(Args)]
struct SourceArgs {
    /// Entity source directory
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output directory for generated models
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language
    #[arg(short, long)]
    language: Option<String>,

    /// Fail when a relation names an unknown entity
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Generate { args } => {
            let config = resolve_config(&cli.config, args)?;
            generate_models(config)?;
        }

        Commands::Check { args } => {
            let config = resolve_config(&cli.config, args)?;
            check_models(config)?;
        }

        Commands::Watch { args } => {
            let config = resolve_config(&cli.config, args)?;
            run_watch_mode(config).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> miette::Result<()> {
    let level = if verbose { "modelgen=debug" } else { "modelgen=warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| miette::miette!("failed to initialize tracing subscriber: {}", e))
}

/// Loads the config file (if present) and applies command-line overrides.
fn resolve_config(path: &Path, args: SourceArgs) -> miette::Result<CompilerConfig> {
    let mut config = match CompilerConfig::load(path)? {
        Some(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            config
        }
        None => CompilerConfig::default(),
    };

    if let Some(source) = args.source {
        config.source_dir = source;
    }
    if let Some(output) = args.output {
        config.out_dir = output;
    }
    if let Some(language) = args.language {
        config.language = language;
    }
    if args.strict {
        config.strict_references = true;
    }

    Ok(config)
}

/// Generate models once.
fn generate_models(config: CompilerConfig) -> miette::Result<()> {
    let start = Instant::now();
    ui::print_compact_header(env!("CARGO_PKG_VERSION"));

    let spinner = ui::spinner("Projecting entities...");
    let out_dir = config.out_dir.clone();
    let compiler = Compiler::new(config);
    let result = compiler.compile();
    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            ui::nope_header();
            return Err(e.into());
        }
    };

    print_summary(&result);
    println!();
    ui::timing(&format!("Wrote {}", out_dir.display()), start.elapsed().as_millis());
    println!();

    Ok(())
}

/// Validate without writing.
fn check_models(config: CompilerConfig) -> miette::Result<()> {
    let spinner = ui::spinner("Checking entities...");
    let compiler = Compiler::new(config);
    let result = compiler.check();
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            ui::looking_good();
            println!();
            print_summary(&result);
            Ok(())
        }
        Err(e) => {
            ui::nope_header();
            Err(e.into())
        }
    }
}

fn print_summary(result: &CompileResult) {
    ui::box_header("MODELS");
    ui::box_line("");
    ui::box_line(&format!(
        "{} entities {} {} modules {} {} enums",
        result.entities,
        ui::symbols::DOT,
        result.modules,
        ui::symbols::DOT,
        result.enums
    ));
    if !result.base {
        ui::box_line("no base declaration, BaseModel not generated");
    }
    ui::box_line("");
    ui::box_footer();

    for unresolved in &result.unresolved {
        ui::warning(&format!(
            "{}.{} references unknown entity '{}' (import omitted)",
            unresolved.entity, unresolved.property, unresolved.target
        ));
    }
}

/// Run watch mode: regenerate whenever a source file changes.
async fn run_watch_mode(config: CompilerConfig) -> miette::Result<()> {
    let source_dir = config.source_dir.clone();

    ui::info(&format!("Watching for changes in {}", source_dir.display()));
    println!();

    let compiler = Compiler::new(config);
    rebuild(&compiler);

    // Writes into an output dir nested under the sources must not retrigger.
    let out_dir = compiler
        .config()
        .out_dir
        .canonicalize()
        .unwrap_or_else(|_| compiler.config().out_dir.clone());

    let watch_dir = source_dir.canonicalize().into_diagnostic()?;
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                if events.iter().any(|e| !e.path.starts_with(&out_dir)) {
                    let _ = tx.try_send(());
                }
            }
            Err(e) => tracing::warn!(error = ?e, "file watcher error"),
        },
    )
    .into_diagnostic()?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::Recursive)
        .into_diagnostic()?;

    ui::info("Ready! Waiting for changes...");

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                println!();
                rebuild(&compiler);
                println!();
                ui::info("Ready! Waiting for changes...");
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                ui::dim("Stopping watch mode.");
                break;
            }
        }
    }

    Ok(())
}

fn rebuild(compiler: &Compiler) {
    let spinner = ui::spinner("Regenerating models...");
    let start = Instant::now();

    match compiler.compile() {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::success(&format!(
                "Generated {} model(s) in {} module(s) in {}ms",
                result.entities,
                result.modules,
                start.elapsed().as_millis()
            ));
            for unresolved in &result.unresolved {
                ui::warning(&format!(
                    "{}.{} references unknown entity '{}'",
                    unresolved.entity, unresolved.property, unresolved.target
                ));
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error(&format!("{}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SourceArgs {
        SourceArgs {
            source: None,
            output: None,
            language: None,
            strict: false,
        }
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = resolve_config(Path::new("does-not-exist/modelgen.json"), args()).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("src/entities"));
        assert!(!config.strict_references);
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut overrides = args();
        overrides.source = Some(PathBuf::from("entities"));
        overrides.output = Some(PathBuf::from("out"));
        overrides.strict = true;

        let config = resolve_config(Path::new("does-not-exist/modelgen.json"), overrides).unwrap();

        assert_eq!(config.source_dir, PathBuf::from("entities"));
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert!(config.strict_references);
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from(["modelgen", "generate", "-s", "entities", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Generate { args: SourceArgs { source: Some(_), .. } }
        ));
    }
}
