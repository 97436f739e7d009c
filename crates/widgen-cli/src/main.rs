use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use widgen_cli::{run as generate, write::atomic_write, Settings};
use widgen_config::{discover_config_path, init_tracing, WidgenConfig};

#[derive(Parser)]
#[command(
    name = "widgen",
    version,
    about = "Generate a Java attribute DSL from a widget class library"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the DSL source (stdout unless an output path is configured)
    Generate(GenerateArgs),
    /// Exit with status 1 if the output file is missing or stale
    Check(GenerateArgs),
    /// Print the classes and resolved attributes without rendering
    Inspect(InspectArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Config file (defaults to `$WIDGEN_CONFIG_PATH`, then `widgen.toml`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Binary name of the root widget type
    #[arg(long)]
    root: Option<String>,
    /// Archive (jar or class directory) to generate for; repeatable
    #[arg(long = "archive")]
    archives: Vec<PathBuf>,
    /// Archive used only to resolve types; repeatable
    #[arg(long = "classpath")]
    classpath: Vec<PathBuf>,
    /// Package of the generated class
    #[arg(long)]
    package: Option<String>,
    /// Name of the generated class
    #[arg(long)]
    class_name: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output file (overrides `output.path`)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct InspectArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Generate(args) => {
            let settings = load_settings(&args.input, args.out)?;
            let source = generate(&settings)?.source();
            match &settings.output {
                Some(path) => {
                    if read_existing(path)?.as_deref() == Some(source.as_str()) {
                        tracing::info!(target: "widgen.cli", path = %path.display(), "output up to date");
                    } else {
                        if let Some(dir) = path.parent() {
                            std::fs::create_dir_all(dir)
                                .with_context(|| format!("failed to create {}", dir.display()))?;
                        }
                        atomic_write(path, source.as_bytes())
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        tracing::info!(target: "widgen.cli", path = %path.display(), "wrote output");
                    }
                }
                None => print!("{source}"),
            }
            Ok(0)
        }
        Command::Check(args) => {
            let settings = load_settings(&args.input, args.out)?;
            let path = settings
                .output
                .clone()
                .context("check needs an output path (set `output.path` or pass --out)")?;
            let source = generate(&settings)?.source();
            match read_existing(&path)? {
                Some(existing) if existing == source => {
                    println!("{}: up to date", path.display());
                    Ok(0)
                }
                Some(_) => {
                    println!("{}: stale", path.display());
                    Ok(1)
                }
                None => {
                    println!("{}: missing", path.display());
                    Ok(1)
                }
            }
        }
        Command::Inspect(args) => {
            let settings = load_settings(&args.input, None)?;
            let report = generate(&settings)?.report();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            Ok(0)
        }
    }
}

fn load_settings(input: &InputArgs, out: Option<PathBuf>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let config_path = input
        .config
        .clone()
        .or_else(|| discover_config_path(&cwd));
    let mut config = match &config_path {
        Some(path) => WidgenConfig::load_from_path(path)?,
        None => WidgenConfig::default(),
    };
    init_tracing(&config.logging);
    if let Some(path) = &config_path {
        tracing::debug!(target: "widgen.cli", path = %path.display(), "using config file");
    }

    if let Some(root) = &input.root {
        config.root = Some(root.clone());
    }
    config.archives.extend(input.archives.iter().cloned());
    config.classpath.extend(input.classpath.iter().cloned());
    if let Some(package) = &input.package {
        config.output.package = Some(package.clone());
    }
    if let Some(class_name) = &input.class_name {
        config.output.class_name = Some(class_name.clone());
    }
    if let Some(out) = out {
        config.output.path = Some(out);
    }

    Settings::from_config(&config)
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}
