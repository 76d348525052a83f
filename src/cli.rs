//! Command-line interface for osprey.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::endpoints::CancellationFlag;
use crate::report::{self, InspectedEndpoint};
use crate::workspace::Workspace;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static endpoint and DTO analysis for decorator-based TypeScript controllers.
///
/// Osprey reads controller classes without running them and reports every
/// request handler with its HTTP verb, route, parameters and an example
/// request body synthesized from the DTO classes it references.
#[derive(Parser)]
#[command(name = "osprey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every endpoint in a workspace, grouped by controller
    Routes(RoutesArgs),
    /// Show the analysis of one controller file
    Inspect(InspectArgs),
    /// Print the request an endpoint would be opened with
    Payload(PayloadArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Arguments for the routes command.
#[derive(Parser)]
pub struct RoutesArgs {
    /// Workspace root to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: Format,
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Controller file to analyze
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: Format,
}

/// Arguments for the payload command.
#[derive(Parser)]
pub struct PayloadArgs {
    /// Controller file containing the endpoint
    pub file: PathBuf,

    /// Line of the handler (1-indexed)
    #[arg(short, long)]
    pub line: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: Format,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "osprey.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Log filter for a verbosity level; `RUST_LOG` takes precedence.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "osprey=warn",
        1 => "osprey=debug",
        _ => "osprey=trace",
    }
}

/// Load the configuration for `dir`.
///
/// An explicit path must exist; otherwise the discovered file or the
/// defaults are used.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config::discover(dir),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using configuration");
            Config::parse_file(&path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?
        }
        None => {
            let mut config = Config::default();
            config.anchor_module_roots(dir);
            config
        }
    };

    config::validate(&config).context("invalid configuration")?;
    Ok(config)
}

fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("cannot determine working directory")
}

/// Run the routes command.
pub async fn run_routes(cli: &Cli, args: &RoutesArgs) -> anyhow::Result<i32> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot access path {}", args.path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let config = load_config(cli.config.as_deref(), &root)?;
    let mut workspace = Workspace::open(&root, config);

    let progress = if args.format == Format::Pretty {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("  {spinner} [{bar:30}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let cancel = CancellationFlag::new();
    let report = workspace
        .discover(&cancel, |path, done, total| {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress.set_message(name);
        })
        .await?;
    progress.finish_and_clear();

    match args.format {
        Format::Pretty => report::write_routes_pretty(&root, &report),
        Format::Json => report::write_routes_json(&root, &report)?,
    }

    workspace.dispose();

    if report.endpoint_count() == 0 {
        return Ok(EXIT_FAILED);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the inspect command.
pub fn run_inspect(cli: &Cli, args: &InspectArgs) -> anyhow::Result<i32> {
    let cwd = current_dir()?;
    if !args.file.is_file() {
        anyhow::bail!("cannot access file {}", args.file.display());
    }

    let config = load_config(cli.config.as_deref(), &cwd)?;
    let mut workspace = Workspace::open(&cwd, config);

    let entries: Vec<InspectedEndpoint> = workspace
        .endpoints(&args.file)
        .into_iter()
        .map(|endpoint| {
            let body_fields = endpoint
                .request_body
                .as_ref()
                .map(|dto| workspace.fields(dto))
                .unwrap_or_default();
            InspectedEndpoint {
                endpoint,
                body_fields,
            }
        })
        .collect();

    match args.format {
        Format::Pretty => report::write_inspect_pretty(&args.file, &entries),
        Format::Json => report::write_inspect_json(&entries)?,
    }

    if entries.is_empty() {
        return Ok(EXIT_FAILED);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the payload command.
pub fn run_payload(cli: &Cli, args: &PayloadArgs) -> anyhow::Result<i32> {
    let cwd = current_dir()?;
    if !args.file.is_file() {
        anyhow::bail!("cannot access file {}", args.file.display());
    }

    let config = load_config(cli.config.as_deref(), &cwd)?;
    let mut workspace = Workspace::open(&cwd, config);

    let Some(endpoint) = workspace.endpoint_at(&args.file, args.line) else {
        eprintln!(
            "No endpoint found at {}:{}",
            args.file.display(),
            args.line
        );
        return Ok(EXIT_FAILED);
    };

    let preview = workspace.request_preview(&endpoint);
    match args.format {
        Format::Pretty => report::write_preview_pretty(&preview),
        Format::Json => report::write_preview_json(&preview)?,
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it, pass --force, or use --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let content = format!(
        "# osprey configuration\n{}",
        serde_yaml::to_string(&Config::default())?
    );
    std::fs::write(&args.output, content)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to match your project layout", args.output.display());
    println!("  2. Run: osprey routes . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "osprey=warn");
        assert_eq!(log_filter(1), "osprey=debug");
        assert_eq!(log_filter(5), "osprey=trace");
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from(["osprey", "-v", "payload", "a.controller.ts", "--line", "12"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Payload(args) => {
                assert_eq!(args.line, 12);
                assert_eq!(args.format, Format::Json);
            }
            _ => panic!("expected payload command"),
        }

        let cli = Cli::try_parse_from(["osprey", "routes", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Routes(args) => {
                assert_eq!(args.path, PathBuf::from("."));
                assert_eq!(args.format, Format::Json);
            }
            _ => panic!("expected routes command"),
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("conf/osprey.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let config = load_config(Some(output.as_path()), dir.path()).unwrap();
        assert_eq!(config.discovery_batch_size, 5);

        // Refuses to overwrite without --force.
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
        let forced = InitArgs {
            output,
            force: true,
        };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(load_config(Some(missing.as_path()), dir.path()).is_err());
    }
}
