use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use janitor_indexer::ScanOptions;
use janitor_protocol::serialize_json;
use janitor_service::{
    CheckMissingScalesRequest, CheckSwiftgenStatusRequest, DeleteAssetRequest,
    FindAssetUsageRequest, FindUnusedAssetsRequest, GetAssetInfoRequest, IndexAssetsRequest,
    Janitor, JanitorConfig, ToolName, ToolRequest, ToolResponse,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "xcode-janitor")]
#[command(about = "Find and clean up unused assets in Xcode asset catalogs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Source files per scan batch (overrides XCODE_JANITOR_SCAN_BATCH_SIZE)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=1000))]
    batch_size: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a JSON request: {"tool": "...", "args": {...}}
    Command(CommandArgs),

    /// Index every .xcassets catalog under a project
    Index(ProjectArgs),

    /// Report unused assets and write the JSON and HTML reports
    Unused(UnusedArgs),

    /// List every reference to an asset
    Usage(AssetArgs),

    /// Delete an asset (backed up first unless --no-backup)
    Delete(DeleteArgs),

    /// Report image sets missing 1x/2x/3x variants
    Scales(ScalesArgs),

    /// Show the full record of an asset
    Info(AssetArgs),

    /// Show which assets are reached through SwiftGen accessors
    Swiftgen(ProjectArgs),
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ProjectArgs {
    /// Project root
    #[arg(default_value = ".")]
    path: PathBuf,
}

#[derive(Args)]
struct AssetArgs {
    /// Project root
    path: PathBuf,

    /// Asset name without the set suffix
    asset: String,
}

#[derive(Args)]
struct UnusedArgs {
    /// Project root
    #[arg(default_value = ".")]
    path: PathBuf,

    /// JSON report path (HTML is written next to it)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only report assets untouched for at least this many days
    #[arg(long)]
    min_age_days: Option<i64>,

    /// Name filter, '*' matches any sequence
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Args)]
struct DeleteArgs {
    /// Project root
    path: PathBuf,

    /// Asset name without the set suffix
    asset: String,

    /// Report the bytes that would be freed without deleting
    #[arg(long)]
    dry_run: bool,

    /// Skip the backup copy
    #[arg(long)]
    no_backup: bool,
}

#[derive(Args)]
struct ScalesArgs {
    /// Project root
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Check a single asset
    #[arg(long)]
    asset: Option<String>,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // `command` always writes JSON to stdout
    if matches!(cli.command, Commands::Command(_)) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut scan = ScanOptions::default();
    if let Some(batch_size) = cli.batch_size {
        scan = scan.with_batch_size(batch_size as usize);
    }
    let janitor = Janitor::new(JanitorConfig::default().with_scan_options(scan));

    match cli.command {
        Commands::Command(args) => run_command(&janitor, args).await?,
        Commands::Index(args) => {
            let request = IndexAssetsRequest {
                project_path: Some(project_path(&args.path)),
            };
            run_tool(&janitor, ToolName::IndexAssets, &request).await?
        }
        Commands::Unused(args) => {
            let request = FindUnusedAssetsRequest {
                project_path: Some(project_path(&args.path)),
                output_file: args.output.map(|p| p.to_string_lossy().into_owned()),
                minimum_age_days: args.min_age_days,
                pattern: args.pattern,
            };
            run_tool(&janitor, ToolName::FindUnusedAssets, &request).await?
        }
        Commands::Usage(args) => {
            let request = FindAssetUsageRequest {
                project_path: Some(project_path(&args.path)),
                asset_name: Some(args.asset),
            };
            run_tool(&janitor, ToolName::FindAssetUsage, &request).await?
        }
        Commands::Delete(args) => {
            let request = DeleteAssetRequest {
                project_path: Some(project_path(&args.path)),
                asset_name: Some(args.asset),
                dry_run: Some(args.dry_run),
                create_backup: Some(!args.no_backup),
            };
            run_tool(&janitor, ToolName::DeleteAsset, &request).await?
        }
        Commands::Scales(args) => {
            let request = CheckMissingScalesRequest {
                project_path: Some(project_path(&args.path)),
                asset_name: args.asset,
            };
            run_tool(&janitor, ToolName::CheckMissingScales, &request).await?
        }
        Commands::Info(args) => {
            let request = GetAssetInfoRequest {
                project_path: Some(project_path(&args.path)),
                asset_name: Some(args.asset),
            };
            run_tool(&janitor, ToolName::GetAssetInfo, &request).await?
        }
        Commands::Swiftgen(args) => {
            let request = CheckSwiftgenStatusRequest {
                project_path: Some(project_path(&args.path)),
            };
            run_tool(&janitor, ToolName::CheckSwiftgenStatus, &request).await?
        }
    }

    Ok(())
}

/// Absolute form of `path` when it exists; otherwise passed through so the
/// service can report it.
fn project_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

async fn run_tool<T: Serialize>(janitor: &Janitor, tool: ToolName, request: &T) -> Result<()> {
    let args = serde_json::to_value(request)?;
    let response = janitor
        .execute(ToolRequest {
            tool: tool.as_str().to_string(),
            args,
        })
        .await;

    if let Some(error) = &response.error {
        eprintln!("Error [{}]: {}", error.code, error.message);
        if let Some(hint) = &error.hint {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
    print_stdout(&serde_json::to_string_pretty(&response.data)?)
}

async fn run_command(janitor: &Janitor, args: CommandArgs) -> Result<()> {
    let raw = read_payload(&args)?;
    let request: ToolRequest =
        serde_json::from_str(&raw).context("Invalid JSON passed to --json/--file")?;

    let response = janitor.execute(request).await;
    print_response(&response, args.pretty)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_response(response: &ToolResponse, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serialize_json(response)?
    };
    print_stdout(&output)
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn batch_size_is_range_checked() {
        assert!(Cli::try_parse_from(["xcode-janitor", "--batch-size", "0", "index"]).is_err());
        assert!(Cli::try_parse_from(["xcode-janitor", "--batch-size", "1001", "index"]).is_err());
        let cli = Cli::try_parse_from(["xcode-janitor", "index", "--batch-size", "8"]).unwrap();
        assert_eq!(cli.batch_size, Some(8));
    }

    #[test]
    fn json_and_file_conflict() {
        assert!(Cli::try_parse_from([
            "xcode-janitor",
            "command",
            "--json",
            "{}",
            "--file",
            "req.json"
        ])
        .is_err());
    }
}
