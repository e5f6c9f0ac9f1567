//! CLI entry point for emaki
//!
//! This provides a command-line interface to play, check and dump timeline
//! registries.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use emaki::cli::dump::run_dump;
use emaki::cli::play::{PlayOptions, PlayOutcome, run_play};
use emaki::runtime::debug::DebugConfig;
use emaki::{
    FileSystemRepository, PlayerConfig, RegistryRepository, RepositoryError, SnapshotRepository,
    TimelineRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "emaki", version)]
#[command(about = "Data-driven visual novel timeline player")]
struct Cli {
    /// Player configuration JSON (canvas, timing, gate layout).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a registry interactively in the terminal.
    Play(PlayArgs),
    /// Lint a registry and report problems.
    Check(CheckArgs),
    /// Run a registry headless and print the recorded surface commands.
    Dump(DumpArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Registry JSON file.
    registry: PathBuf,

    /// Timeline to start with.
    #[arg(long, default_value = "start")]
    start: String,

    /// Event index to start at.
    #[arg(long)]
    from: Option<usize>,

    /// Seed for the multi-choice shuffle.
    #[arg(long)]
    seed: Option<u64>,

    /// Show cursor state and verbose engine logs.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Show dialog lines at once instead of typing them out.
    #[arg(long, default_value_t = false)]
    no_animation: bool,

    /// Save the cursor next to the registry when quitting.
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Start from the saved cursor, if there is one.
    #[arg(long, default_value_t = false)]
    resume: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Registry JSON file.
    registry: PathBuf,

    /// Print the lint result as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Registry JSON file.
    registry: PathBuf,

    /// Timeline to start with.
    #[arg(long, default_value = "start")]
    start: String,

    /// Seed for the multi-choice shuffle.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.cmd, Command::Play(args) if args.debug);
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        logger.filter_module("emaki", log::LevelFilter::Trace);
    }
    logger.init();

    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Play(args) => cmd_play(args, config).await,
        Command::Check(args) => cmd_check(args).await,
        Command::Dump(args) => cmd_dump(args, config).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    match path {
        Some(path) => PlayerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PlayerConfig::default()),
    }
}

/// Split `dir/name.json` into a repository over `dir` and the registry name
fn repository_for(path: &Path) -> anyhow::Result<(FileSystemRepository, String)> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        anyhow::bail!("registry file must end in .json: {}", path.display());
    }
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("invalid registry path {}", path.display()))?;
    let base = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((FileSystemRepository::new(base), name.to_string()))
}

async fn load(path: &Path) -> anyhow::Result<(FileSystemRepository, String, TimelineRegistry)> {
    let (repo, name) = repository_for(path)?;
    let registry = repo
        .load_registry(&name)
        .await
        .with_context(|| format!("failed to load registry {}", path.display()))?;
    log::info!(
        "loaded registry '{}' with {} timeline(s)",
        name,
        registry.timelines.len()
    );
    Ok((repo, name, registry))
}

async fn cmd_play(args: PlayArgs, mut config: PlayerConfig) -> anyhow::Result<()> {
    let (repo, name, registry) = load(&args.registry).await?;

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.debug {
        config.debug = DebugConfig::verbose();
    }

    let mut options = PlayOptions {
        start: args.start,
        from: args.from,
        debug: args.debug,
        animate: !args.no_animation,
    };
    if args.resume {
        match repo.load_snapshot(&name).await? {
            Some(snapshot) => {
                if let Some(key) = snapshot.timeline_key {
                    options.start = key;
                }
                options.from = Some(snapshot.index);
            }
            None => log::warn!("no saved cursor for '{}', starting fresh", name),
        }
    }

    let outcome = run_play(&registry, &config, &options, io::stdin().lock(), io::stdout())?;

    match outcome {
        PlayOutcome::Quit(snapshot) if args.save => {
            repo.save_snapshot(&name, &snapshot).await?;
            println!(
                "Saved cursor at {}#{}",
                snapshot.timeline_key.as_deref().unwrap_or("-"),
                snapshot.index
            );
        }
        PlayOutcome::Ending if args.save => match repo.delete_snapshot(&name).await {
            Ok(()) | Err(RepositoryError::SaveDataNotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        },
        PlayOutcome::Scene { scene, .. } => {
            log::info!("left for scene '{}'", scene);
        }
        _ => {}
    }
    Ok(())
}

async fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let (_, _, registry) = load(&args.registry).await?;
    let result = emaki::lint(&registry);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for issue in &result.issues {
            println!("{}", issue);
        }
        println!(
            "{} timeline(s): {} error(s), {} warning(s), {} info",
            registry.timelines.len(),
            result.error_count,
            result.warning_count,
            result.info_count
        );
    }

    if result.has_errors() {
        anyhow::bail!(
            "{} lint error(s) in {}",
            result.error_count,
            args.registry.display()
        );
    }
    Ok(())
}

async fn cmd_dump(args: DumpArgs, mut config: PlayerConfig) -> anyhow::Result<()> {
    let (_, _, registry) = load(&args.registry).await?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let report = run_dump(&registry, &config, &args.start)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
