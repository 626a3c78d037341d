use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use scene_versioning::{
    parse_scene_name, versions_in, AdoptError, ConfigError, DiscoveryError, FieldError,
    FileHost, IncrementError, LocalFs, PersistenceError, SceneFile, SmartSaveConfig,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about = "Versioned scene saves")]
struct Cli {
    /// Config file with default directory, descriptor and extension.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long)]
    descriptor: Option<String>,
    #[arg(short = 'n', long = "number")]
    number: Option<u32>,
    #[arg(long)]
    ext: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the file name the given fields produce.
    Name {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Copy a working file to its versioned path.
    Save {
        #[arg(long)]
        source: PathBuf,
        /// Treat the session as already saved at this path and take its fields.
        #[arg(long)]
        adopt: Option<PathBuf>,
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Advance to the next free version, then save.
    Increment {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        adopt: Option<PathBuf>,
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// List the versions on disk for a descriptor.
    Versions {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        descriptor: Option<String>,
    },
    /// Report every versioned scene under a directory tree.
    Scan {
        root: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct ScanEntry {
    directory: PathBuf,
    descriptor: String,
    versions: Vec<u32>,
    latest: u32,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).map_err(into_report)
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(SmartSaveConfig::default_path);
    let config = SmartSaveConfig::load(&config_path)?;

    match cli.command {
        Command::Name { scene } => print_name(&config, &scene),
        Command::Save {
            source,
            adopt,
            scene,
        } => save_scene(&config, &source, adopt, &scene, false),
        Command::Increment {
            source,
            adopt,
            scene,
        } => save_scene(&config, &source, adopt, &scene, true),
        Command::Versions { dir, descriptor } => list_versions(&config, dir, descriptor),
        Command::Scan { root, output } => scan_tree(&root, output.as_deref()),
    }
}

/// Library errors keep their diagnostic code and help text.
fn into_report(err: anyhow::Error) -> miette::Report {
    diagnostic::<AdoptError>(err)
        .or_else(diagnostic::<ConfigError>)
        .or_else(diagnostic::<DiscoveryError>)
        .or_else(diagnostic::<FieldError>)
        .or_else(diagnostic::<IncrementError>)
        .or_else(diagnostic::<PersistenceError>)
        .unwrap_or_else(|err| miette::miette!("{:#}", err))
}

fn diagnostic<E>(err: anyhow::Error) -> Result<miette::Report, anyhow::Error>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    err.downcast::<E>().map(miette::Report::new)
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags given on the command line win over whatever was adopted or configured.
fn apply_overrides(scene: &mut SceneFile, args: &SceneArgs) -> Result<()> {
    if let Some(dir) = &args.dir {
        scene.set_directory(dir);
    }
    if let Some(descriptor) = &args.descriptor {
        scene.set_descriptor(descriptor.as_str())?;
    }
    if let Some(number) = args.number {
        scene.set_version(number)?;
    }
    if let Some(ext) = &args.ext {
        scene.set_extension(ext.as_str())?;
    }
    Ok(())
}

fn print_name(config: &SmartSaveConfig, args: &SceneArgs) -> Result<()> {
    let mut scene = config.scene_file()?;
    apply_overrides(&mut scene, args)?;
    println!("{}", scene.file_name());
    Ok(())
}

fn save_scene(
    config: &SmartSaveConfig,
    source: &Path,
    adopt: Option<PathBuf>,
    args: &SceneArgs,
    increment: bool,
) -> Result<()> {
    let mut host = match adopt {
        Some(path) => FileHost::adopt(source, path),
        None => FileHost::new(source),
    };
    let mut scene = SceneFile::resolve(&host, config.scene_file()?)?;
    apply_overrides(&mut scene, args)?;

    let path = if increment {
        scene.increment_and_save(&mut host, &LocalFs)?
    } else {
        scene.save(&mut host, &LocalFs)?
    };
    println!("{}", path.display());
    Ok(())
}

fn list_versions(
    config: &SmartSaveConfig,
    dir: Option<PathBuf>,
    descriptor: Option<String>,
) -> Result<()> {
    let dir = dir
        .or_else(|| config.directory.clone())
        .unwrap_or_default();
    let descriptor = descriptor.unwrap_or_else(|| config.descriptor().to_string());
    let versions = versions_in(&LocalFs, &dir, &descriptor)?;
    for version in versions {
        println!("{version}");
    }
    Ok(())
}

fn scan_tree(root: &Path, output: Option<&Path>) -> Result<()> {
    let mut found: BTreeMap<(PathBuf, String), Vec<u32>> = BTreeMap::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Ok(name) = parse_scene_name(file_name) else {
            continue;
        };
        let directory = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        found
            .entry((directory, name.descriptor))
            .or_default()
            .push(name.version);
    }
    debug!(groups = found.len(), root = %root.display(), "scan finished");

    let mut entries = Vec::with_capacity(found.len());
    for ((directory, descriptor), mut versions) in found {
        versions.sort_unstable();
        versions.dedup();
        let latest = versions.last().copied().unwrap_or_default();
        println!(
            "{}: {descriptor} latest v{latest:03} ({} versions)",
            directory.display(),
            versions.len()
        );
        entries.push(ScanEntry {
            directory,
            descriptor,
            versions,
            latest,
        });
    }

    if let Some(out) = output {
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(out, json).with_context(|| format!("write {}", out.display()))?;
    }
    Ok(())
}
