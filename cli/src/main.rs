use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;
use clap_complete::Shell;
use clap_complete::generate;
use supports_color::Stream;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use oneinstall_core::backends::available_backends;
use oneinstall_core::config::Config;
use oneinstall_core::config::config_path;
use oneinstall_core::config::load_config;
use oneinstall_core::config::save_config;
use oneinstall_core::doctor::Doctor;
use oneinstall_core::integrity::verify_file_hash;
use oneinstall_core::ops;
use oneinstall_core::shims;
use oneinstall_core::shims::ShimRegistry;
use oneinstall_core::telemetry::TelemetryEvent;
use oneinstall_core::telemetry::track_event;

mod output;

/// 1install: one CLI for every package manager on the system.
#[derive(Debug, Parser)]
#[clap(
    name = "1i",
    author,
    version,
    about = "Unified cross-platform package manager",
    propagate_version = true
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Search for packages across all available package managers.
    Search(SearchArgs),

    /// Install a package.
    Install(PackageArgs),

    /// Update an installed package.
    Update(PackageArgs),

    /// Uninstall a package.
    #[clap(visible_alias = "remove")]
    Uninstall(PackageArgs),

    /// List available backends on this system.
    Backends,

    /// Manage configuration.
    Config(ConfigCli),

    /// Manage shims.
    Shims(ShimsCli),

    /// Run system diagnostics.
    Doctor,

    /// Verify a file against an expected SHA-256 digest.
    Verify(VerifyArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of results to display.
    #[arg(short, long, default_value_t = 20)]
    limit: usize,
}

#[derive(Debug, clap::Args)]
struct PackageArgs {
    /// Name of the package.
    #[arg(value_name = "PACKAGE")]
    package: String,

    /// Backend to use (e.g. apt, winget, npm).
    #[arg(short, long)]
    backend: Option<String>,
}

#[derive(Debug, clap::Args)]
struct ConfigCli {
    #[clap(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Get a configuration value.
    Get {
        /// Configuration key (e.g. backends.priority).
        key: String,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Value to set.
        value: String,
    },
    /// List all configuration values.
    List,
    /// Show the config file path.
    Path,
}

#[derive(Debug, clap::Args)]
struct ShimsCli {
    #[clap(subcommand)]
    action: ShimsAction,
}

#[derive(Debug, clap::Subcommand)]
enum ShimsAction {
    /// List all registered shims.
    List,
    /// Show the shim directory path.
    Path,
    /// Show PATH setup instructions.
    Setup,
    /// Regenerate shim scripts and prune entries whose target is gone.
    Refresh,
}

#[derive(Debug, clap::Args)]
struct VerifyArgs {
    /// File to verify.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Expected SHA-256 digest, hex encoded.
    #[arg(value_name = "SHA256")]
    sha256: String,
}

#[derive(Debug, clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    shell: Shell,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let with_ansi = supports_color::on_cached(Stream::Stderr).is_some();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(with_ansi)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    track_event(&TelemetryEvent::UserPing);

    let result = run(cli).await;
    if let Err(err) = &result {
        track_event(&TelemetryEvent::ErrorOccurred {
            error_type: err.to_string(),
        });
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Search(args) => search(args).await,
        Command::Install(args) => install(args).await,
        Command::Update(args) => update(args).await,
        Command::Uninstall(args) => uninstall(args).await,
        Command::Backends => {
            let config = load_config()?;
            let backends = available_backends(&config.backends.disabled);
            let names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
            output::render_backends(&names);
            Ok(())
        }
        Command::Config(args) => handle_config(args.action),
        Command::Shims(args) => handle_shims(args.action),
        Command::Doctor => {
            Doctor::run()?;
            Ok(())
        }
        Command::Verify(args) => {
            verify_file_hash(&args.file, &args.sha256)?;
            println!("OK: {} matches the expected digest", args.file.display());
            Ok(())
        }
        Command::Completion(args) => {
            generate(args.shell, &mut Cli::command(), "1i", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn search(args: SearchArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    println!("Searching for '{}'...\n", args.query);

    let backends = available_backends(&config.backends.disabled);
    if backends.is_empty() {
        println!("No package managers available on this system.");
        return Ok(());
    }
    let names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
    println!("   Searching {} backends: {}\n", names.len(), names.join(", "));

    let hits = ops::search_packages(&args.query, &config).await?;
    output::render_search_results(&hits, args.limit);
    Ok(())
}

async fn install(args: PackageArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    println!("Detecting system...");

    let (backend, context) = ops::resolve_backend(args.backend.as_deref(), &config)?;
    debug!("resolved backend {}", backend.name());
    if let Some(context) = &context {
        let name = context.os_name.as_deref().unwrap_or("unknown OS");
        match &context.os_version {
            Some(version) => println!("   OS: {name} {version}"),
            None => println!("   OS: {name}"),
        }
    }
    println!("   Backend: {}\n", backend.name());

    println!("Installing {}...", args.package);
    let shim = ops::install_package(backend.as_ref(), &args.package, &config).await?;
    match shim {
        Some(path) => println!("   Created shim: {}", path.display()),
        None if config.behavior.verbose => {
            println!("   Could not locate a binary for shim creation");
        }
        None => {}
    }

    println!("\n{} installed successfully!", args.package);
    Ok(())
}

async fn update(args: PackageArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let (backend, _) = ops::resolve_backend(args.backend.as_deref(), &config)?;

    println!("Updating {} via {}...", args.package, backend.name());
    ops::update_package(backend.as_ref(), &args.package).await?;
    println!("\n{} updated successfully!", args.package);
    Ok(())
}

async fn uninstall(args: PackageArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let (backend, _) = ops::resolve_backend(args.backend.as_deref(), &config)?;

    println!("Uninstalling {} via {}...", args.package, backend.name());
    ops::uninstall_package(backend.as_ref(), &args.package).await?;
    println!("\n{} uninstalled.", args.package);
    Ok(())
}

fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match config.get(&key) {
                Some(value) => println!("{key} = {value}"),
                None => anyhow::bail!("unknown config key: {key}"),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config()?;
            config.set(&key, &value)?;
            save_config(&config)?;
            println!("Set {key} = {value}");
        }
        ConfigAction::List => {
            let config = load_config()?;
            println!("Configuration:\n");
            for key in Config::list_keys() {
                if let Some(value) = config.get(key) {
                    println!("  {key} = {value}");
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", config_path()?.display());
        }
    }
    Ok(())
}

fn handle_shims(action: ShimsAction) -> anyhow::Result<()> {
    match action {
        ShimsAction::List => {
            let registry = ShimRegistry::load()?;
            if registry.is_empty() {
                println!("No shims registered.");
            } else {
                println!("Registered shims ({}):\n", registry.len());
                for shim in registry.list() {
                    println!(
                        "  {} -> {} ({})",
                        shim.name,
                        shim.target.display(),
                        shim.installed_by
                    );
                }
            }
        }
        ShimsAction::Path => {
            println!("{}", shims::shim_dir()?.display());
        }
        ShimsAction::Setup => {
            println!("{}", shims::path_instruction()?);
        }
        ShimsAction::Refresh => {
            let mut registry = ShimRegistry::load()?;
            let (regenerated, pruned) = registry.refresh()?;
            registry.save()?;
            println!("Regenerated {regenerated} shims, pruned {pruned}.");
        }
    }
    Ok(())
}
