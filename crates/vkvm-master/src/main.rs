//! vkvm entry point.
//!
//! Wires the configuration, the input source and the remote transport
//! together and runs the dispatch loop on a single-threaded Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, validate profiles     -- fatal on any invalid profile
//!  └─ SessionSwitcher::new()             -- optional initial profile
//!  └─ InputSource::grab()
//!  └─ RouteInputUseCase::run()           -- until stop hotkey, EOF, or Ctrl-C
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vkvm_core::DefinitionRegistry;
use vkvm_master::application::route_input::RouteInputUseCase;
use vkvm_master::application::switch_session::{SessionSwitcher, SwitchError};
use vkvm_master::infrastructure::input_capture::script::{ScriptInputSource, ScriptOrigin};
use vkvm_master::infrastructure::input_capture::InputSource;
use vkvm_master::infrastructure::remote::DryRunRemote;
use vkvm_master::infrastructure::storage::config;

/// Forward the local keyboard and pointer to remote desktop sessions,
/// switching between them with per-profile hotkeys.
#[derive(Debug, Parser)]
#[command(name = "vkvm", version, about)]
struct Args {
    /// Configuration file (default: platform config dir/vkvm/config.toml).
    #[arg(long, env = "VKVM_CONFIG")]
    config: Option<PathBuf>,

    /// Profile to connect to at startup.
    #[arg(long)]
    profile: Option<String>,

    /// Keep running when the active profile's hotkey is pressed again
    /// (reconnect instead of exiting).
    #[arg(long)]
    forever: bool,

    /// Password used for every profile, replacing configured ones.
    #[arg(long, env = "VKVM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Input event script to replay; `-` reads standard input.
    #[arg(long, default_value = "-")]
    script: String,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("vkvm starting");

    // ── Configuration ─────────────────────────────────────────────────────────
    // An explicit --config must exist; the platform default may be absent.
    let (config_path, cfg) = match args.config {
        Some(path) => {
            let cfg = config::load_config_file(&path)?;
            (path, cfg)
        }
        None => {
            let path = config::config_file_path()?;
            let cfg = config::load_config(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            (path, cfg)
        }
    };
    let profiles = cfg.load_profiles(DefinitionRegistry::global(), args.password.as_deref())?;
    if profiles.is_empty() {
        bail!("no profiles configured in {}", config_path.display());
    }
    for profile in &profiles {
        info!(profile = %profile.name, hotkey = %profile.hotkey, rules = profile.rules.len(), "profile loaded");
    }

    // ── Session ───────────────────────────────────────────────────────────────
    let transport = DryRunRemote::for_profiles(&profiles, cfg.dry_run.screen());
    let mut switcher = SessionSwitcher::new(profiles, Box::new(transport), args.forever);
    if let Some(name) = &args.profile {
        match switcher.activate(name).await {
            Ok(()) => {}
            Err(e @ SwitchError::UnknownProfile(_)) => return Err(e.into()),
            Err(e) => error!(error = %e, "initial profile not connected"),
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────
    let source = ScriptInputSource::new(ScriptOrigin::from_arg(&args.script), cfg.local.screen());
    let events = source.grab()?;
    info!("input grabbed; press a profile hotkey to switch");

    let mut router = RouteInputUseCase::new(switcher, source.screen());
    let interrupted = tokio::select! {
        _ = router.run(events) => false,
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                info!("shutdown signal received");
            }
            true
        }
    };
    if interrupted {
        router.switcher_mut().disconnect().await;
    }

    source.ungrab();
    info!("vkvm stopped");
    Ok(())
}
