use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

use autohost_cli::{EXAMPLE_CONFIG, load_plugins, run_session, write_actions};
use autohost_plugin_api::UnloadReason;
use autohost_plugin_host::{AutohostConfig, ConfigLoadError, PluginRunner, init_logging};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enables debug mode
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plugin to load, may be repeated (defaults to the plugins enabled in the config)
    #[arg(short, long = "plugin")]
    plugins: Vec<String>,

    /// Session script to replay (defaults to stdin)
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Also write logs to the data directory
    #[arg(long)]
    log_file: bool,
}

fn create_example_config(config_path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(config_path, EXAMPLE_CONFIG)?;
    info!("Created example config at {}", config_path.display());
    eprintln!("Config file created at: {}", config_path.display());
    eprintln!("Please edit it with your host and plugin settings, then run autohost again.");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = match cli.debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _log_guard = init_logging("autohost", cli.log_file, default_filter)?;

    let loaded = match &cli.config {
        Some(path) => AutohostConfig::load_from(path),
        None => AutohostConfig::load(),
    };

    let config = match loaded {
        Ok(cfg) => cfg,
        Err(ConfigLoadError::NotFound(path)) => {
            info!("No config found, creating example config");
            create_example_config(&path)?;
            return Ok(());
        }
        Err(err) => {
            return Err(format!("Failed to load config: {}", err).into());
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let mut runner = PluginRunner::from_config(&config, action_tx);

    let plugins = if cli.plugins.is_empty() {
        config
            .enabled_plugins()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        cli.plugins
    };
    load_plugins(&mut runner, &plugins);
    info!(
        "Loaded {} of {} plugin(s): {}",
        runner.plugin_count(),
        plugins.len(),
        runner.plugin_names().join(", ")
    );

    let mut stdout = io::stdout();
    write_actions(&mut action_rx, &mut stdout)?;

    match cli.session {
        Some(path) => {
            info!("Replaying session {}", path.display());
            let file = tokio::fs::File::open(&path).await?;
            run_session(&mut runner, &mut action_rx, BufReader::new(file), &mut stdout).await?;
        }
        None => {
            run_session(
                &mut runner,
                &mut action_rx,
                BufReader::new(tokio::io::stdin()),
                &mut stdout,
            )
            .await?;
        }
    }

    runner.unload_all(UnloadReason::Exiting);
    write_actions(&mut action_rx, &mut stdout)?;

    Ok(())
}
