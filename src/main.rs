use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use voicecue::app::{
    ReplayOptions, add_user_trigger, load_trigger_set, remove_user_trigger, run_replay_command,
};
use voicecue::cli::{Cli, Commands, ConfigAction, TriggersAction};
use voicecue::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Replay {
            script,
            pause,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let summary = run_replay_command(
                &config,
                ReplayOptions {
                    script,
                    pause,
                    json,
                    quiet: cli.quiet,
                },
            )
            .await?;
            if !cli.quiet && !json {
                eprintln!(
                    "{}",
                    format!(
                        "{} events, {} triggers, {} playbacks",
                        summary.events, summary.triggers, summary.playbacks
                    )
                    .dimmed()
                );
            }
        }
        Commands::Triggers { action } => {
            let config = load_config(cli.config.as_deref())?;
            handle_triggers_command(action, &config)?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "voicecue",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

fn handle_triggers_command(action: TriggersAction, config: &Config) -> Result<()> {
    match action {
        TriggersAction::List => {
            let set = load_trigger_set(config)?;
            if set.is_empty() {
                eprintln!("No trigger phrases configured");
                return Ok(());
            }
            for trigger in set.iter() {
                let origin = if trigger.is_default { "default" } else { "user" };
                println!(
                    "  {:<12} {}  {}",
                    trigger.id.to_string(),
                    trigger.phrase.green(),
                    origin.dimmed()
                );
            }
        }
        TriggersAction::Add { phrase } => {
            let trigger = add_user_trigger(config, &phrase)
                .with_context(|| format!("Failed to add trigger {:?}", phrase))?;
            println!("{} {} ({})", "Added".green(), trigger.phrase, trigger.id);
        }
        TriggersAction::Remove { id } => {
            let trigger = remove_user_trigger(config, &id)?;
            println!("{} {} ({})", "Removed".green(), trigger.phrase, trigger.id);
        }
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = custom_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            let toml = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{}", toml);
        }
    }
    Ok(())
}
