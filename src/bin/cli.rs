//! Telecom Digest CLI
//!
//! Local entry point: runs the daily scheduler against a console transport,
//! or performs one-shot digest, push and chat operations.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use telecom_digest::{
    error::Result,
    models::{Config, InboundMessage},
    pipeline::{DigestBot, PushOutcome},
    services::format_digest,
    transport::{ConsoleTransport, MemoryTransport},
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Telecom Digest - daily telecom industry news pushed to chat
#[derive(Parser, Debug)]
#[command(
    name = "telecom-digest",
    version,
    about = "Scrapes telecom industry news and pushes a daily digest"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push every day at the configured time; stdin lines are handled as chat
    Run {
        /// Sender id used for messages typed on stdin
        #[arg(long, default_value = "console")]
        sender: String,
    },

    /// Fetch and print one digest
    Digest {
        /// Print the selected items as JSON instead of the chat text
        #[arg(long)]
        json: bool,
    },

    /// Broadcast one digest to all recipients now
    Push,

    /// Route a single direct message and print the replies
    Chat {
        /// Message text
        text: String,

        /// Sender id
        #[arg(long, default_value = "console")]
        sender: String,
    },

    /// Validate the configuration
    Validate,

    /// Print the default configuration as TOML
    InitConfig,
}

/// Initialize logging from the verbosity flag and the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Log what the bot is about to do.
fn log_startup_summary(config: &Config) {
    let recipients = config.recipient_list();
    let sources = config.active_sources();

    log::info!("Push time: every day at {}", config.schedule.label());
    log::info!("Items per digest: {}", config.digest.count);
    log::info!(
        "Recipients ({}): {}",
        recipients.len(),
        recipients.iter().collect::<Vec<_>>().join(", ")
    );
    log::info!(
        "Sources ({}): {}",
        sources.len(),
        sources
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env();
    init_logging(cli.verbose, &config.logging.level);

    match load_error {
        Some(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
        None => log::info!("Loaded configuration from {}", cli.config.display()),
    }

    match cli.command {
        Command::Run { sender } => {
            config.validate()?;
            log_startup_summary(&config);

            let bot = Arc::new(DigestBot::from_config(
                config,
                Arc::new(ConsoleTransport::new()),
            )?);

            if !bot.announce_startup().await {
                log::warn!("Startup notice was not delivered");
            }

            let reader = Arc::clone(&bot);
            tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let message = InboundMessage::direct_text(sender.clone(), line);
                    let bot = Arc::clone(&reader);
                    tokio::spawn(async move {
                        bot.handle_message(&message).await;
                    });
                }
            });

            log::info!("Bot running. Press Ctrl-C to stop.");
            bot.run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                }
                log::info!("Shutdown requested");
            })
            .await;
        }

        Command::Digest { json } => {
            let bot = DigestBot::from_config(config, Arc::new(ConsoleTransport::new()))?;
            let digest = bot.digest().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&digest)?);
            } else {
                println!("{}", format_digest(&digest));
            }
        }

        Command::Push => {
            config.validate()?;
            log_startup_summary(&config);

            let bot = DigestBot::from_config(config, Arc::new(ConsoleTransport::new()))?;
            match bot.daily_push().await {
                PushOutcome::NotReady => log::error!("Push skipped: transport not ready"),
                PushOutcome::NoNews => log::info!("Push skipped: no news"),
                PushOutcome::Delivered(report) => log::info!(
                    "Push complete: {} delivered, {} failed",
                    report.success_count,
                    report.failure_count
                ),
            }
        }

        Command::Chat { text, sender } => {
            let bot = DigestBot::from_config(config, Arc::new(MemoryTransport::new()))?;
            let replies = bot
                .handle_message(&InboundMessage::direct_text(sender, text))
                .await;

            if replies.is_empty() {
                log::info!("No reply for this message");
            }
            for reply in replies {
                println!("{reply}\n");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} active sources, {} recipients, {} auto-replies)",
                config.active_sources().len(),
                config.recipient_list().len(),
                config.auto_replies.len()
            );
        }

        Command::InitConfig => {
            print!("{}", toml::to_string_pretty(&Config::default())?);
        }
    }

    Ok(())
}
