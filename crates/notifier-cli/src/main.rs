use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notifier_cli::cli::{audio, default_data_dir, ConsoleSurface, Fixture, Runner};
use notifier_core::alarms::parse_blink_pattern;
use notifier_core::preferences::PreferencesStorage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notifier-cli")]
#[command(about = "Drive the unread-message notifier against a JSON message store")]
struct Cli {
    /// Directory holding notification_preferences.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON snapshot of threads, contacts, mutes, and unread messages
    #[arg(long, short = 'f', global = true)]
    fixture: Option<PathBuf>,

    /// Thread currently on screen
    #[arg(long, global = true)]
    visible_thread: Option<i64>,

    /// Treat the device as locked
    #[arg(long, global = true)]
    locked: bool,

    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the summary notification
    Update {
        /// Thread that just received a message; omit for a silent refresh
        #[arg(long)]
        thread: Option<i64>,
    },

    /// Report a failed delivery in a thread
    DeliveryFailed {
        #[arg(long)]
        thread: i64,
    },

    /// Show how an LED blink pattern is interpreted
    Blink {
        /// Preset like "500,2000", "none", or "custom"
        pattern: String,
        /// Pattern used for "custom" (defaults to the stored one)
        #[arg(long)]
        custom: Option<String>,
    },

    /// Show or change notification preferences
    Prefs {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        in_thread_alerts: Option<bool>,
        /// Ringtone URI; an empty string means silent
        #[arg(long)]
        ringtone: Option<String>,
        #[arg(long)]
        vibrate: Option<bool>,
        #[arg(long)]
        led_color: Option<String>,
        #[arg(long)]
        led_pattern: Option<String>,
        #[arg(long)]
        led_pattern_custom: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NOTIFIER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let mut storage = PreferencesStorage::new(&data_dir);

    match cli.command {
        Commands::Update { thread } => {
            let runner = build_runner(&cli.fixture, &storage, cli.pretty)?;
            runner.set_visible_thread(cli.visible_thread);
            runner.update(thread, cli.locked)?;
            for id in runner.read_threads() {
                info!("Thread {} is marked read", id);
            }
        }
        Commands::DeliveryFailed { thread } => {
            let runner = build_runner(&cli.fixture, &storage, cli.pretty)?;
            runner.set_visible_thread(cli.visible_thread);
            runner.delivery_failed(thread)?;
        }
        Commands::Blink { pattern, custom } => {
            let custom = custom.unwrap_or_else(|| storage.prefs.led_pattern_custom.clone());
            let blink = parse_blink_pattern(&pattern, &custom)?;
            print_json(&serde_json::json!({ "pattern": pattern, "blink": blink }), cli.pretty)?;
        }
        Commands::Prefs {
            enabled,
            in_thread_alerts,
            ringtone,
            vibrate,
            led_color,
            led_pattern,
            led_pattern_custom,
        } => {
            if let Some(value) = enabled {
                storage.set_notifications_enabled(value)?;
            }
            if let Some(value) = in_thread_alerts {
                storage.set_in_thread_alerts(value)?;
            }
            if let Some(uri) = ringtone {
                storage.set_ringtone(Some(uri))?;
            }
            if let Some(value) = vibrate {
                storage.set_vibrate(value)?;
            }
            if let Some(color) = led_color {
                storage.set_led_color(&color)?;
            }
            match (led_pattern, led_pattern_custom) {
                (Some(pattern), custom) => storage.set_led_pattern(&pattern, custom.as_deref())?,
                (None, Some(custom)) => {
                    let pattern = storage.prefs.led_pattern.clone();
                    storage.set_led_pattern(&pattern, Some(&custom))?;
                }
                (None, None) => {}
            }
            print_json(&serde_json::to_value(&storage.prefs)?, cli.pretty)?;
        }
    }

    Ok(())
}

fn build_runner(
    fixture: &Option<PathBuf>,
    storage: &PreferencesStorage,
    pretty: bool,
) -> Result<Runner> {
    let fixture = match fixture {
        Some(path) => Fixture::load(path)?,
        None => Fixture::default(),
    };

    Ok(Runner::new(
        fixture,
        Arc::new(storage.prefs.clone()),
        Arc::new(ConsoleSurface::stdout(pretty)),
        audio::default_player(),
    ))
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to encode output")?;
    println!("{}", text);
    Ok(())
}
