use anyhow::{Context, Result};
use clap::Parser;
use note_relay_client::{config, input::Prompter, run, Overrides};
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "note_relay_client",
    version = "0.1.0",
    about = "Fetches recent notes mentioning a user, then signs and broadcasts a new note"
)]
struct Args {
    /// Path to config directory
    #[arg(short, long, default_value = "config")]
    config_dir: String,

    /// Override the relay used for the subscription
    #[arg(short, long)]
    relay_url: Option<String>,

    /// Override the output file for received events
    #[arg(short, long)]
    output: Option<String>,

    /// Public key (npub) to look up instead of prompting for it
    #[arg(long)]
    npub: Option<String>,
}

fn setup_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,note_relay_client=debug"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_timer(fmt::time::SystemTime)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();
    let config = config::Config::new(&args.config_dir).context("Failed to load configuration")?;
    let mut settings = config
        .get_settings()
        .context("Failed to get client settings")?;

    if let Some(relay_url) = args.relay_url {
        settings.subscribe_relay = relay_url;
    }

    if let Some(output) = args.output {
        settings.output_file = output;
    }

    let cancellation_token = CancellationToken::new();
    let token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, press Ctrl-C again to quit");
            token.cancel();
        }
        // The handler stays installed, so blocking prompts need a way out.
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stderr());
    let overrides = Overrides { npub: args.npub };

    let summary = run(&settings, overrides, &mut prompter, &cancellation_token)
        .await
        .context("Run aborted")?;

    let failed = summary.reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        warn!(
            "{} of {} relays failed during broadcast",
            failed,
            summary.reports.len()
        );
    }
    info!(
        "Published event {} after receiving {} events",
        summary.published.id,
        summary.received.len()
    );

    Ok(())
}
