use crate::composer::{compose_note, resolve_keys};
use crate::config::ClientSettings;
use crate::error::Error;
use crate::filter::{decode_public_key, mentions_filter};
use crate::input::Prompter;
use crate::persist::save_events;
use crate::publisher::{broadcast, BroadcastOptions, RelayReport};
use crate::relay_connection::RelayConnection;
use crate::subscriber::{collect_until_eose, StreamEnd};
use nostr_sdk::prelude::*;
use std::io::{BufRead, Write};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Inputs that skip the matching interactive prompt.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub npub: Option<String>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub received: Vec<Event>,
    pub stream_end: StreamEnd,
    pub published: Event,
    pub reports: Vec<RelayReport>,
}

/// Subscribes for notes mentioning a user, saves them, then signs a new note
/// and broadcasts it. Any error returned here is fatal; per-relay failures
/// during the broadcast end up in `RunSummary::reports`.
pub async fn run<R: BufRead, W: Write>(
    settings: &ClientSettings,
    overrides: Overrides,
    prompter: &mut Prompter<R, W>,
    token: &CancellationToken,
) -> Result<RunSummary, Error> {
    let url = settings.subscribe_relay.as_str();
    let npub = match overrides.npub {
        Some(npub) => npub,
        None => prompter.line(&format!(
            "using {url}\n----\nexample subscription for {} most recent notes mentioning user\npaste npub key: ",
            settings.limit
        ))?,
    };
    // No relay is contacted until the key is known to be valid.
    let public_key = decode_public_key(&npub)?;
    let filter = mentions_filter(public_key, settings.limit);

    let connection = RelayConnection::connect(url, None, settings.connect_timeout).await?;
    println!("relay: {}", connection.is_connected());
    println!("filters: {}", filter.as_json());

    let collected = collect_until_eose(
        &connection,
        filter.clone(),
        settings.subscription_timeout,
        token,
    )
    .await?;
    connection.disconnect().await;

    save_events(&settings.output_file, &collected.events)?;
    prompter.say(&format!(
        "returned events saved to {}\n",
        settings.output_file
    ))?;

    let nsec = prompter
        .line("----\nexample publication of note.\npaste nsec key (leave empty to autogenerate): ")?;
    let signing = resolve_keys(&nsec);
    prompter.say(&format!("using: {}\n", signing.npub()))?;

    let content =
        prompter.until_eof("enter content of note, ending with an empty newline (ctrl+d):\n")?;
    let event = compose_note(&signing.keys, &content)?;
    info!("Composed event {}", event.id);

    let opts = BroadcastOptions {
        connect_timeout: settings.connect_timeout,
        query_timeout: settings.query_timeout,
    };
    let reports = broadcast(
        &settings.publish_relays,
        &event,
        &filter,
        &signing.keys,
        &opts,
    )
    .await;

    for report in &reports {
        if let Ok(events) = &report.result {
            println!("listen to events: {}", report.url);
            for event in events {
                println!("{}", event.as_json());
            }
        }
    }

    Ok(RunSummary {
        received: collected.events,
        stream_end: collected.end,
        published: event,
        reports,
    })
}
