use crate::error::Error;
use crate::relay_connection::RelayConnection;
use nostr_sdk::prelude::*;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct BroadcastOptions {
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

/// What happened on one relay of the broadcast.
#[derive(Debug)]
pub struct RelayReport {
    pub url: String,
    pub result: Result<Vec<Event>, Error>,
}

impl RelayReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Connects to every relay in turn, publishes `event`, then queries with
/// `filter`. A failure on one relay is logged and the next relay is tried.
pub async fn broadcast(
    relays: &[String],
    event: &Event,
    filter: &Filter,
    signer: &Keys,
    opts: &BroadcastOptions,
) -> Vec<RelayReport> {
    let mut reports = Vec::with_capacity(relays.len());

    for url in relays {
        let result = publish_and_query(url, event, filter, signer, opts).await;
        match &result {
            Ok(events) => info!("{} returned {} events", url, events.len()),
            Err(e) => error!(relay = e.relay_url().unwrap_or(url), "{}", e),
        }
        reports.push(RelayReport {
            url: url.clone(),
            result,
        });
    }

    reports
}

async fn publish_and_query(
    url: &str,
    event: &Event,
    filter: &Filter,
    signer: &Keys,
    opts: &BroadcastOptions,
) -> Result<Vec<Event>, Error> {
    let connection =
        RelayConnection::connect(url, Some(signer.clone()), opts.connect_timeout).await?;

    info!("posting to: {}", url);
    let result: Result<Vec<Event>, Error> = async {
        connection.publish(event).await?;
        let events = connection.query(filter.clone(), opts.query_timeout).await?;
        Ok(events.into_iter().collect())
    }
    .await;

    connection.disconnect().await;
    result
}
