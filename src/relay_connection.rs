use crate::create_client::create_client;
use crate::error::Error;
use nostr_sdk::prelude::*;
use std::time::Duration;
use tracing::debug;

/// A connected session with one relay.
#[derive(Debug, Clone)]
pub struct RelayConnection {
    url: String,
    client: Client,
    relay: Relay,
}

impl RelayConnection {
    /// Opens the connection and waits up to `timeout` for the handshake.
    pub async fn connect(
        url: &str,
        signer: Option<Keys>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let relay_url = RelayUrl::parse(url).map_err(|e| Error::connection(url, e))?;
        let client = create_client(&relay_url, signer)
            .await
            .map_err(|e| Error::connection(url, e))?;
        let relay = client
            .relay(relay_url.as_str())
            .await
            .map_err(|e| Error::connection(url, e))?;

        relay
            .try_connect(timeout)
            .await
            .map_err(|e| Error::connection(url, e))?;

        debug!("Connected to {}", url);
        Ok(Self {
            url: url.to_string(),
            client,
            relay,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.relay.status() == RelayStatus::Connected
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends a signed event and waits for the relay's `OK`.
    pub async fn publish(&self, event: &Event) -> Result<EventId, Error> {
        debug!("Publishing event {} to {}", event.id, self.url);
        let output = self
            .client
            .send_event(event.clone())
            .await
            .map_err(|e| Error::publish(&self.url, e))?;

        if output.success.is_empty() {
            return Err(Error::publish(
                &self.url,
                format!("event rejected: {:?}", output.failed),
            ));
        }

        Ok(output.val)
    }

    /// One-shot query that returns once the relay signals end of stored events.
    pub async fn query(&self, filter: Filter, timeout: Duration) -> Result<Events, Error> {
        debug!("Querying {} with {:?}", self.url, filter);
        self.client
            .fetch_events(filter, timeout)
            .await
            .map_err(|e| Error::query(&self.url, e))
    }

    pub async fn disconnect(&self) {
        debug!("Disconnecting from {}", self.url);
        self.client.disconnect().await;
    }
}
