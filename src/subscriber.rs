use crate::error::Error;
use crate::relay_connection::RelayConnection;
use nostr_sdk::prelude::*;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why collection stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    EndOfStoredEvents,
    Closed(String),
    Cancelled,
    DeadlineElapsed,
    Shutdown,
}

#[derive(Debug)]
pub struct Collected {
    pub events: Vec<Event>,
    pub end: StreamEnd,
}

/// Subscribes with `filter` and collects events in arrival order until the
/// relay sends EOSE or closes the subscription. Cancellation of `token` and
/// the `deadline` take priority over pending relay messages. Collection stops
/// growing once `filter.limit` is reached.
pub async fn collect_until_eose(
    connection: &RelayConnection,
    filter: Filter,
    deadline: Duration,
    token: &CancellationToken,
) -> Result<Collected, Error> {
    let client = connection.client();
    let cap = filter.limit.unwrap_or(usize::MAX);

    // Listen before sending REQ so nothing is missed.
    let notifications = client.notifications();

    let output = client
        .subscribe(filter, Some(SubscribeAutoCloseOptions::default()))
        .await
        .map_err(|e| Error::subscription(connection.url(), e))?;
    if output.success.is_empty() {
        return Err(Error::subscription(
            connection.url(),
            format!("REQ rejected: {:?}", output.failed),
        ));
    }
    let subscription_id = output.val;
    debug!("Subscription {} opened on {}", subscription_id, connection.url());

    let (events, end) = drain_notifications(
        notifications,
        &subscription_id,
        cap,
        deadline,
        token,
    )
    .await;

    match &end {
        StreamEnd::EndOfStoredEvents => info!("end of stored events"),
        StreamEnd::Closed(reason) => warn!("Relay closed subscription: {}", reason),
        StreamEnd::Cancelled => warn!("Subscription cancelled"),
        StreamEnd::DeadlineElapsed => warn!("Subscription deadline of {:?} elapsed", deadline),
        StreamEnd::Shutdown => warn!("Client shut down before end of stored events"),
    }

    Ok(Collected { events, end })
}

/// Consumes pool notifications for `subscription_id` until the stream ends.
/// Events of other subscriptions are ignored; at most `cap` events are kept.
async fn drain_notifications(
    mut notifications: Receiver<RelayPoolNotification>,
    subscription_id: &SubscriptionId,
    cap: usize,
    deadline: Duration,
    token: &CancellationToken,
) -> (Vec<Event>, StreamEnd) {
    let mut events = Vec::new();
    let timeout = tokio::time::sleep(deadline);
    tokio::pin!(timeout);

    let end = loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break StreamEnd::Cancelled,
            _ = &mut timeout => break StreamEnd::DeadlineElapsed,
            notification = notifications.recv() => match notification {
                Ok(RelayPoolNotification::Event { subscription_id: id, event, .. }) => {
                    if &id == subscription_id && events.len() < cap {
                        events.push(*event);
                    }
                }
                Ok(RelayPoolNotification::Message { message, .. }) => match message {
                    RelayMessage::EndOfStoredEvents(id) if &id == subscription_id => {
                        break StreamEnd::EndOfStoredEvents;
                    }
                    RelayMessage::Closed { subscription_id: id, message }
                        if &id == subscription_id =>
                    {
                        break StreamEnd::Closed(message.to_string());
                    }
                    _ => {}
                },
                Ok(RelayPoolNotification::Shutdown) => break StreamEnd::Shutdown,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notification receiver lagged, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => break StreamEnd::Shutdown,
            },
        }
    };

    (events, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::broadcast;

    const WAIT: Duration = Duration::from_secs(5);

    fn relay_url() -> RelayUrl {
        RelayUrl::parse("ws://127.0.0.1:7777").unwrap()
    }

    fn note(keys: &Keys, content: &str) -> Event {
        EventBuilder::text_note(content)
            .sign_with_keys(keys)
            .unwrap()
    }

    fn event_notification(id: &SubscriptionId, event: Event) -> RelayPoolNotification {
        RelayPoolNotification::Event {
            relay_url: relay_url(),
            subscription_id: id.clone(),
            event: Box::new(event),
        }
    }

    fn message_notification(message: RelayMessage) -> RelayPoolNotification {
        RelayPoolNotification::Message {
            relay_url: relay_url(),
            message,
        }
    }

    #[tokio::test]
    async fn test_deadline_elapses_when_relay_stays_silent() {
        let (tx, rx) = broadcast::channel(16);
        let id = SubscriptionId::generate();

        let (events, end) = drain_notifications(
            rx,
            &id,
            3,
            Duration::from_millis(50),
            &CancellationToken::new(),
        )
        .await;
        drop(tx);

        assert!(events.is_empty());
        assert_eq!(end, StreamEnd::DeadlineElapsed);
    }

    #[tokio::test]
    async fn test_closed_by_relay_keeps_events_received_so_far() {
        let (tx, rx) = broadcast::channel(16);
        let id = SubscriptionId::generate();
        let keys = Keys::generate();
        let first = note(&keys, "first");

        tx.send(event_notification(&id, first.clone())).unwrap();
        tx.send(message_notification(RelayMessage::closed(
            id.clone(),
            "blocked: not allowed",
        )))
        .unwrap();

        let (events, end) = drain_notifications(rx, &id, 3, WAIT, &CancellationToken::new()).await;

        assert_eq!(events, vec![first]);
        assert_eq!(end, StreamEnd::Closed("blocked: not allowed".to_string()));
    }

    #[tokio::test]
    async fn test_other_subscriptions_are_ignored_and_cap_applies() {
        let (tx, rx) = broadcast::channel(16);
        let id = SubscriptionId::generate();
        let other = SubscriptionId::generate();
        let keys = Keys::generate();
        let sent: Vec<Event> = (0..4).map(|i| note(&keys, &format!("n{i}"))).collect();

        tx.send(event_notification(&other, note(&keys, "elsewhere")))
            .unwrap();
        tx.send(message_notification(RelayMessage::closed(other.clone(), "done")))
            .unwrap();
        for event in &sent {
            tx.send(event_notification(&id, event.clone())).unwrap();
        }
        tx.send(message_notification(RelayMessage::eose(id.clone())))
            .unwrap();

        let (events, end) = drain_notifications(rx, &id, 3, WAIT, &CancellationToken::new()).await;

        assert_eq!(end, StreamEnd::EndOfStoredEvents);
        assert_eq!(events, sent[..3].to_vec());
    }

    #[tokio::test]
    async fn test_dropped_sender_is_shutdown() {
        let (tx, rx) = broadcast::channel::<RelayPoolNotification>(16);
        drop(tx);
        let id = SubscriptionId::generate();

        let (_, end) = drain_notifications(rx, &id, 3, WAIT, &CancellationToken::new()).await;
        assert_eq!(end, StreamEnd::Shutdown);
    }
}
