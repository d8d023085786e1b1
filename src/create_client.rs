use crate::error::Error;
use nostr_sdk::prelude::*;

/// Builds a client bound to a single relay. With `signer` set the client can
/// answer NIP-42 auth challenges on its own.
pub async fn create_client(relay_url: &RelayUrl, signer: Option<Keys>) -> Result<Client, Error> {
    let client = match signer {
        Some(keys) => ClientBuilder::default().signer(keys).build(),
        None => ClientBuilder::default().build(),
    };

    client.add_relay(relay_url.as_str()).await?;
    Ok(client)
}
