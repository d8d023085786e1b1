use crate::error::Error;
use nostr_sdk::prelude::*;
use tracing::{debug, warn};

/// Signing keys and whether they were freshly generated.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    pub keys: Keys,
    pub generated: bool,
}

impl SigningKeys {
    pub fn npub(&self) -> String {
        self.keys
            .public_key()
            .to_bech32()
            .unwrap_or_else(|_| self.keys.public_key().to_hex())
    }
}

/// Decodes an `nsec` (or hex) secret key. Empty or undecodable input falls
/// back to a newly generated key.
pub fn resolve_keys(input: &str) -> SigningKeys {
    let input = input.trim();
    if input.is_empty() {
        debug!("No secret key given, generating one");
        return SigningKeys {
            keys: Keys::generate(),
            generated: true,
        };
    }

    match SecretKey::parse(input) {
        Ok(secret_key) => SigningKeys {
            keys: Keys::new(secret_key),
            generated: false,
        },
        Err(e) => {
            warn!("Could not decode secret key ({}), generating one", e);
            SigningKeys {
                keys: Keys::generate(),
                generated: true,
            }
        }
    }
}

/// Builds and signs an encrypted-direct-message kind note stamped with the
/// current time. `content` is trimmed of surrounding whitespace before
/// signing.
pub fn compose_note(keys: &Keys, content: &str) -> Result<Event, Error> {
    let event = EventBuilder::new(Kind::EncryptedDirectMessage, content.trim())
        .sign_with_keys(keys)
        .map_err(Error::signing)?;
    debug!("Signed event {} kind={}", event.id, event.kind);
    Ok(event)
}
