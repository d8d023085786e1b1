use crate::error::Error;
use nostr_sdk::prelude::*;

/// Default number of events requested from the relay.
pub const DEFAULT_LIMIT: usize = 3;

/// Decodes a bech32 `npub` into a raw public key.
pub fn decode_public_key(input: &str) -> Result<PublicKey, Error> {
    let input = input.trim();
    PublicKey::from_bech32(input).map_err(|e| Error::invalid_public_key(input, e))
}

/// Direct messages and text notes that tag `public_key`, capped at `limit`.
pub fn mentions_filter(public_key: PublicKey, limit: usize) -> Filter {
    Filter::new()
        .kinds([Kind::EncryptedDirectMessage, Kind::TextNote])
        .custom_tag(SingleLetterTag::lowercase(Alphabet::P), public_key.to_hex())
        .limit(limit)
}
