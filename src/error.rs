use nostr_sdk::client::Error as NostrSdkError;
use snafu::{Backtrace, Snafu};
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid public key {input:?}: {message}"))]
    InvalidPublicKey {
        input: String,
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Connection to {url} failed: {message}"))]
    Connection {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Subscription on {url} failed: {message}"))]
    Subscription {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Publish to {url} failed: {message}"))]
    Publish {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Query on {url} failed: {message}"))]
    Query {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Signing failed: {message}"))]
    Signing {
        message: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to create {}", path.display()))]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to write {}", path.display()))]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to encode events into {}", path.display()))]
    EncodeOutput {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to open {}", path.display()))]
    ReadOutput {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to decode events from {}", path.display()))]
    DecodeOutput {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to read input"))]
    Input {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to write prompt"))]
    Prompt {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Nostr SDK error: {message}"))]
    NostrSdk {
        message: String,
        backtrace: Backtrace,
    },
}

impl Error {
    pub fn invalid_public_key(input: impl Into<String>, message: impl ToString) -> Self {
        Error::InvalidPublicKey {
            input: input.into(),
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn connection(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Connection {
            url: url.into(),
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn subscription(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Subscription {
            url: url.into(),
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn publish(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Publish {
            url: url.into(),
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn query(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Query {
            url: url.into(),
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn signing(message: impl ToString) -> Self {
        Error::Signing {
            message: message.to_string(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn nostr_sdk(message: impl Into<String>) -> Self {
        Error::NostrSdk {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Relay URL the error refers to, if any.
    pub fn relay_url(&self) -> Option<&str> {
        match self {
            Error::Connection { url, .. }
            | Error::Subscription { url, .. }
            | Error::Publish { url, .. }
            | Error::Query { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<NostrSdkError> for Error {
    fn from(error: NostrSdkError) -> Self {
        match error {
            NostrSdkError::Relay(relay_error) => Error::nostr_sdk(relay_error.to_string()),
            NostrSdkError::RelayPool(relay_pool_error) => {
                Error::nostr_sdk(relay_pool_error.to_string())
            }
            NostrSdkError::Signer(signer_error) => Error::nostr_sdk(signer_error.to_string()),
            NostrSdkError::EventBuilder(event_builder_error) => {
                Error::nostr_sdk(event_builder_error.to_string())
            }
            _ => Error::nostr_sdk(format!("Unhandled Nostr SDK error: {error}")),
        }
    }
}
