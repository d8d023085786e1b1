pub mod app;
pub mod composer;
pub mod config;
pub mod create_client;
pub mod error;
pub mod filter;
pub mod input;
pub mod persist;
pub mod publisher;
pub mod relay_connection;
pub mod subscriber;

// Re-export commonly used items
pub use app::{run, Overrides, RunSummary};
pub use error::Error;
pub use relay_connection::RelayConnection;
