// favorcard-api: Async Rust client for the favorcard REST API

pub mod auth;
pub mod cards;
pub mod client;
pub mod error;
pub mod friends;
pub mod models;
pub mod transport;

pub use client::{ApiClient, DEFAULT_FRIENDS_PATH};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
