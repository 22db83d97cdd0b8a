pub mod concurrent;
pub mod config;
pub mod discover;
pub mod error;
pub mod http_client;
pub mod output;
pub mod probe;

pub use crate::error::ReconError;
