pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod request;
pub mod splitter;
pub mod standardize;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_transport;

pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use request::{Id, Request};
pub use standardize::{ErrorObject, Outcome, StandardResponse};
