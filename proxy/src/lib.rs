mod config;
mod error;
mod handler;
mod metrics;
mod server;
mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use handler::Handler;
pub use metrics::Metrics;
pub use server::Server;
pub use types::RpcResponse;
