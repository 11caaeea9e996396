use clap::Parser;
use jsonrpc_batch_core::config::HttpConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Clone, Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub http: HttpConfig,
    /// Address to be used for running server
    #[clap(long, default_value_t = default_server_addr())]
    pub server_addr: SocketAddr,
    /// Rpc endpoint to forward requests to
    #[clap(long)]
    pub target_rpc: url::Url,
    /// Maximum requests per second accepted by the proxy.
    /// A batch counts as a single request
    #[clap(long)]
    pub max_requests_per_sec: Option<usize>,
}

fn default_server_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8282)
}

impl Config {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
