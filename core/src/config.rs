use clap::Args;
use std::num::NonZeroU64;

#[derive(Args, Debug, Clone)]
pub struct HttpConfig {
    /// Http request timeout in seconds
    #[clap(long, default_value_t = NonZeroU64::new(30).unwrap())]
    pub request_timeout_secs: NonZeroU64,
    /// Http connect timeout in milliseconds
    #[clap(long, default_value_t = NonZeroU64::new(5000).unwrap())]
    pub connect_timeout_ms: NonZeroU64,
}
