use crate::{Error, Result};
use core::sync::atomic::AtomicI64;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge as GaugeImpl;
use prometheus_client::registry::Registry;

type RPSGauge = GaugeImpl<i64, AtomicI64>;

pub struct Metrics {
    rps: Family<Label, RPSGauge>,
    failures: Family<Label, Counter>,
    registry: Registry,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
struct Label {
    kind: String,
}

impl Metrics {
    pub fn new() -> Self {
        let rps = Family::<Label, RPSGauge>::default();
        let failures = Family::<Label, Counter>::default();
        let mut registry = <Registry>::default();

        registry.register(
            "rpc_proxy_requests_per_sec",
            "Requests per second",
            rps.clone(),
        );
        registry.register(
            "rpc_proxy_failures",
            "Requests that could not be served",
            failures.clone(),
        );

        Self {
            rps,
            failures,
            registry,
        }
    }

    pub fn record_rps(&self, kind: &str, rps: usize) {
        self.rps
            .get_or_create(&Label {
                kind: kind.to_owned(),
            })
            .set(rps as i64);
    }

    pub fn record_failure(&self, kind: &str) {
        self.failures
            .get_or_create(&Label {
                kind: kind.to_owned(),
            })
            .inc();
    }

    pub fn encode(&self) -> Result<String> {
        let mut buf = String::new();

        encode(&mut buf, &self.registry).map_err(Error::EncodeMetrics)?;

        Ok(buf)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
