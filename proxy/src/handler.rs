use crate::config::Config;
use crate::metrics::Metrics;
use crate::types::RpcResponse;
use crate::{Error, Result};
use jsonrpc_batch_core::types::MaybeBatch;
use jsonrpc_batch_core::{Client, Request};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct Handler {
    limiter: Mutex<Limiter>,
    client: Client,
    metrics: Arc<Metrics>,
}

impl Handler {
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Result<Self> {
        let client = Client::from_http_config(config.target_rpc.clone(), &config.http)
            .map_err(Error::CreateClient)?;

        Ok(Self::with_client(
            client,
            config.max_requests_per_sec,
            metrics,
        ))
    }

    pub fn with_client(client: Client, rps_limit: Option<usize>, metrics: Arc<Metrics>) -> Self {
        let limiter = Limiter::new(rps_limit, metrics.clone());

        Self {
            limiter: Mutex::new(limiter),
            client,
            metrics,
        }
    }

    pub async fn handle(&self, rpc_req: MaybeBatch<Request>) -> Result<RpcResponse> {
        let kind = match &rpc_req {
            MaybeBatch::Batch(_) => "batch",
            MaybeBatch::Single(_) => "single",
        };

        {
            if let CountResult::Limited = self.limiter.lock().unwrap().count_req(kind) {
                self.metrics.record_failure("rate_limited");
                return Err(Error::RateLimited);
            }
        }

        let res = match rpc_req {
            MaybeBatch::Single(req) => self.forward(req).await,
            MaybeBatch::Batch(reqs) => self
                .client
                .send_batch(&reqs)
                .await
                .map(RpcResponse::Batch)
                .map_err(Error::Forward),
        };

        if let Err(e) = &res {
            log::debug!("failed to forward {} request:\n{}", kind, e);
            self.metrics.record_failure("forward");
        }

        res
    }

    async fn forward(&self, req: Request) -> Result<RpcResponse> {
        let resp = match self.client.send(&req).await {
            Ok(result) => serde_json::json!({
                "jsonrpc": "2.0",
                "id": req.id,
                "result": result,
            }),
            Err(jsonrpc_batch_core::Error::Rpc(error)) => serde_json::json!({
                "jsonrpc": "2.0",
                "id": req.id,
                "error": error,
            }),
            Err(e) => return Err(Error::Forward(e)),
        };

        Ok(RpcResponse::Single(resp))
    }
}

struct Limiter {
    time: Instant,
    reqs_total: usize,
    reqs: HashMap<String, usize>,
    rps_limit: Option<usize>,
    metrics: Arc<Metrics>,
}

enum CountResult {
    Counted,
    Limited,
}

impl Limiter {
    fn new(rps_limit: Option<usize>, metrics: Arc<Metrics>) -> Self {
        Self {
            time: Instant::now(),
            reqs_total: 0,
            reqs: HashMap::new(),
            rps_limit,
            metrics,
        }
    }

    fn count_req(&mut self, kind: &str) -> CountResult {
        if self.time.elapsed().as_millis() >= 1000 {
            for (kind, val) in self.reqs.iter() {
                self.metrics.record_rps(kind, *val);
            }
            self.metrics.record_rps("total", self.reqs_total);

            self.reqs_total = 0;
            self.reqs.values_mut().for_each(|val| *val = 0);
            self.time = Instant::now();
        }
        if let Some(rps_limit) = self.rps_limit {
            if self.reqs_total >= rps_limit {
                return CountResult::Limited;
            }
        }

        self.reqs_total += 1;
        *self.reqs.entry(kind.to_owned()).or_default() += 1;

        CountResult::Counted
    }
}
