use crate::config::Config;
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::metrics::Metrics;
use hyper::service::{make_service_fn, service_fn};
use hyper::{header, Body, Method, Request, Response, Server as HttpServer, StatusCode};
use jsonrpc_batch_core::types::MaybeBatch;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serves `POST /` for rpc requests and `GET /metrics`.
#[derive(Clone)]
pub struct Server {
    handler: Arc<Handler>,
    metrics: Arc<Metrics>,
}

impl Server {
    pub fn new(config: &Config) -> Result<Self> {
        let metrics = Arc::new(Metrics::new());
        let handler = Handler::new(config, metrics.clone())?;

        Ok(Self::with_handler(handler, metrics))
    }

    pub fn with_handler(handler: Handler, metrics: Arc<Metrics>) -> Self {
        Self {
            handler: Arc::new(handler),
            metrics,
        }
    }

    /// Binds to `addr` and returns the bound address along with the future
    /// that serves connections until the server fails.
    pub fn bind(
        self,
        addr: SocketAddr,
    ) -> Result<(SocketAddr, impl Future<Output = Result<()>>)> {
        let make_service = make_service_fn(move |_| {
            let server = self.clone();
            async move { Ok::<_, Infallible>(service_fn(move |req| route(server.clone(), req))) }
        });

        let server = HttpServer::try_bind(&addr)
            .map_err(Error::BindHttpServer)?
            .http1_preserve_header_case(true)
            .http1_title_case_headers(true)
            .serve(make_service);
        let local_addr = server.local_addr();

        Ok((local_addr, async move {
            server.await.map_err(Error::RunHttpServer)
        }))
    }
}

async fn route(server: Server, req: Request<Body>) -> hyper::Result<Response<Body>> {
    let res = match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => metrics_handler(server).await,
        (&Method::POST, "/") => rpc_handler(server, req).await,
        _ => Ok(empty_response(StatusCode::NOT_FOUND)),
    };

    match res {
        Ok(res) => Ok(res),
        Err(e) => Ok(Response::builder()
            .status(e.status_code())
            .body(Body::from(e.to_string()))
            .unwrap_or_else(|_| empty_response(StatusCode::INTERNAL_SERVER_ERROR))),
    }
}

async fn rpc_handler(server: Server, req: Request<Body>) -> Result<Response<Body>> {
    let req = hyper::body::to_bytes(req.into_body())
        .await
        .map_err(|_| Error::InvalidRequestBody(None))?;

    let rpc_req: MaybeBatch<jsonrpc_batch_core::Request> =
        serde_json::from_slice(req.as_ref()).map_err(|e| Error::InvalidRequestBody(Some(e)))?;

    let res = server.handler.handle(rpc_req).await?;

    let res = serde_json::to_string(&res).map_err(Error::EncodeResponse)?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(res))
        .unwrap_or_else(|_| empty_response(StatusCode::INTERNAL_SERVER_ERROR)))
}

async fn metrics_handler(server: Server) -> Result<Response<Body>> {
    let body = server.metrics.encode()?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )
        .body(Body::from(body))
        .unwrap_or_else(|_| empty_response(StatusCode::INTERNAL_SERVER_ERROR)))
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = status;
    res
}
