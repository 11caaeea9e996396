use jsonrpc_batch_proxy::{Config, Server};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::parse();

    let server = match Server::new(&config) {
        Ok(server) => server,
        Err(e) => {
            log::error!("failed to create rpc proxy:\n{}", e);
            return;
        }
    };

    let (addr, serve) = match server.bind(config.server_addr) {
        Ok(bound) => bound,
        Err(e) => {
            log::error!("failed to start server:\n{}", e);
            return;
        }
    };

    log::info!("forwarding rpc requests on {} to {}", addr, config.target_rpc);

    if let Err(e) = serve.await {
        log::error!("failed to run server:\n{}", e);
    }
}
