use std::sync::Arc;

mod config;
mod container;
mod dispatch;
mod error;
mod logger;
mod modules;
mod routing;
mod server;
mod web;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path).map_err(error::BootstrapError::Config)?;
    logger::init(&cfg)?;

    // Bootstrap runs once, single-threaded, before any request is served.
    let catalog = modules::catalog();
    let container = container::Container::bootstrap(&catalog, &cfg.container)?;
    logger::log_bootstrap_report(&container.report.to_json());

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, container))
}

async fn async_main(
    cfg: config::Config,
    container: container::Container,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let dispatcher = dispatch::Dispatcher::new(container, &cfg);
    logger::log_server_start(&addr, &cfg, dispatcher.route_count());

    server::run(listener, Arc::new(dispatcher), Arc::new(cfg)).await
}
