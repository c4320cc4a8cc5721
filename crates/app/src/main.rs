//! Timeview - console client entry point
//!
//! Wires configuration, the reqwest adapter, and the request controller
//! together and hands control to the console frontend.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use timeview_application::RequestController;
use timeview_infrastructure::{ReqwestTimeService, ServiceConfig};

mod cli;
mod console;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let mut config = ServiceConfig::new(cli.base_url.clone());
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let service = Arc::new(ReqwestTimeService::new(&config)?);
    let controller = RequestController::new(service);

    if cli.once {
        console::run_once(&controller).await
    } else {
        console::run(controller).await
    }
}
