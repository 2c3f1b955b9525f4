use std::process::ExitCode;
use std::sync::Arc;

use sonos_doorbell::logging::init_logging_from_env;
use sonos_doorbell::{Config, Doorbell, DoorbellError, DoorbellServer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging_from_env() {
        eprintln!("sonos-doorbell: {e}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sonos-doorbell stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DoorbellError> {
    let config = Config::from_env()?;
    let port = config.port;

    let doorbell = Arc::new(Doorbell::connect(config).await?);
    let server = DoorbellServer::start(Arc::clone(&doorbell), port).await?;

    info!(
        "Sonos Doorbell API available on: {}",
        doorbell.announce().base_url()
    );
    for device in doorbell.devices() {
        info!(group = %device.name, host = %device.host, "will ring");
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| DoorbellError::Server(format!("waiting for Ctrl-C: {e}")))?;

    info!("shutting down");
    server.shutdown().await;
    Ok(())
}
