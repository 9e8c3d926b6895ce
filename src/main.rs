use futures_util::future::join_all;
use log::{error, info, warn};

use lpr_simulator::camera::Camera;
use lpr_simulator::config::{is_running_in_container, SimulatorConfig};

/// Spawn one independent task per configured camera and wait on all of them
async fn main_loop(config: SimulatorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let in_container = is_running_in_container();
    info!(
        "Starting LPR simulator: {} camera(s), connector {}, container mode {}",
        config.cameras.len(),
        config.connector_host,
        in_container
    );

    // Build every camera before starting any, so a bad entry stops startup
    let mut cameras = Vec::with_capacity(config.cameras.len());
    for camera in &config.cameras {
        cameras.push(Camera::from_config(camera, &config, in_container)?);
    }

    let handles: Vec<_> = cameras
        .into_iter()
        .map(|camera| tokio::spawn(camera.run()))
        .collect();

    for result in join_all(handles).await {
        if let Err(e) = result {
            warn!("Camera task ended: {}", e);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match SimulatorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            // Keep the sender alive so the cameras keep running
            std::future::pending::<()>().await;
        }
        let _ = tx.send(());
    });

    // Run cameras or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            if let Err(e) = result {
                error!("Fatal error: {}", e);
                return Err(e);
            }
        }
        _ = &mut rx => {
            info!("Simulator terminated by user. Exiting.");
        }
    }

    Ok(())
}
