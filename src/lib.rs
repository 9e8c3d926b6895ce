//! Simulated fleet of license plate recognition cameras feeding a connector
//! service with fabricated detections.

pub mod camera;
pub mod config;
pub mod connector;
pub mod error;
pub mod event;
pub mod models;
pub mod utils;

pub use camera::{Camera, CameraSettings, Timing};
pub use config::{ImagePaths, SimulatorConfig};
pub use connector::{ConnectorClient, Delivery};
pub use error::SendError;
