use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::Timing;

// Container layout: config and images are mounted under /data
const DOCKER_MARKER: &str = "/.dockerenv";
const CONTAINER_DATA_DIR: &str = "/data";
const CONTAINER_CAR_IMAGE: &str = "/data/car_image";
const CONTAINER_PLATE_IMAGE: &str = "/data/plate_image";

/// One simulated camera as described in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(deserialize_with = "camera_id")]
    pub id: String,
    #[serde(default)]
    pub direction: String,
    #[serde(rename = "authkey", default)]
    pub auth_key: String,
    /// Events per hour
    pub rate: f64,
    /// Percentage the interval may deviate from the average, both ways
    #[serde(rename = "rate-variance", default)]
    pub rate_variance: f64,
}

// Ids may be written quoted or bare in YAML
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

fn camera_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulatorConfig {
    #[serde(default)]
    pub target_location: String,
    pub connector_host: String,
    #[serde(default)]
    pub car_image_path: String,
    #[serde(default)]
    pub plate_image_path: String,
    #[serde(default)]
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub debug: bool,
}

/// Image files attached to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    pub car: PathBuf,
    pub plate: PathBuf,
}

impl ImagePaths {
    pub fn resolve(config: &SimulatorConfig, in_container: bool) -> Self {
        if in_container {
            ImagePaths {
                car: PathBuf::from(CONTAINER_CAR_IMAGE),
                plate: PathBuf::from(CONTAINER_PLATE_IMAGE),
            }
        } else {
            ImagePaths {
                car: PathBuf::from(&config.car_image_path),
                plate: PathBuf::from(&config.plate_image_path),
            }
        }
    }
}

/// Docker creates `/.dockerenv` at the root of every container
pub fn is_running_in_container() -> bool {
    Path::new(DOCKER_MARKER).exists()
}

/// Where the configuration file lives for a given `CONFIG` value
pub fn config_file_path(config_name: &str, in_container: bool) -> PathBuf {
    if in_container {
        Path::new(CONTAINER_DATA_DIR).join(config_name)
    } else {
        PathBuf::from(config_name)
    }
}

impl SimulatorConfig {
    /// Load from the file named by the `CONFIG` environment variable
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let config_name =
            env::var("CONFIG").map_err(|_| "CONFIG environment variable not set")?;

        let in_container = is_running_in_container();
        let path = config_file_path(&config_name, in_container);

        let config = Self::from_file(&path)?;
        config.validate(in_container)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path).map_err(|e| {
            format!(
                "Error in opening configuration file, {}. Cause: {}",
                path.display(),
                e
            )
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Error in decode YAML from file. Cause: {}", e).into())
    }

    /// Reject configurations no camera could run with
    pub fn validate(&self, in_container: bool) -> Result<(), Box<dyn std::error::Error>> {
        if !in_container {
            if self.car_image_path.is_empty() {
                return Err("Car Image is not defined in configuration file".into());
            }
            if self.plate_image_path.is_empty() {
                return Err("Plate Image is not defined in configuration file".into());
            }
        }

        if self.connector_host.trim().is_empty() {
            return Err("Connector host is not defined in configuration file".into());
        }

        if self.cameras.is_empty() {
            return Err("No cameras configured".into());
        }

        for camera in &self.cameras {
            if camera.id.trim().parse::<u32>().is_err() {
                return Err(format!("Camera id '{}' is not a non-negative integer", camera.id).into());
            }
            if !(camera.rate.is_finite() && camera.rate > 0.0) {
                return Err(format!("Camera {}: rate must be positive, got {}", camera.id, camera.rate).into());
            }
            if !(0.0..=100.0).contains(&camera.rate_variance) {
                return Err(format!(
                    "Camera {}: rate-variance must be within 0..=100, got {}",
                    camera.id, camera.rate_variance
                )
                .into());
            }
            if !Timing::new(camera.rate, camera.rate_variance).is_representable() {
                return Err(format!("Camera {}: rate {} is too low to schedule", camera.id, camera.rate).into());
            }
        }

        Ok(())
    }
}
