/// Simulated camera state and its send/sleep loop
use log::{info, log, Level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use tokio::time::sleep;

use crate::config::{CameraConfig, ImagePaths, SimulatorConfig};
use crate::connector::{submit_event, ConnectorClient, Delivery};
use crate::error::Result;
use crate::event::{synthesize, EventIdentity, PlateSequence};
use crate::models::LprEvent;
use crate::utils::format_elapsed;

/// Inter-event timing derived from the configured hourly rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Mean seconds between events
    pub interval_average: f64,
    /// Width of the window sleeps are drawn from
    pub interval_range: f64,
    /// Lower edge of that window
    pub minimum_interval: f64,
}

impl Timing {
    pub fn new(rate: f64, rate_variance: f64) -> Self {
        let interval_average = 3600.0 / rate;
        let interval_range = interval_average * (rate_variance / 100.0) * 2.0;
        let minimum_interval = interval_average - interval_range / 2.0;
        Self {
            interval_average,
            interval_range,
            minimum_interval,
        }
    }

    /// Upper edge of the sleep window, in seconds
    pub fn maximum_interval(&self) -> f64 {
        self.minimum_interval + self.interval_range
    }

    /// Whether every sleep in the window fits in a `Duration`
    pub fn is_representable(&self) -> bool {
        Duration::try_from_secs_f64(self.maximum_interval().max(0.0)).is_ok()
    }

    /// Uniform over `[minimum_interval, minimum_interval + interval_range)`.
    /// Windows too wide for a `Duration` saturate at `Duration::MAX`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let seconds = self.minimum_interval + self.interval_range * rng.gen::<f64>();
        Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Log line for a send outcome. Accepted events produce none.
pub fn diagnostic(camera_id: &str, outcome: &Result<Delivery>) -> Option<(Level, String)> {
    match outcome {
        Ok(Delivery::Accepted) => None,
        Ok(Delivery::Unexpected { status: 200, body }) => Some((
            Level::Warn,
            format!(
                "Camera {}: status code is ok. Response body is {}",
                camera_id, body
            ),
        )),
        Ok(Delivery::Unexpected { status, body }) => Some((
            Level::Warn,
            format!(
                "Camera {}: status code is {}. Response body is {}",
                camera_id, status, body
            ),
        )),
        Err(e) => Some((
            Level::Error,
            format!("Camera {}: event dropped. {}", camera_id, e),
        )),
    }
}

/// Everything a camera needs from configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Id as written in the configuration, sent verbatim on the wire
    pub id: String,
    pub direction: String,
    pub auth_key: String,
    pub target_location: String,
    pub rate: f64,
    pub rate_variance: f64,
    pub images: ImagePaths,
    pub debug: bool,
}

impl CameraSettings {
    pub fn from_config(camera: &CameraConfig, config: &SimulatorConfig, in_container: bool) -> Self {
        Self {
            id: camera.id.clone(),
            direction: camera.direction.clone(),
            auth_key: camera.auth_key.clone(),
            target_location: config.target_location.clone(),
            rate: camera.rate,
            rate_variance: camera.rate_variance,
            images: ImagePaths::resolve(config, in_container),
            debug: config.debug,
        }
    }

    /// Numeric id used in plate numbers; ids that don't parse map to 0
    pub fn numeric_id(&self) -> u32 {
        self.id.trim().parse().unwrap_or(0)
    }
}

/// One simulated camera. Owns its counter, timing and random source;
/// nothing is shared with other cameras.
pub struct Camera<R = StdRng> {
    settings: CameraSettings,
    timing: Timing,
    plates: PlateSequence,
    client: ConnectorClient,
    rng: R,
}

impl Camera<StdRng> {
    pub fn from_config(
        camera: &CameraConfig,
        config: &SimulatorConfig,
        in_container: bool,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let client = ConnectorClient::new(&config.connector_host)?;
        let settings = CameraSettings::from_config(camera, config, in_container);
        Ok(Self::new(settings, client, StdRng::from_entropy()))
    }
}

impl<R: Rng> Camera<R> {
    pub fn new(settings: CameraSettings, client: ConnectorClient, rng: R) -> Self {
        let timing = Timing::new(settings.rate, settings.rate_variance);
        let plates = PlateSequence::new(settings.numeric_id());
        Self {
            settings,
            timing,
            plates,
            client,
            rng,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn number_counter(&self) -> u32 {
        self.plates.counter()
    }

    pub fn next_event(&mut self) -> LprEvent {
        let identity = EventIdentity {
            camera_id: &self.settings.id,
            direction: &self.settings.direction,
            target_location: &self.settings.target_location,
        };
        synthesize(
            &mut self.rng,
            &mut self.plates,
            &identity,
            OffsetDateTime::now_utc(),
        )
    }

    pub fn next_interval(&mut self) -> Duration {
        self.timing.sample(&mut self.rng)
    }

    /// Deliver an already built event. File reads and the HTTP call run
    /// on the blocking pool.
    pub async fn submit(&self, event: LprEvent) -> Result<Delivery> {
        let client = self.client.clone();
        let secret = self.settings.auth_key.clone();
        let images = self.settings.images.clone();
        let dump_body = self.settings.debug;

        tokio::task::spawn_blocking(move || {
            submit_event(&client, &event, &secret, &images, dump_body)
        })
        .await?
    }

    /// Synthesize and deliver one event
    pub async fn send(&mut self) -> Result<Delivery> {
        let event = self.next_event();
        self.submit(event).await
    }

    fn report(&self, outcome: &Result<Delivery>) {
        if let Some((level, message)) = diagnostic(&self.settings.id, outcome) {
            log!(level, "{}", message);
        }
    }
}

impl<R: Rng + Send + 'static> Camera<R> {
    /// Send, log the elapsed time, sleep, repeat. Never returns.
    pub async fn run(mut self) {
        info!(
            "Camera {} started: {:.3}s average interval, {:.3}s window from {:.3}s",
            self.settings.id,
            self.timing.interval_average,
            self.timing.interval_range,
            self.timing.minimum_interval
        );

        loop {
            let started = Instant::now();
            let outcome = self.send().await;
            self.report(&outcome);
            info!(
                "Camera {} send took {}",
                self.settings.id,
                format_elapsed(started.elapsed())
            );

            let interval = self.next_interval();
            sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SendError;
    use crate::models::VehicleClass;
    use rand::rngs::mock::StepRng;

    fn settings(id: &str, rate: f64, rate_variance: f64) -> CameraSettings {
        CameraSettings {
            id: id.to_string(),
            direction: "in".to_string(),
            auth_key: "key".to_string(),
            target_location: "UTC".to_string(),
            rate,
            rate_variance,
            images: ImagePaths {
                car: "car_image".into(),
                plate: "plate_image".into(),
            },
            debug: false,
        }
    }

    fn camera<R: Rng>(settings: CameraSettings, rng: R) -> Camera<R> {
        let client = ConnectorClient::new("127.0.0.1").unwrap();
        Camera::new(settings, client, rng)
    }

    #[test]
    fn derives_timing_from_rate() {
        let timing = Timing::new(120.0, 25.0);
        assert_eq!(timing.interval_average, 30.0);
        assert_eq!(timing.interval_range, 15.0);
        assert_eq!(timing.minimum_interval, 22.5);
    }

    #[test]
    fn zero_variance_sleeps_exactly_one_second() {
        let timing = Timing::new(3600.0, 0.0);
        assert_eq!(timing.interval_average, 1.0);
        assert_eq!(timing.interval_range, 0.0);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_eq!(timing.sample(&mut rng), Duration::from_secs(1));
        }
    }

    #[test]
    fn sleeps_stay_within_variance_window() {
        for (rate, variance) in [(60.0, 10.0), (720.0, 50.0), (1.5, 100.0), (3600.0, 33.0)] {
            let timing = Timing::new(rate, variance);
            let avg: f64 = 3600.0 / rate;
            let low = avg - avg * variance / 100.0;
            let high = avg + avg * variance / 100.0;

            let mut rng = StdRng::seed_from_u64(rate as u64);
            for _ in 0..10_000 {
                let slept = timing.sample(&mut rng).as_secs_f64();
                assert!(
                    slept >= low - 1e-6 && slept <= high + 1e-6,
                    "{} outside [{}, {}]",
                    slept,
                    low,
                    high
                );
            }
        }
    }

    #[test]
    fn zero_draw_sleeps_minimum_interval() {
        let mut cam = camera(settings("1", 60.0, 50.0), StepRng::new(0, 0));
        assert_eq!(cam.next_interval(), Duration::from_secs(30));
    }

    #[test]
    fn counter_tracks_known_class_events() {
        let mut cam = camera(settings("4", 60.0, 0.0), StdRng::seed_from_u64(42));
        let mut known = 0;
        for _ in 0..5_000 {
            let event = cam.next_event();
            if event.vehicle_class != VehicleClass::Unknown {
                known += 1;
                assert!(event.number.starts_with(event.vehicle_class.plate_letter().unwrap()));
                assert_eq!(&event.number[1..3], "04");
            } else {
                assert_eq!(event.number, "Unknown");
            }
            assert_eq!(cam.number_counter(), known);
        }
        assert!(known < 5_000);
    }

    #[test]
    fn cameras_count_independently() {
        let mut first = camera(settings("1", 60.0, 0.0), StepRng::new(0, 0));
        let mut second = camera(settings("2", 60.0, 0.0), StepRng::new(0, 0));
        for _ in 0..3 {
            first.next_event();
        }
        assert_eq!(second.next_event().number, "C02000000000");
        assert_eq!(first.next_event().number, "C01000000003");
    }

    #[test]
    fn tiny_rate_saturates_instead_of_panicking() {
        let timing = Timing::new(1e-16, 50.0);
        assert!(!timing.is_representable());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(timing.sample(&mut rng), Duration::MAX);
        assert!(Timing::new(1.0, 100.0).is_representable());
    }

    #[test]
    fn accepted_events_log_nothing() {
        assert!(diagnostic("1", &Ok(Delivery::Accepted)).is_none());

        let (level, message) = diagnostic(
            "1",
            &Ok(Delivery::Unexpected {
                status: 200,
                body: "nope".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(level, Level::Warn);
        assert_eq!(message, "Camera 1: status code is ok. Response body is nope");

        let (level, message) = diagnostic(
            "2",
            &Ok(Delivery::Unexpected {
                status: 503,
                body: "busy".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(level, Level::Warn);
        assert!(message.contains("status code is 503"));

        let failure = Err(SendError::Transport("connection refused".to_string()));
        let (level, message) = diagnostic("3", &failure).unwrap();
        assert_eq!(level, Level::Error);
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn non_numeric_id_plates_as_zero() {
        let cfg = settings("cam", 60.0, 0.0);
        assert_eq!(cfg.numeric_id(), 0);
    }
}
