pub mod plate;
pub mod synthesizer;

pub use plate::PlateSequence;

use rand::Rng;
use time::OffsetDateTime;

use crate::models::LprEvent;
use crate::utils::{format_target_timestamp, transaction_key};

/// Identity fields a camera stamps on every event it produces
#[derive(Debug, Clone)]
pub struct EventIdentity<'a> {
    pub camera_id: &'a str,
    pub direction: &'a str,
    pub target_location: &'a str,
}

/// Build one fabricated detection.
///
/// Draw order is class, colour, country, probability. The plate is issued
/// from `plates` after the class is known.
pub fn synthesize<R: Rng + ?Sized>(
    rng: &mut R,
    plates: &mut PlateSequence,
    identity: &EventIdentity<'_>,
    now: OffsetDateTime,
) -> LprEvent {
    let vehicle_class = synthesizer::vehicle_class(rng);
    let vehicle_color = synthesizer::vehicle_color(rng, vehicle_class);
    let number = plates.next_number(vehicle_class);
    let country_code = synthesizer::country_code(rng);
    let first_seen = format_target_timestamp(now, identity.target_location);
    let probability = synthesizer::probability(rng);

    LprEvent {
        camera_id: identity.camera_id.to_string(),
        number,
        country_code,
        last_seen: first_seen.clone(),
        first_seen,
        probability,
        transaction_key: transaction_key(),
        direction: identity.direction.to_string(),
        vehicle_class,
        vehicle_color,
    }
}
