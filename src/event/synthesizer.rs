/// Weighted random synthesis of detection fields
///
/// Every categorical field is chosen by comparing a single uniform draw in
/// `[0, 1)` against a cumulative threshold table. The first threshold the draw
/// falls under wins, so the table order matters.
use rand::Rng;

use crate::models::{CountryCode, VehicleClass, VehicleColor};

const CLASS_TABLE: &[(f64, VehicleClass)] = &[
    (0.60, VehicleClass::Car),       // 60%
    (0.70, VehicleClass::Truck),     // 10%
    (0.80, VehicleClass::Bus),       // 10%
    (0.90, VehicleClass::Motorbike), // 10%
    (0.95, VehicleClass::Van),       // 5%
    (0.99, VehicleClass::SuvPickup), // 4%
];

const COUNTRY_TABLE: &[(f64, CountryCode)] = &[
    (0.98, CountryCode::Romania),
    (0.995, CountryCode::Germany),
];

const CAR_COLORS: &[(f64, VehicleColor)] = &[
    (0.23, VehicleColor::Black),
    (0.42, VehicleColor::White),
    (0.60, VehicleColor::Grey),
    (0.75, VehicleColor::Silver),
    (0.85, VehicleColor::Blue),
    (0.95, VehicleColor::Red),
    (0.97, VehicleColor::Brown),
    (0.98, VehicleColor::Gold),
    (0.99, VehicleColor::Green),
];

const MOTORBIKE_COLORS: &[(f64, VehicleColor)] = &[
    (0.40, VehicleColor::Black),
    (0.80, VehicleColor::White),
];

// Vans and SUV/Pickups share one palette
const UTILITY_COLORS: &[(f64, VehicleColor)] = &[
    (0.40, VehicleColor::White),
    (0.80, VehicleColor::Silver),
];

fn pick<T: Copy>(table: &[(f64, T)], fallback: T, draw: f64) -> T {
    table
        .iter()
        .find(|(threshold, _)| draw < *threshold)
        .map(|(_, value)| *value)
        .unwrap_or(fallback)
}

pub fn class_for_draw(draw: f64) -> VehicleClass {
    pick(CLASS_TABLE, VehicleClass::Unknown, draw)
}

pub fn country_for_draw(draw: f64) -> CountryCode {
    pick(COUNTRY_TABLE, CountryCode::Hungary, draw)
}

pub fn color_for_draw(class: VehicleClass, draw: f64) -> VehicleColor {
    match class {
        VehicleClass::Car => pick(CAR_COLORS, VehicleColor::Unknown, draw),
        VehicleClass::Truck | VehicleClass::Bus => VehicleColor::White,
        VehicleClass::Motorbike => pick(MOTORBIKE_COLORS, VehicleColor::Red, draw),
        VehicleClass::Van | VehicleClass::SuvPickup => {
            pick(UTILITY_COLORS, VehicleColor::Grey, draw)
        }
        VehicleClass::Unknown => VehicleColor::Unknown,
    }
}

/// Render a detection probability with one decimal digit, e.g. `"0.7"`
pub fn probability_for_draw(draw: f64) -> String {
    format!("{:.1}", draw)
}

pub fn vehicle_class<R: Rng + ?Sized>(rng: &mut R) -> VehicleClass {
    class_for_draw(rng.gen())
}

/// Colour is drawn independently of the class draw, even for classes
/// with a fixed colour, so every event consumes the same number of draws.
pub fn vehicle_color<R: Rng + ?Sized>(rng: &mut R, class: VehicleClass) -> VehicleColor {
    color_for_draw(class, rng.gen())
}

pub fn country_code<R: Rng + ?Sized>(rng: &mut R) -> CountryCode {
    country_for_draw(rng.gen())
}

pub fn probability<R: Rng + ?Sized>(rng: &mut R) -> String {
    probability_for_draw(rng.gen())
}
