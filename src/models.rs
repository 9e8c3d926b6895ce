use std::fmt;

/// Vehicle class reported by a camera. The display strings are what the
/// connector receives in the `vehicle_class` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    Motorbike,
    Van,
    SuvPickup,
    Unknown,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "Car",
            VehicleClass::Truck => "Truck",
            VehicleClass::Bus => "Bus",
            VehicleClass::Motorbike => "Motorbike",
            VehicleClass::Van => "Van",
            VehicleClass::SuvPickup => "SUV/Pickup",
            VehicleClass::Unknown => "Unknown",
        }
    }

    /// Leading letter of a plate number, `None` for classes without plates.
    pub fn plate_letter(&self) -> Option<char> {
        match self {
            VehicleClass::Car => Some('C'),
            VehicleClass::Truck => Some('T'),
            VehicleClass::Bus => Some('B'),
            VehicleClass::Motorbike => Some('M'),
            VehicleClass::Van => Some('V'),
            VehicleClass::SuvPickup => Some('S'),
            VehicleClass::Unknown => None,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleColor {
    Black,
    White,
    Grey,
    Silver,
    Blue,
    Red,
    Brown,
    Gold,
    Green,
    Unknown,
}

impl VehicleColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleColor::Black => "Black",
            VehicleColor::White => "White",
            VehicleColor::Grey => "Grey",
            VehicleColor::Silver => "Silver",
            VehicleColor::Blue => "Blue",
            VehicleColor::Red => "Red",
            VehicleColor::Brown => "Brown",
            VehicleColor::Gold => "Gold",
            VehicleColor::Green => "Green",
            VehicleColor::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for VehicleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryCode {
    Romania,
    Germany,
    Hungary,
}

impl CountryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Romania => "RO",
            CountryCode::Germany => "D",
            CountryCode::Hungary => "H",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fabricated detection, built and sent within a single camera cycle.
#[derive(Debug, Clone)]
pub struct LprEvent {
    pub camera_id: String,
    pub number: String,
    pub country_code: CountryCode,
    pub first_seen: String,
    pub last_seen: String,
    pub probability: String,
    pub transaction_key: String,
    pub direction: String,
    pub vehicle_class: VehicleClass,
    pub vehicle_color: VehicleColor,
}

impl LprEvent {
    // Fixed values the simulator always reports
    pub const GPS_LATITUDE: &'static str = "0";
    pub const GPS_LONGITUDE: &'static str = "0";
    pub const HAVE_COMPANION: &'static str = "0";
    pub const WEIGHT: &'static str = "0";
    pub const SPEED: &'static str = "0";
    pub const TRIGGER_KEY: &'static str = "none";
}
