use crate::models::VehicleClass;

/// Plate string returned for classes that carry no plate
pub const UNKNOWN_PLATE: &str = "Unknown";

/// Per-camera plate numbering.
///
/// Plates look like `C07000000003`: class letter, two-digit camera id and a
/// nine-digit counter. The counter only moves when a plate is issued.
#[derive(Debug, Clone)]
pub struct PlateSequence {
    camera_id: u32,
    counter: u32,
}

impl PlateSequence {
    pub fn new(camera_id: u32) -> Self {
        Self::starting_at(camera_id, 0)
    }

    pub fn starting_at(camera_id: u32, counter: u32) -> Self {
        Self { camera_id, counter }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn next_number(&mut self, class: VehicleClass) -> String {
        match class.plate_letter() {
            Some(letter) => {
                let number = format!("{}{:02}{:09}", letter, self.camera_id, self.counter);
                self.counter = self.counter.wrapping_add(1);
                number
            }
            None => UNKNOWN_PLATE.to_string(),
        }
    }
}
