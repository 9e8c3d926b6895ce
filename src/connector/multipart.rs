/// multipart/form-data encoding of detection events
use rand::Rng;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::ImagePaths;
use crate::error::{Result, SendError};
use crate::models::LprEvent;

const CRLF: &[u8] = b"\r\n";

/// A fully encoded request body and the boundary that delimits it
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Incremental writer for form parts
pub struct FormBuilder {
    boundary: String,
    bytes: Vec<u8>,
}

impl FormBuilder {
    /// Builder with a random 60 hex character boundary
    pub fn new() -> Self {
        let seed: [u8; 30] = rand::thread_rng().gen();
        Self::with_boundary(hex::encode(seed))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            bytes: Vec::new(),
        }
    }

    fn part_header(&mut self, disposition: &str, content_type: Option<&str>) {
        self.bytes.extend_from_slice(b"--");
        self.bytes.extend_from_slice(self.boundary.as_bytes());
        self.bytes.extend_from_slice(CRLF);
        self.bytes.extend_from_slice(b"Content-Disposition: ");
        self.bytes.extend_from_slice(disposition.as_bytes());
        self.bytes.extend_from_slice(CRLF);
        if let Some(content_type) = content_type {
            self.bytes.extend_from_slice(b"Content-Type: ");
            self.bytes.extend_from_slice(content_type.as_bytes());
            self.bytes.extend_from_slice(CRLF);
        }
        self.bytes.extend_from_slice(CRLF);
    }

    pub fn text_field(&mut self, name: &str, value: &str) -> &mut Self {
        self.part_header(&format!("form-data; name=\"{}\"", escape_quotes(name)), None);
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.extend_from_slice(CRLF);
        self
    }

    /// Append a binary part, copying everything `reader` yields.
    ///
    /// On error the builder is left with a truncated part and must be dropped.
    pub fn file_part<R: Read>(&mut self, name: &str, filename: &str, reader: &mut R) -> io::Result<u64> {
        self.part_header(
            &format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                escape_quotes(name),
                escape_quotes(filename)
            ),
            Some("application/octet-stream"),
        );
        let copied = io::copy(reader, &mut self.bytes)?;
        self.bytes.extend_from_slice(CRLF);
        Ok(copied)
    }

    pub fn finish(mut self) -> MultipartBody {
        self.bytes.extend_from_slice(b"--");
        self.bytes.extend_from_slice(self.boundary.as_bytes());
        self.bytes.extend_from_slice(b"--");
        self.bytes.extend_from_slice(CRLF);
        MultipartBody {
            boundary: self.boundary,
            bytes: self.bytes,
        }
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn attach_image(form: &mut FormBuilder, part: &'static str, path: &Path) -> Result<()> {
    let image_error = |source| SendError::Image {
        part,
        path: path.to_path_buf(),
        source,
    };

    // Handle is dropped on every path out of this function
    let mut file = File::open(path).map_err(image_error)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| part.to_string());
    form.file_part(part, &filename, &mut file).map_err(image_error)?;
    Ok(())
}

/// Encode an event, its digest and both images into one request body
pub fn encode_event(event: &LprEvent, auth: &str, images: &ImagePaths) -> Result<MultipartBody> {
    encode_event_with(FormBuilder::new(), event, auth, images)
}

pub fn encode_event_with(
    mut form: FormBuilder,
    event: &LprEvent,
    auth: &str,
    images: &ImagePaths,
) -> Result<MultipartBody> {
    form.text_field("id", &event.camera_id)
        .text_field("number", &event.number)
        .text_field("country_code", event.country_code.as_str())
        .text_field("first_seen", &event.first_seen)
        .text_field("last_seen", &event.last_seen)
        .text_field("probability", &event.probability)
        .text_field("transactionkey", &event.transaction_key)
        .text_field("direction", &event.direction)
        .text_field("gps_latitude", LprEvent::GPS_LATITUDE)
        .text_field("gps_longitude", LprEvent::GPS_LONGITUDE)
        .text_field("have_companion", LprEvent::HAVE_COMPANION)
        .text_field("auth", auth)
        .text_field("vehicle_class", event.vehicle_class.as_str())
        .text_field("vehicle_color", event.vehicle_color.as_str())
        .text_field("weight", LprEvent::WEIGHT)
        .text_field("speed", LprEvent::SPEED)
        .text_field("triggerKey", LprEvent::TRIGGER_KEY);

    attach_image(&mut form, "car_image", &images.car)?;
    attach_image(&mut form, "plate_image", &images.plate)?;

    Ok(form.finish())
}
