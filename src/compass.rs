//! Compass samples pushed in by the heading sensor.
//!
//! Angles use the 16-bit trig scale of the sensor driver: a full turn is
//! [`TRIG_MAX_ANGLE`] units, growing counter-clockwise from north.

use core::fmt::Write;

use heapless::String;

/// One full turn in sensor angle units.
pub const TRIG_MAX_ANGLE: u32 = 0x1_0000;

/// `"%3d°"` or the `"---°"` placeholder.
pub type HeadingText = String<8>;

/// Calibration state reported with each sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompassStatus {
    /// The sensor has no usable heading.
    DataInvalid,
    /// Heading available but the user should keep moving the wrist.
    Calibrating,
    Calibrated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassSample {
    /// Magnetic heading in trig units, `0..TRIG_MAX_ANGLE`.
    pub angle: u16,
    pub status: CompassStatus,
}

impl CompassSample {
    /// Clockwise compass bearing in whole degrees, `0..360`.
    pub fn heading_degrees(&self) -> u16 {
        let deg = (self.angle as u32 * 360 / TRIG_MAX_ANGLE) as u16;
        (360 - deg) % 360
    }

    /// Needle rotation in radians (counter-clockwise), for drawing.
    pub fn needle_radians(&self) -> f32 {
        self.angle as f32 * core::f32::consts::TAU / TRIG_MAX_ANGLE as f32
    }

    pub fn is_calibrated(&self) -> bool {
        self.status == CompassStatus::Calibrated
    }
}

/// Heading text for the main screen.
pub fn heading_text(sample: Option<&CompassSample>) -> HeadingText {
    let mut out = HeadingText::new();
    match sample {
        Some(s) if s.status != CompassStatus::DataInvalid => {
            let _ = write!(out, "{:3}°", s.heading_degrees());
        }
        _ => {
            let _ = out.push_str("---°");
        }
    }
    out
}

/// Calibration hint, blank once the sensor is calibrated.
pub fn calibration_text(sample: Option<&CompassSample>) -> &'static str {
    match sample {
        Some(s) if s.is_calibrated() => "",
        _ => "calibrating",
    }
}
