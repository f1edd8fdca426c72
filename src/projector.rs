//! Maps session state onto the fixed set of text slots the screens show.
//!
//! Pure view code: nothing here is cached, so the app task simply projects
//! again after every handler call.

use core::fmt::Write;

use heapless::String;

use crate::compass::{self, HeadingText};
use crate::log::ReadingLog;
use crate::reading::{format_clock, ClockText, ReadingText};
use crate::session::Session;

/// Rendered bar value; fits any `i32`.
pub type BarText = String<11>;

/// Compass part of the main screen.
#[derive(Clone, Debug, PartialEq)]
pub struct CompassView {
    pub heading: HeadingText,
    pub calibration: &'static str,
    /// Needle rotation in radians, `None` while there is no usable heading.
    pub needle_radians: Option<f32>,
}

/// Everything the main screen draws.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState<const K: usize> {
    pub clock: ClockText,
    pub bar: BarText,
    /// Latest readings right-aligned: slot `K - 1` is the newest, leading
    /// slots stay empty while the log is shorter than `K`.
    pub slots: [Option<ReadingText>; K],
    /// Present when the compass feature is enabled.
    pub compass: Option<CompassView>,
}

/// Project the main screen.
pub fn project<const N: usize, const K: usize>(session: &Session<N>) -> DisplayState<K> {
    let log = session.log();
    let shown = log.window(K);
    let offset = K - shown.len();

    let mut slots: [Option<ReadingText>; K] = core::array::from_fn(|_| None);
    for (slot, reading) in slots[offset..].iter_mut().zip(shown) {
        *slot = Some(reading.format());
    }

    let compass = session.config().compass.then(|| {
        let sample = session.compass();
        CompassView {
            heading: compass::heading_text(sample),
            calibration: compass::calibration_text(sample),
            needle_radians: sample
                .filter(|s| s.status != compass::CompassStatus::DataInvalid)
                .map(|s| s.needle_radians()),
        }
    });

    DisplayState {
        clock: format_clock(session.elapsed_seconds()),
        bar: bar_text(session.bar_value()),
        slots,
        compass,
    }
}

/// Every reading as a text line, oldest first.
pub fn project_history<const N: usize>(
    log: &ReadingLog<N>,
) -> impl Iterator<Item = ReadingText> + Clone + '_ {
    log.all().map(|r| r.format())
}

/// The `rows` history lines visible from top row `scroll`.
pub fn history_page<const N: usize>(
    log: &ReadingLog<N>,
    scroll: usize,
    rows: usize,
) -> impl Iterator<Item = ReadingText> + '_ {
    let top = clamp_scroll(log.len(), scroll, rows);
    project_history(log).skip(top).take(rows)
}

/// Largest top row that still fills the last page.
pub fn clamp_scroll(len: usize, scroll: usize, rows: usize) -> usize {
    scroll.min(len.saturating_sub(rows))
}

fn bar_text(bar: i32) -> BarText {
    let mut out = BarText::new();
    let _ = write!(out, "{}", bar);
    out
}
