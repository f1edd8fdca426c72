//! A single logged pressure observation and its text rendering.
//!
//! Text layout:
//! ```text
//! "HH:MM:SS <bar> bar"     e.g. "00:01:05 205 bar"
//! ```
//!
//! The clock part renders a seconds-since-start counter through a
//! time-of-day formatter, so it wraps every 24 h and negative values
//! show the previous day's time (`-1` → `23:59:59`).

use core::fmt::Write;

use heapless::String;

/// Rendered clock, `"HH:MM:SS"`.
pub type ClockText = String<8>;

/// Rendered reading; fits the longest `i32` bar value.
pub type ReadingText = String<24>;

const SECS_PER_DAY: i32 = 86_400;

/// One captured `(elapsed_seconds, bar_value)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    elapsed_seconds: i32,
    bar_value: i32,
}

impl Reading {
    pub const fn new(elapsed_seconds: i32, bar_value: i32) -> Self {
        Self {
            elapsed_seconds,
            bar_value,
        }
    }

    pub const fn elapsed_seconds(&self) -> i32 {
        self.elapsed_seconds
    }

    pub const fn bar_value(&self) -> i32 {
        self.bar_value
    }

    /// Render as `"HH:MM:SS <bar> bar"`.
    pub fn format(&self) -> ReadingText {
        let mut out = ReadingText::new();
        // 8 + 1 + 11 + 4 = 24 bytes worst case, the write cannot overflow.
        let _ = write!(
            out,
            "{} {} bar",
            format_clock(self.elapsed_seconds),
            self.bar_value
        );
        out
    }
}

/// Render a seconds counter as a 24-hour time of day.
pub fn format_clock(elapsed_seconds: i32) -> ClockText {
    let secs = elapsed_seconds.rem_euclid(SECS_PER_DAY);
    let mut out = ClockText::new();
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    );
    out
}
