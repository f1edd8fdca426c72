//! Application-wide constants and runtime feature toggles.
//!
//! Hardware pin assignments, timing parameters and log sizes live here so
//! they can be tuned in one place. [`SessionConfig`] carries the behaviour
//! switches that used to be separate firmware builds.

use crate::log::CapacityPolicy;

// Reading log

/// Storage slots compiled into the firmware's reading log.
pub const LOG_SLOTS: usize = 50;

/// Formatted reading rows shown on the main screen.
pub const VISIBLE_SLOTS: usize = 3;

/// Rows that fit on the history screen (6x10 font, 64 px tall).
pub const HISTORY_ROWS: usize = 6;

// Pressure

/// Pressure value at start and after a reset.
pub const DEFAULT_BAR: i32 = 200;

/// Pressure change per UP/DOWN click.
pub const BAR_STEP: i32 = 5;

/// Quiet period after a pressure change before it is logged (seconds).
/// A reading is taken once strictly more than this has elapsed.
pub const QUIET_PERIOD_SECS: u64 = 3;

// Vibration

/// Reminder interval (seconds). 300 = 5 minutes.
pub const VIBES_INTERVAL_SECS: i32 = 300;

/// Motor on-time for the "reading taken" pulse (ms).
pub const VIBE_SHORT_MS: u64 = 200;

/// Motor on-time for the reminder pulse (ms).
pub const VIBE_LONG_MS: u64 = 500;

// Buttons
//
// nRF52840-DK defaults, active-low with internal pull-up:
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button SELECT  → P0.24
//   Vibe motor     → P0.13 (through a transistor)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Hold time after which a press becomes a long click (ms).
pub const LONG_CLICK_MS: u64 = 1000;

/// Maximum gap between two SELECT clicks for a double click (ms).
pub const DOUBLE_CLICK_MS: u64 = 300;

// Session snapshot storage

/// Flash page index where snapshot storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for snapshot storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// The reference board has no magnetometer; flip when one is fitted.
pub const COMPASS_FITTED: bool = false;

/// Seconds between flushes of a dirty session to flash.
pub const SNAPSHOT_FLUSH_SECS: u64 = 30;

/// Clock drift after which an otherwise unchanged session is saved again.
/// Bounds how far the clock falls back after a power loss.
pub const CLOCK_SAVE_SECS: u64 = 300;

/// How the running clock is treated when a saved session is restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestartClock {
    /// Continue from the saved clock value.
    Resume,
    /// Add the wall-clock time spent switched off, when it is known.
    AdvanceByWallGap,
}

/// Behaviour switches for one logging session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    pub policy: CapacityPolicy,
    /// Entries kept by the log, `1..=N` for a `ReadingLog<N>`.
    pub capacity: usize,
    /// Log a reading automatically once a pressure change has settled.
    pub auto_capture: bool,
    pub quiet_period_secs: u64,
    /// Long pulse on every tick once the reminder is due.
    pub vibration_reminder: bool,
    pub vibration_interval_secs: i32,
    /// Show compass heading, calibration state and needle.
    pub compass: bool,
    pub restart_clock: RestartClock,
    pub initial_bar: i32,
    pub bar_step: i32,
}

impl SessionConfig {
    /// Needle-compass logger: 50 entries, stops when full, reminder on,
    /// clock advanced across restarts.
    pub const fn compass_logger() -> Self {
        Self {
            policy: CapacityPolicy::StopAtCapacity,
            capacity: LOG_SLOTS,
            auto_capture: true,
            quiet_period_secs: QUIET_PERIOD_SECS,
            vibration_reminder: true,
            vibration_interval_secs: VIBES_INTERVAL_SECS,
            compass: true,
            restart_clock: RestartClock::AdvanceByWallGap,
            initial_bar: DEFAULT_BAR,
            bar_step: BAR_STEP,
        }
    }

    /// Plain logger: 50 entries, stops when full, compass shown,
    /// no reminder.
    pub const fn basic() -> Self {
        Self {
            vibration_reminder: false,
            restart_clock: RestartClock::Resume,
            ..Self::compass_logger()
        }
    }

    /// Keeps the `capacity` most recent readings, oldest overwritten.
    pub const fn rolling(capacity: usize) -> Self {
        Self {
            policy: CapacityPolicy::Circular,
            capacity,
            auto_capture: true,
            quiet_period_secs: QUIET_PERIOD_SECS,
            vibration_reminder: false,
            vibration_interval_secs: VIBES_INTERVAL_SECS,
            compass: false,
            restart_clock: RestartClock::Resume,
            initial_bar: DEFAULT_BAR,
            bar_step: BAR_STEP,
        }
    }

    /// Grows to `capacity` entries, then keeps rewriting the last one.
    pub const fn capped(capacity: usize) -> Self {
        Self {
            policy: CapacityPolicy::CapAndFreeze,
            ..Self::rolling(capacity)
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::compass_logger()
    }
}
