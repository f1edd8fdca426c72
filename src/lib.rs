//! Pressure logger core - reading log, session state machine and views.
//!
//! Everything in this library is pure logic that runs on the host as well
//! as on the device, so it can be tested without hardware.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary (main.rs, `--features embedded`) is
//! `#![no_std]`/`#![no_main]` and pulls the hardware-facing modules in
//! itself; this lib.rs only exposes what they build on.

#![cfg_attr(not(test), no_std)]

pub mod compass;
pub mod config;
pub mod error;
pub mod log;
pub mod persist;
pub mod projector;
pub mod reading;
pub mod session;
pub mod ui;

pub use error::{CodecError, Error};
pub use log::{CapacityPolicy, ReadingLog, RecordOutcome};
pub use reading::Reading;
pub use session::{Direction, Effects, Session, Vibe};
