//! User interface subsystem - OLED display + physical buttons.
//!
//! The app task feeds debounced button edges through the
//! [`gesture::ClickRecognizer`] and hands the resulting clicks to the
//! session, then renders the projected screen.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C (firmware only)
//! - **Buttons**: 3 tactile switches with debouncing (UP, DOWN, SELECT)

pub mod gesture;

/// Physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Select,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounced button edge with its timestamp in milliseconds since boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: Button,
    pub edge: Edge,
    pub at_ms: u64,
}

/// Screens (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Clock, pressure, latest readings and compass.
    Main,
    /// Scrollable list of every reading; `scroll` is the top row.
    History { scroll: usize },
}
