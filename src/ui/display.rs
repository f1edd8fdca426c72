//! SSD1306 OLED display wrapper.
//!
//! ```text
//! Main screen (128×64)            History screen
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │205 bar         ╱╲ 90°│        │00:00:05 200 bar      │
//! │00:12:41        ╲╱ cal│        │00:00:09 205 bar      │
//! │00:10:02 200 bar      │        │...                   │
//! │00:11:40 205 bar      │        │                      │
//! │00:12:30 210 bar      │        │                      │
//! └──────────────────────┘        └──────────────────────┘
//! ```

use barlog::projector::{CompassView, DisplayState};
use barlog::reading::ReadingText;
use barlog::Error;
use embedded_graphics::mono_font::ascii::FONT_10X20;
// ISO 8859-1 for the degree sign.
use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use micromath::F32Ext;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// History rows are 10 px tall.
const ROW_HEIGHT: i32 = 10;

/// Needle centre and half-length.
const NEEDLE_CENTER: Point = Point::new(88, 16);
const NEEDLE_LEN: f32 = 13.0;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

fn draw_text<I2C>(display: &mut Display<I2C>, text: &str, at: Point, font: &'static MonoFont<'static>)
where
    I2C: embedded_hal::i2c::I2c,
{
    let _ = Text::with_baseline(text, at, text_style(font), Baseline::Top).draw(display);
}

/// Render the main screen.
pub fn draw_main<I2C, const K: usize>(
    display: &mut Display<I2C>,
    state: &DisplayState<K>,
) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    draw_text(display, state.bar.as_str(), Point::new(0, 0), &FONT_10X20);
    let label_x = 10 * state.bar.len() as i32 + 4;
    draw_text(display, "bar", Point::new(label_x, 8), &FONT_6X10);

    draw_text(display, state.clock.as_str(), Point::new(0, 22), &FONT_6X10);

    if let Some(compass) = &state.compass {
        draw_compass(display, compass);
    }

    for (row, slot) in state.slots.iter().enumerate() {
        if let Some(line) = slot {
            let y = 33 + row as i32 * ROW_HEIGHT;
            draw_text(display, line.as_str(), Point::new(0, y), &FONT_6X10);
        }
    }

    display.flush().map_err(|_| Error::Display)
}

fn draw_compass<I2C>(display: &mut Display<I2C>, compass: &CompassView)
where
    I2C: embedded_hal::i2c::I2c,
{
    draw_text(display, compass.heading.as_str(), Point::new(104, 4), &FONT_6X10);
    if !compass.calibration.is_empty() {
        // "calibrating" is too wide for the corner; the first three letters do.
        let short = compass.calibration.get(..3).unwrap_or(compass.calibration);
        draw_text(display, short, Point::new(108, 16), &FONT_6X10);
    }

    if let Some(angle) = compass.needle_radians {
        draw_needle(display, angle);
    }
    let _ = Circle::with_center(NEEDLE_CENTER, 5)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display);
}

/// Filled north half, outlined south half, rotated counter-clockwise.
fn draw_needle<I2C>(display: &mut Display<I2C>, angle: f32)
where
    I2C: embedded_hal::i2c::I2c,
{
    let (sin, cos) = (angle.sin(), angle.cos());
    // Screen y grows downwards, so "north" is -y.
    let rotate = |x: f32, y: f32| {
        NEEDLE_CENTER
            + Point::new(
                (x * cos + y * sin).round() as i32,
                (-x * sin + y * cos).round() as i32,
            )
    };

    let north = Triangle::new(rotate(-3.0, 0.0), rotate(3.0, 0.0), rotate(0.0, -NEEDLE_LEN));
    let south = Triangle::new(rotate(3.0, 0.0), rotate(0.0, NEEDLE_LEN), rotate(-3.0, 0.0));
    let _ = north
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display);
    let _ = south
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
}

/// Render one page of the history list.
pub fn draw_history<I2C>(
    display: &mut Display<I2C>,
    lines: impl Iterator<Item = ReadingText>,
) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    let mut empty = true;
    for (row, line) in lines.enumerate() {
        empty = false;
        let y = row as i32 * ROW_HEIGHT + 2;
        draw_text(display, line.as_str(), Point::new(0, y), &FONT_6X10);
    }
    if empty {
        draw_text(display, "No readings", Point::new(0, 2), &FONT_6X10);
    }

    display.flush().map_err(|_| Error::Display)
}
