/// Hardware seams the game core talks to.
///
/// The handheld exposes a drawing surface, a tone pin, four buttons and
/// delay primitives. The core only sees these traits; `ui::host` backs
/// them with the terminal, rodio and gilrs, and tests back them with a
/// scripted fake.

use crate::domain::button::{Button, Tone};
use crate::domain::color::NativeColor;
use crate::error::Result;

/// 240x240 pixel canvas. Drawing is buffered until `update()`.
pub trait DrawSurface {
    fn set_pen(&mut self, color: NativeColor);
    /// Fill the whole canvas with the current pen and drop any text.
    fn clear(&mut self);
    fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32);
    /// Filled circle.
    fn circle(&mut self, x: i32, y: i32, r: i32);
    fn text(&mut self, s: &str, x: i32, y: i32, max_width: i32, scale: u8);
    /// Push the buffered frame to the display.
    fn update(&mut self) -> Result<()>;
}

pub trait ToneDevice {
    /// `None` silences the output.
    fn set_tone(&mut self, tone: Option<Tone>);
}

pub trait InputSource {
    /// Instantaneous state, read fresh on every call.
    fn is_pressed(&mut self, button: Button) -> Result<bool>;
}

/// Delays and housekeeping.
pub trait Environment {
    fn sleep_ms(&mut self, ms: u64);

    fn sleep_secs(&mut self, secs: u64) {
        self.sleep_ms(secs * 1000);
    }

    /// One short fixed wait between input samples.
    fn poll_tick(&mut self);

    /// Drop transient state left over from the previous session.
    fn reclaim(&mut self) {}
}

/// Everything the game needs from one device.
pub trait Hardware: DrawSurface + ToneDevice + InputSource + Environment {}

impl<T: DrawSurface + ToneDevice + InputSource + Environment> Hardware for T {}
