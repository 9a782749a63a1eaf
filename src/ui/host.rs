/// Desktop stand-in for the handheld.
///
/// Backs the hardware traits with the terminal (display), keyboard and
/// gamepad (buttons), rodio (tone pin) and the thread clock (delays).

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::button::{Button, Tone};
use crate::domain::color::NativeColor;
use crate::error::{Error, Result};
use crate::ui::device::{DrawSurface, Environment, InputSource, ToneDevice};
use crate::ui::gamepad::GamepadState;
use crate::ui::input::KeyboardState;
use crate::ui::sound::ToneEngine;
use crate::ui::terminal::TerminalSurface;

pub struct HostDevice {
    surface: TerminalSurface,
    keyboard: KeyboardState,
    gamepad: GamepadState,
    tone: Option<ToneEngine>,
    poll_interval: Duration,
}

impl HostDevice {
    pub fn new(config: &GameConfig) -> Self {
        let tone = ToneEngine::new(config.audio.volume);
        if tone.is_none() {
            info!("no audio output, playing silently");
        }
        HostDevice {
            surface: TerminalSurface::new(),
            keyboard: KeyboardState::new(&config.keys),
            gamepad: GamepadState::new(&config.gamepad),
            tone,
            poll_interval: Duration::from_millis(config.timing.poll_interval_ms),
        }
    }

    pub fn init(&mut self) -> Result<()> {
        let enhanced = self.surface.init()?;
        self.keyboard.honor_release = enhanced;
        info!(
            key_release_events = enhanced,
            gamepad = self.gamepad.connected,
            "host device ready"
        );
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        self.set_tone(None);
        Ok(self.surface.cleanup()?)
    }
}

impl DrawSurface for HostDevice {
    fn set_pen(&mut self, color: NativeColor) {
        self.surface.set_pen(color);
    }

    fn clear(&mut self) {
        self.surface.clear();
    }

    fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.surface.rectangle(x, y, w, h);
    }

    fn circle(&mut self, x: i32, y: i32, r: i32) {
        self.surface.circle(x, y, r);
    }

    fn text(&mut self, s: &str, x: i32, y: i32, max_width: i32, scale: u8) {
        self.surface.text(s, x, y, max_width, scale);
    }

    fn update(&mut self) -> Result<()> {
        self.surface.update()
    }
}

impl ToneDevice for HostDevice {
    fn set_tone(&mut self, tone: Option<Tone>) {
        if let Some(engine) = self.tone.as_mut() {
            match tone {
                Some(hz) => engine.start(hz),
                None => engine.stop(),
            }
        }
    }
}

impl InputSource for HostDevice {
    fn is_pressed(&mut self, button: Button) -> Result<bool> {
        self.keyboard.drain_events()?;
        self.gamepad.update();
        if self.keyboard.quit_requested() {
            return Err(Error::Interrupted);
        }
        Ok(self.keyboard.is_held(button) || self.gamepad.is_held(button))
    }
}

impl Environment for HostDevice {
    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    fn poll_tick(&mut self) {
        thread::sleep(self.poll_interval);
    }

    fn reclaim(&mut self) {
        self.keyboard.release_all();
        self.gamepad.release_all();
        // Keys typed during the outcome screens must not pick a difficulty
        if let Err(e) = self.keyboard.drain_events() {
            debug!(error = %e, "drain after session failed");
        }
        self.keyboard.release_all();
    }
}
