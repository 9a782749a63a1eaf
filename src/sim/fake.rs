/// Scripted stand-in for the handheld, used by unit tests.
///
/// Records every draw call, tone change and delay, and replays a queue
/// of button chords:
///   - a chord becomes visible at the first input read after a `clear()`
///     (i.e. on the next rendered frame)
///   - it stays held until the next delay or poll tick
///   - reading input when a new chord is due but the script is empty
///     returns `Error::Interrupted`, which ends any game loop

use std::collections::VecDeque;

use crate::domain::button::{Button, Tone};
use crate::domain::color::NativeColor;
use crate::error::{Error, Result};
use crate::ui::device::{DrawSurface, Environment, InputSource, ToneDevice};

pub const POLL_TICK_MS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Pen(NativeColor),
    Clear,
    Rect(i32, i32, i32, i32),
    Circle(i32, i32, i32),
    Text(String, i32, i32),
    Update,
    Tone(Option<Tone>),
    Sleep(u64),
    Tick,
    Reclaim,
}

#[derive(Default)]
pub struct FakeDevice {
    pub ops: Vec<Op>,
    pub elapsed_ms: u64,
    script: VecDeque<[bool; 4]>,
    held: Option<[bool; 4]>,
    armed: bool,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue single-button presses, one per frame.
    pub fn with_presses(presses: impl IntoIterator<Item = Button>) -> Self {
        let mut hw = Self::new();
        for b in presses {
            hw.push_chord(&[b]);
        }
        hw
    }

    pub fn push_chord(&mut self, buttons: &[Button]) {
        let mut chord = [false; 4];
        for b in buttons {
            chord[b.index()] = true;
        }
        self.script.push_back(chord);
    }

    /// Hold a chord right now, bypassing the script.
    pub fn hold(&mut self, buttons: &[Button]) {
        let mut chord = [false; 4];
        for b in buttons {
            chord[b.index()] = true;
        }
        self.held = Some(chord);
    }

    pub fn remaining_presses(&self) -> usize {
        self.script.len()
    }

    /// Frequencies started, in order (silence omitted).
    pub fn tones_played(&self) -> Vec<Tone> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Tone(Some(t)) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(s, _, _) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, want: &Op) -> usize {
        self.ops.iter().filter(|op| *op == want).count()
    }

    fn release(&mut self) {
        self.held = None;
    }
}

impl DrawSurface for FakeDevice {
    fn set_pen(&mut self, color: NativeColor) {
        self.ops.push(Op::Pen(color));
    }

    fn clear(&mut self) {
        self.armed = true;
        self.ops.push(Op::Clear);
    }

    fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.ops.push(Op::Rect(x, y, w, h));
    }

    fn circle(&mut self, x: i32, y: i32, r: i32) {
        self.ops.push(Op::Circle(x, y, r));
    }

    fn text(&mut self, s: &str, x: i32, y: i32, _max_width: i32, _scale: u8) {
        self.ops.push(Op::Text(s.to_string(), x, y));
    }

    fn update(&mut self) -> Result<()> {
        self.ops.push(Op::Update);
        Ok(())
    }
}

impl ToneDevice for FakeDevice {
    fn set_tone(&mut self, tone: Option<Tone>) {
        self.ops.push(Op::Tone(tone));
    }
}

impl InputSource for FakeDevice {
    fn is_pressed(&mut self, button: Button) -> Result<bool> {
        if self.held.is_none() && self.armed {
            self.held = Some(self.script.pop_front().ok_or(Error::Interrupted)?);
            self.armed = false;
        }
        Ok(self.held.map_or(false, |chord| chord[button.index()]))
    }
}

impl Environment for FakeDevice {
    fn sleep_ms(&mut self, ms: u64) {
        self.elapsed_ms += ms;
        self.ops.push(Op::Sleep(ms));
        self.release();
    }

    fn poll_tick(&mut self) {
        self.elapsed_ms += POLL_TICK_MS;
        self.ops.push(Op::Tick);
        self.release();
    }

    fn reclaim(&mut self) {
        self.ops.push(Op::Reclaim);
    }
}
