/// Keyboard state tracker for the four game buttons.
///
/// Tracks which keys are currently held down so the game can ask
/// "is button X pressed right now", including while a key is held
/// through a sustained tone.
///
/// Uses Release events when the terminal reports them (keyboard
/// enhancement). Falls back to timeout-based release detection on
/// terminals that don't.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::ButtonBindings;
use crate::domain::button::Button;

/// After this duration without a repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Grace period after the first Press of a hold. Covers the OS delay
/// before auto-repeat starts, so one long hold never reads as two presses.
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(600);

/// One physical hold of a key.
#[derive(Clone, Copy, Debug)]
struct Hold {
    last: Instant,
    repeating: bool,
}

impl Hold {
    fn alive_at(&self, now: Instant) -> bool {
        let timeout = if self.repeating { HOLD_TIMEOUT } else { FIRST_REPEAT_TIMEOUT };
        now.saturating_duration_since(self.last) < timeout
    }
}

pub struct KeyboardState {
    /// Current hold of each key seen since the last release.
    holds: HashMap<KeyCode, Hold>,

    /// Keys bound to each button, in button order.
    bindings: [Vec<KeyCode>; 4],

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,

    quit: bool,
}

impl KeyboardState {
    pub fn new(bindings: &ButtonBindings) -> Self {
        let lists = bindings.lists();
        KeyboardState {
            holds: HashMap::with_capacity(16),
            bindings: std::array::from_fn(|i| {
                lists[i].iter().filter_map(|s| key_from_name(s)).collect()
            }),
            honor_release: false,
            quit: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) -> io::Result<()> {
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.apply(key, Instant::now());
            }
        }
        Ok(())
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        let is_ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
        if is_ctrl_c || key.code == KeyCode::Esc {
            self.quit = true;
            return;
        }

        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.holds.remove(&code);
            }
            KeyEventKind::Release => {
                // Not trusted without enhancement; timeout handles it
            }
            _ => {
                // Without enhancement, auto-repeat arrives as more Press events
                let repeating = self
                    .holds
                    .get(&code)
                    .map_or(false, |h| h.alive_at(now));
                self.holds.insert(code, Hold { last: now, repeating });
            }
        }
    }

    /// Is any key bound to `button` held?
    pub fn is_held(&self, button: Button) -> bool {
        self.is_held_at(button, Instant::now())
    }

    fn is_held_at(&self, button: Button, now: Instant) -> bool {
        self.bindings[button.index()].iter().any(|code| {
            self.holds
                .get(code)
                .map_or(false, |h| self.honor_release || h.alive_at(now))
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Forget every held key.
    pub fn release_all(&mut self) {
        self.holds.clear();
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Parse a config key name: a single character, or a named key
/// ("space", "enter", "left", "f1", ...).
pub fn key_from_name(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c.to_ascii_lowercase()));
    }
    let lower = s.to_lowercase();
    match lower.as_str() {
        "space" => Some(KeyCode::Char(' ')),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        _ => lower
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}
