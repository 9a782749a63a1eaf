/// Blocking tone playback on top of a `ToneDevice`.

use crate::domain::button::Tone;
use crate::ui::device::{Environment, ToneDevice};

#[cfg(test)]
pub const DEFAULT_DURATION_MS: u64 = 500;

/// Sound `tone` for `ms`, then silence. `None` plays nothing but still
/// waits, so callers keep the same pacing with or without a tone.
pub fn play<H: ToneDevice + Environment + ?Sized>(hw: &mut H, tone: Option<Tone>, ms: u64) {
    hw.set_tone(tone);
    hw.sleep_ms(ms);
    hw.set_tone(None);
}
