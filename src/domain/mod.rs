/// Fixed game facts: buttons, tones, difficulty presets, the random
/// sequence, and the color codec. No I/O lives here.

pub mod button;
pub mod color;
pub mod difficulty;
pub mod sequence;
