/// The four physical buttons and everything fixed about them:
/// the tone each one sounds and the screen quadrant it owns.
///
/// Index order (0..3) matters: it is the scan order for input
/// sampling and the tie-break order when several buttons are held.

/// A tone frequency in Hz.
pub type Tone = u32;

/// Buzzer sounded on a wrong press.
pub const WRONG_TONE: Tone = 200;

/// Lower buzzer sounded once the last try is gone.
pub const LOSE_TONE: Tone = WRONG_TONE - 100;

/// Side length of one board quadrant in pixels.
pub const QUADRANT: i32 = 120;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::A, Button::B, Button::X, Button::Y];

    #[cfg(test)]
    pub fn from_index(i: usize) -> Option<Button> {
        Button::ALL.get(i).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn tone(self) -> Tone {
        match self {
            Button::A => 2093,
            Button::B => 2249,
            Button::X => 2637,
            Button::Y => 2794,
        }
    }

    /// Top-left pixel of this button's quadrant.
    /// Index > 1 selects the right half, odd index the bottom half.
    pub fn origin(self) -> (i32, i32) {
        let i = self.index() as i32;
        ((i > 1) as i32 * QUADRANT, (i % 2) * QUADRANT)
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
        }
    }
}
