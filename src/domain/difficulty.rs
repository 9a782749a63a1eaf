/// Difficulty presets bound to the four buttons on the title screen.
///
/// "Hard" is shorter than "Easy": the presets are keyed by button,
/// not sorted by length.

use super::button::Button;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Nightmare,
}

impl Difficulty {
    /// In button order: A, B, X, Y.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    pub fn for_button(button: Button) -> Difficulty {
        Difficulty::ALL[button.index()]
    }

    pub fn button(self) -> Button {
        Button::ALL[self as usize]
    }

    /// Total sequence length the player must reach.
    pub fn target_length(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 5,
            Difficulty::Nightmare => 50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }

    /// Title-screen line, e.g. `A = Easy        10`.
    pub fn menu_line(self) -> String {
        format!("{} = {:<12}{:>3}", self.button().name(), self.label(), self.target_length())
    }
}
