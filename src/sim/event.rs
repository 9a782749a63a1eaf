/// Events emitted while a session plays out.
/// Logged as they happen and collected into the session report.

use crate::domain::button::Button;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: u32, playback_ms: u64 },
    SimonStep { button: Button },
    PlayerMatched { button: Button, pos: usize },
    Mismatch { expected: Button, got: Button, tries_remaining: u32 },
    LevelComplete { level: u32 },
    GameOver,
    GameWon,
}
