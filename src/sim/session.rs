/// SessionState: everything that changes while one game is played.
///
/// Created when a difficulty is picked, mutated only by the turn machine,
/// dropped when the session reaches a terminal outcome.
///
/// `level` runs from 1 to `target_length + 1` during play. A loss parks it
/// at `target_length + 2` so the outer loop stops without looking like a win.

use crate::domain::sequence::Sequence;

pub const STARTING_TRIES: u32 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Turn {
    Simon,
    Player,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    SimonPlayback,
    PlayerInput,
    LevelComplete,
    Mismatch,
    GameOver,
    GameWon,
}

/// Note length bounds for Simon's playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tempo {
    pub base_ms: u64,
    pub min_ms: u64,
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo { base_ms: 525, min_ms: 150 }
    }
}

impl Tempo {
    /// Notes get shorter as `level * target_length` grows, never below `min_ms`.
    pub fn playback_ms(&self, level: u32, target_length: u32) -> u64 {
        let shrink = level as u64 * target_length as u64;
        self.base_ms.saturating_sub(shrink).max(self.min_ms)
    }
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub sequence: Sequence,
    pub target_length: u32,
    pub level: u32,
    pub tries_remaining: u32,
    pub turn: Turn,
    pub phase: Phase,
    pub playback_ms: u64,
}

impl SessionState {
    pub fn new(sequence: Sequence, tempo: &Tempo) -> Self {
        let target_length = sequence.len() as u32;
        SessionState {
            sequence,
            target_length,
            level: 1,
            tries_remaining: STARTING_TRIES,
            turn: Turn::Simon,
            phase: Phase::SimonPlayback,
            playback_ms: tempo.playback_ms(1, target_length),
        }
    }

    pub fn tries_used(&self) -> u32 {
        STARTING_TRIES - self.tries_remaining
    }

    /// Level value that marks a lost session.
    pub fn loss_sentinel(&self) -> u32 {
        self.target_length + 2
    }

    pub fn in_progress(&self) -> bool {
        self.level <= self.target_length
    }

    /// True once the last level was cleared without running out of tries.
    pub fn cleared_all(&self) -> bool {
        self.level == self.target_length + 1
    }
}
