/// Turn state machine: Simon plays a prefix of the sequence, the player
/// repeats it, and the level grows until the whole sequence is matched or
/// the tries run out.
///
/// Flow per level:
///   1. recompute note length, reset the player's position
///   2. Simon turn: light + sound each step of the prefix
///   3. Player turn: poll the board until a button lights
///        match    → hold the tone while held, advance; full prefix → next level
///        mismatch → buzzer, lose a try; third miss → loss sentinel
///      either way a mismatch hands the turn back to Simon, who replays
///      the whole prefix from the start
///   4. after the loop: exactly `target + 1` means won → win animation
///
/// Everything blocks: a render finishes before its tone starts, a tone
/// finishes before the next render.

use tracing::{debug, info};

use crate::domain::button::{Button, Tone, LOSE_TONE, WRONG_TONE};
use crate::error::Result;
use crate::sim::event::GameEvent;
use crate::sim::session::{Phase, SessionState, Tempo, Turn};
use crate::ui::board::{Banner, BoardRenderer, Pressed};
use crate::ui::device::Hardware;
use crate::ui::tone;

const BUZZER_MS: u64 = 1000;
const WIN_STEP_MS: u64 = 100;
const WIN_ROUNDS: usize = 4;

/// Which tone accompanies the win animation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum WinTone {
    /// The tone of the last button the player pressed, for every flash.
    #[default]
    LastPlayer,
    /// The tone of whichever cell is flashing.
    PerCell,
}

impl WinTone {
    pub fn from_name(s: &str) -> Option<WinTone> {
        match s.to_lowercase().as_str() {
            "last-player" | "last_player" | "last" => Some(WinTone::LastPlayer),
            "per-cell" | "per_cell" | "cell" => Some(WinTone::PerCell),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TurnConfig {
    pub tempo: Tempo,
    pub level_pause_ms: u64,
    pub win_tone: WinTone,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Clone, Debug)]
pub struct SessionReport {
    pub outcome: Outcome,
    /// Level as displayed at the end (already adjusted after a win).
    pub final_level: u32,
    pub tries_remaining: u32,
    pub events: Vec<GameEvent>,
}

impl SessionReport {
    pub fn mismatches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::Mismatch { .. }))
            .count()
    }
}

pub struct TurnMachine<'a, H: Hardware + ?Sized> {
    hw: &'a mut H,
    board: &'a BoardRenderer,
    config: &'a TurnConfig,
    events: Vec<GameEvent>,
    last_player_tone: Option<Tone>,
}

impl<'a, H: Hardware + ?Sized> TurnMachine<'a, H> {
    pub fn new(hw: &'a mut H, board: &'a BoardRenderer, config: &'a TurnConfig) -> Self {
        TurnMachine {
            hw,
            board,
            config,
            events: Vec::new(),
            last_player_tone: None,
        }
    }

    /// Play the session to a terminal outcome.
    pub fn run(mut self, state: &mut SessionState) -> Result<SessionReport> {
        while state.in_progress() {
            state.playback_ms = self.config.tempo.playback_ms(state.level, state.target_length);
            let mut pos = 0usize;
            self.emit(GameEvent::LevelStarted { level: state.level, playback_ms: state.playback_ms });

            if state.turn == Turn::Simon {
                self.simon_playback(state)?;
            }

            while state.turn == Turn::Player {
                state.phase = Phase::PlayerInput;
                let pressed = match self.board.render(self.hw, state.level, None, true)? {
                    Some(p) => p,
                    None => {
                        self.hw.poll_tick();
                        continue;
                    }
                };
                self.last_player_tone = Some(pressed.tone);

                let expected = state.sequence.steps()[pos];
                if pressed.button == expected {
                    self.sustain(pressed)?;
                    self.board.render(self.hw, state.level, None, false)?;
                    self.emit(GameEvent::PlayerMatched { button: pressed.button, pos });
                    pos += 1;
                    if pos == state.level as usize {
                        self.emit(GameEvent::LevelComplete { level: state.level });
                        state.phase = Phase::LevelComplete;
                        state.level += 1;
                        state.turn = Turn::Simon;
                        self.hw.sleep_ms(self.config.level_pause_ms);
                    }
                } else {
                    self.mismatch(state, expected, pressed.button)?;
                }
            }
            debug_assert!(state.level <= state.loss_sentinel());
        }

        let outcome = if state.cleared_all() {
            state.level -= 1;
            state.phase = Phase::GameWon;
            self.emit(GameEvent::GameWon);
            self.win_animation(state)?;
            Outcome::Won
        } else {
            Outcome::Lost
        };
        info!(?outcome, level = state.level, tries_used = state.tries_used(), "session finished");

        Ok(SessionReport {
            outcome,
            final_level: state.level,
            tries_remaining: state.tries_remaining,
            events: self.events,
        })
    }

    fn simon_playback(&mut self, state: &mut SessionState) -> Result<()> {
        state.phase = Phase::SimonPlayback;
        for &button in state.sequence.prefix(state.level) {
            let lit = self.board.render(self.hw, state.level, Some(button), false)?;
            self.emit(GameEvent::SimonStep { button });
            tone::play(self.hw, lit.map(|p| p.tone), state.playback_ms);
        }
        state.turn = Turn::Player;
        Ok(())
    }

    /// Keep the button's tone going for as long as it is held.
    fn sustain(&mut self, pressed: Pressed) -> Result<()> {
        self.hw.set_tone(Some(pressed.tone));
        while self.hw.is_pressed(pressed.button)? {
            self.hw.poll_tick();
        }
        self.hw.set_tone(None);
        Ok(())
    }

    fn mismatch(&mut self, state: &mut SessionState, expected: Button, got: Button) -> Result<()> {
        state.phase = Phase::Mismatch;
        tone::play(self.hw, Some(WRONG_TONE), BUZZER_MS);
        state.tries_remaining = state.tries_remaining.saturating_sub(1);
        self.emit(GameEvent::Mismatch { expected, got, tries_remaining: state.tries_remaining });
        info!(level = state.level, tries = state.tries_remaining, "wrong button");

        if state.tries_remaining == 0 {
            self.board.banner(self.hw, Banner::Lose)?;
            tone::play(self.hw, Some(LOSE_TONE), BUZZER_MS);
            state.level = state.loss_sentinel();
            state.phase = Phase::GameOver;
            self.emit(GameEvent::GameOver);
        }
        state.turn = Turn::Simon;
        Ok(())
    }

    fn win_animation(&mut self, state: &SessionState) -> Result<()> {
        for button in Button::ALL.iter().copied().cycle().take(WIN_ROUNDS * Button::ALL.len()) {
            self.board.render(self.hw, state.level, Some(button), false)?;
            self.board.banner(self.hw, Banner::Win)?;
            let tone = match self.config.win_tone {
                WinTone::LastPlayer => self.last_player_tone,
                WinTone::PerCell => Some(button.tone()),
            };
            tone::play(self.hw, tone, WIN_STEP_MS);
        }
        Ok(())
    }

    fn emit(&mut self, event: GameEvent) {
        debug!(?event);
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::Palette;
    use crate::domain::sequence::Sequence;
    use crate::error::Error;
    use crate::sim::fake::{FakeDevice, Op};
    use assert_matches::assert_matches;

    fn config() -> TurnConfig {
        TurnConfig { tempo: Tempo::default(), level_pause_ms: 500, win_tone: WinTone::LastPlayer }
    }

    fn seq(indices: &[usize]) -> Sequence {
        Sequence::from_indices(indices).unwrap()
    }

    /// Every prefix of the sequence, in order: what a flawless player presses.
    fn perfect_presses(sequence: &Sequence) -> Vec<Button> {
        (1..=sequence.len())
            .flat_map(|level| sequence.steps()[..level].to_vec())
            .collect()
    }

    fn run(hw: &mut FakeDevice, state: &mut SessionState, cfg: &TurnConfig) -> Result<SessionReport> {
        let board = BoardRenderer::new(Palette::default());
        TurnMachine::new(hw, &board, cfg).run(state)
    }

    // ── winning ──

    #[test]
    fn perfect_play_wins_hard_preset() {
        let sequence = seq(&[2, 0, 3, 1, 0]);
        let mut hw = FakeDevice::with_presses(perfect_presses(&sequence));
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);

        let report = run(&mut hw, &mut state, &cfg).unwrap();

        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.final_level, 5);
        assert_eq!(state.level, 5);
        assert_eq!(state.phase, Phase::GameWon);
        assert_eq!(report.mismatches(), 0);
        assert_eq!(hw.remaining_presses(), 0);
        assert!(report.events.contains(&GameEvent::GameWon));
        assert!(!report.events.contains(&GameEvent::GameOver));
        assert_eq!(hw.texts().iter().filter(|t| *t == "You Win!").count(), 16);
    }

    #[test]
    fn simon_replays_growing_prefix() {
        let sequence = seq(&[2, 0, 3, 1, 0]);
        let mut hw = FakeDevice::with_presses(perfect_presses(&sequence));
        let cfg = config();
        let mut state = SessionState::new(sequence.clone(), &cfg.tempo);
        let report = run(&mut hw, &mut state, &cfg).unwrap();

        let simon: Vec<Button> = report
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::SimonStep { button } => Some(*button),
                _ => None,
            })
            .collect();
        assert_eq!(simon, perfect_presses(&sequence));
    }

    #[test]
    fn note_length_shrinks_per_level() {
        let sequence = seq(&[2, 0, 3, 1, 0]);
        let mut hw = FakeDevice::with_presses(perfect_presses(&sequence));
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        let report = run(&mut hw, &mut state, &cfg).unwrap();

        let lengths: Vec<u64> = report
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LevelStarted { playback_ms, .. } => Some(*playback_ms),
                _ => None,
            })
            .collect();
        assert_eq!(lengths, vec![520, 515, 510, 505, 500]);
        assert!(hw.ops.contains(&Op::Sleep(500)));
    }

    #[test]
    fn win_animation_reuses_last_player_tone() {
        // last element is button A, so every flash sounds A's tone
        let sequence = seq(&[3, 0]);
        let mut hw = FakeDevice::with_presses(perfect_presses(&sequence));
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        run(&mut hw, &mut state, &cfg).unwrap();

        let tones = hw.tones_played();
        let tail = &tones[tones.len() - 16..];
        assert!(tail.iter().all(|&t| t == Button::A.tone()));
    }

    #[test]
    fn win_animation_per_cell_tone() {
        let sequence = seq(&[3, 0]);
        let mut hw = FakeDevice::with_presses(perfect_presses(&sequence));
        let cfg = TurnConfig { win_tone: WinTone::PerCell, ..config() };
        let mut state = SessionState::new(sequence, &cfg.tempo);
        run(&mut hw, &mut state, &cfg).unwrap();

        let tones = hw.tones_played();
        let tail = &tones[tones.len() - 16..];
        let expected: Vec<Tone> = (0..16).map(|i| Button::ALL[i % 4].tone()).collect();
        assert_eq!(tail, expected.as_slice());
    }

    #[test]
    fn held_button_sustains_tone_until_release() {
        let sequence = seq(&[1]);
        let mut hw = FakeDevice::with_presses([Button::B]);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        run(&mut hw, &mut state, &cfg).unwrap();

        let start = hw.ops.iter().position(|op| *op == Op::Tone(Some(2249))).unwrap();
        // Simon's own note is tone+sleep; the sustained one is tone+tick
        let sustained = hw.ops[start..]
            .windows(2)
            .any(|w| w[0] == Op::Tone(Some(2249)) && w[1] == Op::Tick);
        assert!(sustained);
    }

    // ── losing ──

    #[test]
    fn three_wrong_presses_lose() {
        // target 10, first expected button is A; always press Y
        let sequence = seq(&[0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
        let mut hw = FakeDevice::with_presses([Button::Y, Button::Y, Button::Y]);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);

        let report = run(&mut hw, &mut state, &cfg).unwrap();

        assert_eq!(report.outcome, Outcome::Lost);
        assert_eq!(report.mismatches(), 3);
        assert_eq!(state.level, 12);
        assert_eq!(report.final_level, 12);
        assert_eq!(state.tries_remaining, 0);
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.turn, Turn::Simon);
        assert!(hw.texts().contains(&"You Lose!".to_string()));
        assert!(!hw.texts().contains(&"You Win!".to_string()));
        assert!(!report.events.contains(&GameEvent::GameWon));
        assert_eq!(hw.tones_played().last(), Some(&LOSE_TONE));
    }

    #[test]
    fn mismatch_replays_whole_prefix() {
        // clear level 1, then at level 2 get the second step wrong once
        let sequence = seq(&[2, 1, 0]);
        let presses = [
            Button::X,              // level 1
            Button::X, Button::Y,   // level 2, second wrong
            Button::X, Button::B,   // level 2 again
            Button::X, Button::B, Button::A,
        ];
        let mut hw = FakeDevice::with_presses(presses);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        let report = run(&mut hw, &mut state, &cfg).unwrap();

        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.tries_remaining, 2);
        let simon: Vec<Button> = report
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::SimonStep { button } => Some(*button),
                _ => None,
            })
            .collect();
        assert_eq!(
            simon,
            vec![Button::X, Button::X, Button::B, Button::X, Button::B, Button::X, Button::B, Button::A]
        );
        assert_eq!(hw.count(&Op::Tone(Some(WRONG_TONE))), 1);
    }

    #[test]
    fn two_misses_then_success_still_wins() {
        let sequence = seq(&[0, 0]);
        let presses = [Button::B, Button::B, Button::A, Button::A, Button::A];
        let mut hw = FakeDevice::with_presses(presses);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        let report = run(&mut hw, &mut state, &cfg).unwrap();
        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.tries_remaining, 1);
    }

    #[test]
    fn level_never_exceeds_sentinel() {
        let sequence = seq(&[1, 2, 3, 0, 1]);
        let mut presses = vec![Button::B];
        presses.extend([Button::A; 3]);
        let mut hw = FakeDevice::with_presses(presses);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        let report = run(&mut hw, &mut state, &cfg).unwrap();
        assert_eq!(report.outcome, Outcome::Lost);
        assert!(state.level <= state.target_length + 2);
    }

    // ── device faults ──

    #[test]
    fn interrupt_propagates() {
        let sequence = seq(&[0, 1]);
        let mut hw = FakeDevice::with_presses([Button::A]);
        let cfg = config();
        let mut state = SessionState::new(sequence, &cfg.tempo);
        let err = run(&mut hw, &mut state, &cfg).unwrap_err();
        assert_matches!(err, Error::Interrupted);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn win_tone_names() {
        assert_eq!(WinTone::from_name("per-cell"), Some(WinTone::PerCell));
        assert_eq!(WinTone::from_name("Last-Player"), Some(WinTone::LastPlayer));
        assert_eq!(WinTone::from_name("random"), None);
    }
}
