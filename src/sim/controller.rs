/// Session controller: the outer loop of the game.
///
/// title screen → difficulty press → new random sequence → board + short
/// pause → turn machine until won or lost → back to the title screen.

use rand::Rng;
use tracing::info;

use crate::domain::button::Button;
use crate::domain::difficulty::Difficulty;
use crate::domain::sequence::Sequence;
use crate::error::Result;
use crate::sim::session::SessionState;
use crate::sim::turn::{SessionReport, TurnConfig, TurnMachine};
use crate::ui::board::BoardRenderer;
use crate::ui::device::Hardware;

pub struct SessionController<H: Hardware, R: Rng> {
    hw: H,
    rng: R,
    board: BoardRenderer,
    turn: TurnConfig,
    /// Pause between the first board and Simon's first note.
    reaction_delay_secs: u64,
    sessions: u64,
}

impl<H: Hardware, R: Rng> SessionController<H, R> {
    pub fn new(hw: H, rng: R, board: BoardRenderer, turn: TurnConfig, reaction_delay_secs: u64) -> Self {
        SessionController {
            hw,
            rng,
            board,
            turn,
            reaction_delay_secs,
            sessions: 0,
        }
    }

    /// Play sessions back to back. Only a device error or an interrupt
    /// gets out of here.
    pub fn run_forever(&mut self) -> Result<()> {
        loop {
            self.run_session()?;
        }
    }

    /// One session: title screen through terminal outcome.
    pub fn run_session(&mut self) -> Result<SessionReport> {
        self.hw.reclaim();
        self.board.render_title(&mut self.hw)?;

        let difficulty = self.select_difficulty()?;
        let sequence = Sequence::generate(difficulty.target_length(), &mut self.rng);
        self.sessions += 1;
        info!(
            session = self.sessions,
            difficulty = difficulty.label(),
            length = sequence.len(),
            "session started"
        );

        let mut state = SessionState::new(sequence, &self.turn.tempo);
        self.board.render(&mut self.hw, state.level, None, false)?;
        self.hw.sleep_secs(self.reaction_delay_secs);

        let report = TurnMachine::new(&mut self.hw, &self.board, &self.turn).run(&mut state)?;
        info!(
            session = self.sessions,
            outcome = ?report.outcome,
            mismatches = report.mismatches(),
            "session over"
        );
        Ok(report)
    }

    /// Block until a button is held. Scans in button order each tick, so
    /// the lowest index wins when several are held.
    pub fn select_difficulty(&mut self) -> Result<Difficulty> {
        loop {
            for button in Button::ALL {
                if self.hw.is_pressed(button)? {
                    return Ok(Difficulty::for_button(button));
                }
            }
            self.hw.poll_tick();
        }
    }

    pub fn sessions_played(&self) -> u64 {
        self.sessions
    }

    #[cfg(test)]
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn into_hardware(self) -> H {
        self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::Palette;
    use crate::error::Error;
    use crate::sim::fake::{FakeDevice, Op};
    use crate::sim::session::Tempo;
    use crate::sim::turn::{Outcome, WinTone};
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SEED: u64 = 2021;

    fn controller(hw: FakeDevice) -> SessionController<FakeDevice, StdRng> {
        let turn = TurnConfig { tempo: Tempo::default(), level_pause_ms: 500, win_tone: WinTone::LastPlayer };
        SessionController::new(hw, StdRng::seed_from_u64(SEED), BoardRenderer::new(Palette::default()), turn, 1)
    }

    /// The sequence the controller will draw for its first session.
    fn first_sequence(len: u32) -> Sequence {
        Sequence::generate(len, &mut StdRng::seed_from_u64(SEED))
    }

    fn perfect_presses(sequence: &Sequence) -> Vec<Button> {
        (1..=sequence.len())
            .flat_map(|level| sequence.steps()[..level].to_vec())
            .collect()
    }

    #[test]
    fn lowest_button_wins_difficulty_tie() {
        let mut hw = FakeDevice::new();
        hw.hold(&[Button::B, Button::Y]);
        let mut c = controller(hw);
        assert_eq!(c.select_difficulty().unwrap(), Difficulty::Medium);
    }

    #[test]
    fn difficulty_poll_ticks_until_pressed() {
        // title render arms the first chord, so the first scan sees it
        let mut c = controller(FakeDevice::with_presses([Button::Y]));
        c.board.render_title(&mut c.hw).unwrap();
        assert_eq!(c.select_difficulty().unwrap(), Difficulty::Nightmare);
        assert_eq!(c.hardware().count(&Op::Tick), 0);
    }

    #[test]
    fn hard_session_perfect_play_then_back_to_title() {
        let sequence = first_sequence(5);
        let mut presses = vec![Button::X];
        presses.extend(perfect_presses(&sequence));
        let mut c = controller(FakeDevice::with_presses(presses));

        let report = c.run_session().unwrap();
        assert_eq!(report.outcome, Outcome::Won);
        assert_eq!(report.final_level, 5);
        assert_eq!(c.hardware().texts().iter().filter(|t| *t == "You Win!").count(), 16);

        // next session starts at the title and waits for a difficulty
        let err = c.run_forever().unwrap_err();
        assert_matches!(err, Error::Interrupted);
        let hw = c.into_hardware();
        assert_eq!(hw.texts().iter().filter(|t| *t == "DO SAME").count(), 2);
        assert_eq!(hw.count(&Op::Reclaim), 2);
    }

    #[test]
    fn reaction_pause_precedes_first_note() {
        let sequence = first_sequence(10);
        let first = sequence.steps()[0];
        let mut c = controller(FakeDevice::with_presses([Button::A, first]));
        let _ = c.run_session();
        let hw = c.into_hardware();
        let pause = hw.ops.iter().position(|op| *op == Op::Sleep(1000)).unwrap();
        let note = hw.ops.iter().position(|op| *op == Op::Tone(Some(first.tone()))).unwrap();
        assert!(pause < note);
    }

    #[test]
    fn loss_restarts_session() {
        let sequence = first_sequence(10);
        let wrong = Button::ALL
            .into_iter()
            .find(|&b| b != sequence.steps()[0])
            .unwrap();
        let mut c = controller(FakeDevice::with_presses([Button::A, wrong, wrong, wrong]));

        let err = c.run_forever().unwrap_err();
        assert_matches!(err, Error::Interrupted);
        assert_eq!(c.sessions_played(), 1);
        let hw = c.into_hardware();
        assert!(hw.texts().contains(&"You Lose!".to_string()));
        assert!(!hw.texts().contains(&"You Win!".to_string()));
        assert_eq!(hw.texts().iter().filter(|t| *t == "DO SAME").count(), 2);
    }
}
