//! End-of-game sequencing
//!
//! Playing -> Ending -> Ended, and back to Playing on reset. The sequencer
//! never touches audio or the page itself; it emits [`Cue`]s for the
//! platform layer to act on.

use crate::consts::GAME_OVER_DELAY_MS;

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn from_won(has_won: bool) -> Self {
        if has_won { Outcome::Won } else { Outcome::Lost }
    }

    /// Overlay text
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Won => "You Won!",
            Outcome::Lost => "You Lost!",
        }
    }
}

/// Current phase of the end-of-game sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequencePhase {
    Playing,
    /// Game just ended; overlay pending
    Ending { outcome: Outcome, elapsed_ms: f64 },
    /// Overlay shown
    Ended { outcome: Outcome },
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    StopGameMusic,
    PlayGameMusic,
    PlayGameOverMusic,
    StopGameOverMusic,
    /// Every meow at once
    MeowBurst,
    StartShake,
    ShowOverlay(Outcome),
    HideOverlay,
}

#[derive(Debug, Clone)]
pub struct GameOverSequencer {
    phase: SequencePhase,
}

impl Default for GameOverSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameOverSequencer {
    pub fn new() -> Self {
        Self {
            phase: SequencePhase::Playing,
        }
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SequencePhase::Playing
    }

    /// React to a snapshot replacement. Fires only on an active -> inactive flip.
    pub fn observe(&mut self, was_active: bool, now_active: bool, has_won: bool) -> Vec<Cue> {
        if !(was_active && !now_active) || !self.is_playing() {
            return Vec::new();
        }

        let outcome = Outcome::from_won(has_won);
        log::info!("Game over: {:?}", outcome);
        self.phase = SequencePhase::Ending {
            outcome,
            elapsed_ms: 0.0,
        };

        let mut cues = vec![Cue::StopGameMusic];
        if outcome == Outcome::Lost {
            cues.push(Cue::MeowBurst);
            cues.push(Cue::PlayGameOverMusic);
        }
        cues.push(Cue::StartShake);
        cues
    }

    /// Advance the pending overlay timer by loop time
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Cue> {
        let SequencePhase::Ending {
            outcome,
            elapsed_ms,
        } = self.phase
        else {
            return Vec::new();
        };

        let elapsed_ms = elapsed_ms + dt_ms;
        if elapsed_ms >= GAME_OVER_DELAY_MS {
            self.phase = SequencePhase::Ended { outcome };
            vec![Cue::ShowOverlay(outcome)]
        } else {
            self.phase = SequencePhase::Ending {
                outcome,
                elapsed_ms,
            };
            Vec::new()
        }
    }

    /// Explicit reset from any phase
    pub fn reset(&mut self) -> Vec<Cue> {
        if let SequencePhase::Ending { .. } = self.phase {
            log::info!("Reset before overlay; dropping pending overlay");
        }
        self.phase = SequencePhase::Playing;
        vec![Cue::HideOverlay, Cue::StopGameOverMusic, Cue::PlayGameMusic]
    }
}
