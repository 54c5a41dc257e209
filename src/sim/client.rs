//! Shared client context
//!
//! `GameClient` exclusively owns the current snapshot, camera spring,
//! animation clock and end-of-game sequencer. The platform layer feeds it
//! frames, gestures and server responses, and acts on what it returns.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::AnimationClock;
use super::camera::CameraShake;
use super::input::{Gesture, InputRouter};
use super::sequencer::{Cue, GameOverSequencer, SequencePhase};
use super::snapshot::GameSnapshot;
use crate::consts::*;
use crate::net::ApiCall;

/// An issued request. Responses are applied only if their ticket is newer
/// than the last one applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    call: ApiCall,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn call(&self) -> ApiCall {
        self.call
    }
}

/// Result of one loop frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Kitten frame index changed; animated sprites need refreshing
    pub frame_advanced: bool,
    /// Time tick to send to the server
    pub time_tick: Option<Ticket>,
    /// Sequencer cues that fired this frame
    pub cues: Vec<Cue>,
}

pub struct GameClient {
    snapshot: Option<GameSnapshot>,
    camera: CameraShake,
    clock: AnimationClock,
    sequencer: GameOverSequencer,
    router: InputRouter,
    rng: Pcg32,
    time_accumulator_ms: f64,
    next_seq: u64,
    applied_seq: Option<u64>,
    shake_enabled: bool,
}

impl GameClient {
    /// Create a client; `seed` drives the shake direction
    pub fn new(seed: u64) -> Self {
        Self {
            snapshot: None,
            camera: CameraShake::new(),
            clock: AnimationClock::new(),
            sequencer: GameOverSequencer::new(),
            router: InputRouter::new(TILE_SIZE),
            rng: Pcg32::seed_from_u64(seed),
            time_accumulator_ms: 0.0,
            next_seq: 1,
            applied_seq: None,
            shake_enabled: true,
        }
    }

    pub fn set_shake_enabled(&mut self, enabled: bool) {
        self.shake_enabled = enabled;
        if !enabled {
            self.camera.halt();
        }
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn camera(&self) -> &CameraShake {
        &self.camera
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn phase(&self) -> SequencePhase {
        self.sequencer.phase()
    }

    pub fn tile_size(&self) -> f32 {
        self.router.tile_size
    }

    /// Board translation for the current shake, in pixels
    pub fn board_offset(&self) -> Vec2 {
        self.camera.offset(self.router.tile_size)
    }

    /// Stamp a call with the next sequence number
    pub fn issue(&mut self, call: ApiCall) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        Ticket { seq, call }
    }

    /// Route a gesture; issues a ticket only when it should reach the server
    pub fn gesture(&mut self, gesture: Gesture, board_origin: Vec2) -> Option<Ticket> {
        let call = self
            .router
            .route(gesture, board_origin, self.snapshot.as_ref())?;
        Some(self.issue(call))
    }

    /// Adopt a successful response.
    ///
    /// Returns `None` when the response is older than one already applied,
    /// otherwise the cues triggered by the replacement.
    pub fn apply(&mut self, ticket: Ticket, snapshot: GameSnapshot) -> Option<Vec<Cue>> {
        if self.applied_seq.is_some_and(|last| ticket.seq <= last) {
            log::debug!(
                "Discarding stale {} response #{} (applied #{:?})",
                ticket.call.name(),
                ticket.seq,
                self.applied_seq
            );
            return None;
        }
        self.applied_seq = Some(ticket.seq);

        let snapshot = match ticket.call {
            ApiCall::Reveal { x, y } => snapshot.confirm_reveal(x, y),
            _ => snapshot,
        };

        let mut cues = Vec::new();
        if ticket.call == ApiCall::Reset {
            cues.extend(self.sequencer.reset());
            self.camera.halt();
            self.clock.reset();
            self.time_accumulator_ms = 0.0;
        }

        let was_active = self.snapshot.as_ref().is_some_and(|s| s.game_active);
        let (now_active, has_won) = (snapshot.game_active, snapshot.has_won);
        self.snapshot = Some(snapshot);

        cues.extend(self.sequencer.observe(was_active, now_active, has_won));
        Some(self.take_shake(cues))
    }

    /// Advance one display frame
    pub fn frame(&mut self, dt_ms: f64) -> FrameReport {
        let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);

        let frame_advanced = self.clock.tick();
        if self.camera.active {
            self.camera.step();
        }

        let mut time_tick = None;
        self.time_accumulator_ms += dt_ms;
        if self.time_accumulator_ms >= TIME_TICK_MS {
            self.time_accumulator_ms -= TIME_TICK_MS;
            if self.snapshot.as_ref().is_some_and(|s| s.game_active) {
                time_tick = Some(self.issue(ApiCall::AdvanceTime { seconds: 1 }));
            }
        }

        let cues = self.sequencer.advance(dt_ms);
        FrameReport {
            frame_advanced,
            time_tick,
            cues: self.take_shake(cues),
        }
    }

    /// Consume shake cues here; everything else goes to the platform
    fn take_shake(&mut self, cues: Vec<Cue>) -> Vec<Cue> {
        cues.into_iter()
            .filter(|cue| {
                if *cue != Cue::StartShake {
                    return true;
                }
                if self.shake_enabled {
                    self.camera.activate(&mut self.rng);
                }
                false
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TileKind;
    use crate::sim::sequencer::Outcome;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn loaded_client() -> GameClient {
        let mut client = GameClient::new(42);
        let ticket = client.issue(ApiCall::Fetch);
        client.apply(ticket, GameSnapshot::filled(9, 9, TileKind::Unrevealed));
        client
    }

    fn ended(has_won: bool) -> GameSnapshot {
        let mut snap = GameSnapshot::filled(9, 9, TileKind::Empty);
        snap.game_active = false;
        snap.has_won = has_won;
        snap
    }

    /// Run frames until `ms` of loop time has passed, collecting cues
    fn run_for(client: &mut GameClient, ms: f64) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < ms {
            cues.extend(client.frame(FRAME_MS).cues);
            elapsed += FRAME_MS;
        }
        cues
    }

    #[test]
    fn test_loss_end_to_end() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 3, y: 3 });
        let cues = client.apply(ticket, ended(false)).unwrap();

        assert_eq!(cues, vec![Cue::StopGameMusic, Cue::MeowBurst, Cue::PlayGameOverMusic]);
        assert!(matches!(client.phase(), SequencePhase::Ending { outcome: Outcome::Lost, .. }));
        assert!(client.camera().active);

        let cues = run_for(&mut client, 2100.0);
        assert_eq!(cues, vec![Cue::ShowOverlay(Outcome::Lost)]);
        assert_eq!(Outcome::Lost.message(), "You Lost!");
        assert_eq!(client.phase(), SequencePhase::Ended { outcome: Outcome::Lost });
    }

    #[test]
    fn test_win_end_to_end() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 3, y: 3 });
        let cues = client.apply(ticket, ended(true)).unwrap();

        assert_eq!(cues, vec![Cue::StopGameMusic]);
        assert!(!cues.contains(&Cue::MeowBurst));
        assert!(client.camera().active);

        let cues = run_for(&mut client, 2100.0);
        assert_eq!(cues, vec![Cue::ShowOverlay(Outcome::Won)]);
    }

    #[test]
    fn test_overlay_not_shown_early() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 3, y: 3 });
        client.apply(ticket, ended(false));
        assert!(run_for(&mut client, 1900.0).is_empty());
    }

    #[test]
    fn test_reveal_of_kitten_is_confirmed() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 4, y: 5 });

        // Server still reports the game as running
        let mut snap = GameSnapshot::filled(9, 9, TileKind::Unrevealed);
        snap.tiles[4][5].kind = TileKind::UnrevealedMine;
        let cues = client.apply(ticket, snap).unwrap();

        assert!(cues.contains(&Cue::MeowBurst));
        let held = client.snapshot().unwrap();
        assert!(!held.game_active);
        assert_eq!(held.tile(4, 5).unwrap().kind, TileKind::RevealedMine);
    }

    #[test]
    fn test_reset_scenario() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 1, y: 1 });
        client.apply(ticket, ended(false));
        run_for(&mut client, 500.0);
        assert!(client.clock().ticks() > 0);

        let ticket = client.issue(ApiCall::Reset);
        let mut fresh = GameSnapshot::filled(11, 11, TileKind::Unrevealed);
        fresh.time_remaining = 240;
        fresh.formatted_time = "4:00".to_string();
        fresh.num_kittens = 9;
        let cues = client.apply(ticket, fresh).unwrap();

        assert_eq!(cues, vec![Cue::HideOverlay, Cue::StopGameOverMusic, Cue::PlayGameMusic]);
        assert_eq!(*client.camera(), CameraShake::new());
        assert_eq!(client.board_offset(), Vec2::ZERO);
        assert_eq!(client.phase(), SequencePhase::Playing);
        assert_eq!(client.clock().ticks(), 0);
        assert_eq!(client.snapshot().unwrap().formatted_time, "4:00");

        // Pending overlay never shows after reset
        assert!(run_for(&mut client, 3000.0).is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut client = loaded_client();
        let first = client.issue(ApiCall::Reveal { x: 1, y: 1 });
        let second = client.issue(ApiCall::ToggleFlag { x: 2, y: 2 });

        let mut newer = GameSnapshot::filled(9, 9, TileKind::Unrevealed);
        newer.tiles[2][2].flagged = true;
        assert!(client.apply(second, newer.clone()).is_some());

        let older = GameSnapshot::filled(9, 9, TileKind::Empty);
        assert!(client.apply(first, older).is_none());
        assert_eq!(client.snapshot(), Some(&newer));
    }

    #[test]
    fn test_time_tick_cadence() {
        let mut client = loaded_client();
        let mut ticks = Vec::new();
        for _ in 0..200 {
            if let Some(ticket) = client.frame(FRAME_MS).time_tick {
                ticks.push(ticket);
            }
        }
        // 200 frames at 60 Hz is 3.33 s
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|t| t.call() == ApiCall::AdvanceTime { seconds: 1 }));
        assert!(ticks.windows(2).all(|w| w[0].seq() < w[1].seq()));
    }

    #[test]
    fn test_no_time_tick_without_active_game() {
        let mut client = GameClient::new(1);
        assert!(run_frames_for_ticks(&mut client, 120).is_empty());

        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Fetch);
        client.apply(ticket, ended(false));
        assert!(run_frames_for_ticks(&mut client, 120).is_empty());
    }

    fn run_frames_for_ticks(client: &mut GameClient, frames: usize) -> Vec<Ticket> {
        (0..frames)
            .filter_map(|_| client.frame(FRAME_MS).time_tick)
            .collect()
    }

    #[test]
    fn test_huge_frame_is_clamped() {
        let mut client = loaded_client();
        let report = client.frame(60_000.0);
        assert!(report.time_tick.is_some());
        assert!(client.frame(FRAME_MS).time_tick.is_none());
    }

    #[test]
    fn test_animation_frames_advance_every_fifteen_ticks() {
        let mut client = GameClient::new(3);
        let advanced = (0..45).filter(|_| client.frame(FRAME_MS).frame_advanced).count();
        assert_eq!(advanced, 3);
    }

    #[test]
    fn test_gesture_issues_ticket() {
        let mut client = loaded_client();
        let ticket = client
            .gesture(Gesture::Reveal(Vec2::new(50.0, 80.0)), Vec2::ZERO)
            .unwrap();
        assert_eq!(ticket.call(), ApiCall::Reveal { x: 1, y: 2 });
        assert!(client.gesture(Gesture::Reveal(Vec2::new(-5.0, 0.0)), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_shake_disabled() {
        let mut client = loaded_client();
        client.set_shake_enabled(false);
        let ticket = client.issue(ApiCall::Reveal { x: 1, y: 1 });
        client.apply(ticket, ended(false));
        assert!(!client.camera().active);
        assert!(matches!(client.phase(), SequencePhase::Ending { .. }));
    }

    #[test]
    fn test_shake_settles_during_frames() {
        let mut client = loaded_client();
        let ticket = client.issue(ApiCall::Reveal { x: 1, y: 1 });
        client.apply(ticket, ended(true));
        run_for(&mut client, 10_000.0);
        assert!(!client.camera().active);
        assert_eq!(client.board_offset(), Vec2::ZERO);
    }
}
