//! Seeded demo pilot
//!
//! Plays the game headlessly: wanders left/right, grabs ladders now and
//! then, and hops over obstacles it is about to walk into. Same seed, same
//! inputs, so a demo run is reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{RunPhase, Snapshot, TickInput};

/// How close (px, horizontally) an obstacle ahead must be to trigger a hop
const HOP_DISTANCE: f32 = 56.0;
/// Vertical band counted as "same floor" for hop decisions
const SAME_FLOOR_BAND: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Left,
    Right,
    ClimbUp,
    ClimbDown,
    Idle,
}

pub struct DemoPilot {
    rng: Pcg32,
    intent: Intent,
    /// Frames left before picking a new intent
    hold: u32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            intent: Intent::Right,
            hold: 0,
        }
    }

    /// Input for the next frame given the last rendered snapshot
    pub fn next_input(&mut self, snapshot: &Snapshot) -> TickInput {
        match snapshot.phase {
            RunPhase::Home => TickInput {
                start: true,
                ..Default::default()
            },
            RunPhase::GameOver => TickInput::default(),
            RunPhase::Gameplay => self.steer(snapshot),
        }
    }

    fn steer(&mut self, snapshot: &Snapshot) -> TickInput {
        if self.hold == 0 {
            self.intent = match self.rng.random_range(0..10) {
                0..=3 => Intent::Right,
                4..=6 => Intent::Left,
                7 => Intent::ClimbUp,
                8 => Intent::ClimbDown,
                _ => Intent::Idle,
            };
            self.hold = self.rng.random_range(15..90);
        }
        self.hold -= 1;

        let player = &snapshot.player;
        let heading_right = match self.intent {
            Intent::Right => true,
            Intent::Left => false,
            _ => player.facing_right,
        };
        let obstacle_ahead = snapshot.obstacles.iter().any(|o| {
            let dx = o.pos.x - player.pos.x;
            let ahead = if heading_right { dx > 0.0 } else { dx < 0.0 };
            ahead && dx.abs() < HOP_DISTANCE && (o.pos.y - player.pos.y).abs() < SAME_FLOOR_BAND
        });

        TickInput {
            left: self.intent == Intent::Left,
            right: self.intent == Intent::Right,
            up: self.intent == Intent::ClimbUp,
            down: self.intent == Intent::ClimbDown,
            jump: obstacle_ahead || self.rng.random_bool(0.02),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use crate::sim::{GameState, tick};

    fn play(seed: u64, frames: usize) -> GameState {
        let mut state = GameState::new(LevelConfig::default());
        let mut pilot = DemoPilot::new(seed);
        for _ in 0..frames {
            let input = pilot.next_input(&state.snapshot());
            tick(&mut state, &input);
        }
        state
    }

    #[test]
    fn test_pilot_starts_the_run() {
        let state = GameState::new(LevelConfig::default());
        let input = DemoPilot::new(1).next_input(&state.snapshot());
        assert!(input.start);
    }

    #[test]
    fn test_demo_is_deterministic() {
        let a = play(99_999, 600);
        let b = play(99_999, 600);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.player, b.player);
        assert_eq!(a.ledger, b.ledger);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_demo_run_respects_invariants() {
        let mut state = GameState::new(LevelConfig::default());
        let mut pilot = DemoPilot::new(7);
        for _ in 0..3_000 {
            let before = state.obstacles.len();
            let destroyed_before = state.ledger.obstacles_destroyed;
            let input = pilot.next_input(&state.snapshot());
            tick(&mut state, &input);

            let removed = before - state.obstacles.len();
            assert_eq!(
                removed as u32,
                state.ledger.obstacles_destroyed - destroyed_before
            );
            for obstacle in &state.obstacles {
                assert!(obstacle.pos.y <= obstacle.stop_y);
            }
            if state.phase == RunPhase::GameOver {
                assert!(state.outcome.is_some());
                break;
            }
        }
        assert!(state.ledger.obstacles_evaded as usize <= state.config.obstacles.len());
    }
}
