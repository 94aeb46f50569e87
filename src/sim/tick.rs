//! Fixed timestep simulation tick
//!
//! Core game loop: the run state machine plus the per-frame interaction
//! resolver. One call to [`tick`] is one frame at 60 Hz.

use super::collision::Aabb;
use super::state::{GameEvent, GameState, LossReason, Outcome, RunPhase};

/// Held directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Edge-triggered actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Start,
    Acknowledge,
    Quit,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held this frame
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Newly pressed this frame
    pub jump: bool,
    pub start: bool,
    pub acknowledge: bool,
    pub quit: bool,
}

impl TickInput {
    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => self.jump,
            Action::Start => self.start,
            Action::Acknowledge => self.acknowledge,
            Action::Quit => self.quit,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Quitting is the host's job; just report it
    if input.quit {
        events.push(GameEvent::QuitRequested);
    }

    match state.phase {
        RunPhase::Home => {
            if input.start {
                state.reset_run();
                state.phase = RunPhase::Gameplay;
                log::info!(
                    "Run started: {} obstacles, {} frame budget",
                    state.obstacles.len(),
                    state.config.frame_budget
                );
                events.push(GameEvent::RunStarted);
            }
        }

        RunPhase::Gameplay => {
            state.player = state.player.step(input, &state.level, &state.config.physics);
            state.goal = state.goal.step();
            for obstacle in state.obstacles.iter_mut() {
                *obstacle = obstacle.step();
            }

            match resolve_interactions(state, &mut events) {
                Some(outcome) => end_run(state, outcome, &mut events),
                None => state.frame += 1,
            }
        }

        // Pure display state, nothing simulates
        RunPhase::GameOver => {
            if input.acknowledge {
                state.phase = RunPhase::Home;
                state.frame = 0;
                state.outcome = None;
                events.push(GameEvent::ReturnedHome);
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

/// Resolve one frame's interactions in fixed order: obstacles, powerup,
/// goal, time budget. The first terminal outcome stops resolution.
pub fn resolve_interactions(state: &mut GameState, events: &mut Vec<GameEvent>) -> Option<Outcome> {
    let hitbox = state.player.hitbox();
    let armed = state.player.has_powerup;
    let jumping = state.player.airborne;
    let proximity = state.config.physics.evasion_proximity;

    let mut destroyed = Vec::new();
    for obstacle in &state.obstacles {
        let bounds = obstacle.bounds();

        if jumping && !state.ledger.has_evaded(obstacle.id) && passed_over(&hitbox, &bounds, proximity) {
            state.ledger.credit_evaded(obstacle.id);
            log::debug!("Obstacle {} evaded", obstacle.id);
            events.push(GameEvent::ObstacleEvaded { id: obstacle.id });
        }

        if hitbox.overlaps(&bounds) {
            if !armed {
                return Some(Outcome::Lost(LossReason::HitObstacle));
            }
            destroyed.push(obstacle.id);
        }
    }
    for id in destroyed {
        state.destroy_obstacle(id);
        state.ledger.credit_destroyed();
        log::debug!("Obstacle {id} destroyed");
        events.push(GameEvent::ObstacleDestroyed { id });
    }

    if !state.powerup.collected && hitbox.overlaps(&state.powerup.bounds()) {
        state.powerup.collected = true;
        state.player.collect_powerup();
        log::debug!("Powerup collected at frame {}", state.frame);
        events.push(GameEvent::PowerupCollected);
    }

    if hitbox.overlaps(&state.goal.bounds()) {
        if !state.player.has_powerup {
            return Some(Outcome::Lost(LossReason::ReachedGoalUnarmed));
        }
        let bonus = state.remaining_seconds();
        state.ledger.set_bonus_seconds(bonus);
        return Some(Outcome::Won);
    }

    if state.frame >= state.config.frame_budget {
        return Some(Outcome::Lost(LossReason::TimeExpired));
    }

    None
}

/// Player is entirely above the obstacle and horizontally close to it.
/// Only counted mid-jump, so standing on a higher floor earns nothing.
fn passed_over(player: &Aabb, obstacle: &Aabb, proximity: f32) -> bool {
    player.bottom() < obstacle.top() && (player.center_x() - obstacle.center_x()).abs() < proximity
}

fn end_run(state: &mut GameState, outcome: Outcome, events: &mut Vec<GameEvent>) {
    let score = state.ledger.total();
    state.phase = RunPhase::GameOver;
    state.outcome = Some(outcome);
    log::info!(
        "Run ended at frame {}: {:?}, score {} (destroyed {}, evaded {}, bonus {}s)",
        state.frame,
        outcome,
        score,
        state.ledger.obstacles_destroyed,
        state.ledger.obstacles_evaded,
        state.ledger.bonus_seconds
    );
    events.push(GameEvent::RunEnded { outcome, score });
}
