//! Score ledger
//!
//! Final score = destroyed × 100 + evaded × 30 + bonus seconds × 3.
//! Evasion is credited at most once per obstacle for the whole run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::{POINTS_PER_BONUS_SECOND, POINTS_PER_DESTROYED, POINTS_PER_EVADED};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    pub obstacles_destroyed: u32,
    pub obstacles_evaded: u32,
    pub bonus_seconds: u32,
    /// Obstacle IDs already credited for evasion
    evaded: BTreeSet<u32>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit_destroyed(&mut self) {
        self.obstacles_destroyed += 1;
    }

    /// Credit an evasion for `obstacle_id`. Returns false if it was already credited.
    pub fn credit_evaded(&mut self, obstacle_id: u32) -> bool {
        if !self.evaded.insert(obstacle_id) {
            return false;
        }
        self.obstacles_evaded += 1;
        true
    }

    pub fn has_evaded(&self, obstacle_id: u32) -> bool {
        self.evaded.contains(&obstacle_id)
    }

    pub fn evaded_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.evaded.iter().copied()
    }

    /// Record the time bonus for a won run (replaces any earlier value)
    pub fn set_bonus_seconds(&mut self, seconds: u32) {
        self.bonus_seconds = seconds;
    }

    pub fn bonus_points(&self) -> u32 {
        self.bonus_seconds * POINTS_PER_BONUS_SECOND
    }

    pub fn total(&self) -> u32 {
        self.obstacles_destroyed * POINTS_PER_DESTROYED
            + self.obstacles_evaded * POINTS_PER_EVADED
            + self.bonus_points()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
