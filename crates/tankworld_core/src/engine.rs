//! Simulation engine: the phase-ordered tick driver.
//!
//! Every tick executes the ten phases below in fixed order; phases are
//! never reordered or skipped (a paused world stops after FRAME_START).
//! Within a phase, entities iterate in ascending `EntityId`, and each
//! randomness-consuming phase draws from its own child RNG keyed by
//! `(master_seed, phase, frame)`. Partial failures inside one system never
//! prevent later phases from running in the same tick.

use crate::rng::SimRng;
use crate::world::World;
use serde::{Deserialize, Serialize};

/// The ten ordered stages of one tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    FrameStart = 0,
    TimeUpdate = 1,
    Environment = 2,
    EntityAct = 3,
    Lifecycle = 4,
    Spawn = 5,
    Collision = 6,
    Interaction = 7,
    Reproduction = 8,
    FrameEnd = 9,
}

impl Phase {
    pub const ORDER: [Phase; 10] = [
        Phase::FrameStart,
        Phase::TimeUpdate,
        Phase::Environment,
        Phase::EntityAct,
        Phase::Lifecycle,
        Phase::Spawn,
        Phase::Collision,
        Phase::Interaction,
        Phase::Reproduction,
        Phase::FrameEnd,
    ];

    pub fn id(self) -> u64 {
        self as u64
    }

    /// Child RNG for this phase of this frame.
    pub fn rng(self, master_seed: u64, frame: u64) -> SimRng {
        SimRng::for_phase(master_seed, self.id(), frame)
    }
}

impl World {
    /// One complete pass through the phase sequence. The frame counter
    /// advances only when the tick body ran; a paused world drains its
    /// command queue and stops.
    pub(crate) fn run_tick(&mut self) {
        // FRAME_START: reset the tick event window, drain commands
        self.tracker.begin_tick();
        self.phase_frame_start(self.frame + 1);
        // a Reset command rewinds the counter, so the frame number is
        // re-read after the drain
        let frame = self.frame + 1;
        if self.paused {
            return;
        }

        // TIME_UPDATE: advance the day/night clock
        self.clock.update(frame);

        // ENVIRONMENT: rebuild the spatial index from committed positions
        self.phase_environment();

        // ENTITY_ACT .. REPRODUCTION
        self.phase_entity_act(frame);
        self.phase_lifecycle();
        self.phase_spawn(frame);
        self.phase_collision(frame);
        self.phase_interaction(frame);
        self.phase_reproduction(frame);

        // FRAME_END: commit removals and births, tracker commit
        self.phase_frame_end(frame);
        self.frame = frame;
    }

    /// Rebuilds the spatial index. Arena geometry follows the current
    /// config so a `SetConfig` takes effect here.
    pub(crate) fn phase_environment(&mut self) {
        let width = self.config.world.width;
        let height = self.config.world.height;
        let cell = self.config.grid_cell_size();
        if self.grid.width() != width || self.grid.height() != height {
            self.grid = crate::environment::SpatialGrid::new(cell, width, height);
        } else {
            self.grid.clear();
        }
        for (id, entity) in &self.entities {
            self.grid.insert(*id, entity.kind(), entity.pos());
        }
    }

    pub(crate) fn phase_frame_end(&mut self, frame: u64) {
        let removals = std::mem::take(&mut self.pending_removals);
        for (id, cause) in removals {
            if let Some(entity) = self.entities.remove(&id) {
                self.grid.remove(id);
                if let tankworld_data::Entity::Fish(fish) = entity {
                    self.fish_count = self.fish_count.saturating_sub(1);
                    self.tracker
                        .record_death(&fish, cause, frame, Phase::FrameEnd);
                }
            }
        }

        let births = std::mem::take(&mut self.pending_births);
        for fish in births {
            self.tracker.record_birth(&fish, frame, Phase::FrameEnd);
            self.fish_count += 1;
            self.entities
                .insert(fish.id, tankworld_data::Entity::Fish(fish));
        }

        self.tracker.commit(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_fixed() {
        for window in Phase::ORDER.windows(2) {
            assert!(window[0] < window[1]);
        }
        assert_eq!(Phase::ORDER.len(), 10);
        assert_eq!(Phase::FrameStart.id(), 0);
        assert_eq!(Phase::FrameEnd.id(), 9);
    }
}
