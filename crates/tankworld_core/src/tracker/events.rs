//! Simulation event stream.
//!
//! Events are stamped with `(frame, phase)` at the moment they are
//! recorded, so within one tick the stream is ordered by phase. The world
//! snapshot carries the events of the last completed tick; the ring buffer
//! keeps a longer window for stats export.

use crate::engine::Phase;
use crate::poker::PokerOutcome;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tankworld_data::{AlgorithmId, DeathCause, EntityId, FoodKind, Vec2};

/// Ring buffer capacity; comfortably above the 1000-event contract.
pub const EVENT_LOG_CAPACITY: usize = 1024;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum SimEvent {
    Birth {
        id: EntityId,
        parents: (EntityId, EntityId),
        generation: u32,
        algorithm: AlgorithmId,
        frame: u64,
        phase: Phase,
    },
    Death {
        id: EntityId,
        cause: DeathCause,
        age: u64,
        generation: u32,
        algorithm: AlgorithmId,
        frame: u64,
        phase: Phase,
    },
    FoodSpawned {
        id: EntityId,
        pos: Vec2,
        kind: FoodKind,
        frame: u64,
        phase: Phase,
    },
    FoodEaten {
        id: EntityId,
        by: EntityId,
        frame: u64,
        phase: Phase,
    },
    Poker {
        outcome: PokerOutcome,
        frame: u64,
        phase: Phase,
    },
    CapacityReached {
        population: usize,
        frame: u64,
        phase: Phase,
    },
    Extinction {
        algorithm: AlgorithmId,
        frame: u64,
        phase: Phase,
    },
    CommandRejected {
        reason: String,
        frame: u64,
        phase: Phase,
    },
}

impl SimEvent {
    pub fn frame(&self) -> u64 {
        match self {
            SimEvent::Birth { frame, .. }
            | SimEvent::Death { frame, .. }
            | SimEvent::FoodSpawned { frame, .. }
            | SimEvent::FoodEaten { frame, .. }
            | SimEvent::Poker { frame, .. }
            | SimEvent::CapacityReached { frame, .. }
            | SimEvent::Extinction { frame, .. }
            | SimEvent::CommandRejected { frame, .. } => *frame,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            SimEvent::Birth { phase, .. }
            | SimEvent::Death { phase, .. }
            | SimEvent::FoodSpawned { phase, .. }
            | SimEvent::FoodEaten { phase, .. }
            | SimEvent::Poker { phase, .. }
            | SimEvent::CapacityReached { phase, .. }
            | SimEvent::Extinction { phase, .. }
            | SimEvent::CommandRejected { phase, .. } => *phase,
        }
    }
}

/// Bounded event history; old events fall off the front.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: SimEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }
}
