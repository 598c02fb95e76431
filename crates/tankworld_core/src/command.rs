//! Typed commands ingested by the world façade.
//!
//! Commands are enqueued at any time and drained at FRAME_START in a
//! canonical order, so permutations of same-frame submissions cannot change
//! any snapshot.

use serde::{Deserialize, Serialize};
use tankworld_data::{Genome, Vec2};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    AddFood {
        pos: Option<Vec2>,
    },
    SpawnFish {
        genome: Option<Genome>,
        pos: Option<Vec2>,
    },
    SpawnPlant {
        pos: Option<Vec2>,
    },
    SpawnCrab {
        pos: Option<Vec2>,
    },
    Pause,
    Resume,
    Reset,
    SetConfig {
        overrides: Vec<(String, String)>,
    },
}

impl Command {
    /// World-state commands apply before entity spawns so that, e.g., a
    /// same-frame `Reset` + `SpawnFish` always produces the fish in the
    /// fresh world regardless of submission order.
    fn variant_rank(&self) -> u8 {
        match self {
            Command::Reset => 0,
            Command::SetConfig { .. } => 1,
            Command::Pause => 2,
            Command::Resume => 3,
            Command::SpawnFish { .. } => 4,
            Command::SpawnPlant { .. } => 5,
            Command::SpawnCrab { .. } => 6,
            Command::AddFood { .. } => 7,
        }
    }

    /// Canonical ordering key: variant rank, then the serialized form.
    pub fn canonical_key(&self) -> (u8, String) {
        (
            self.variant_rank(),
            serde_json::to_string(self).unwrap_or_default(),
        )
    }
}

pub fn sort_canonically(commands: &mut [Command]) {
    commands.sort_by_cached_key(Command::canonical_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_sort_identically() {
        let a = Command::AddFood {
            pos: Some(Vec2::new(1.0, 2.0)),
        };
        let b = Command::SpawnFish {
            genome: None,
            pos: None,
        };
        let c = Command::Pause;
        let mut first = vec![a.clone(), b.clone(), c.clone()];
        let mut second = vec![c, a, b];
        sort_canonically(&mut first);
        sort_canonically(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn reset_sorts_before_spawns() {
        let mut commands = vec![
            Command::SpawnFish {
                genome: None,
                pos: None,
            },
            Command::Reset,
        ];
        sort_canonically(&mut commands);
        assert_eq!(commands[0], Command::Reset);
    }
}
