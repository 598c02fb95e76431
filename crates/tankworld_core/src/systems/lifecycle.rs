//! LIFECYCLE: detect dying fish and mark them for end-of-tick removal.

use crate::world::World;
use tankworld_data::{DeathCause, Entity};

impl World {
    pub(crate) fn phase_lifecycle(&mut self) {
        let max_age = self.config.lifecycle.max_age;
        let mut dying = Vec::new();
        for (id, entity) in &self.entities {
            let Entity::Fish(fish) = entity else {
                continue;
            };
            if fish.energy <= 0.0 {
                dying.push((*id, DeathCause::Starvation));
            } else if fish.age >= max_age {
                dying.push((*id, DeathCause::OldAge));
            }
        }
        for (id, cause) in dying {
            self.mark_dead(id, cause);
        }
    }
}
