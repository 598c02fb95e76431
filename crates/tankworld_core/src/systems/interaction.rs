//! INTERACTION: drain the poker queue, run each game to completion, apply
//! energy transfers, and fire post-poker emergency mating.

use crate::engine::Phase;
use crate::poker::game::{Entrant, PokerGame};
use crate::poker::TableStakes;
use crate::world::World;
use tankworld_data::{DeathCause, Entity, EntityId};

impl World {
    pub(crate) fn phase_interaction(&mut self, frame: u64) {
        let mut rng = Phase::Interaction.rng(self.master_seed, frame);
        let queue = std::mem::take(&mut self.poker_queue);
        let stakes = TableStakes::from(&self.config.poker);

        for (a, b) in queue {
            if self.is_marked_dead(a) || self.is_marked_dead(b) {
                continue;
            }
            let Some(entrant_a) = self.entrant_for(a) else {
                continue;
            };
            let Some(entrant_b) = self.entrant_for(b) else {
                continue;
            };
            let styles = [
                (a, self.algorithm_of(a)),
                (b, self.algorithm_of(b)),
            ];

            let mut game = PokerGame::new(vec![entrant_a, entrant_b], stakes, &mut rng);
            let outcome = game.run(&mut rng);

            // apply settlements; winner gains clamp at the energy cap
            let cooldown = self.config.poker.cooldown;
            let mut applied = Vec::with_capacity(2);
            let mut busted = Vec::new();
            for (id, delta) in &outcome.energy_delta_per_player {
                let Some(Entity::Fish(fish)) = self.entities.get_mut(id) else {
                    continue;
                };
                let applied_delta = if *delta >= 0.0 {
                    delta.min(fish.max_energy - fish.energy)
                } else {
                    (*delta).max(-fish.energy)
                };
                fish.energy += applied_delta;
                fish.poker_cooldown = cooldown;
                applied.push((*id, applied_delta));
                if fish.energy <= f32::EPSILON {
                    busted.push(*id);
                }
            }
            self.tracker
                .record_poker(&outcome, &applied, &styles, frame, Phase::Interaction);
            for id in busted {
                self.mark_dead(id, DeathCause::PokerLoss);
            }

            // emergency mating at the table; consumes both cooldowns
            if self.config.reproduction.post_poker_mating
                && !self.is_marked_dead(a)
                && !self.is_marked_dead(b)
            {
                let (mother, father) = if a < b { (a, b) } else { (b, a) };
                self.try_mate(mother, father, frame, Phase::Interaction, &mut rng);
            }
        }
    }

    fn entrant_for(&self, id: EntityId) -> Option<Entrant> {
        match self.entities.get(&id) {
            Some(Entity::Fish(fish)) => Some(Entrant {
                id,
                style: fish.genome.poker.style,
                params: fish.genome.poker.params.clone(),
                energy: fish.energy,
            }),
            _ => None,
        }
    }

    fn algorithm_of(&self, id: EntityId) -> tankworld_data::AlgorithmId {
        match self.entities.get(&id) {
            Some(Entity::Fish(fish)) => fish.genome.behavior.algorithm,
            _ => tankworld_data::AlgorithmId::RandomWalk,
        }
    }
}
