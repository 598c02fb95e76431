//! Energy flow accounting.
//!
//! Every energy unit that enters or leaves a living fish is posted here by
//! the system that moved it. The posted residual `gains - burns` therefore
//! tracks the change in total fish energy over any window, modulo entities
//! that entered the window (stocked or injected fish carry unposted initial
//! energy). The poker house cut is not a fish-energy sink: it is the gap
//! between `poker_out` and `poker_in` and is tallied separately by the
//! tracker.

use serde::{Deserialize, Serialize};

/// Where fish energy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergySource {
    Food,
    PokerTransfer,
    BirthTransfer,
}

/// Where fish energy goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergySink {
    Metabolism,
    Movement,
    MatingCost,
    PokerTransfer,
    /// The mother's side of the birth transfer.
    BirthTransfer,
    /// Residual energy carried by a fish when it leaves the simulation.
    DeathLoss,
}

/// Accumulated per-source gains and per-sink burns, in energy units.
/// Totals accumulate in `f64` so long runs do not drift.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EnergyLedger {
    pub food_in: f64,
    pub poker_in: f64,
    pub birth_transfer_in: f64,
    pub metabolism_out: f64,
    pub movement_out: f64,
    pub mating_cost_out: f64,
    pub poker_out: f64,
    pub birth_transfer_out: f64,
    pub death_loss_out: f64,
}

impl EnergyLedger {
    pub fn record_gain(&mut self, source: EnergySource, amount: f32) {
        debug_assert!(amount >= 0.0, "negative gain posted");
        let amount = amount as f64;
        match source {
            EnergySource::Food => self.food_in += amount,
            EnergySource::PokerTransfer => self.poker_in += amount,
            EnergySource::BirthTransfer => self.birth_transfer_in += amount,
        }
    }

    pub fn record_burn(&mut self, sink: EnergySink, amount: f32) {
        debug_assert!(amount >= 0.0, "negative burn posted");
        let amount = amount as f64;
        match sink {
            EnergySink::Metabolism => self.metabolism_out += amount,
            EnergySink::Movement => self.movement_out += amount,
            EnergySink::MatingCost => self.mating_cost_out += amount,
            EnergySink::PokerTransfer => self.poker_out += amount,
            EnergySink::BirthTransfer => self.birth_transfer_out += amount,
            EnergySink::DeathLoss => self.death_loss_out += amount,
        }
    }

    pub fn total_gains(&self) -> f64 {
        self.food_in + self.poker_in + self.birth_transfer_in
    }

    pub fn total_burns(&self) -> f64 {
        self.metabolism_out
            + self.movement_out
            + self.mating_cost_out
            + self.poker_out
            + self.birth_transfer_out
            + self.death_loss_out
    }

    /// Net posted flow; equals the change in total fish energy over any
    /// window with no unposted entity entries.
    pub fn residual(&self) -> f64 {
        self.total_gains() - self.total_burns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_balances_gains_and_burns() {
        let mut ledger = EnergyLedger::default();
        ledger.record_gain(EnergySource::Food, 25.0);
        ledger.record_gain(EnergySource::PokerTransfer, 5.0);
        ledger.record_burn(EnergySink::Metabolism, 10.0);
        ledger.record_burn(EnergySink::PokerTransfer, 6.0);
        assert!((ledger.residual() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn birth_transfer_nets_to_zero() {
        let mut ledger = EnergyLedger::default();
        ledger.record_burn(EnergySink::MatingCost, 10.0);
        ledger.record_burn(EnergySink::BirthTransfer, 25.0);
        ledger.record_gain(EnergySource::BirthTransfer, 25.0);
        assert!((ledger.residual() + 10.0).abs() < 1e-9);
    }
}
