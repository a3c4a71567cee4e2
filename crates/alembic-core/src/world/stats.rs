//! Simulation statistics collection trait

use serde::{Deserialize, Serialize};

/// Trait for collecting simulation statistics
///
/// Systems report events through this trait so that callers decide whether
/// anything is counted at all.
pub trait SimStats {
    /// Record that a cell was relocated, swapped or erased during movement
    fn record_cell_moved(&mut self);

    /// Record a temperature-driven transition (e.g., melting, freezing)
    fn record_state_change(&mut self);

    /// Record that a reaction fired
    fn record_reaction(&mut self);

    /// Record a spontaneous decay
    fn record_decay(&mut self);

    /// Record a particle spawned by an emission or a clone
    fn record_emission(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
    fn record_state_change(&mut self) {}
    fn record_reaction(&mut self) {}
    fn record_decay(&mut self) {}
    fn record_emission(&mut self) {}
}

/// Per-tick counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub cells_moved: u32,
    pub state_changes: u32,
    pub reactions: u32,
    pub decays: u32,
    pub emissions: u32,
}

impl SimStats for TickStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_state_change(&mut self) {
        self.state_changes += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_decay(&mut self) {
        self.decays += 1;
    }

    fn record_emission(&mut self) {
        self.emissions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_stats_all_methods() {
        let mut stats = NoopStats;

        for _ in 0..100 {
            stats.record_cell_moved();
            stats.record_state_change();
            stats.record_reaction();
            stats.record_decay();
            stats.record_emission();
        }
    }

    #[test]
    fn test_tick_stats_counts() {
        let mut stats = TickStats::default();

        for _ in 0..10 {
            stats.record_cell_moved();
        }
        for _ in 0..5 {
            stats.record_state_change();
        }
        for _ in 0..3 {
            stats.record_reaction();
        }
        stats.record_decay();
        stats.record_emission();
        stats.record_emission();

        assert_eq!(
            stats,
            TickStats {
                cells_moved: 10,
                state_changes: 5,
                reactions: 3,
                decays: 1,
                emissions: 2,
            }
        );
    }

    #[test]
    fn test_tick_stats_as_trait_object() {
        let mut stats = TickStats::default();
        let sink: &mut dyn SimStats = &mut stats;
        sink.record_reaction();
        assert_eq!(stats.reactions, 1);
    }
}
