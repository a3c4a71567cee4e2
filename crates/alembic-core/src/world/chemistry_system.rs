//! Chemistry system - reactions, decay, emissions and cloning
//!
//! Every rule here is a per-tick roll gated on the cell's Moore neighborhood.
//! Material changes keep the previous temperature; spawned particles start at
//! their material's default temperature.

use glam::IVec2;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use super::cell::Cell;
use super::grid::{Grid, Neighborhood, Neighbors};
use crate::simulation::{EmissionRule, MaterialKind, MaterialRegistry, roughly};
use crate::world::{SimRng, SimStats};

/// Relative jitter applied to a reaction's forced temperature when it fires
const FORCED_TEMPERATURE_JITTER: f64 = 0.1;

/// Handles reactions, decay, emissions and clone cells
pub struct ChemistrySystem;

impl ChemistrySystem {
    /// Fire the first reaction rule whose roll succeeds and whose required
    /// neighbors are all present. Returns whether the material changed.
    pub fn check_reactions<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let Some(cell) = grid.get(pos).copied() else {
            return false;
        };
        let profile = registry.get(cell.kind);
        if profile.reactions.is_empty() {
            return false;
        }

        let neighbors = grid.neighbor_kinds(pos);

        for rule in &profile.reactions {
            let rolled = rng.check_probability(rule.probability);
            if !rolled || !rule.prerequisites_met(&neighbors) {
                continue;
            }
            let Some(outcome) = rule.outcome() else {
                continue;
            };

            grid.convert(pos, registry.get(outcome.kind), true);
            if let Some(forced) = outcome.temperature {
                let heated = roughly(rng, forced, FORCED_TEMPERATURE_JITTER).max(cell.temperature);
                if let Some(result) = grid.get_mut(pos) {
                    result.temperature = heated;
                }
            }

            log::trace!("{} reacted into {} at {pos}", cell.kind, outcome.kind);
            stats.record_reaction();
            return true;
        }

        false
    }

    /// Spontaneous end-of-life conversion. Returns whether the material changed.
    pub fn check_decay<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let Some(kind) = grid.kind_at(pos) else {
            return false;
        };
        if kind.is_empty() {
            return false;
        }
        let Some(decay) = registry.get(kind).decay else {
            return false;
        };

        if !rng.check_probability(decay.probability) {
            return false;
        }

        grid.convert(pos, registry.get(decay.into), true);
        stats.record_decay();
        true
    }

    /// Roll each emission rule in random order, spawning into distinct empty
    /// neighbors. Returns how many particles were spawned.
    pub fn attempt_emissions<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> usize {
        let Some(kind) = grid.kind_at(pos) else {
            return 0;
        };
        let profile = registry.get(kind);
        if profile.emissions.is_empty() {
            return 0;
        }

        let mut empty = grid.empty_neighbors(pos);
        let mut rules: SmallVec<[&EmissionRule; 4]> = profile.emissions.iter().collect();
        rules.shuffle(rng);

        let mut spawned = 0;
        for rule in rules {
            if empty.is_empty() {
                break;
            }
            if !rng.check_probability(rule.probability) {
                continue;
            }
            let Some(i) = rng.pick_index(empty.len()) else {
                break;
            };
            let target = empty.swap_remove(i);
            grid.set(target, Cell::new(registry.get(rule.kind)));
            stats.record_emission();
            spawned += 1;
        }

        spawned
    }

    /// Remember the first non-empty, non-clone neighbor ever seen and copy it
    /// into a random empty neighbor. Returns whether a particle was spawned.
    pub fn clone_neighbors<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let Some(cell) = grid.get(pos).copied() else {
            return false;
        };

        let mut remembered = cell.remembered;
        let mut empty = Neighbors::new();
        for n in grid.neighbors(pos, Neighborhood::Moore) {
            let Some(kind) = grid.kind_at(n) else {
                continue;
            };
            if kind.is_empty() {
                empty.push(n);
            } else if remembered.is_none() && kind != MaterialKind::Clone {
                remembered = Some(kind);
            }
        }

        if remembered != cell.remembered
            && let Some(slot) = grid.get_mut(pos)
        {
            slot.remembered = remembered;
        }

        let Some(kind) = remembered else {
            return false;
        };
        let Some(i) = rng.pick_index(empty.len()) else {
            return false;
        };

        grid.set(empty[i], Cell::new(registry.get(kind)));
        stats.record_emission();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{ReactionOutcome, ReactionRule};
    use crate::world::{NoopStats, TickStats};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn setup(width: usize, height: usize) -> (MaterialRegistry, Grid, Xoshiro256StarStar) {
        let mut rng = Xoshiro256StarStar::seed_from_u64(404);
        let registry = MaterialRegistry::new(&mut rng, false);
        let grid = Grid::new(width, height, registry.get(MaterialKind::Empty));
        (registry, grid, rng)
    }

    fn place(grid: &mut Grid, registry: &MaterialRegistry, x: i32, y: i32, kind: MaterialKind) {
        grid.set(IVec2::new(x, y), Cell::new(registry.get(kind)));
    }

    fn count(grid: &Grid, kind: MaterialKind) -> usize {
        grid.cells().iter().filter(|c| c.kind == kind).count()
    }

    #[test]
    fn test_reaction_requires_neighbor() {
        let (registry, mut grid, mut rng) = setup(3, 3);
        place(&mut grid, &registry, 1, 1, MaterialKind::Wood);

        for _ in 0..500 {
            assert!(!ChemistrySystem::check_reactions(
                &mut grid,
                &registry,
                IVec2::ONE,
                &mut NoopStats,
                &mut rng
            ));
        }
        assert_eq!(grid.kind_at(IVec2::ONE), Some(MaterialKind::Wood));
    }

    #[test]
    fn test_reaction_rate_matches_probability() {
        let (registry, mut grid, mut rng) = setup(3, 1);
        let probability = registry.get(MaterialKind::Wood).reactions[0].probability;

        let trials = 20_000;
        let mut fired = 0;
        for _ in 0..trials {
            place(&mut grid, &registry, 0, 0, MaterialKind::Wood);
            place(&mut grid, &registry, 1, 0, MaterialKind::Fire);
            if ChemistrySystem::check_reactions(&mut grid, &registry, IVec2::ZERO, &mut NoopStats, &mut rng) {
                fired += 1;
            }
        }

        // Only the fire rule can fire; the burning-wood rule has no neighbor
        let rate = fired as f64 / trials as f64;
        assert!(
            (rate - probability).abs() < 0.02,
            "rate {rate} vs probability {probability}"
        );
    }

    #[test]
    fn test_forced_temperature_never_cools() {
        let (registry, mut grid, mut rng) = setup(2, 1);
        let mut wood = Cell::new(registry.get(MaterialKind::Wood));
        wood.temperature = 5000.0;
        grid.set(IVec2::ZERO, wood);
        place(&mut grid, &registry, 1, 0, MaterialKind::Fire);

        let mut stats = TickStats::default();
        while !ChemistrySystem::check_reactions(&mut grid, &registry, IVec2::ZERO, &mut stats, &mut rng) {}

        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::BurningWood));
        assert_eq!(grid.get(IVec2::ZERO).map(|c| c.temperature), Some(5000.0));
        assert_eq!(stats.reactions, 1);
    }

    #[test]
    fn test_forced_temperature_heats_cold_cell() {
        let (registry, mut grid, mut rng) = setup(2, 1);
        place(&mut grid, &registry, 0, 0, MaterialKind::Oil);
        place(&mut grid, &registry, 1, 0, MaterialKind::Fire);

        while !ChemistrySystem::check_reactions(&mut grid, &registry, IVec2::ZERO, &mut NoopStats, &mut rng) {}

        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::Fire));
        let t = grid.get(IVec2::ZERO).map(|c| c.temperature).unwrap_or_default();
        let forced = 1200.0 + crate::simulation::CELSIUS_TO_KELVIN;
        assert!(t >= forced * 0.9 && t <= forced * 1.1, "temperature {t}");
    }

    #[test]
    fn test_fire_quenched_by_water() {
        let (registry, mut grid, mut rng) = setup(2, 1);
        place(&mut grid, &registry, 0, 0, MaterialKind::Fire);
        place(&mut grid, &registry, 1, 0, MaterialKind::Water);

        let fired = (0..1000).any(|_| {
            ChemistrySystem::check_reactions(&mut grid, &registry, IVec2::ZERO, &mut NoopStats, &mut rng)
        });
        assert!(fired);
        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_decay_rate_converges() {
        let (registry, mut grid, mut rng) = setup(1, 1);
        let decay = registry
            .get(MaterialKind::Smoke)
            .decay
            .expect("smoke decays");

        let trials = 200_000;
        let mut decayed = 0;
        for _ in 0..trials {
            place(&mut grid, &registry, 0, 0, MaterialKind::Smoke);
            if ChemistrySystem::check_decay(&mut grid, &registry, IVec2::ZERO, &mut NoopStats, &mut rng) {
                assert_eq!(grid.kind_at(IVec2::ZERO), Some(decay.into));
                decayed += 1;
            }
        }

        let rate = decayed as f64 / trials as f64;
        assert!(
            (rate - decay.probability).abs() < decay.probability * 0.15,
            "rate {rate} vs probability {}",
            decay.probability
        );
    }

    #[test]
    fn test_decay_preserves_temperature() {
        let (registry, mut grid, mut rng) = setup(1, 1);
        let mut steam = Cell::new(registry.get(MaterialKind::Steam));
        steam.temperature = 390.0;

        loop {
            grid.set(IVec2::ZERO, steam);
            if ChemistrySystem::check_decay(&mut grid, &registry, IVec2::ZERO, &mut NoopStats, &mut rng) {
                break;
            }
        }
        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::Water));
        assert_eq!(grid.get(IVec2::ZERO).map(|c| c.temperature), Some(390.0));
    }

    #[test]
    fn test_materials_without_decay_never_decay() {
        let (registry, mut grid, mut rng) = setup(1, 1);
        place(&mut grid, &registry, 0, 0, MaterialKind::Sand);
        for _ in 0..1000 {
            assert!(!ChemistrySystem::check_decay(
                &mut grid,
                &registry,
                IVec2::ZERO,
                &mut NoopStats,
                &mut rng
            ));
        }
    }

    #[test]
    fn test_emission_spawns_into_empty_neighbor() {
        let (registry, mut grid, mut rng) = setup(3, 3);
        place(&mut grid, &registry, 1, 1, MaterialKind::BurningWood);

        let mut stats = TickStats::default();
        let mut spawned = 0;
        for _ in 0..200 {
            spawned += ChemistrySystem::attempt_emissions(&mut grid, &registry, IVec2::ONE, &mut stats, &mut rng);
        }

        assert!(spawned > 0);
        assert_eq!(count(&grid, MaterialKind::Fire), spawned);
        assert_eq!(stats.emissions as usize, spawned);
        assert_eq!(grid.kind_at(IVec2::ONE), Some(MaterialKind::BurningWood));

        let fire = grid
            .cells()
            .iter()
            .find(|c| c.kind == MaterialKind::Fire)
            .map(|c| c.temperature);
        assert_eq!(fire, Some(registry.get(MaterialKind::Fire).default_temperature));
    }

    #[test]
    fn test_emission_stops_without_empty_neighbors() {
        let (registry, mut grid, mut rng) = setup(3, 3);
        for pos in grid.positions().collect::<Vec<_>>() {
            place(&mut grid, &registry, pos.x, pos.y, MaterialKind::Wall);
        }
        place(&mut grid, &registry, 1, 1, MaterialKind::BurningWood);

        for _ in 0..200 {
            assert_eq!(
                ChemistrySystem::attempt_emissions(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng),
                0
            );
        }
    }

    #[test]
    fn test_emission_rules_claim_distinct_neighbors() {
        let (mut registry, mut grid, mut rng) = setup(3, 3);
        let mut burning = registry.get(MaterialKind::BurningWood).clone();
        burning.emissions = vec![
            EmissionRule {
                kind: MaterialKind::Fire,
                probability: 1.0,
            },
            EmissionRule {
                kind: MaterialKind::Smoke,
                probability: 1.0,
            },
        ];
        registry.replace(burning);
        place(&mut grid, &registry, 1, 1, MaterialKind::BurningWood);

        let spawned = ChemistrySystem::attempt_emissions(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng);

        assert_eq!(spawned, 2);
        assert_eq!(count(&grid, MaterialKind::Fire), 1);
        assert_eq!(count(&grid, MaterialKind::Smoke), 1);
    }

    #[test]
    fn test_emission_rules_share_last_empty_neighbor() {
        let (mut registry, mut grid, mut rng) = setup(3, 3);
        let mut burning = registry.get(MaterialKind::BurningWood).clone();
        burning.emissions = vec![
            EmissionRule {
                kind: MaterialKind::Fire,
                probability: 1.0,
            },
            EmissionRule {
                kind: MaterialKind::Smoke,
                probability: 1.0,
            },
        ];
        registry.replace(burning);
        for pos in grid.positions().collect::<Vec<_>>() {
            place(&mut grid, &registry, pos.x, pos.y, MaterialKind::Wall);
        }
        place(&mut grid, &registry, 1, 1, MaterialKind::BurningWood);
        place(&mut grid, &registry, 2, 1, MaterialKind::Empty);

        let spawned = ChemistrySystem::attempt_emissions(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng);

        assert_eq!(spawned, 1);
        assert_eq!(count(&grid, MaterialKind::Fire) + count(&grid, MaterialKind::Smoke), 1);
        assert_eq!(count(&grid, MaterialKind::Empty), 0);
    }

    #[test]
    fn test_first_satisfied_reaction_wins() {
        let (mut registry, mut grid, mut rng) = setup(3, 3);
        let mut sand = registry.get(MaterialKind::Sand).clone();
        sand.reactions = vec![
            ReactionRule::new(1.0, &[MaterialKind::Fire], ReactionOutcome::new(MaterialKind::Stone)),
            ReactionRule::new(1.0, &[MaterialKind::Water], ReactionOutcome::new(MaterialKind::Dust)),
            ReactionRule::new(1.0, &[MaterialKind::Water], ReactionOutcome::new(MaterialKind::Ice)),
        ];
        registry.replace(sand);
        place(&mut grid, &registry, 1, 1, MaterialKind::Sand);
        place(&mut grid, &registry, 0, 1, MaterialKind::Water);

        assert!(ChemistrySystem::check_reactions(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng));
        assert_eq!(grid.kind_at(IVec2::ONE), Some(MaterialKind::Dust));
    }

    #[test]
    fn test_clone_remembers_first_neighbor() {
        let (registry, mut grid, mut rng) = setup(3, 3);
        place(&mut grid, &registry, 1, 1, MaterialKind::Clone);
        place(&mut grid, &registry, 0, 0, MaterialKind::Sand);
        place(&mut grid, &registry, 2, 2, MaterialKind::Water);

        assert!(ChemistrySystem::clone_neighbors(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng));
        // (0, 0) comes first in neighbor order
        assert_eq!(
            grid.get(IVec2::ONE).and_then(|c| c.remembered),
            Some(MaterialKind::Sand)
        );
        assert_eq!(count(&grid, MaterialKind::Sand), 2);
    }

    #[test]
    fn test_clone_memory_is_sticky() {
        let (registry, mut grid, mut rng) = setup(3, 3);
        place(&mut grid, &registry, 1, 1, MaterialKind::Clone);
        place(&mut grid, &registry, 0, 1, MaterialKind::Sand);

        ChemistrySystem::clone_neighbors(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng);

        // Wipe every neighbor, then surround with water on one side
        for pos in grid.neighbors(IVec2::ONE, Neighborhood::Moore) {
            grid.clear(pos);
        }
        place(&mut grid, &registry, 2, 1, MaterialKind::Water);

        assert!(ChemistrySystem::clone_neighbors(&mut grid, &registry, IVec2::ONE, &mut NoopStats, &mut rng));
        assert_eq!(count(&grid, MaterialKind::Sand), 1);
        assert_eq!(
            grid.get(IVec2::ONE).and_then(|c| c.remembered),
            Some(MaterialKind::Sand)
        );
    }

    #[test]
    fn test_clone_ignores_other_clones() {
        let (registry, mut grid, mut rng) = setup(3, 1);
        place(&mut grid, &registry, 0, 0, MaterialKind::Clone);
        place(&mut grid, &registry, 1, 0, MaterialKind::Clone);

        assert!(!ChemistrySystem::clone_neighbors(&mut grid, &registry, IVec2::X, &mut NoopStats, &mut rng));
        assert_eq!(grid.get(IVec2::X).and_then(|c| c.remembered), None);
    }
}
