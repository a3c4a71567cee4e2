//! Thermal system - two-pass heat exchange and temperature transitions
//!
//! The pre-pass only accumulates into `heat_received`, reading neighbors'
//! current temperatures. The post-pass applies the accumulated heat and checks
//! the transition points of the cell's material.

use glam::IVec2;

use super::grid::{Grid, Neighborhood};
use crate::simulation::{
    MaterialRegistry, StateChangeSystem,
    heat::{ThermalSample, heat_exchange},
};
use crate::world::SimStats;

pub struct ThermalSystem;

impl ThermalSystem {
    /// Pre-pass: accumulate heat flowing between `pos` and its conducting neighbors
    pub fn exchange_heat(grid: &mut Grid, registry: &MaterialRegistry, pos: IVec2) {
        let Some(cell) = grid.get(pos).copied() else {
            return;
        };
        let profile = registry.get(cell.kind);
        if !profile.conducts_heat() {
            return;
        }

        let current = ThermalSample {
            temperature: cell.temperature,
            conductivity: profile.conductivity,
            heat_capacity: profile.heat_capacity,
        };

        let neighbors = grid.neighbors(pos, Neighborhood::Moore);
        let neighbor_count = neighbors.len();
        let mut received = 0.0;

        for n in neighbors {
            let Some(neighbor) = grid.get_mut(n) else {
                continue;
            };
            let neighbor_profile = registry.get(neighbor.kind);
            if !neighbor_profile.conducts_heat() {
                continue;
            }

            let share = heat_exchange(
                current,
                ThermalSample {
                    temperature: neighbor.temperature,
                    conductivity: neighbor_profile.conductivity,
                    heat_capacity: neighbor_profile.heat_capacity,
                },
                neighbor_count,
            );
            neighbor.heat_received += share.to_neighbor;
            received += share.to_current;
        }

        if let Some(cell) = grid.get_mut(pos) {
            cell.heat_received += received;
        }
    }

    /// Post-pass: apply pending heat, then convert the cell if it crossed a
    /// transition point. Returns whether the material changed.
    pub fn apply_heat(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        stats: &mut dyn SimStats,
    ) -> bool {
        let Some(cell) = grid.get_mut(pos) else {
            return false;
        };
        cell.temperature += cell.heat_received;
        cell.heat_received = 0.0;

        let profile = registry.get(cell.kind);
        match StateChangeSystem::check_transition(profile, cell.temperature) {
            Some(into) => {
                grid.convert(pos, registry.get(into), true);
                stats.record_state_change();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialKind;
    use crate::world::{Cell, NoopStats, TickStats};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn setup(width: usize, height: usize, thermal_detail: bool) -> (MaterialRegistry, Grid) {
        let mut rng = Xoshiro256StarStar::seed_from_u64(31);
        let registry = MaterialRegistry::new(&mut rng, thermal_detail);
        let grid = Grid::new(width, height, registry.get(MaterialKind::Empty));
        (registry, grid)
    }

    fn place_at(grid: &mut Grid, registry: &MaterialRegistry, pos: IVec2, kind: MaterialKind, kelvin: f64) {
        let mut cell = Cell::new(registry.get(kind));
        cell.temperature = kelvin;
        grid.set(pos, cell);
    }

    fn temperature(grid: &Grid, pos: IVec2) -> f64 {
        grid.get(pos).map(|c| c.temperature).unwrap_or(f64::NAN)
    }

    fn full_pass(grid: &mut Grid, registry: &MaterialRegistry) {
        let positions: Vec<IVec2> = grid.positions().collect();
        for &pos in &positions {
            ThermalSystem::exchange_heat(grid, registry, pos);
        }
        for &pos in &positions {
            ThermalSystem::apply_heat(grid, registry, pos, &mut NoopStats);
        }
    }

    #[test]
    fn test_two_cell_exchange_conserves_energy() {
        let (registry, mut grid) = setup(2, 1, false);
        let a = IVec2::new(0, 0);
        let b = IVec2::new(1, 0);
        place_at(&mut grid, &registry, a, MaterialKind::Stone, 400.0);
        place_at(&mut grid, &registry, b, MaterialKind::Stone, 300.0);

        full_pass(&mut grid, &registry);

        let total = temperature(&grid, a) + temperature(&grid, b);
        assert!((total - 700.0).abs() < 1e-9, "total {total}");
        assert!(temperature(&grid, a) < 400.0);
        assert!(temperature(&grid, b) > 300.0);
    }

    #[test]
    fn test_pending_heat_is_reset_after_apply() {
        let (registry, mut grid) = setup(2, 1, false);
        place_at(&mut grid, &registry, IVec2::ZERO, MaterialKind::Stone, 400.0);
        place_at(&mut grid, &registry, IVec2::X, MaterialKind::Stone, 300.0);

        full_pass(&mut grid, &registry);
        assert!(grid.cells().iter().all(|c| c.heat_received == 0.0));
    }

    #[test]
    fn test_insulator_blocks_exchange() {
        let (registry, mut grid) = setup(3, 1, false);
        place_at(&mut grid, &registry, IVec2::new(0, 0), MaterialKind::Stone, 900.0);
        place_at(&mut grid, &registry, IVec2::new(1, 0), MaterialKind::Wall, 300.0);
        place_at(&mut grid, &registry, IVec2::new(2, 0), MaterialKind::Stone, 300.0);

        full_pass(&mut grid, &registry);

        assert_eq!(temperature(&grid, IVec2::new(0, 0)), 900.0);
        assert_eq!(temperature(&grid, IVec2::new(1, 0)), 300.0);
        assert_eq!(temperature(&grid, IVec2::new(2, 0)), 300.0);
    }

    #[test]
    fn test_hot_water_boils_preserving_temperature() {
        let (registry, mut grid) = setup(1, 1, false);
        place_at(&mut grid, &registry, IVec2::ZERO, MaterialKind::Water, 500.0);

        let mut stats = TickStats::default();
        assert!(ThermalSystem::apply_heat(&mut grid, &registry, IVec2::ZERO, &mut stats));
        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::Steam));
        assert_eq!(temperature(&grid, IVec2::ZERO), 500.0);
        assert_eq!(stats.state_changes, 1);
    }

    #[test]
    fn test_cold_water_freezes() {
        let (registry, mut grid) = setup(1, 1, true);
        place_at(&mut grid, &registry, IVec2::ZERO, MaterialKind::Water, 200.0);

        assert!(ThermalSystem::apply_heat(&mut grid, &registry, IVec2::ZERO, &mut NoopStats));
        assert_eq!(grid.kind_at(IVec2::ZERO), Some(MaterialKind::Ice));
    }

    #[test]
    fn test_heat_spreads_into_cold_neighbor_with_detail() {
        let (registry, mut grid) = setup(2, 1, true);
        place_at(&mut grid, &registry, IVec2::ZERO, MaterialKind::Diamond, 600.0);
        place_at(&mut grid, &registry, IVec2::X, MaterialKind::Sand, 300.0);

        full_pass(&mut grid, &registry);
        assert!(temperature(&grid, IVec2::ZERO) < 600.0);
        assert!(temperature(&grid, IVec2::X) > 300.0);
    }
}
