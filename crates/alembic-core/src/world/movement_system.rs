//! Movement system - density-driven relocation, swapping and erasure
//!
//! A mobile cell samples one direction tier at a time (weighted by the tier's
//! combined probability), tries the tier's directions in random order and
//! drops the tier when none of them works. At most one relocation, swap or
//! erasure happens per cell per call.

use glam::IVec2;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use super::grid::Grid;
use crate::simulation::{MaterialKind, MaterialPhase, MaterialProfile, MaterialRegistry, sample_weighted};
use crate::world::{SimRng, SimStats};

/// Movers lighter than this rise through denser neighbors instead of sinking
pub const BUOYANCY_THRESHOLD: f64 = 1.2;

/// One probe of a recursive step chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Where the moving cell sits
    pub origin: IVec2,
    /// Position the direction is applied to
    pub probe: IVec2,
    pub direction: IVec2,
    pub depth: u32,
    /// Non-fluid neighbors pushed past while sliding sideways
    pub times_swapped: u32,
}

impl Step {
    pub fn new(origin: IVec2, direction: IVec2) -> Self {
        Self {
            origin,
            probe: origin,
            direction,
            depth: 0,
            times_swapped: 0,
        }
    }

    /// Continue sideways from `target`
    fn slide_from(self, target: IVec2, past_non_fluid: bool) -> Self {
        Self {
            origin: self.origin,
            probe: target,
            direction: IVec2::new(self.direction.x, 0),
            depth: self.depth + 1,
            times_swapped: self.times_swapped + u32::from(past_non_fluid),
        }
    }
}

/// Movement system - moves mobile cells according to their movement tables
pub struct MovementSystem;

impl MovementSystem {
    /// Try to move the cell at `pos` once; returns whether anything happened.
    pub fn move_cell<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        pos: IVec2,
        max_depth: u32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let Some(kind) = grid.kind_at(pos) else {
            return false;
        };
        let mover = registry.get(kind);
        let tiers = mover.movement.tiers();

        let mut remaining: SmallVec<[usize; 8]> = (0..tiers.len()).collect();
        while !remaining.is_empty() {
            let weights: SmallVec<[f64; 8]> = remaining.iter().map(|&i| tiers[i].weight).collect();
            let Some(choice) = sample_weighted(&weights, rng) else {
                break;
            };
            let tier = &tiers[remaining[choice]];

            let mut order: SmallVec<[usize; 8]> = (0..tier.directions.len()).collect();
            order.shuffle(rng);

            for i in order {
                let step = Step::new(pos, tier.directions[i]);
                if Self::step_in_direction(grid, registry, mover, step, max_depth, rng) {
                    stats.record_cell_moved();
                    return true;
                }
            }

            remaining.remove(choice);
        }

        false
    }

    /// Attempt a single directional step for `mover`, recursing sideways for
    /// fluids. Only the first probe of a chain may swap.
    pub fn step_in_direction<R: SimRng + ?Sized>(
        grid: &mut Grid,
        registry: &MaterialRegistry,
        mover: &MaterialProfile,
        step: Step,
        max_depth: u32,
        rng: &mut R,
    ) -> bool {
        if step.depth > max_depth {
            return false;
        }

        let target = step.probe + step.direction;
        let Some(target_kind) = grid.kind_at(target) else {
            return false;
        };

        match target_kind {
            MaterialKind::Empty => {
                // A chain that already slid past a non-fluid never lands
                step.times_swapped == 0 && grid.relocate(step.origin, target)
            }
            MaterialKind::Eraser => grid.clear(step.origin),
            _ => {
                let occupant = registry.get(target_kind);
                if !occupant.is_mobile() {
                    return false;
                }

                if mover.phase == MaterialPhase::Fluid && step.direction.x != 0 {
                    let slide = step.slide_from(target, occupant.phase != MaterialPhase::Fluid);
                    if Self::step_in_direction(grid, registry, mover, slide, max_depth, rng) {
                        return true;
                    }
                }

                if step.depth != 0 {
                    return false;
                }

                Self::try_density_swap(grid, mover.density, occupant.density, step.origin, target, rng)
            }
        }
    }

    /// Swap `origin` and `target` with a probability driven by their density ratio
    fn try_density_swap<R: SimRng + ?Sized>(
        grid: &mut Grid,
        mover_density: f64,
        occupant_density: f64,
        origin: IVec2,
        target: IVec2,
        rng: &mut R,
    ) -> bool {
        if mover_density <= 0.0 || occupant_density <= 0.0 || mover_density == occupant_density {
            return false;
        }

        let lighter = mover_density.min(occupant_density);
        let denser = mover_density.max(occupant_density);
        let ratio = lighter / denser;

        let (probability, direction_ok) = if mover_density < BUOYANCY_THRESHOLD {
            (ratio, mover_density == lighter)
        } else {
            (1.0 - ratio, mover_density == denser)
        };

        rng.gen_unit() < probability && direction_ok && grid.swap(origin, target)
    }
}
