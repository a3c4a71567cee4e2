//! Movement tables - density-derived direction preferences
//!
//! Every mobile material gets a table of probability tiers, built once from its
//! phase and density. Each tier groups the compass directions that ended up with
//! exactly the same probability; the engine samples a tier by its combined
//! weight, then tries the tier's directions in random order.

use glam::IVec2;
use rand::Rng;

use crate::MaterialPhase;

/// The eight compass directions, +y is up.
///
/// Order: up, up-left, up-right, left, right, down, down-left, down-right.
pub const COMPASS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(-1, 1),
    IVec2::new(1, 1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
    IVec2::new(1, -1),
];

/// Density anchors of the seven bands: extremely-light, very-light, light,
/// neutral, slightly-dense, very-dense, extremely-dense.
pub const BAND_ANCHORS: [f64; 7] = [0.01, 0.25, 1.0, 1.2, 1.4, 1000.0, 2000.0];

type BandCurve = [[f64; 8]; 7];

/// Shared by solids, powders, gases and plasma.
const STANDARD_BANDS: BandCurve = [
    [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
];

/// Dense fluids keep a little sideways spread so they still level out.
const FLUID_BANDS: BandCurve = [
    [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 0.1, 0.1, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 0.0001, 0.0001, 1.0, 0.1, 0.1],
];

fn bands_for(phase: MaterialPhase) -> Option<&'static BandCurve> {
    match phase {
        MaterialPhase::Empty => None,
        MaterialPhase::Fluid => Some(&FLUID_BANDS),
        MaterialPhase::Solid
        | MaterialPhase::Powder
        | MaterialPhase::Gas
        | MaterialPhase::Plasma => Some(&STANDARD_BANDS),
    }
}

/// Hermite ease: 0 below `edge0`, 1 above `edge1`, smooth in between.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Blend the phase's band curve at `density`.
///
/// Returns all zeros for the empty phase.
pub fn interpolate_weights(phase: MaterialPhase, density: f64) -> [f64; 8] {
    let Some(bands) = bands_for(phase) else {
        return [0.0; 8];
    };

    if density < BAND_ANCHORS[0] {
        return bands[0];
    }

    for band in 0..BAND_ANCHORS.len() - 1 {
        let (lo, hi) = (BAND_ANCHORS[band], BAND_ANCHORS[band + 1]);
        if density < hi {
            let t = smoothstep(lo, hi, density);
            let mut blended = [0.0; 8];
            for (i, w) in blended.iter_mut().enumerate() {
                *w = (1.0 - t) * bands[band][i] + t * bands[band + 1][i];
            }
            return blended;
        }
    }

    bands[BAND_ANCHORS.len() - 1]
}

/// Linear normalization: positive weights divided by the total, everything
/// else mapped to zero.
pub fn normalize_weights(weights: &[f64; 8]) -> [f64; 8] {
    let total: f64 = weights.iter().sum();
    let mut probabilities = [0.0; 8];
    if total <= 0.0 {
        return probabilities;
    }
    for (p, &w) in probabilities.iter_mut().zip(weights) {
        if w > 0.0 {
            *p = w / total;
        }
    }
    probabilities
}

/// Pick an index with probability proportional to its weight.
///
/// Returns `None` only when `weights` is empty.
pub fn sample_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    let target = if total > 0.0 {
        rng.gen_range(0.0..=total)
    } else {
        0.0
    };

    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if target <= cumulative {
            return Some(i);
        }
    }

    // Rounding left the draw just past the last bucket.
    Some(weights.len() - 1)
}

/// A group of directions sharing one exact probability.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementTier {
    /// Sum of the member directions' probabilities
    pub weight: f64,
    /// Member directions (unit compass offsets)
    pub directions: Vec<IVec2>,
}

/// Ordered probability tiers for one material, heaviest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovementTable {
    tiers: Vec<MovementTier>,
}

impl MovementTable {
    /// A table with no directions; the material never moves on its own.
    pub fn immobile() -> Self {
        Self::default()
    }

    /// Build the table for a phase and density.
    pub fn for_phase(phase: MaterialPhase, density: f64) -> Self {
        let probabilities = normalize_weights(&interpolate_weights(phase, density));

        let mut ranked: Vec<(IVec2, f64)> = COMPASS
            .iter()
            .zip(probabilities)
            .filter(|(_, p)| *p > 0.0)
            .map(|(dir, p)| (*dir, p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut tiers: Vec<(f64, MovementTier)> = Vec::new();
        for (direction, probability) in ranked {
            match tiers.last_mut() {
                Some((tier_probability, tier)) if *tier_probability == probability => {
                    tier.weight += probability;
                    tier.directions.push(direction);
                }
                _ => tiers.push((
                    probability,
                    MovementTier {
                        weight: probability,
                        directions: vec![direction],
                    },
                )),
            }
        }

        Self {
            tiers: tiers.into_iter().map(|(_, tier)| tier).collect(),
        }
    }

    pub fn tiers(&self) -> &[MovementTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Every direction in the table, tier by tier.
    pub fn directions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiers.iter().flat_map(|t| t.directions.iter().copied())
    }
}
