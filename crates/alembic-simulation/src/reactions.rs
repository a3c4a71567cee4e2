//! Reaction and emission rules
//!
//! A reaction turns a cell into another material when every required
//! neighbor material is present and a per-tick roll succeeds. An emission
//! spawns a new particle into an empty neighbor.

use crate::MaterialKind;

/// What a cell becomes when a reaction fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionOutcome {
    pub kind: MaterialKind,
    /// Forced resulting temperature (Kelvin). Jittered when applied and never
    /// lowers the cell's prior temperature.
    pub temperature: Option<f64>,
}

impl ReactionOutcome {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            temperature: None,
        }
    }

    pub fn at(kind: MaterialKind, temperature: f64) -> Self {
        Self {
            kind,
            temperature: Some(temperature),
        }
    }
}

/// A neighbor-gated, stochastic material change.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactionRule {
    /// Probability per tick (0.0 - 1.0)
    pub probability: f64,
    /// Materials that must all appear in the Moore neighborhood
    pub requires: Vec<MaterialKind>,
    /// Possible outcomes; only the first is applied
    pub outcomes: Vec<ReactionOutcome>,
}

impl ReactionRule {
    pub fn new(probability: f64, requires: &[MaterialKind], outcome: ReactionOutcome) -> Self {
        Self {
            probability,
            requires: requires.to_vec(),
            outcomes: vec![outcome],
        }
    }

    /// True when every required material is somewhere in `neighbors`.
    pub fn prerequisites_met(&self, neighbors: &[MaterialKind]) -> bool {
        self.requires.iter().all(|req| neighbors.contains(req))
    }

    pub fn outcome(&self) -> Option<&ReactionOutcome> {
        self.outcomes.first()
    }
}

/// Spawns `kind` into an empty neighbor with `probability` per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionRule {
    pub kind: MaterialKind,
    pub probability: f64,
}
