//! Material simulation data for Alembic
//!
//! This crate provides the immutable, per-material side of the simulation:
//! - Material identities and phases (MaterialKind, MaterialPhase)
//! - Per-material physical profiles and their registry (MaterialProfile, MaterialRegistry)
//! - Density-derived movement tables (MovementTable, MovementTier)
//! - Reaction and emission rules (ReactionRule, EmissionRule)
//! - Behavior flags and per-phase hook schedules (BehaviorFlags, Hook, HookSchedule)

mod behavior;
mod catalog;
mod jitter;
mod materials;
mod movement;
mod reactions;

pub use behavior::{BehaviorFlags, Hook, HookSchedule};
pub use jitter::{darken, roughly};
pub use materials::{
    CELSIUS_TO_KELVIN, Decay, MaterialInfo, MaterialKind, MaterialPhase, MaterialProfile,
    MaterialRegistry, Transition, UnknownMaterial,
};
pub use movement::{
    BAND_ANCHORS, COMPASS, MovementTable, MovementTier, interpolate_weights, normalize_weights,
    sample_weighted, smoothstep,
};
pub use reactions::{EmissionRule, ReactionOutcome, ReactionRule};
