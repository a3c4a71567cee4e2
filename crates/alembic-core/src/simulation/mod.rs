//! Simulation rules - heat exchange math and temperature transitions

pub mod heat;
pub mod state_changes;

// Re-export from alembic-simulation so engine code has one import path
pub use alembic_simulation::{
    BehaviorFlags, CELSIUS_TO_KELVIN, COMPASS, Decay, EmissionRule, Hook, HookSchedule,
    MaterialInfo, MaterialKind, MaterialPhase, MaterialProfile, MaterialRegistry, MovementTable,
    MovementTier, ReactionOutcome, ReactionRule, Transition, UnknownMaterial, roughly,
    sample_weighted,
};

pub use heat::heat_exchange;
pub use state_changes::StateChangeSystem;
