//! World - grid, cells and the per-tick systems

mod cell;
mod chemistry_system;
pub mod edit;
mod grid;
mod movement_system;
pub mod rng_trait;
pub mod stats;
mod thermal_system;
#[allow(clippy::module_inception)]
mod world;

pub use cell::Cell;
pub use chemistry_system::ChemistrySystem;
pub use edit::{EditIntent, Palette};
pub use grid::{Grid, Neighborhood, Neighbors};
pub use movement_system::{BUOYANCY_THRESHOLD, MovementSystem, Step};
pub use rng_trait::SimRng;
pub use stats::{NoopStats, SimStats, TickStats};
pub use thermal_system::ThermalSystem;
pub use world::{CellSnapshot, World};
