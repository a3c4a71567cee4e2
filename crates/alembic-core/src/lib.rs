//! Alembic simulation engine
//!
//! A dense 2D grid of cells updated once per tick: density-driven movement,
//! two-pass heat exchange, temperature transitions, stochastic reactions,
//! decay and emission. [`world::World`] owns the grid, the material registry
//! and the random stream; rendering and input live outside this crate and talk
//! to it through [`world::World::tick`], [`world::World::cell_at`],
//! [`world::World::set_cell`] and [`world::World::list_materials`].

pub mod config;
pub mod error;
pub mod simulation;
pub mod world;

pub use config::SimConfig;
pub use error::SimError;
pub use world::World;
