//! World - owns the grid, the material registry and the random stream
//!
//! A tick visits every position three times (pre, main and post sweep) in one
//! shuffled order that is reused by all three sweeps and reshuffled on the
//! next tick. Writes are immediate: a cell moved earlier in a sweep can be
//! moved again by a later visit.

use glam::IVec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;

use super::cell::Cell;
use super::chemistry_system::ChemistrySystem;
use super::edit::{EditIntent, Palette};
use super::grid::Grid;
use super::movement_system::MovementSystem;
use super::thermal_system::ThermalSystem;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::simulation::{CELSIUS_TO_KELVIN, Hook, MaterialInfo, MaterialKind, MaterialRegistry};
use crate::world::{SimRng, SimStats, TickStats};

/// Read-only view of one cell for rendering and inspection
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub kind: MaterialKind,
    pub name: &'static str,
    pub color: [u8; 4],
    /// Kelvin
    pub temperature: f64,
    pub density: f64,
    pub conducts_heat: bool,
}

impl CellSnapshot {
    /// One-line description, e.g. `WATER, Temp: 30.00C, Density: 998.000`
    pub fn describe(&self) -> String {
        let mut out = self.name.to_string();
        if self.conducts_heat {
            out.push_str(&format!(
                ", Temp: {:.2}C",
                self.temperature - CELSIUS_TO_KELVIN
            ));
        }
        if self.density != 0.0 {
            out.push_str(&format!(", Density: {:.3}", self.density));
        }
        out
    }
}

/// The simulation context
pub struct World {
    config: SimConfig,
    registry: MaterialRegistry,
    grid: Grid,
    /// Visit order, reshuffled every tick
    positions: Vec<IVec2>,
    rng: Xoshiro256StarStar,
    palette: Palette,
    paused: bool,
    step_requested: bool,
    tick_count: u64,
    last_tick_stats: TickStats,
}

impl World {
    /// Build an empty world. The seeded stream builds the material registry
    /// first and then drives every tick.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        let registry = MaterialRegistry::new(&mut rng, config.thermal_detail);
        let grid = Grid::new(
            config.width,
            config.height,
            registry.get(MaterialKind::Empty),
        );
        let positions = grid.positions().collect();
        let palette = Palette::new(&registry.list_materials());

        log::info!(
            "Created {}x{} world (seed: {}, max step depth: {})",
            config.width,
            config.height,
            config.seed,
            config.max_step_depth
        );

        Ok(Self {
            config,
            registry,
            grid,
            positions,
            rng,
            palette,
            paused: false,
            step_requested: false,
            tick_count: 0,
            last_tick_stats: TickStats::default(),
        })
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self) {
        let mut stats = TickStats::default();
        self.positions.shuffle(&mut self.rng);

        let Self {
            config,
            registry,
            grid,
            positions,
            rng,
            ..
        } = self;
        let registry: &MaterialRegistry = registry;

        // Pre sweep: heat accumulation
        for &pos in positions.iter() {
            let Some(kind) = grid.kind_at(pos) else {
                continue;
            };
            for &hook in &registry.get(kind).hooks.pre {
                run_hook(hook, grid, registry, pos, &mut stats, rng);
            }
        }

        // Main sweep: movement, then hooks of whatever now occupies the position
        for &pos in positions.iter() {
            if grid.kind_at(pos).is_some_and(|kind| !kind.is_empty()) {
                MovementSystem::move_cell(
                    grid,
                    registry,
                    pos,
                    config.max_step_depth,
                    &mut stats,
                    rng,
                );
            }
            let Some(kind) = grid.kind_at(pos) else {
                continue;
            };
            for &hook in &registry.get(kind).hooks.main {
                run_hook(hook, grid, registry, pos, &mut stats, rng);
            }
        }

        // Post sweep: at most one material change per visit
        for &pos in positions.iter() {
            let Some(kind) = grid.kind_at(pos) else {
                continue;
            };
            for &hook in &registry.get(kind).hooks.post {
                if run_hook(hook, grid, registry, pos, &mut stats, rng) {
                    break;
                }
            }
        }

        self.tick_count += 1;
        self.last_tick_stats = stats;

        log::debug!(
            "Tick {}: {} moved, {} state changes, {} reactions, {} decays, {} emissions",
            self.tick_count,
            stats.cells_moved,
            stats.state_changes,
            stats.reactions,
            stats.decays,
            stats.emissions
        );
    }

    /// Tick unless paused; a requested single step runs even while paused.
    /// Returns whether a tick ran.
    pub fn advance(&mut self) -> bool {
        if self.paused && !self.step_requested {
            return false;
        }
        self.tick();
        self.step_requested = false;
        true
    }

    /// Snapshot of the cell at (`x`, `y`), `None` outside the grid
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellSnapshot> {
        let cell = self.grid.get(IVec2::new(x, y))?;
        let profile = self.registry.get(cell.kind);
        Some(CellSnapshot {
            kind: cell.kind,
            name: profile.name,
            color: profile.color,
            temperature: cell.temperature,
            density: profile.density,
            conducts_heat: profile.conducts_heat(),
        })
    }

    /// Overwrite a cell with a fresh `kind` cell at its default temperature
    pub fn set_cell(&mut self, x: i32, y: i32, kind: MaterialKind) -> SimResult<()> {
        let cell = Cell::new(self.registry.get(kind));
        if self.grid.set(IVec2::new(x, y), cell) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds { x, y })
        }
    }

    /// [`World::set_cell`] with a material name such as `"burning wood"`
    pub fn set_cell_named(&mut self, x: i32, y: i32, name: &str) -> SimResult<()> {
        let kind: MaterialKind = name.parse()?;
        self.set_cell(x, y, kind)
    }

    /// Overwrite a cell's temperature (Kelvin)
    pub fn set_temperature(&mut self, x: i32, y: i32, kelvin: f64) -> SimResult<()> {
        let cell = self
            .grid
            .get_mut(IVec2::new(x, y))
            .ok_or(SimError::OutOfBounds { x, y })?;
        cell.temperature = kelvin;
        Ok(())
    }

    /// Pickable materials for UI palettes (EMPTY excluded)
    pub fn list_materials(&self) -> Vec<MaterialInfo> {
        self.registry.list_materials()
    }

    /// Execute a user edit
    pub fn apply(&mut self, intent: EditIntent) -> SimResult<()> {
        match intent {
            EditIntent::Place { x, y, radius, kind } => {
                self.paint(x, y, radius, kind);
            }
            EditIntent::Erase { x, y, radius } => {
                self.erase(x, y, radius);
            }
            EditIntent::SetBorder(kind) => self.set_border(kind),
            EditIntent::Clear => self.clear(),
            EditIntent::SelectNext => self.palette.select_next(),
            EditIntent::SelectPrevious => self.palette.select_previous(),
            EditIntent::Select(kind) => {
                if !self.palette.select(kind) {
                    log::warn!("{kind} is not a pickable material");
                }
            }
            EditIntent::PickFrom { x, y } => {
                let Some(kind) = self.grid.kind_at(IVec2::new(x, y)) else {
                    log::warn!("Ignoring pick outside the grid at ({x}, {y})");
                    return Err(SimError::OutOfBounds { x, y });
                };
                if !kind.is_empty() {
                    self.palette.select(kind);
                }
            }
            EditIntent::TogglePause => self.paused = !self.paused,
            EditIntent::Step => {
                self.paused = true;
                self.step_requested = true;
            }
        }
        Ok(())
    }

    /// Fill the empty cells of a square brush with `kind`; returns cells written
    pub fn paint(&mut self, x: i32, y: i32, radius: u32, kind: MaterialKind) -> usize {
        let cell = Cell::new(self.registry.get(kind));
        let targets: Vec<IVec2> = self
            .grid
            .brush(IVec2::new(x, y), radius)
            .filter(|&p| self.grid.kind_at(p).is_some_and(MaterialKind::is_empty))
            .collect();
        for &pos in &targets {
            self.grid.set(pos, cell);
        }
        targets.len()
    }

    /// Clear a square brush; returns cells cleared
    pub fn erase(&mut self, x: i32, y: i32, radius: u32) -> usize {
        let targets: Vec<IVec2> = self.grid.brush(IVec2::new(x, y), radius).collect();
        for &pos in &targets {
            self.grid.clear(pos);
        }
        targets.len()
    }

    /// Fill the outermost ring of the grid with `kind`
    pub fn set_border(&mut self, kind: MaterialKind) {
        let cell = Cell::new(self.registry.get(kind));
        let (max_x, max_y) = (
            self.grid.width() as i32 - 1,
            self.grid.height() as i32 - 1,
        );
        let ring: Vec<IVec2> = self
            .grid
            .positions()
            .filter(|p| p.x == 0 || p.y == 0 || p.x == max_x || p.y == max_y)
            .collect();
        for pos in ring {
            self.grid.set(pos, cell);
        }
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.grid.clear_all();
    }

    /// Number of non-empty cells
    pub fn particle_count(&self) -> usize {
        self.grid.cells().iter().filter(|c| !c.is_empty()).count()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Counters of the most recent tick
    pub fn last_tick_stats(&self) -> TickStats {
        self.last_tick_stats
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Material currently selected in the palette
    pub fn selected(&self) -> MaterialKind {
        self.palette.selected()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Dispatch one hook for the cell at `pos`; returns whether its material changed
fn run_hook<R: SimRng + ?Sized>(
    hook: Hook,
    grid: &mut Grid,
    registry: &MaterialRegistry,
    pos: IVec2,
    stats: &mut dyn SimStats,
    rng: &mut R,
) -> bool {
    match hook {
        Hook::ExchangeHeat => {
            ThermalSystem::exchange_heat(grid, registry, pos);
            false
        }
        Hook::ApplyHeat => ThermalSystem::apply_heat(grid, registry, pos, stats),
        Hook::Decay => ChemistrySystem::check_decay(grid, registry, pos, stats, rng),
        Hook::React => ChemistrySystem::check_reactions(grid, registry, pos, stats, rng),
        Hook::Emit => {
            ChemistrySystem::attempt_emissions(grid, registry, pos, stats, rng);
            false
        }
        Hook::Clone => {
            ChemistrySystem::clone_neighbors(grid, registry, pos, stats, rng);
            false
        }
    }
}
