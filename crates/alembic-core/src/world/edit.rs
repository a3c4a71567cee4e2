//! Edit intents and the material palette
//!
//! Input handling lives outside the engine; it translates key presses and
//! mouse actions into [`EditIntent`]s which [`crate::World::apply`] executes.

use serde::{Deserialize, Serialize};

use crate::simulation::{MaterialInfo, MaterialKind};

/// A user edit forwarded to the world
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EditIntent {
    /// Fill the empty cells of a square brush with `kind`
    Place {
        x: i32,
        y: i32,
        radius: u32,
        kind: MaterialKind,
    },
    /// Reset every cell of a square brush to empty
    Erase { x: i32, y: i32, radius: u32 },
    /// Fill the outermost ring of the grid
    SetBorder(MaterialKind),
    /// Reset the whole grid
    Clear,
    SelectNext,
    SelectPrevious,
    Select(MaterialKind),
    /// Select the material under a non-empty cell
    PickFrom { x: i32, y: i32 },
    TogglePause,
    /// Pause and run exactly one tick
    Step,
}

/// Ordered, wrapping selection over the pickable materials
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    materials: Vec<MaterialKind>,
    selected: usize,
}

impl Palette {
    pub fn new(materials: &[MaterialInfo]) -> Self {
        Self {
            materials: materials.iter().map(|info| info.kind).collect(),
            selected: 0,
        }
    }

    /// Currently selected material, EMPTY for an empty palette
    pub fn selected(&self) -> MaterialKind {
        self.materials
            .get(self.selected)
            .copied()
            .unwrap_or(MaterialKind::Empty)
    }

    pub fn select_next(&mut self) {
        if !self.materials.is_empty() {
            self.selected = (self.selected + 1) % self.materials.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.materials.is_empty() {
            self.selected = (self.selected + self.materials.len() - 1) % self.materials.len();
        }
    }

    /// Select `kind`; returns false if it is not in the palette
    pub fn select(&mut self, kind: MaterialKind) -> bool {
        match self.materials.iter().position(|&k| k == kind) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn materials(&self) -> &[MaterialKind] {
        &self.materials
    }
}
