//! Cell - one grid position's mutable simulation state

use crate::simulation::{MaterialKind, MaterialProfile};

/// Material plus the cell-local state that travels with it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub kind: MaterialKind,
    /// Kelvin
    pub temperature: f64,
    /// Heat accumulated during the pre-pass, applied and reset in the post-pass
    pub heat_received: f64,
    /// Sticky neighbor material for cloning cells
    pub remembered: Option<MaterialKind>,
}

impl Cell {
    /// Fresh cell of `profile` at its default temperature
    pub fn new(profile: &MaterialProfile) -> Self {
        Self {
            kind: profile.kind,
            temperature: profile.default_temperature,
            heat_received: 0.0,
            remembered: None,
        }
    }

    /// Fresh cell of `profile` that keeps this cell's temperature
    pub fn transmuted(&self, profile: &MaterialProfile) -> Self {
        Self {
            temperature: self.temperature,
            ..Self::new(profile)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }
}
