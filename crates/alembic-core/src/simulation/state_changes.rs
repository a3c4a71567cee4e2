//! State change system
//!
//! Handles material transitions based on temperature:
//! - Lower transitions (water → ice, lava → stone, steam → water)
//! - Upper transitions (ice → water, water → steam, wood → burning wood)

use crate::simulation::{MaterialKind, MaterialProfile};

/// System for checking temperature transitions
pub struct StateChangeSystem;

impl StateChangeSystem {
    /// Material a cell of `material` should turn into at `temperature`, if any
    ///
    /// The lower point is checked first; at most one transition applies.
    pub fn check_transition(material: &MaterialProfile, temperature: f64) -> Option<MaterialKind> {
        if let Some(lower) = material.lower_transition
            && temperature < lower.point
        {
            return Some(lower.into);
        }

        if let Some(upper) = material.upper_transition
            && temperature > upper.point
        {
            return Some(upper.into);
        }

        None
    }
}
