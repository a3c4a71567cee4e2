//! Heat exchange between two neighboring cells
//!
//! The exchange is symmetric: both cells read each other's current
//! temperature, and each side's share is scaled by the ratio of heat
//! capacities so that equal-capacity pairs conserve energy exactly.

/// Thermal state of one side of an exchange
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalSample {
    pub temperature: f64,
    pub conductivity: f64,
    pub heat_capacity: f64,
}

/// Pending-heat adjustments produced by one exchange
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatShare {
    /// Added to the visiting cell's pending heat
    pub to_current: f64,
    /// Added to the neighbor's pending heat
    pub to_neighbor: f64,
}

impl HeatShare {
    pub const NONE: HeatShare = HeatShare {
        to_current: 0.0,
        to_neighbor: 0.0,
    };
}

/// Heat flowing from `current` to `neighbor`, normalized by how many
/// neighbors `current` exchanges with in total.
pub fn heat_exchange(
    current: ThermalSample,
    neighbor: ThermalSample,
    neighbor_count: usize,
) -> HeatShare {
    let total_capacity = current.heat_capacity + neighbor.heat_capacity;
    if total_capacity <= 0.0
        || neighbor_count == 0
        || current.heat_capacity <= 0.0
        || neighbor.heat_capacity <= 0.0
    {
        return HeatShare::NONE;
    }

    let delta = current.temperature - neighbor.temperature;
    let combined_conductivity = current.conductivity.min(neighbor.conductivity);
    let transfer = combined_conductivity * delta;
    let exchange = (0.5 * transfer / total_capacity) / neighbor_count as f64;

    HeatShare {
        to_current: -exchange * (neighbor.heat_capacity / current.heat_capacity),
        to_neighbor: exchange * (current.heat_capacity / neighbor.heat_capacity),
    }
}
