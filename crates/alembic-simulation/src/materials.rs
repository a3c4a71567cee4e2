//! Material definitions and registry

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{self, MaterialSpec};
use crate::jitter::{darken, roughly};
use crate::{BehaviorFlags, EmissionRule, HookSchedule, MovementTable, ReactionRule};

/// Offset between Celsius and Kelvin
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Every material the simulation knows about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaterialKind {
    Empty,
    Sand,
    Water,
    Methane,
    Fire,
    Smoke,
    Steam,
    Stone,
    Dust,
    Lava,
    Clone,
    Ice,
    Plasma,
    Wall,
    Diamond,
    Mercury,
    Oil,
    Eraser,
    Wood,
    BurningWood,
}

impl MaterialKind {
    pub const COUNT: usize = 20;

    pub const ALL: [MaterialKind; Self::COUNT] = [
        MaterialKind::Empty,
        MaterialKind::Sand,
        MaterialKind::Water,
        MaterialKind::Methane,
        MaterialKind::Fire,
        MaterialKind::Smoke,
        MaterialKind::Steam,
        MaterialKind::Stone,
        MaterialKind::Dust,
        MaterialKind::Lava,
        MaterialKind::Clone,
        MaterialKind::Ice,
        MaterialKind::Plasma,
        MaterialKind::Wall,
        MaterialKind::Diamond,
        MaterialKind::Mercury,
        MaterialKind::Oil,
        MaterialKind::Eraser,
        MaterialKind::Wood,
        MaterialKind::BurningWood,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == MaterialKind::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Empty => "EMPTY",
            MaterialKind::Sand => "SAND",
            MaterialKind::Water => "WATER",
            MaterialKind::Methane => "METHANE",
            MaterialKind::Fire => "FIRE",
            MaterialKind::Smoke => "SMOKE",
            MaterialKind::Steam => "STEAM",
            MaterialKind::Stone => "STONE",
            MaterialKind::Dust => "DUST",
            MaterialKind::Lava => "LAVA",
            MaterialKind::Clone => "CLONE",
            MaterialKind::Ice => "ICE",
            MaterialKind::Plasma => "PLASMA",
            MaterialKind::Wall => "WALL",
            MaterialKind::Diamond => "DIAMOND",
            MaterialKind::Mercury => "MERCURY",
            MaterialKind::Oil => "OIL",
            MaterialKind::Eraser => "ERASER",
            MaterialKind::Wood => "WOOD",
            MaterialKind::BurningWood => "BURNING_WOOD",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A material name that matches no catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material: {0:?}")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialKind {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace([' ', '-'], "_");
        MaterialKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}

/// Physical phase class; selects the movement curve family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialPhase {
    /// Nothing there
    Empty,
    /// Holds its shape (stone, wood, walls)
    Solid,
    /// Falls and piles up (sand, dust)
    Powder,
    /// Flows and levels out (water, oil, lava)
    Fluid,
    /// Rises and disperses (steam, smoke)
    Gas,
    Plasma,
}

/// Temperature threshold at which a material turns into another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Kelvin
    pub point: f64,
    pub into: MaterialKind,
}

/// Spontaneous end-of-life conversion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decay {
    /// Probability per tick (0.0 - 1.0)
    pub probability: f64,
    pub into: MaterialKind,
}

/// Immutable physical and behavioral profile of one material
#[derive(Clone, Debug)]
pub struct MaterialProfile {
    pub kind: MaterialKind,
    pub name: &'static str,
    /// Catalog color (RGBA) before darkening jitter
    pub base_color: [u8; 4],
    /// Color used for drawing (RGBA)
    pub color: [u8; 4],
    pub phase: MaterialPhase,

    /// Relative density; drives movement tables and swaps
    pub density: f64,
    pub conductivity: f64,
    pub heat_capacity: f64,
    /// Temperature of a freshly placed particle (Kelvin)
    pub default_temperature: f64,

    // Unset transitions are unreachable
    pub lower_transition: Option<Transition>,
    pub upper_transition: Option<Transition>,
    pub decay: Option<Decay>,

    pub reactions: Vec<ReactionRule>,
    pub emissions: Vec<EmissionRule>,
    pub movement: MovementTable,

    pub flags: BehaviorFlags,
    pub hooks: HookSchedule,
    /// Shown in material pickers
    pub pickable: bool,
}

impl MaterialProfile {
    /// Build a profile from its catalog entry, applying jitter.
    pub(crate) fn from_spec<R: Rng + ?Sized>(
        spec: MaterialSpec,
        rng: &mut R,
        thermal_detail: bool,
    ) -> Self {
        let movement = if spec.mobile {
            MovementTable::for_phase(spec.phase, spec.density)
        } else {
            MovementTable::immobile()
        };

        let reactions: Vec<ReactionRule> = spec
            .reactions
            .into_iter()
            .map(|mut rule| {
                rule.probability = roughly(rng, rule.probability, 0.1);
                rule
            })
            .collect();

        let emissions: Vec<EmissionRule> = spec
            .emissions
            .into_iter()
            .map(|mut emission| {
                emission.probability = roughly(rng, emission.probability, 0.1);
                emission
            })
            .collect();

        let decay = spec.decay.map(|decay| Decay {
            probability: roughly(rng, decay.probability, 0.1),
            into: decay.into,
        });

        let (mut conductivity, mut heat_capacity) = match spec.detailed_thermal {
            Some(detail) if thermal_detail => detail,
            _ => (spec.conductivity, spec.heat_capacity),
        };

        let conducts = conductivity > 0.0 && heat_capacity > 0.0;
        let mut lower_transition = spec.lower_transition;
        let mut upper_transition = spec.upper_transition;
        if conducts {
            for transition in [&mut lower_transition, &mut upper_transition]
                .into_iter()
                .flatten()
            {
                transition.point = roughly(rng, transition.point, 0.01);
            }
            if thermal_detail {
                conductivity = roughly(rng, conductivity, 0.01);
                heat_capacity = roughly(rng, heat_capacity, 0.01);
            }
        }

        let color = darken(spec.color, roughly(rng, 0.1, 1.0));
        let density = roughly(rng, spec.density, 0.0001);

        let mut profile = Self {
            kind: spec.kind,
            name: spec.kind.name(),
            base_color: spec.color,
            color,
            phase: spec.phase,
            density,
            conductivity,
            heat_capacity,
            default_temperature: spec.default_temperature,
            lower_transition,
            upper_transition,
            decay,
            reactions,
            emissions,
            movement,
            flags: BehaviorFlags::empty(),
            hooks: HookSchedule::default(),
            pickable: spec.kind != MaterialKind::Empty,
        };
        profile.refresh_behavior();
        profile
    }

    /// Recompute behavior flags and the hook schedule from the profile's
    /// constants, rules and movement table.
    pub fn refresh_behavior(&mut self) {
        let mut flags = BehaviorFlags::empty();
        flags.set(
            BehaviorFlags::CONDUCTS_HEAT,
            self.conductivity > 0.0 && self.heat_capacity > 0.0,
        );
        flags.set(BehaviorFlags::MOBILE, !self.movement.is_empty());
        flags.set(BehaviorFlags::REACTS, !self.reactions.is_empty());
        flags.set(BehaviorFlags::EMITS, !self.emissions.is_empty());
        flags.set(BehaviorFlags::DECAYS, self.decay.is_some());
        flags.set(BehaviorFlags::CLONES, self.kind == MaterialKind::Clone);

        self.flags = flags;
        self.hooks = HookSchedule::from_flags(flags);
    }

    #[inline]
    pub fn conducts_heat(&self) -> bool {
        self.flags.contains(BehaviorFlags::CONDUCTS_HEAT)
    }

    #[inline]
    pub fn is_mobile(&self) -> bool {
        self.flags.contains(BehaviorFlags::MOBILE)
    }
}

/// Entry for material pickers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub kind: MaterialKind,
    pub name: String,
    pub color: [u8; 4],
}

/// Registry of all material profiles, indexed by kind
pub struct MaterialRegistry {
    profiles: Vec<MaterialProfile>,
}

impl MaterialRegistry {
    /// Build every profile from the static catalog.
    ///
    /// Jitter draws come from `rng`, so the registry is reproducible for a
    /// given generator state.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, thermal_detail: bool) -> Self {
        let profiles: Vec<MaterialProfile> = MaterialKind::ALL
            .into_iter()
            .map(|kind| MaterialProfile::from_spec(catalog::spec_for(kind), rng, thermal_detail))
            .collect();

        log::info!(
            "Built material registry: {} materials, {} mobile (thermal detail: {})",
            profiles.len(),
            profiles.iter().filter(|p| p.is_mobile()).count(),
            thermal_detail
        );

        Self { profiles }
    }

    /// Get the profile of a material
    #[inline]
    pub fn get(&self, kind: MaterialKind) -> &MaterialProfile {
        &self.profiles[kind.index()]
    }

    /// Swap in a customized profile for `profile.kind`. Flags and hooks are
    /// rebuilt from the new rules.
    pub fn replace(&mut self, mut profile: MaterialProfile) {
        profile.refresh_behavior();
        log::debug!("Replaced material profile: {}", profile.name);
        let index = profile.kind.index();
        self.profiles[index] = profile;
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialProfile> {
        self.profiles.iter()
    }

    /// Pickable materials in catalog order (excludes EMPTY)
    pub fn list_materials(&self) -> Vec<MaterialInfo> {
        self.profiles
            .iter()
            .filter(|p| p.pickable)
            .map(|p| MaterialInfo {
                kind: p.kind,
                name: p.name.to_string(),
                color: p.color,
            })
            .collect()
    }
}
