//! Static material catalog
//!
//! Un-jittered constants for every material. Densities are in kg/m³,
//! temperatures in Kelvin; "detailed" thermal constants are only used when a
//! run enables thermal detail.

use crate::reactions::{EmissionRule, ReactionOutcome, ReactionRule};
use crate::{CELSIUS_TO_KELVIN, Decay, MaterialKind, MaterialPhase, Transition};

const C: f64 = CELSIUS_TO_KELVIN;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const YELLOW: [u8; 4] = [253, 249, 0, 255];
const BLUE: [u8; 4] = [0, 121, 241, 255];
const GREEN: [u8; 4] = [0, 228, 48, 255];
const RED: [u8; 4] = [230, 41, 55, 255];
const GRAY: [u8; 4] = [130, 130, 130, 255];
const GOLD: [u8; 4] = [255, 203, 0, 255];
const SKYBLUE: [u8; 4] = [102, 191, 255, 255];
const PURPLE: [u8; 4] = [200, 122, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const WOOD_BROWN: [u8; 4] = [139, 69, 19, 255];

/// Even blend of two colors
const fn mix(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
    [
        ((a[0] as u16 + b[0] as u16 + 1) / 2) as u8,
        ((a[1] as u16 + b[1] as u16 + 1) / 2) as u8,
        ((a[2] as u16 + b[2] as u16 + 1) / 2) as u8,
        ((a[3] as u16 + b[3] as u16 + 1) / 2) as u8,
    ]
}

/// Catalog entry for one material, before jitter
#[derive(Clone, Debug)]
pub(crate) struct MaterialSpec {
    pub kind: MaterialKind,
    pub phase: MaterialPhase,
    pub color: [u8; 4],
    pub density: f64,
    pub conductivity: f64,
    pub heat_capacity: f64,
    /// (conductivity, heat capacity) used when thermal detail is enabled
    pub detailed_thermal: Option<(f64, f64)>,
    pub default_temperature: f64,
    pub lower_transition: Option<Transition>,
    pub upper_transition: Option<Transition>,
    pub decay: Option<Decay>,
    pub reactions: Vec<ReactionRule>,
    pub emissions: Vec<EmissionRule>,
    /// Gets a movement table
    pub mobile: bool,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Empty,
            phase: MaterialPhase::Empty,
            color: [255, 0, 255, 255], // Magenta for missing materials
            density: 0.0,
            conductivity: 1.0,
            heat_capacity: 1.0,
            detailed_thermal: None,
            default_temperature: 30.0 + C,
            lower_transition: None,
            upper_transition: None,
            decay: None,
            reactions: Vec::new(),
            emissions: Vec::new(),
            mobile: false,
        }
    }
}

fn turns_into(celsius: f64, into: MaterialKind) -> Option<Transition> {
    Some(Transition {
        point: celsius + C,
        into,
    })
}

fn decays(probability: f64, into: MaterialKind) -> Option<Decay> {
    Some(Decay { probability, into })
}

fn insulator(kind: MaterialKind, color: [u8; 4]) -> MaterialSpec {
    MaterialSpec {
        kind,
        phase: MaterialPhase::Solid,
        color,
        density: 9999.9,
        conductivity: 0.0,
        heat_capacity: 0.0,
        ..Default::default()
    }
}

/// Catalog entry for `kind`
pub(crate) fn spec_for(kind: MaterialKind) -> MaterialSpec {
    use MaterialKind as M;

    match kind {
        M::Empty => MaterialSpec {
            kind,
            color: [0, 0, 0, 0],
            conductivity: 0.0,
            heat_capacity: 0.0,
            ..Default::default()
        },

        M::Sand => MaterialSpec {
            kind,
            phase: MaterialPhase::Powder,
            color: YELLOW,
            density: 1700.0,
            detailed_thermal: Some((0.27, 0.8)),
            mobile: true,
            ..Default::default()
        },

        M::Water => MaterialSpec {
            kind,
            phase: MaterialPhase::Fluid,
            color: BLUE,
            density: 998.0,
            detailed_thermal: Some((0.6, 4.18)),
            lower_transition: turns_into(0.0, M::Ice),
            upper_transition: turns_into(100.0, M::Steam),
            mobile: true,
            ..Default::default()
        },

        M::Methane => MaterialSpec {
            kind,
            phase: MaterialPhase::Gas,
            color: GREEN,
            density: 0.65,
            detailed_thermal: Some((0.034, 2.2)),
            upper_transition: turns_into(537.0, M::Fire),
            reactions: vec![
                ReactionRule::new(
                    1.0 / 3.0,
                    &[M::Fire],
                    ReactionOutcome::at(M::Fire, 1960.0 + C),
                ),
                ReactionRule::new(1.0, &[M::Plasma], ReactionOutcome::at(M::Fire, 1960.0 + C)),
            ],
            mobile: true,
            ..Default::default()
        },

        M::Fire => MaterialSpec {
            kind,
            phase: MaterialPhase::Gas,
            color: mix(YELLOW, RED),
            density: 0.3,
            detailed_thermal: Some((90.0, 1.0)),
            default_temperature: 950.0 + C,
            lower_transition: turns_into(200.0, M::Smoke),
            upper_transition: turns_into(7800.0, M::Plasma),
            decay: decays(1.0 / 300.0, M::Smoke),
            reactions: vec![ReactionRule::new(
                1.0 / 8.0,
                &[M::Water],
                ReactionOutcome::new(M::Empty),
            )],
            mobile: true,
            ..Default::default()
        },

        M::Smoke => MaterialSpec {
            kind,
            phase: MaterialPhase::Gas,
            color: GRAY,
            density: 1.2,
            detailed_thermal: Some((0.01, 1.0)),
            upper_transition: turns_into(350.0, M::Fire),
            decay: decays(1.0 / 300.0, M::Empty),
            mobile: true,
            ..Default::default()
        },

        M::Steam => MaterialSpec {
            kind,
            phase: MaterialPhase::Gas,
            color: mix(GRAY, BLUE),
            density: 0.6,
            detailed_thermal: Some((0.02, 2.0)),
            default_temperature: 150.0 + C,
            lower_transition: turns_into(100.0, M::Water),
            upper_transition: turns_into(10000.0, M::Plasma),
            decay: decays(1.0 / 300.0, M::Water),
            mobile: true,
            ..Default::default()
        },

        M::Stone => MaterialSpec {
            kind,
            phase: MaterialPhase::Solid,
            color: mix(GRAY, BLACK),
            density: 2800.0,
            detailed_thermal: Some((2.5, 0.84)),
            upper_transition: turns_into(1500.0, M::Lava),
            mobile: true,
            ..Default::default()
        },

        M::Dust => MaterialSpec {
            kind,
            phase: MaterialPhase::Powder,
            color: mix(YELLOW, WHITE),
            density: 49.0,
            detailed_thermal: Some((0.05, 0.8)),
            upper_transition: turns_into(350.0, M::Fire),
            reactions: vec![ReactionRule::new(
                1.0 / 8.0,
                &[M::Fire],
                ReactionOutcome::new(M::Fire),
            )],
            mobile: true,
            ..Default::default()
        },

        M::Lava => MaterialSpec {
            kind,
            phase: MaterialPhase::Fluid,
            color: RED,
            density: 2900.0,
            detailed_thermal: Some((1.0, 1.5)),
            default_temperature: 2050.0 + C,
            lower_transition: turns_into(1000.0, M::Stone),
            upper_transition: turns_into(10000.0, M::Plasma),
            mobile: true,
            ..Default::default()
        },

        M::Clone => insulator(kind, GOLD),

        M::Ice => MaterialSpec {
            kind,
            phase: MaterialPhase::Solid,
            color: SKYBLUE,
            density: 916.7,
            detailed_thermal: Some((2.2, 2.09)),
            default_temperature: -20.0 + C,
            upper_transition: turns_into(0.0, M::Water),
            ..Default::default()
        },

        M::Plasma => MaterialSpec {
            kind,
            phase: MaterialPhase::Plasma,
            color: PURPLE,
            density: 0.02,
            detailed_thermal: Some((0.1, 5.0)),
            default_temperature: 9500.0 + C,
            lower_transition: turns_into(3000.0, M::Empty),
            mobile: true,
            ..Default::default()
        },

        M::Wall => insulator(kind, GRAY),

        M::Diamond => MaterialSpec {
            kind,
            phase: MaterialPhase::Solid,
            color: mix(BLUE, SKYBLUE),
            density: 3500.0,
            detailed_thermal: Some((1500.0, 5.0)),
            ..Default::default()
        },

        M::Mercury => MaterialSpec {
            kind,
            phase: MaterialPhase::Fluid,
            color: mix(GRAY, WHITE),
            density: 13546.0,
            detailed_thermal: Some((8.3, 0.14)),
            mobile: true,
            ..Default::default()
        },

        M::Oil => MaterialSpec {
            kind,
            phase: MaterialPhase::Fluid,
            color: [112, 22, 6, 255],
            density: 870.0,
            detailed_thermal: Some((0.13, 2.1)),
            upper_transition: turns_into(300.0, M::Fire),
            reactions: vec![ReactionRule::new(
                1.0 / 8.0,
                &[M::Fire],
                ReactionOutcome::at(M::Fire, 1200.0 + C),
            )],
            mobile: true,
            ..Default::default()
        },

        M::Eraser => insulator(kind, mix(RED, BLACK)),

        M::Wood => MaterialSpec {
            kind,
            phase: MaterialPhase::Solid,
            color: WOOD_BROWN,
            density: 600.0,
            detailed_thermal: Some((0.15, 1.7)),
            upper_transition: turns_into(350.0, M::BurningWood),
            reactions: vec![
                ReactionRule::new(
                    1.0 / 3.0,
                    &[M::Fire],
                    ReactionOutcome::at(M::BurningWood, 500.0 + C),
                ),
                ReactionRule::new(
                    1.0 / 300.0,
                    &[M::BurningWood],
                    ReactionOutcome::at(M::BurningWood, 500.0 + C),
                ),
            ],
            ..Default::default()
        },

        M::BurningWood => MaterialSpec {
            kind,
            phase: MaterialPhase::Solid,
            color: mix(WOOD_BROWN, BLACK),
            density: 600.0,
            detailed_thermal: Some((0.15, 1.7)),
            default_temperature: 500.0 + C,
            lower_transition: turns_into(150.0, M::Wood),
            upper_transition: turns_into(1000.0, M::Fire),
            reactions: vec![
                ReactionRule::new(
                    1.0 / 300.0,
                    &[M::Empty],
                    ReactionOutcome::at(M::Fire, 950.0 + C),
                ),
                ReactionRule::new(
                    1.0 / 300.0,
                    &[M::Fire],
                    ReactionOutcome::at(M::Fire, 950.0 + C),
                ),
                ReactionRule::new(1.0 / 3.0, &[M::Water], ReactionOutcome::new(M::Wood)),
            ],
            emissions: vec![EmissionRule {
                kind: M::Fire,
                probability: 1.0 / 5.0,
            }],
            ..Default::default()
        },
    }
}
