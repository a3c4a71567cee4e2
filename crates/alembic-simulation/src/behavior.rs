//! Behavior flags and hook schedules
//!
//! Which per-tick behaviors a material takes part in is decided once, from
//! its profile, and stored as flags. The flags expand into three ordered hook
//! lists (pre, main, post) that the scheduler walks every tick.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BehaviorFlags: u8 {
        /// Positive conductivity and heat capacity
        const CONDUCTS_HEAT = 1 << 0;
        /// Non-empty movement table
        const MOBILE = 1 << 1;
        /// At least one reaction rule
        const REACTS = 1 << 2;
        /// At least one emission rule
        const EMITS = 1 << 3;
        /// Spontaneous per-tick decay
        const DECAYS = 1 << 4;
        /// Copies a remembered neighbor material into empty neighbors
        const CLONES = 1 << 5;
    }
}

/// A single per-tick behavior, invoked by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// First half of heat exchange: accumulate pending heat
    ExchangeHeat,
    /// Clone behavior (main pass, after movement)
    Clone,
    /// Second half of heat exchange: apply pending heat, check transitions
    ApplyHeat,
    /// Spontaneous end-of-life conversion
    Decay,
    /// Neighbor-gated reactions
    React,
    /// Spawn particles into empty neighbors
    Emit,
}

/// Ordered hook lists for the three sweeps of a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookSchedule {
    pub pre: Vec<Hook>,
    pub main: Vec<Hook>,
    pub post: Vec<Hook>,
}

impl HookSchedule {
    pub fn from_flags(flags: BehaviorFlags) -> Self {
        let mut schedule = Self::default();

        if flags.contains(BehaviorFlags::CONDUCTS_HEAT) {
            schedule.pre.push(Hook::ExchangeHeat);
        }

        if flags.contains(BehaviorFlags::CLONES) {
            schedule.main.push(Hook::Clone);
        }

        if flags.contains(BehaviorFlags::CONDUCTS_HEAT) {
            schedule.post.push(Hook::ApplyHeat);
        }
        if flags.contains(BehaviorFlags::DECAYS) {
            schedule.post.push(Hook::Decay);
        }
        if flags.contains(BehaviorFlags::REACTS) {
            schedule.post.push(Hook::React);
        }
        if flags.contains(BehaviorFlags::EMITS) {
            schedule.post.push(Hook::Emit);
        }

        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_flags_have_no_hooks() {
        let schedule = HookSchedule::from_flags(BehaviorFlags::empty());
        assert!(schedule.pre.is_empty());
        assert!(schedule.main.is_empty());
        assert!(schedule.post.is_empty());
    }

    #[test]
    fn test_post_hook_order() {
        let schedule = HookSchedule::from_flags(BehaviorFlags::all());
        assert_eq!(schedule.pre, vec![Hook::ExchangeHeat]);
        assert_eq!(schedule.main, vec![Hook::Clone]);
        assert_eq!(
            schedule.post,
            vec![Hook::ApplyHeat, Hook::Decay, Hook::React, Hook::Emit]
        );
    }
}
