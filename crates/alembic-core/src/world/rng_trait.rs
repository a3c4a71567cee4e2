//! RNG trait abstraction for the simulation systems
//!
//! Every system draws through [`SimRng`], so a world can be driven by its own
//! seeded generator and tests can substitute any other `rand` generator.

use rand::Rng;

/// Random number generator trait for the simulation
pub trait SimRng: rand::RngCore {
    /// Uniform f64 in [0.0, 1.0)
    fn gen_unit(&mut self) -> f64 {
        Rng::r#gen(self)
    }

    /// Check if a uniform draw is below the probability threshold
    fn check_probability(&mut self, probability: f64) -> bool {
        self.gen_unit() < probability
    }

    /// Uniform index into a collection of `len` items; `None` when empty
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.gen_range(0..len))
        }
    }
}

impl<T: ?Sized + rand::RngCore> SimRng for T {}
