//! Bounded random perturbation of catalog constants

use rand::Rng;

/// "Roughly `value`, within `fraction`": scales `value` by a uniform factor in
/// `[1 - fraction, 1 + fraction]`.
pub fn roughly<R: Rng + ?Sized>(rng: &mut R, value: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return value;
    }
    value * (1.0 + rng.gen_range(-fraction..=fraction))
}

/// Blend an RGBA color towards black by `amount` (0.0 = unchanged, 1.0 = black).
/// Alpha is preserved.
pub fn darken(color: [u8; 4], amount: f64) -> [u8; 4] {
    let keep = (1.0 - amount).clamp(0.0, 1.0);
    let scale = |c: u8| (c as f64 * keep).round() as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}
