//! Coulomb-like force laws.
//!
//! The exponents and coefficients are tuned for the look of the toy, not for
//! physical accuracy. Sweater and balloon interactions use the inverse-square
//! law; induced wall charges use a steeper `2.35` falloff.

use glam::Vec2;

/// Default exponent of [`coulomb_force`].
pub const INVERSE_SQUARE: f32 = 2.0;

/// Force acting at `p1` due to a charge at `p2`.
///
/// Returns the unit vector from `p2` toward `p1` scaled by
/// `kqq / r^power`. The sign of the interaction is carried by `kqq`:
/// positive pushes `p1` away from `p2`, negative pulls it closer.
///
/// Coincident points yield [`Vec2::ZERO`] instead of dividing by zero.
pub fn coulomb_force(p1: Vec2, p2: Vec2, kqq: f32, power: f32) -> Vec2 {
    let diff = p1 - p2;
    let r = diff.length();
    if r == 0.0 {
        return Vec2::ZERO;
    }
    diff / r * (kqq / r.powf(power))
}

/// Rescales `force` so that its magnitude does not exceed `max`.
pub fn clamp_magnitude(force: Vec2, max: f32) -> Vec2 {
    if force.length() > max {
        force.normalize_or_zero() * max
    } else {
        force
    }
}
