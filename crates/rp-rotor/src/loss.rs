//! Prandtl tip and hub loss.
//!
//! ```text
//! f = B·Δ / (2·r·sin φ)
//! F = (2/π)·acos(min(1, exp(-f)))      (F = 1 when -f > 500)
//! ```
//!
//! Δ is the distance from the station to the tip (tip loss) or to the hub
//! (hub loss). The combined factor is the product of both components and is
//! defined as exactly 1 at φ = 0, where the expression above is 0/0.

use std::f64::consts::FRAC_2_PI;

/// Above this value of -f the component is 1 (guards `exp` overflow).
const EXP_GUARD: f64 = 500.0;

/// One Prandtl component and its derivative with respect to φ.
pub fn prandtl_component(nblades: u32, distance: f64, radius: f64, phi: f64) -> (f64, f64) {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let f = nblades as f64 * distance / (2.0 * radius * sin_phi);
    if -f > EXP_GUARD {
        return (1.0, 0.0);
    }

    let e = (-f).exp();
    if e >= 1.0 {
        return (0.0, 0.0);
    }

    let value = FRAC_2_PI * e.acos();
    if e == 0.0 {
        return (value, 0.0);
    }
    // de/dφ = e·f·cot φ
    let de_dphi = e * f * cos_phi / sin_phi;
    let slope = -FRAC_2_PI * de_dphi / (1.0 - e * e).sqrt();
    (value, slope)
}

/// Combined tip·hub loss factor and its φ-derivative.
pub fn loss_factor_with_slope(
    nblades: u32,
    radius: f64,
    hub_radius: f64,
    blade_radius: f64,
    phi: f64,
) -> (f64, f64) {
    if phi == 0.0 {
        return (1.0, 0.0);
    }
    let (f_tip, d_tip) = prandtl_component(nblades, blade_radius - radius, radius, phi);
    let (f_hub, d_hub) = prandtl_component(nblades, radius - hub_radius, radius, phi);
    (f_tip * f_hub, d_tip * f_hub + f_tip * d_hub)
}

pub fn loss_factor(nblades: u32, radius: f64, hub_radius: f64, blade_radius: f64, phi: f64) -> f64 {
    loss_factor_with_slope(nblades, radius, hub_radius, blade_radius, phi).0
}
