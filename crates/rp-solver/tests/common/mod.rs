#![allow(dead_code)]

use rp_airfoil::AirfoilCatalog;
use rp_rotor::{Rotor, RotorGeometryBuilder};
use rp_solver::FluidProperties;

pub const RPM: f64 = 1100.0;

pub fn air() -> FluidProperties {
    FluidProperties::from_si(1.225, 1.81e-5)
}

/// Three-bladed CLARK-Y propeller, D = 3.054 m, seven stations at
/// 0.525..1.425 m, tapered chord and helical pitch (P/D ≈ 0.7).
pub fn scenario_rotor() -> Rotor {
    let radius = vec![0.525, 0.675, 0.825, 0.975, 1.125, 1.275, 1.425];
    let chord = radius.iter().map(|r| 0.24 - 0.1 * r).collect();
    let pitch = radius
        .iter()
        .map(|r| (2.14 / (2.0 * std::f64::consts::PI * r)).atan().to_degrees())
        .collect();
    RotorGeometryBuilder::new(3, 0.375, 1.527)
        .samples(radius, chord, pitch)
        .airfoil(AirfoilCatalog::builtin().resolve("CLARKY").unwrap())
        .build_at_stations()
        .unwrap()
}

pub fn relative_difference(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs()).max(1e-12)
}
