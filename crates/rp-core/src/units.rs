// rp-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, DynamicViscosity as UomDynamicViscosity,
    Force as UomForce, MassDensity as UomMassDensity, Power as UomPower, Torque as UomTorque,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type AngVel = UomAngularVelocity;
pub type DynVisc = UomDynamicViscosity;
pub type Force = UomForce;
pub type Density = UomMassDensity;
pub type Power = UomPower;
pub type Torque = UomTorque;
pub type Velocity = UomVelocity;

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngVel {
    use uom::si::angular_velocity::revolution_per_minute;
    AngVel::new::<revolution_per_minute>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn newton_meters(v: f64) -> Torque {
    use uom::si::torque::newton_meter;
    Torque::new::<newton_meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

/// Rotational speed in rev/min to rad/s.
#[inline]
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * std::f64::consts::PI / 30.0
}

/// Angular speed in rev/min.
#[inline]
pub fn to_rpm(speed: AngVel) -> f64 {
    use uom::si::angular_velocity::revolution_per_minute;
    speed.get::<revolution_per_minute>()
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// ISA sea-level density [kg/m³]
    pub const RHO_SL_KG_M3: f64 = 1.225;

    /// ISA sea-level dynamic viscosity [Pa·s]
    pub const MU_SL_PA_S: f64 = 1.789_4e-5;
}
