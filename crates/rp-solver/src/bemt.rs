//! Operating-point solves over a rotor.

use rp_core::units::{AngVel, DynVisc, Density, Force, Power, Torque, Velocity};
use rp_core::{ensure_finite, newton_meters, newtons, rpm_to_rad_per_s, to_rpm, watts};
use rp_rotor::{Inflow, Rotor, SectionState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::performance::{RotorCoefficients, aggregate};
use crate::strategy::SectionSolver;

/// Density and dynamic viscosity of the working fluid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    /// [kg/m³]
    pub density: f64,
    /// [Pa·s]
    pub viscosity: f64,
}

impl FluidProperties {
    pub fn new(density: Density, viscosity: DynVisc) -> Self {
        Self {
            density: density.value,
            viscosity: viscosity.value,
        }
    }

    pub fn from_si(density: f64, viscosity: f64) -> Self {
        Self { density, viscosity }
    }
}

/// Freestream speed [m/s] and rotational speed [rev/min].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub v_inf: f64,
    pub rpm: f64,
}

impl OperatingPoint {
    pub fn new(v_inf: f64, rpm: f64) -> Self {
        Self { v_inf, rpm }
    }

    pub fn from_units(v_inf: Velocity, speed: AngVel) -> Self {
        Self {
            v_inf: v_inf.value,
            rpm: to_rpm(speed),
        }
    }

    /// Angular speed [rad/s].
    pub fn omega(&self) -> f64 {
        rpm_to_rad_per_s(self.rpm)
    }
}

/// Converged state of one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub radius: f64,
    /// Inflow angle [rad]
    pub phi: f64,
    pub aoa_deg: f64,
    pub cl: f64,
    pub cd: f64,
    pub loss_factor: f64,
    pub a: f64,
    pub a_prime: f64,
    pub reynolds: f64,
    pub d_thrust: f64,
    pub d_torque: f64,
}

impl From<&SectionState> for SectionRecord {
    fn from(s: &SectionState) -> Self {
        Self {
            radius: s.radius,
            phi: s.eval.phi,
            aoa_deg: s.eval.aoa_deg,
            cl: s.eval.cl,
            cd: s.eval.cd,
            loss_factor: s.eval.loss_factor,
            a: s.eval.a,
            a_prime: s.eval.a_prime,
            reynolds: s.reynolds,
            d_thrust: s.d_thrust,
            d_torque: s.d_torque,
        }
    }
}

/// Result of one operating-point solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Name of the section solver that produced the record
    pub solver: String,
    pub v_inf: f64,
    pub rpm: f64,
    /// [N]
    pub thrust: f64,
    /// [N·m]
    pub torque: f64,
    /// [W]
    pub power: f64,
    #[serde(flatten)]
    pub coefficients: RotorCoefficients,
    pub sections: Vec<SectionRecord>,
}

impl PerformanceRecord {
    pub fn ct(&self) -> f64 {
        self.coefficients.ct
    }

    pub fn cq(&self) -> f64 {
        self.coefficients.cq
    }

    pub fn cp(&self) -> f64 {
        self.coefficients.cp
    }

    pub fn fm(&self) -> f64 {
        self.coefficients.fm
    }

    pub fn eta(&self) -> f64 {
        self.coefficients.eta
    }

    pub fn j(&self) -> f64 {
        self.coefficients.j
    }

    pub fn thrust_force(&self) -> Force {
        newtons(self.thrust)
    }

    pub fn shaft_torque(&self) -> Torque {
        newton_meters(self.torque)
    }

    pub fn shaft_power(&self) -> Power {
        watts(self.power)
    }

    /// Elemental thrust per section [N].
    pub fn d_thrust(&self) -> Vec<f64> {
        self.sections.iter().map(|s| s.d_thrust).collect()
    }

    /// Elemental torque per section [N·m].
    pub fn d_torque(&self) -> Vec<f64> {
        self.sections.iter().map(|s| s.d_torque).collect()
    }

    /// Converged inflow angles [rad].
    pub fn phi(&self) -> Vec<f64> {
        self.sections.iter().map(|s| s.phi).collect()
    }
}

/// Checks v∞ ≥ 0, rpm > 0 and positive fluid properties, all finite.
pub fn validate_operating_point(
    point: &OperatingPoint,
    fluid: &FluidProperties,
) -> SolverResult<()> {
    let checks = [
        ("v_inf", point.v_inf, point.v_inf >= 0.0, ">= 0"),
        ("rpm", point.rpm, point.rpm > 0.0, "> 0"),
        ("density", fluid.density, fluid.density > 0.0, "> 0"),
        ("viscosity", fluid.viscosity, fluid.viscosity > 0.0, "> 0"),
    ];
    for (name, value, ok, bound) in checks {
        let value = ensure_finite(value, name).map_err(|e| SolverError::InvalidOperatingPoint {
            what: e.to_string(),
        })?;
        if !ok {
            return Err(SolverError::InvalidOperatingPoint {
                what: format!("{name} must be {bound} (got {value})"),
            });
        }
    }
    Ok(())
}

/// Solves a rotor at operating points with a chosen [`SectionSolver`].
#[derive(Debug, Clone)]
pub struct BemtSolver<'a, S> {
    rotor: &'a Rotor,
    fluid: FluidProperties,
    strategy: S,
}

impl<'a, S: SectionSolver> BemtSolver<'a, S> {
    pub fn new(rotor: &'a Rotor, fluid: FluidProperties, strategy: S) -> Self {
        Self {
            rotor,
            fluid,
            strategy,
        }
    }

    pub fn rotor(&self) -> &'a Rotor {
        self.rotor
    }

    pub fn fluid(&self) -> FluidProperties {
        self.fluid
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub(crate) fn inflow(&self, point: &OperatingPoint) -> Inflow {
        Inflow {
            v_inf: point.v_inf,
            omega: point.omega(),
            rho: self.fluid.density,
            mu: self.fluid.viscosity,
        }
    }

    /// Solve at v∞ [m/s] and rpm [rev/min].
    pub fn run(&self, v_inf: f64, rpm: f64) -> SolverResult<PerformanceRecord> {
        self.run_point(&OperatingPoint::new(v_inf, rpm))
    }

    pub fn run_point(&self, point: &OperatingPoint) -> SolverResult<PerformanceRecord> {
        validate_operating_point(point, &self.fluid)?;
        let inflow = self.inflow(point);
        let phis = self.strategy.solve_sections(self.rotor, &inflow)?;
        Ok(self.assemble(point, &inflow, &phis))
    }

    /// Loads and coefficients from converged inflow angles.
    pub(crate) fn assemble(
        &self,
        point: &OperatingPoint,
        inflow: &Inflow,
        phis: &[f64],
    ) -> PerformanceRecord {
        let states: Vec<SectionState> = self
            .rotor
            .sections()
            .iter()
            .zip(phis)
            .map(|(section, phi)| section.loads(*phi, inflow))
            .collect();

        // Elemental loads already cover all blades through the solidity.
        let thrust: f64 = states.iter().map(|s| s.d_thrust).sum();
        let torque: f64 = states.iter().map(|s| s.d_torque).sum();
        let power = torque * inflow.omega;

        let coefficients = aggregate(
            thrust,
            torque,
            power,
            point.v_inf,
            point.rpm,
            self.fluid.density,
            self.rotor.blade_radius(),
        );
        debug!(
            solver = self.strategy.name(),
            v_inf = point.v_inf,
            rpm = point.rpm,
            thrust,
            power,
            "operating point solved"
        );

        PerformanceRecord {
            solver: self.strategy.name().to_string(),
            v_inf: point.v_inf,
            rpm: point.rpm,
            thrust,
            torque,
            power,
            coefficients,
            sections: states.iter().map(SectionRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracketing::BracketingSolver;
    use rp_airfoil::{AirfoilFamily, AirfoilPolar, ClosedFormPolar};
    use rp_core::{kg_per_m3, mps, pa_s, rpm};
    use rp_rotor::RotorGeometryBuilder;
    use std::sync::Arc;

    fn small_rotor() -> Rotor {
        RotorGeometryBuilder::new(2, 0.05, 0.4)
            .n_sections(8)
            .samples(vec![0.05, 0.4], vec![0.05, 0.03], vec![25.0, 10.0])
            .airfoil(Arc::new(AirfoilPolar::from(ClosedFormPolar::for_family(
                AirfoilFamily::Naca4412,
            ))))
            .build()
            .unwrap()
    }

    #[test]
    fn fluid_from_units() {
        let fluid = FluidProperties::new(kg_per_m3(1.1), pa_s(1.8e-5));
        assert_eq!(fluid, FluidProperties::from_si(1.1, 1.8e-5));
    }

    #[test]
    fn operating_point_validation() {
        let air = FluidProperties::from_si(1.225, 1.81e-5);
        assert!(validate_operating_point(&OperatingPoint::new(0.0, 100.0), &air).is_ok());
        assert!(validate_operating_point(&OperatingPoint::new(0.0, 0.0), &air).is_err());
        let vacuum = FluidProperties::from_si(0.0, 1.81e-5);
        assert!(validate_operating_point(&OperatingPoint::new(5.0, 100.0), &vacuum).is_err());
    }

    #[test]
    fn non_finite_inputs_are_named() {
        let air = FluidProperties::from_si(1.225, 1.81e-5);
        let err = validate_operating_point(&OperatingPoint::new(f64::NAN, 100.0), &air).unwrap_err();
        assert!(err.to_string().contains("Non-finite numeric value for v_inf"));
        let thin = FluidProperties::from_si(1.225, f64::INFINITY);
        let err = validate_operating_point(&OperatingPoint::new(5.0, 100.0), &thin).unwrap_err();
        assert!(err.to_string().contains("viscosity"));
        let err = validate_operating_point(&OperatingPoint::new(-1.0, 100.0), &air).unwrap_err();
        assert!(err.to_string().contains("v_inf must be >= 0"));
    }

    #[test]
    fn operating_point_from_units() {
        let point = OperatingPoint::from_units(mps(12.0), rpm(1100.0));
        assert_eq!(point.v_inf, 12.0);
        assert!((point.rpm - 1100.0).abs() < 1e-9);
        assert!((point.omega() - 1100.0 * std::f64::consts::PI / 30.0).abs() < 1e-9);
    }

    #[test]
    fn totals_are_sums_of_elemental_loads() {
        let rotor = small_rotor();
        let solver = BemtSolver::new(
            &rotor,
            FluidProperties::from_si(1.225, 1.81e-5),
            BracketingSolver::default(),
        );
        let record = solver.run(5.0, 3000.0).unwrap();
        let dt: f64 = record.d_thrust().iter().sum();
        let dq: f64 = record.d_torque().iter().sum();
        assert_eq!(record.thrust, dt);
        assert_eq!(record.torque, dq);
        assert!((record.power - dq * 3000.0 * std::f64::consts::PI / 30.0).abs() < 1e-9);
        assert_eq!(record.sections.len(), 8);
        assert!((record.thrust_force().value - record.thrust).abs() < 1e-12);
    }

    #[test]
    fn record_serializes_flat_coefficients() {
        let rotor = small_rotor();
        let record = BemtSolver::new(
            &rotor,
            FluidProperties::from_si(1.225, 1.81e-5),
            BracketingSolver::default(),
        )
        .run(5.0, 3000.0)
        .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("ct").is_some());
        assert!(json.get("eta").is_some());
        assert_eq!(json["sections"].as_array().unwrap().len(), 8);
        assert_eq!(json["solver"], "robust");
    }
}
