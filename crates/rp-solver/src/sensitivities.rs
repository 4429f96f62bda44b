//! Analytic sensitivities of rotor loads through the implicit residual.
//!
//! At a converged φ*, R(φ*, p) = 0 for every design variable p, so
//! dφ*/dp = -(∂R/∂p)/(∂R/∂φ). The total derivative of an elemental load L is
//! ∂L/∂p + ∂L/∂φ · dφ*/dp, summed over sections for rotor-level inputs.

use nalgebra::{DMatrix, DVector};
use rp_rotor::{Inflow, Rotor, var};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::bemt::{BemtSolver, OperatingPoint, PerformanceRecord, validate_operating_point};
use crate::error::{SolverError, SolverResult};
use crate::jacobian::central_difference_jacobian;
use crate::newton::NewtonSolver;
use crate::strategy::SectionSolver;

/// d(ω)/d(rpm)
const OMEGA_PER_RPM: f64 = PI / 30.0;

/// Derivatives of one output with respect to the rotor inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gradient {
    /// per m/s
    pub v_inf: f64,
    /// per rev/min
    pub rpm: f64,
    /// per degree of global twist
    pub global_twist_deg: f64,
    /// per degree of pitch, one entry per section
    pub pitch_deg: Vec<f64>,
    /// per metre of chord, one entry per section
    pub chord: Vec<f64>,
}

impl Gradient {
    fn zeros(n: usize) -> Self {
        Self {
            pitch_deg: vec![0.0; n],
            chord: vec![0.0; n],
            ..Self::default()
        }
    }

    /// (v∞, rpm, global twist) as a row vector.
    pub fn operating_row(&self) -> [f64; 3] {
        [self.v_inf, self.rpm, self.global_twist_deg]
    }
}

/// Gradients of thrust [N], torque [N·m] and power [W].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivities {
    pub thrust: Gradient,
    pub torque: Gradient,
    pub power: Gradient,
}

impl Sensitivities {
    /// Rows (T, Q, P) by columns (v∞, rpm, global twist).
    pub fn operating_matrix(&self) -> DMatrix<f64> {
        let rows = [
            self.thrust.operating_row(),
            self.torque.operating_row(),
            self.power.operating_row(),
        ];
        DMatrix::from_fn(3, 3, |i, j| rows[i][j])
    }
}

/// Implicit-function sensitivities at converged inflow angles.
pub fn sensitivities(
    rotor: &Rotor,
    inflow: &Inflow,
    phis: &[f64],
    torque: f64,
) -> SolverResult<Sensitivities> {
    let n = rotor.len();
    let mut thrust = Gradient::zeros(n);
    let mut torque_grad = Gradient::zeros(n);

    for (i, (section, &phi)) in rotor.sections().iter().zip(phis).enumerate() {
        let (_, dr) = section.residual_partials(phi, inflow);
        let slope = dr[var::PHI];
        if slope == 0.0 || !slope.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("section {i}: dR/dphi is {slope} at the solution"),
            });
        }
        let dphi = -dr / slope;
        let loads = section.load_partials(phi, inflow);

        for (grad, partial) in [
            (&mut thrust, loads.thrust),
            (&mut torque_grad, loads.torque),
        ] {
            let total = partial + dphi * partial[var::PHI];
            grad.v_inf += total[var::V_INF];
            grad.rpm += total[var::OMEGA] * OMEGA_PER_RPM;
            grad.pitch_deg[i] = total[var::PITCH].to_radians();
            grad.chord[i] = total[var::CHORD];
        }
    }

    for grad in [&mut thrust, &mut torque_grad] {
        grad.global_twist_deg = grad.pitch_deg.iter().sum();
    }

    // P = Q·ω
    let omega = inflow.omega;
    let power = Gradient {
        v_inf: omega * torque_grad.v_inf,
        rpm: omega * torque_grad.rpm + torque * OMEGA_PER_RPM,
        global_twist_deg: omega * torque_grad.global_twist_deg,
        pitch_deg: torque_grad.pitch_deg.iter().map(|d| omega * d).collect(),
        chord: torque_grad.chord.iter().map(|d| omega * d).collect(),
    };

    Ok(Sensitivities {
        thrust,
        torque: torque_grad,
        power,
    })
}

impl<'a> BemtSolver<'a, NewtonSolver> {
    /// Solve and differentiate the result with respect to the inputs.
    pub fn run_with_sensitivities(
        &self,
        v_inf: f64,
        rpm: f64,
    ) -> SolverResult<(PerformanceRecord, Sensitivities)> {
        let point = OperatingPoint::new(v_inf, rpm);
        validate_operating_point(&point, &self.fluid())?;
        let inflow = self.inflow(&point);
        let phis = self.strategy().solve_sections(self.rotor(), &inflow)?;
        let record = self.assemble(&point, &inflow, &phis);
        let sens = sensitivities(self.rotor(), &inflow, &phis, record.torque)?;
        Ok((record, sens))
    }
}

/// Central-difference estimate of the matrix of
/// [`Sensitivities::operating_matrix`], obtained by re-solving the rotor.
pub fn finite_difference_operating_matrix<S: SectionSolver>(
    solver: &BemtSolver<'_, S>,
    v_inf: f64,
    rpm: f64,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>> {
    let x = DVector::from_vec(vec![v_inf, rpm, 0.0]);
    central_difference_jacobian(
        &x,
        |x| {
            let rotor = solver.rotor().with_twist_offset(x[2]);
            let record = BemtSolver::new(&rotor, solver.fluid(), solver.strategy())
                .run(x[0], x[1])?;
            Ok(DVector::from_vec(vec![
                record.thrust,
                record.torque,
                record.power,
            ]))
        },
        epsilon,
    )
}
