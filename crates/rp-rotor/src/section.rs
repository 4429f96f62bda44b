//! Blade-element momentum equations for one radial station.
//!
//! For a candidate inflow angle φ:
//!
//! ```text
//! α   = pitch - φ                                  (degrees for the polar)
//! CT  = Cl·cos φ - Cd·sin φ        CQ = Cl·sin φ + Cd·cos φ
//! κ   = 4F·sin²φ / (σ·CT)          κ' = 4F·sin φ·cos φ / (σ·CQ)
//! a   = 1/(κ - 1)                  a' = 1/(κ' + 1)
//! R(φ) = sin φ/(1 + a) - v∞·cos φ / (ω·r·(1 - a'))
//! ```
//!
//! Using 1/(1 + a) = 1 - 1/κ and 1/(1 - a') = 1 + 1/κ', the residual is
//! evaluated as
//!
//! ```text
//! R(φ) = sin φ - λ·cos φ - σ/(4F·sin φ) · (CT + λ·CQ),     λ = v∞/(ω·r)
//! ```
//!
//! which is the same function but stays finite when CT or CQ cross zero
//! (where κ or κ' are singular).

use nalgebra::Vector5;
use rp_airfoil::AirfoilPolar;
use std::f64::consts::PI;
use std::sync::Arc;

use crate::loss::loss_factor_with_slope;

/// Partial derivatives with respect to the section variables, indexed by
/// the constants in [`var`].
pub type Partials = Vector5<f64>;

/// Indices into [`Partials`].
pub mod var {
    /// Inflow angle φ [rad]
    pub const PHI: usize = 0;
    /// Freestream speed [m/s]
    pub const V_INF: usize = 1;
    /// Rotor angular speed [rad/s]
    pub const OMEGA: usize = 2;
    /// Local pitch [rad]
    pub const PITCH: usize = 3;
    /// Local chord [m]
    pub const CHORD: usize = 4;
}

/// Flow conditions seen by every section of a rotor at one operating point
/// (SI: m/s, rad/s, kg/m³, Pa·s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflow {
    pub v_inf: f64,
    pub omega: f64,
    pub rho: f64,
    pub mu: f64,
}

/// Everything the residual depends on, evaluated at one φ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionEval {
    pub phi: f64,
    pub loss_factor: f64,
    pub aoa_deg: f64,
    pub cl: f64,
    pub cd: f64,
    pub ct_local: f64,
    pub cq_local: f64,
    /// Axial induction factor (infinite in hover at the root).
    pub a: f64,
    /// Swirl induction factor
    pub a_prime: f64,
    pub residual: f64,
}

/// Converged section result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionState {
    pub radius: f64,
    pub eval: SectionEval,
    /// Axial velocity at the disk [m/s]
    pub v_axial: f64,
    /// Tangential velocity at the disk [m/s]
    pub v_tangential: f64,
    /// Resultant velocity [m/s]
    pub v_resultant: f64,
    /// Recorded only; the polars are Reynolds-independent.
    pub reynolds: f64,
    /// Elemental thrust [N]
    pub d_thrust: f64,
    /// Elemental torque [N·m]
    pub d_torque: f64,
}

/// Elemental loads and their partials at a given φ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadPartials {
    pub d_thrust: f64,
    pub d_torque: f64,
    pub thrust: Partials,
    pub torque: Partials,
}

/// One radial annulus of the rotor. Elemental loads cover all blades.
#[derive(Debug, Clone)]
pub struct BladeSection {
    airfoil: Arc<AirfoilPolar>,
    radius: f64,
    width: f64,
    chord: f64,
    pitch: f64,
    solidity: f64,
    nblades: u32,
    hub_radius: f64,
    blade_radius: f64,
}

#[inline]
fn unit(index: usize) -> Partials {
    let mut p = Partials::zeros();
    p[index] = 1.0;
    p
}

/// Intermediate quantities shared by the residual and load partials.
struct Linearization {
    sin_phi: f64,
    cos_phi: f64,
    loss: f64,
    ct: f64,
    cq: f64,
    d_sin: Partials,
    d_cos: Partials,
    d_loss: Partials,
    d_solidity: Partials,
    d_ct: Partials,
    d_cq: Partials,
}

impl BladeSection {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        airfoil: Arc<AirfoilPolar>,
        radius: f64,
        width: f64,
        chord: f64,
        pitch: f64,
        nblades: u32,
        hub_radius: f64,
        blade_radius: f64,
    ) -> Self {
        let solidity = nblades as f64 * chord / (2.0 * PI * radius);
        Self {
            airfoil,
            radius,
            width,
            chord,
            pitch,
            solidity,
            nblades,
            hub_radius,
            blade_radius,
        }
    }

    pub fn airfoil(&self) -> &Arc<AirfoilPolar> {
        &self.airfoil
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn chord(&self) -> f64 {
        self.chord
    }

    /// Local blade angle from the disk plane [rad], twist included.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Local solidity B·c/(2πr).
    pub fn solidity(&self) -> f64 {
        self.solidity
    }

    pub fn loss_factor(&self, phi: f64) -> f64 {
        self.loss_with_slope(phi).0
    }

    fn loss_with_slope(&self, phi: f64) -> (f64, f64) {
        loss_factor_with_slope(
            self.nblades,
            self.radius,
            self.hub_radius,
            self.blade_radius,
            phi,
        )
    }

    /// Local inverse speed ratio v∞/(ω·r).
    fn lambda(&self, inflow: &Inflow) -> f64 {
        inflow.v_inf / (inflow.omega * self.radius)
    }

    /// Evaluate loss, airfoil, induction factors and residual at φ.
    pub fn evaluate(&self, phi: f64, inflow: &Inflow) -> SectionEval {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let loss = self.loss_factor(phi);
        let aoa_deg = (self.pitch - phi).to_degrees();
        let polar = self.airfoil.lookup(aoa_deg);

        let ct = polar.cl * cos_phi - polar.cd * sin_phi;
        let cq = polar.cl * sin_phi + polar.cd * cos_phi;

        let kappa = 4.0 * loss * sin_phi * sin_phi / (self.solidity * ct);
        let kappa_p = 4.0 * loss * sin_phi * cos_phi / (self.solidity * cq);
        let a = 1.0 / (kappa - 1.0);
        let a_prime = 1.0 / (kappa_p + 1.0);

        let lambda = self.lambda(inflow);
        let residual = sin_phi
            - lambda * cos_phi
            - self.solidity / (4.0 * loss * sin_phi) * (ct + lambda * cq);

        SectionEval {
            phi,
            loss_factor: loss,
            aoa_deg,
            cl: polar.cl,
            cd: polar.cd,
            ct_local: ct,
            cq_local: cq,
            a,
            a_prime,
            residual,
        }
    }

    /// R(φ) alone.
    pub fn residual(&self, phi: f64, inflow: &Inflow) -> f64 {
        self.evaluate(phi, inflow).residual
    }

    fn linearize(&self, phi: f64) -> Linearization {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (loss, dloss_dphi) = self.loss_with_slope(phi);
        let polar = self.airfoil.lookup((self.pitch - phi).to_degrees());

        // α in degrees moves with pitch - φ.
        let d_alpha = (unit(var::PITCH) - unit(var::PHI)) * (180.0 / PI);
        let d_cl = d_alpha * polar.dcl_dalpha;
        let d_cd = d_alpha * polar.dcd_dalpha;

        let ct = polar.cl * cos_phi - polar.cd * sin_phi;
        let cq = polar.cl * sin_phi + polar.cd * cos_phi;

        // Explicit φ terms: d(Cl cos φ - Cd sin φ)/dφ = -CQ, d(Cl sin φ + Cd cos φ)/dφ = CT.
        let d_ct = d_cl * cos_phi - d_cd * sin_phi - unit(var::PHI) * cq;
        let d_cq = d_cl * sin_phi + d_cd * cos_phi + unit(var::PHI) * ct;

        Linearization {
            sin_phi,
            cos_phi,
            loss,
            ct,
            cq,
            d_sin: unit(var::PHI) * cos_phi,
            d_cos: unit(var::PHI) * -sin_phi,
            d_loss: unit(var::PHI) * dloss_dphi,
            d_solidity: unit(var::CHORD) * (self.solidity / self.chord),
            d_ct,
            d_cq,
        }
    }

    fn d_lambda(&self, inflow: &Inflow) -> Partials {
        let lambda = self.lambda(inflow);
        let mut d = Partials::zeros();
        d[var::V_INF] = 1.0 / (inflow.omega * self.radius);
        d[var::OMEGA] = -lambda / inflow.omega;
        d
    }

    /// R(φ) and its analytic partials with respect to (φ, v∞, ω, pitch, chord).
    pub fn residual_partials(&self, phi: f64, inflow: &Inflow) -> (f64, Partials) {
        let lin = self.linearize(phi);
        let lambda = self.lambda(inflow);
        let d_lambda = self.d_lambda(inflow);

        // R = sin φ - λ cos φ - g·h,  g = σ/(4F sin φ),  h = CT + λ CQ
        let g = self.solidity / (4.0 * lin.loss * lin.sin_phi);
        let h = lin.ct + lambda * lin.cq;
        let d_g = (lin.d_solidity / self.solidity - lin.d_loss / lin.loss - lin.d_sin / lin.sin_phi)
            * g;
        let d_h = lin.d_ct + lin.d_cq * lambda + d_lambda * lin.cq;

        let residual = lin.sin_phi - lambda * lin.cos_phi - g * h;
        let d_residual = lin.d_sin - (lin.d_cos * lambda + d_lambda * lin.cos_phi) - (d_g * h + d_h * g);
        (residual, d_residual)
    }

    /// ∂R/∂φ only.
    pub fn residual_slope(&self, phi: f64, inflow: &Inflow) -> f64 {
        self.residual_partials(phi, inflow).1[var::PHI]
    }

    /// Velocity triangle at φ: (axial, tangential).
    ///
    /// The tangential component is (1 - a')·ω·r. The axial component is
    /// (1 + a)·v∞, evaluated through the residual identity as
    /// (1 - a')·ω·r·tan φ; both agree at a root and the latter stays finite
    /// in hover, where a is unbounded.
    fn velocities(&self, eval: &SectionEval, inflow: &Inflow) -> (f64, f64) {
        let swirl_ratio =
            self.solidity * eval.cq_local / (4.0 * eval.loss_factor * eval.phi.sin() * eval.phi.cos());
        let v_tangential = inflow.omega * self.radius / (1.0 + swirl_ratio);
        let v_axial = v_tangential * eval.phi.tan();
        (v_axial, v_tangential)
    }

    /// Elemental thrust and torque for a converged φ.
    pub fn loads(&self, phi: f64, inflow: &Inflow) -> SectionState {
        let eval = self.evaluate(phi, inflow);
        let (v_axial, v_tangential) = self.velocities(&eval, inflow);
        let u_sq = v_axial * v_axial + v_tangential * v_tangential;
        let v_resultant = u_sq.sqrt();
        let dynamic = self.solidity * PI * inflow.rho * u_sq;

        SectionState {
            radius: self.radius,
            eval,
            v_axial,
            v_tangential,
            v_resultant,
            reynolds: inflow.rho * v_resultant * self.chord / inflow.mu,
            d_thrust: dynamic * eval.ct_local * self.radius * self.width,
            d_torque: dynamic * eval.cq_local * self.radius * self.radius * self.width,
        }
    }

    /// Elemental loads and their partials with respect to (φ, v∞, ω, pitch, chord).
    pub fn load_partials(&self, phi: f64, inflow: &Inflow) -> LoadPartials {
        let lin = self.linearize(phi);
        let omega_r = inflow.omega * self.radius;

        // q = σ·CQ / (4F sin φ cos φ) = 1/κ'
        let denom = 4.0 * lin.loss * lin.sin_phi * lin.cos_phi;
        let d_denom = (lin.d_loss * (lin.sin_phi * lin.cos_phi)
            + lin.d_sin * (lin.loss * lin.cos_phi)
            + lin.d_cos * (lin.loss * lin.sin_phi))
            * 4.0;
        let q = self.solidity * lin.cq / denom;
        let d_q = (lin.d_solidity * lin.cq + lin.d_cq * self.solidity) / denom - d_denom * (q / denom);

        // v_t = ω r / (1 + q),  v_a = v_t tan φ
        let w = 1.0 / (1.0 + q);
        let d_w = d_q * (-w * w);
        let v_t = omega_r * w;
        let d_v_t = unit(var::OMEGA) * (self.radius * w) + d_w * omega_r;
        let tan_phi = lin.sin_phi / lin.cos_phi;
        let d_tan = unit(var::PHI) * (1.0 + tan_phi * tan_phi);
        let v_a = v_t * tan_phi;
        let d_v_a = d_v_t * tan_phi + d_tan * v_t;

        let u_sq = v_a * v_a + v_t * v_t;
        let d_u_sq = d_v_a * (2.0 * v_a) + d_v_t * (2.0 * v_t);

        let scale_t = PI * inflow.rho * self.radius * self.width;
        let scale_q = scale_t * self.radius;
        let sigma = self.solidity;

        // d(σ U² C) = dσ U² C + σ dU² C + σ U² dC
        let d_load = |c: f64, d_c: &Partials| -> Partials {
            lin.d_solidity * (u_sq * c) + d_u_sq * (sigma * c) + d_c * (sigma * u_sq)
        };

        LoadPartials {
            d_thrust: scale_t * sigma * u_sq * lin.ct,
            d_torque: scale_q * sigma * u_sq * lin.cq,
            thrust: d_load(lin.ct, &lin.d_ct) * scale_t,
            torque: d_load(lin.cq, &lin.d_cq) * scale_q,
        }
    }
}
