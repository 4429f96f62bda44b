//! Discretization of a blade description into sections.

use std::sync::Arc;

use rp_airfoil::AirfoilPolar;
use rp_core::{AkimaSpline, Extrapolation, ensure_finite, linspace};
use tracing::debug;

use crate::error::{RotorError, RotorResult};
use crate::rotor::Rotor;
use crate::section::BladeSection;

/// Which polar each section uses.
#[derive(Debug, Clone)]
pub enum AirfoilAssignment {
    /// One polar for the whole blade.
    Single(Arc<AirfoilPolar>),
    /// One polar per radius sample; a section takes the polar of the nearest
    /// sample (the inner one on ties).
    PerSample(Vec<Arc<AirfoilPolar>>),
}

/// Builder for [`Rotor`].
///
/// Radius samples are in metres, chord in metres and pitch in degrees from
/// the disk plane. `build` places `n_sections` equal-width stations at the
/// midpoints between hub and tip and interpolates chord and pitch there with
/// an Akima spline; `build_at_stations` uses the sample radii directly.
#[derive(Debug, Clone)]
pub struct RotorGeometryBuilder {
    nblades: u32,
    hub_radius: f64,
    blade_radius: f64,
    n_sections: usize,
    global_twist_deg: f64,
    radius: Vec<f64>,
    chord: Vec<f64>,
    pitch_deg: Vec<f64>,
    airfoil: Option<AirfoilAssignment>,
}

impl RotorGeometryBuilder {
    pub fn new(nblades: u32, hub_radius: f64, blade_radius: f64) -> Self {
        Self {
            nblades,
            hub_radius,
            blade_radius,
            n_sections: 20,
            global_twist_deg: 0.0,
            radius: Vec::new(),
            chord: Vec::new(),
            pitch_deg: Vec::new(),
            airfoil: None,
        }
    }

    /// Number of midpoint stations used by [`Self::build`] (default 20).
    pub fn n_sections(mut self, n: usize) -> Self {
        self.n_sections = n;
        self
    }

    /// Pitch offset added to every station [deg].
    pub fn global_twist_deg(mut self, twist: f64) -> Self {
        self.global_twist_deg = twist;
        self
    }

    pub fn samples(mut self, radius: Vec<f64>, chord: Vec<f64>, pitch_deg: Vec<f64>) -> Self {
        self.radius = radius;
        self.chord = chord;
        self.pitch_deg = pitch_deg;
        self
    }

    pub fn airfoil(mut self, polar: Arc<AirfoilPolar>) -> Self {
        self.airfoil = Some(AirfoilAssignment::Single(polar));
        self
    }

    pub fn airfoils_per_sample(mut self, polars: Vec<Arc<AirfoilPolar>>) -> Self {
        self.airfoil = Some(AirfoilAssignment::PerSample(polars));
        self
    }

    pub fn assignment(mut self, assignment: AirfoilAssignment) -> Self {
        self.airfoil = Some(assignment);
        self
    }

    /// Midpoint discretization with spline-interpolated chord and pitch.
    pub fn build(&self) -> RotorResult<Rotor> {
        let assignment = self.validate()?;
        if self.n_sections == 0 {
            return Err(RotorError::config("n_sections must be at least 1"));
        }

        let chord_spline = spline(&self.radius, &self.chord, "chord")?;
        let pitch_spline = spline(&self.radius, &self.pitch_deg, "pitch")?;

        let edges = linspace(self.hub_radius, self.blade_radius, self.n_sections + 1);
        let width = (self.blade_radius - self.hub_radius) / self.n_sections as f64;

        let mut sections = Vec::with_capacity(self.n_sections);
        for (i, edge) in edges.windows(2).enumerate() {
            let r = 0.5 * (edge[0] + edge[1]);
            let chord = chord_spline.eval(r);
            let pitch_deg = pitch_spline.eval(r);
            if !(chord.is_finite() && chord > 0.0) {
                return Err(RotorError::config(format!(
                    "interpolated chord {chord} at station {i} (r = {r} m) is not positive"
                )));
            }
            if !pitch_deg.is_finite() {
                return Err(RotorError::config(format!(
                    "interpolated pitch at station {i} is not finite"
                )));
            }
            sections.push(self.section(&assignment, r, width, chord, pitch_deg));
        }

        debug!(
            nblades = self.nblades,
            n_sections = sections.len(),
            hub = self.hub_radius,
            tip = self.blade_radius,
            "built midpoint rotor"
        );
        Ok(Rotor::new(
            self.nblades,
            self.hub_radius,
            self.blade_radius,
            sections,
        ))
    }

    /// One section at each sample radius.
    ///
    /// Interior widths are half the distance to each neighbour; the first and
    /// last also cover the gap to the hub and to the tip.
    pub fn build_at_stations(&self) -> RotorResult<Rotor> {
        let assignment = self.validate()?;
        let r = &self.radius;
        let n = r.len();
        if r[0] <= self.hub_radius || r[n - 1] >= self.blade_radius {
            return Err(RotorError::config(format!(
                "stations must lie strictly between hub ({} m) and tip ({} m)",
                self.hub_radius, self.blade_radius
            )));
        }
        if let Some(i) = self.chord.iter().position(|c| *c <= 0.0) {
            return Err(RotorError::config(format!("chord sample {i} is not positive")));
        }

        let sections = (0..n)
            .map(|i| {
                let inner = if i == 0 {
                    r[0] - self.hub_radius
                } else {
                    0.5 * (r[i] - r[i - 1])
                };
                let outer = if i == n - 1 {
                    self.blade_radius - r[n - 1]
                } else {
                    0.5 * (r[i + 1] - r[i])
                };
                self.section(&assignment, r[i], inner + outer, self.chord[i], self.pitch_deg[i])
            })
            .collect::<Vec<_>>();

        debug!(
            nblades = self.nblades,
            n_sections = sections.len(),
            "built station rotor"
        );
        Ok(Rotor::new(
            self.nblades,
            self.hub_radius,
            self.blade_radius,
            sections,
        ))
    }

    fn section(
        &self,
        assignment: &AirfoilAssignment,
        radius: f64,
        width: f64,
        chord: f64,
        pitch_deg: f64,
    ) -> BladeSection {
        let airfoil = match assignment {
            AirfoilAssignment::Single(polar) => polar.clone(),
            AirfoilAssignment::PerSample(polars) => {
                polars[nearest_sample(&self.radius, radius)].clone()
            }
        };
        BladeSection::new(
            airfoil,
            radius,
            width,
            chord,
            (pitch_deg + self.global_twist_deg).to_radians(),
            self.nblades,
            self.hub_radius,
            self.blade_radius,
        )
    }

    fn validate(&self) -> RotorResult<AirfoilAssignment> {
        if self.nblades < 1 {
            return Err(RotorError::config("nblades must be at least 1"));
        }
        ensure_finite(self.hub_radius, "hub radius")?;
        ensure_finite(self.blade_radius, "blade radius")?;
        if self.hub_radius < 0.0 {
            return Err(RotorError::config(format!(
                "hub radius {} m is negative",
                self.hub_radius
            )));
        }
        if self.hub_radius >= self.blade_radius {
            return Err(RotorError::config(format!(
                "hub radius {} m must be below blade radius {} m",
                self.hub_radius, self.blade_radius
            )));
        }
        if self.radius.len() < 2 {
            return Err(RotorError::config(format!(
                "at least 2 radius samples are required, got {}",
                self.radius.len()
            )));
        }
        if self.chord.len() != self.radius.len() || self.pitch_deg.len() != self.radius.len() {
            return Err(RotorError::config(format!(
                "sample length mismatch: radius {}, chord {}, pitch {}",
                self.radius.len(),
                self.chord.len(),
                self.pitch_deg.len()
            )));
        }
        for (what, samples) in [
            ("radius sample", &self.radius),
            ("chord sample", &self.chord),
            ("pitch sample", &self.pitch_deg),
        ] {
            for &v in samples {
                ensure_finite(v, what)?;
            }
        }
        if self.radius.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RotorError::config("radius samples must be strictly increasing"));
        }

        match &self.airfoil {
            None => Err(RotorError::config("no airfoil assigned")),
            Some(AirfoilAssignment::PerSample(polars)) if polars.len() != self.radius.len() => {
                Err(RotorError::config(format!(
                    "{} airfoils for {} radius samples",
                    polars.len(),
                    self.radius.len()
                )))
            }
            Some(assignment) => Ok(assignment.clone()),
        }
    }
}

fn spline(x: &[f64], y: &[f64], what: &str) -> RotorResult<AkimaSpline> {
    AkimaSpline::new(x, y, Extrapolation::Polynomial)
        .map_err(|e| RotorError::config(format!("{what} distribution: {e}")))
}

/// Index of the sample closest to `r`; the first wins on ties.
fn nearest_sample(samples: &[f64], r: f64) -> usize {
    let mut best = 0;
    for (i, s) in samples.iter().enumerate().skip(1) {
        if (s - r).abs() < (samples[best] - r).abs() {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_airfoil::{AirfoilFamily, ClosedFormPolar};

    fn polar(family: AirfoilFamily) -> Arc<AirfoilPolar> {
        Arc::new(AirfoilPolar::from(ClosedFormPolar::for_family(family)))
    }

    fn builder() -> RotorGeometryBuilder {
        RotorGeometryBuilder::new(3, 0.2, 1.0)
            .samples(
                vec![0.2, 0.6, 1.0],
                vec![0.10, 0.08, 0.05],
                vec![40.0, 25.0, 15.0],
            )
            .airfoil(polar(AirfoilFamily::ClarkY))
    }

    #[test]
    fn midpoints_and_widths() {
        let rotor = builder().n_sections(4).build().unwrap();
        let radii: Vec<f64> = rotor.sections().iter().map(|s| s.radius()).collect();
        let expected = [0.3, 0.5, 0.7, 0.9];
        for (r, e) in radii.iter().zip(expected) {
            assert!((r - e).abs() < 1e-12);
        }
        let total: f64 = rotor.sections().iter().map(|s| s.width()).sum();
        assert!((total - 0.8).abs() < 1e-12);
    }

    #[test]
    fn global_twist_is_added_in_degrees() {
        let base = builder().n_sections(3).build().unwrap();
        let twisted = builder().n_sections(3).global_twist_deg(3.0).build().unwrap();
        for (a, b) in base.sections().iter().zip(twisted.sections()) {
            assert!((b.pitch() - a.pitch() - 3f64.to_radians()).abs() < 1e-14);
        }
    }

    #[test]
    fn interpolation_passes_through_samples() {
        // Middle station of 5 sits at r = 0.6, a sample radius.
        let rotor = builder().n_sections(5).build().unwrap();
        let mid = &rotor.sections()[2];
        assert!((mid.radius() - 0.6).abs() < 1e-12);
        assert!((mid.chord() - 0.08).abs() < 1e-12);
        assert!((mid.pitch() - 25f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn configuration_errors() {
        assert!(RotorGeometryBuilder::new(3, 1.0, 1.0).build().is_err());
        assert!(
            RotorGeometryBuilder::new(0, 0.1, 1.0)
                .samples(vec![0.2, 0.9], vec![0.1, 0.1], vec![10.0, 10.0])
                .airfoil(polar(AirfoilFamily::ClarkY))
                .build()
                .is_err()
        );
        assert!(
            RotorGeometryBuilder::new(3, 0.1, 1.0)
                .samples(vec![0.5], vec![0.1], vec![10.0])
                .airfoil(polar(AirfoilFamily::ClarkY))
                .build()
                .is_err()
        );
        assert!(builder().n_sections(0).build().is_err());
        assert!(
            builder()
                .samples(vec![0.2, 0.6, 0.5], vec![0.1; 3], vec![10.0; 3])
                .build()
                .is_err()
        );
        let no_airfoil = RotorGeometryBuilder::new(3, 0.2, 1.0).samples(
            vec![0.2, 1.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
        );
        assert!(no_airfoil.build().is_err());
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let err = builder()
            .samples(vec![0.2, 0.6, 1.0], vec![0.1, f64::NAN, 0.1], vec![10.0; 3])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Non-finite numeric value for chord sample"));
        let err = RotorGeometryBuilder::new(3, 0.2, f64::INFINITY)
            .samples(vec![0.2, 0.6], vec![0.1; 2], vec![10.0; 2])
            .airfoil(polar(AirfoilFamily::ClarkY))
            .build()
            .unwrap_err();
        assert!(matches!(err, RotorError::Configuration { .. }));
    }

    #[test]
    fn per_sample_airfoils_use_nearest_sample() {
        let rotor = builder()
            .airfoils_per_sample(vec![
                polar(AirfoilFamily::Naca0012),
                polar(AirfoilFamily::Naca4412),
                polar(AirfoilFamily::ClarkY),
            ])
            .n_sections(4)
            .build()
            .unwrap();
        let names: Vec<&str> = rotor.sections().iter().map(|s| s.airfoil().name()).collect();
        // Midpoints 0.3, 0.5, 0.7, 0.9 against samples 0.2, 0.6, 1.0.
        assert_eq!(names, ["NACA0012", "NACA4412", "NACA4412", "CLARKY"]);
    }

    #[test]
    fn nearest_sample_prefers_inner_on_ties() {
        assert_eq!(nearest_sample(&[0.0, 1.0], 0.5), 0);
        assert_eq!(nearest_sample(&[0.0, 1.0, 2.0], 1.6), 2);
    }

    #[test]
    fn station_widths_cover_the_blade() {
        let rotor = RotorGeometryBuilder::new(3, 0.375, 1.527)
            .samples(
                vec![0.525, 0.675, 0.825, 0.975, 1.125, 1.275, 1.425],
                vec![0.2; 7],
                vec![30.0; 7],
            )
            .airfoil(polar(AirfoilFamily::ClarkY))
            .build_at_stations()
            .unwrap();
        let total: f64 = rotor.sections().iter().map(|s| s.width()).sum();
        assert!((total - (1.527 - 0.375)).abs() < 1e-12);
        assert!((rotor.sections()[0].width() - 0.225).abs() < 1e-12);
        assert!((rotor.sections()[3].width() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn stations_outside_the_blade_are_rejected() {
        let result = RotorGeometryBuilder::new(3, 0.3, 1.0)
            .samples(vec![0.3, 0.9], vec![0.1, 0.1], vec![10.0, 10.0])
            .airfoil(polar(AirfoilFamily::ClarkY))
            .build_at_stations();
        assert!(matches!(result, Err(RotorError::Configuration { .. })));
    }
}
