//! Immutable rotor aggregate.

use std::f64::consts::PI;

use crate::error::{RotorError, RotorResult};
use crate::section::BladeSection;

/// A discretized rotor: blade count, radii and sections ordered by radius.
///
/// Built by [`crate::RotorGeometryBuilder`]; never mutated afterwards.
/// Perturbed copies for gradient checks are made with
/// [`Rotor::with_section_geometry`] and [`Rotor::with_twist_offset`].
#[derive(Debug, Clone)]
pub struct Rotor {
    nblades: u32,
    hub_radius: f64,
    blade_radius: f64,
    sections: Vec<BladeSection>,
}

impl Rotor {
    pub(crate) fn new(
        nblades: u32,
        hub_radius: f64,
        blade_radius: f64,
        sections: Vec<BladeSection>,
    ) -> Self {
        Self {
            nblades,
            hub_radius,
            blade_radius,
            sections,
        }
    }

    pub fn nblades(&self) -> u32 {
        self.nblades
    }

    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }

    /// Tip radius, D/2.
    pub fn blade_radius(&self) -> f64 {
        self.blade_radius
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.blade_radius
    }

    /// πR², hub included.
    pub fn disk_area(&self) -> f64 {
        PI * self.blade_radius * self.blade_radius
    }

    pub fn sections(&self) -> &[BladeSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Copy of this rotor with one section's chord [m] and pitch [rad] replaced.
    pub fn with_section_geometry(&self, index: usize, chord: f64, pitch: f64) -> RotorResult<Rotor> {
        let Some(section) = self.sections.get(index) else {
            return Err(RotorError::config(format!(
                "section index {index} out of range ({} sections)",
                self.sections.len()
            )));
        };
        if !(chord.is_finite() && chord > 0.0) || !pitch.is_finite() {
            return Err(RotorError::config(format!(
                "section {index}: chord must be positive and pitch finite"
            )));
        }
        let replaced = BladeSection::new(
            section.airfoil().clone(),
            section.radius(),
            section.width(),
            chord,
            pitch,
            self.nblades,
            self.hub_radius,
            self.blade_radius,
        );
        let mut sections = self.sections.clone();
        sections[index] = replaced;
        Ok(Self::new(self.nblades, self.hub_radius, self.blade_radius, sections))
    }

    /// Copy of this rotor with every pitch shifted by `delta_deg`.
    pub fn with_twist_offset(&self, delta_deg: f64) -> Rotor {
        let delta = delta_deg.to_radians();
        let sections = self
            .sections
            .iter()
            .map(|s| {
                BladeSection::new(
                    s.airfoil().clone(),
                    s.radius(),
                    s.width(),
                    s.chord(),
                    s.pitch() + delta,
                    self.nblades,
                    self.hub_radius,
                    self.blade_radius,
                )
            })
            .collect();
        Self::new(self.nblades, self.hub_radius, self.blade_radius, sections)
    }
}
