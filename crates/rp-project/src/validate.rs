//! Case validation logic.

use crate::schema::{AirfoilRefDef, Case, FluidDef, RotorDef, SolverDef, SweepDef};
use rp_airfoil::AirfoilCatalog;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require(ok: bool, field: &str, value: f64, reason: &str) -> Result<(), ValidationError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, reason))
    }
}

fn check_len(field: &str, expected: usize, actual: usize) -> Result<(), ValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ValidationError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

pub fn validate_case(case: &Case) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    let known = validate_airfoil_tables(case)?;
    validate_rotor(&case.rotor, &known)?;
    validate_fluid(&case.fluid)?;
    validate_solver(&case.solver)?;

    for (i, point) in case.operating_points.iter().enumerate() {
        let field = |name: &str| format!("operating_points[{i}].{name}");
        require(point.v_inf_mps >= 0.0, &field("v_inf_mps"), point.v_inf_mps, "must be >= 0")?;
        require(point.rpm > 0.0, &field("rpm"), point.rpm, "must be > 0")?;
    }

    if let Some(sweep) = &case.sweep {
        validate_sweep(sweep)?;
    }
    Ok(())
}

/// Returns the catalog of names the rotor may reference.
fn validate_airfoil_tables(case: &Case) -> Result<AirfoilCatalog, ValidationError> {
    let mut catalog = AirfoilCatalog::builtin();
    let mut seen = HashSet::new();
    for table in &case.airfoil_tables {
        if !seen.insert(table.name.as_str()) || catalog.contains(&table.name) {
            return Err(ValidationError::DuplicateId {
                id: table.name.clone(),
                context: "airfoil_tables".to_string(),
            });
        }
        let field = |name: &str| format!("airfoil_tables[{}].{name}", table.name);
        check_len(&field("cl"), table.alpha_deg.len(), table.cl.len())?;
        check_len(&field("cd"), table.alpha_deg.len(), table.cd.len())?;
        let polar = crate::polar_from_table(table)
            .map_err(|e| invalid(field("alpha_deg"), table.alpha_deg.len(), &e.to_string()))?;
        catalog
            .register(polar)
            .map_err(|e| invalid(field("name"), &table.name, &e.to_string()))?;
    }
    Ok(catalog)
}

fn validate_rotor(rotor: &RotorDef, airfoils: &AirfoilCatalog) -> Result<(), ValidationError> {
    if rotor.nblades == 0 {
        return Err(invalid("rotor.nblades", rotor.nblades, "must be >= 1"));
    }
    require(rotor.diameter_m > 0.0, "rotor.diameter_m", rotor.diameter_m, "must be > 0")?;
    let tip = rotor.diameter_m / 2.0;
    require(
        rotor.hub_radius_m >= 0.0,
        "rotor.hub_radius_m",
        rotor.hub_radius_m,
        "must be >= 0",
    )?;
    require(
        rotor.hub_radius_m < tip,
        "rotor.hub_radius_m",
        rotor.hub_radius_m,
        "must be smaller than the tip radius",
    )?;
    require(
        true,
        "rotor.global_twist_deg",
        rotor.global_twist_deg,
        "must be finite",
    )?;

    let n = rotor.radius_m.len();
    if n < 2 {
        return Err(invalid("rotor.radius_m", n, "at least 2 samples required"));
    }
    check_len("rotor.chord_m", n, rotor.chord_m.len())?;
    check_len("rotor.pitch_deg", n, rotor.pitch_deg.len())?;

    for (i, pair) in rotor.radius_m.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(invalid(
                format!("rotor.radius_m[{}]", i + 1),
                pair[1],
                "radii must be strictly increasing",
            ));
        }
    }
    for (i, &r) in rotor.radius_m.iter().enumerate() {
        require(r >= 0.0, &format!("rotor.radius_m[{i}]"), r, "must be >= 0")?;
    }
    for (i, &c) in rotor.chord_m.iter().enumerate() {
        require(c > 0.0, &format!("rotor.chord_m[{i}]"), c, "must be > 0")?;
    }
    for (i, &p) in rotor.pitch_deg.iter().enumerate() {
        require(true, &format!("rotor.pitch_deg[{i}]"), p, "must be finite")?;
    }

    match rotor.discretization {
        crate::schema::DiscretizationDef::Midpoint { n_sections } if n_sections == 0 => {
            return Err(invalid(
                "rotor.discretization.n_sections",
                n_sections,
                "must be >= 1",
            ));
        }
        crate::schema::DiscretizationDef::Stations => {
            for (i, &r) in rotor.radius_m.iter().enumerate() {
                if !(r > rotor.hub_radius_m && r < tip) {
                    return Err(invalid(
                        format!("rotor.radius_m[{i}]"),
                        r,
                        "stations must lie strictly between hub and tip",
                    ));
                }
            }
        }
        _ => {}
    }

    if let AirfoilRefDef::PerSample(names) = &rotor.airfoil {
        check_len("rotor.airfoil", n, names.len())?;
    }
    for name in rotor.airfoil.names() {
        if !airfoils.contains(name) {
            return Err(ValidationError::MissingReference {
                id: name.to_string(),
                context: "rotor.airfoil".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    match *fluid {
        FluidDef::Explicit {
            density_kg_m3,
            viscosity_pa_s,
        } => {
            require(density_kg_m3 > 0.0, "fluid.density_kg_m3", density_kg_m3, "must be > 0")?;
            require(
                viscosity_pa_s > 0.0,
                "fluid.viscosity_pa_s",
                viscosity_pa_s,
                "must be > 0",
            )
        }
        FluidDef::StandardAtmosphere {
            altitude_m,
            temperature_offset_k,
        } => crate::atmosphere::Atmosphere::standard(altitude_m, temperature_offset_k).map(|_| ()),
    }
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if let Some(tol) = solver.tolerance {
        require(tol > 0.0, "solver.tolerance", tol, "must be > 0")?;
    }
    if solver.max_iterations == Some(0) {
        return Err(invalid("solver.max_iterations", 0, "must be >= 1"));
    }
    if solver.scan_intervals == Some(0) {
        return Err(invalid("solver.scan_intervals", 0, "must be >= 1"));
    }
    Ok(())
}

fn validate_sweep(sweep: &SweepDef) -> Result<(), ValidationError> {
    if sweep.num_points < 2 {
        return Err(invalid("sweep.num_points", sweep.num_points, "must be >= 2"));
    }
    require(sweep.start != sweep.end, "sweep.end", sweep.end, "must differ from start")?;
    require(true, "sweep.start", sweep.start, "must be finite")?;
    require(true, "sweep.fixed", sweep.fixed, "must be finite")?;
    Ok(())
}
