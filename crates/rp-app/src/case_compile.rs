//! Case definition → solver inputs.

use rp_airfoil::AirfoilCatalog;
use rp_core::{mps, rpm};
use rp_project::schema::{
    AirfoilRefDef, Case, DiscretizationDef, FluidDef, OperatingPointDef, RotorDef, SolverDef,
    SolverKindDef, SweepDef, SweepQuantityDef, SweepSpacingDef,
};
use rp_rotor::{AirfoilAssignment, Rotor, RotorGeometryBuilder};
use rp_solver::{
    FluidProperties, OperatingPoint, SolverKind, SolverSettings, SweepDefinition, SweepQuantity,
    SweepSpacing,
};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Everything needed to solve a case, resolved once.
#[derive(Debug, Clone)]
pub struct CompiledCase {
    pub name: String,
    pub rotor: Rotor,
    pub fluid: FluidProperties,
    pub settings: SolverSettings,
    pub operating_points: Vec<OperatingPoint>,
    pub sweep: Option<SweepDefinition>,
}

pub fn compile_case(case: &Case) -> AppResult<CompiledCase> {
    let catalog = rp_project::airfoil_catalog(case)?;
    let rotor = build_rotor(&case.rotor, &catalog)?;
    let fluid = build_fluid(&case.fluid)?;
    let settings = build_settings(&case.solver)?;
    let operating_points = case.operating_points.iter().map(build_point).collect();
    let sweep = case.sweep.as_ref().map(build_sweep).transpose()?;

    debug!(
        case = %case.name,
        sections = rotor.len(),
        solver = %settings.kind,
        "case compiled"
    );

    Ok(CompiledCase {
        name: case.name.clone(),
        rotor,
        fluid,
        settings,
        operating_points,
        sweep,
    })
}

pub fn build_rotor(def: &RotorDef, catalog: &AirfoilCatalog) -> AppResult<Rotor> {
    let assignment = match &def.airfoil {
        AirfoilRefDef::Single(name) => AirfoilAssignment::Single(catalog.resolve(name)?),
        AirfoilRefDef::PerSample(names) => AirfoilAssignment::PerSample(
            names
                .iter()
                .map(|name| catalog.resolve(name))
                .collect::<Result<_, _>>()?,
        ),
    };

    let builder = RotorGeometryBuilder::new(def.nblades, def.hub_radius_m, def.diameter_m / 2.0)
        .global_twist_deg(def.global_twist_deg)
        .samples(
            def.radius_m.clone(),
            def.chord_m.clone(),
            def.pitch_deg.clone(),
        )
        .assignment(assignment);

    let rotor = match def.discretization {
        DiscretizationDef::Midpoint { n_sections } => builder.n_sections(n_sections).build()?,
        DiscretizationDef::Stations => builder.build_at_stations()?,
    };
    Ok(rotor)
}

pub fn build_fluid(def: &FluidDef) -> AppResult<FluidProperties> {
    let (density, viscosity) = def.properties()?;
    Ok(FluidProperties::new(density, viscosity))
}

/// Solver settings with the case's overrides applied to both strategies.
pub fn build_settings(def: &SolverDef) -> AppResult<SolverSettings> {
    let mut settings = SolverSettings::with_kind(match def.kind {
        SolverKindDef::Robust => SolverKind::Robust,
        SolverKindDef::Newton => SolverKind::Newton,
    });
    if let Some(tol) = def.tolerance {
        settings.bracket.x_tol = tol;
        settings.newton.abs_tol = tol;
    }
    if let Some(iters) = def.max_iterations {
        settings.bracket.max_iterations = iters;
        settings.newton.max_iterations = iters;
    }
    if let Some(intervals) = def.scan_intervals {
        settings.bracket.scan_intervals = intervals;
        settings.newton.scan_intervals = intervals;
    }
    settings.bracket.parallel = def.parallel;

    settings.bracket.validate()?;
    settings.newton.validate()?;
    Ok(settings)
}

fn build_point(def: &OperatingPointDef) -> OperatingPoint {
    OperatingPoint::from_units(mps(def.v_inf_mps), rpm(def.rpm))
}

pub fn build_sweep(def: &SweepDef) -> AppResult<SweepDefinition> {
    let quantity = match def.quantity {
        SweepQuantityDef::VInf => SweepQuantity::VInf,
        SweepQuantityDef::Rpm => SweepQuantity::Rpm,
    };
    let spacing = match def.spacing {
        SweepSpacingDef::Linear => SweepSpacing::Linear,
        SweepSpacingDef::Logarithmic => SweepSpacing::Logarithmic,
    };
    let sweep = SweepDefinition::new(quantity, def.start, def.end, def.num_points, def.fixed)
        .map_err(|e| AppError::InvalidInput(format!("sweep: {e}")))?;
    Ok(sweep.with_spacing(spacing))
}
