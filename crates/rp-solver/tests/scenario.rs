//! Propeller sweep at fixed rpm against the expected curve shapes.

mod common;

use common::{RPM, air, scenario_rotor};
use rp_solver::{
    SolverKind, SolverSettings, SweepDefinition, SweepPoint, SweepProgress, SweepQuantity,
    run_sweep,
};
use std::sync::Mutex;

fn sweep(kind: SolverKind) -> Vec<SweepPoint> {
    let rotor = scenario_rotor();
    let def = SweepDefinition::new(SweepQuantity::VInf, 0.0, 45.0, 10, RPM).unwrap();
    run_sweep(
        &rotor,
        air(),
        &SolverSettings::with_kind(kind),
        &def.operating_points(),
        None,
    )
}

#[test]
fn thrust_coefficient_decreases_with_airspeed() {
    let points = sweep(SolverKind::Robust);
    let ct: Vec<f64> = points.iter().map(|p| p.record().unwrap().ct()).collect();
    assert!(ct.windows(2).all(|w| w[1] < w[0]), "CT = {ct:?}");
    assert!(ct[0] > 0.0);
}

#[test]
fn efficiency_has_a_single_interior_maximum() {
    let points = sweep(SolverKind::Robust);
    let eta: Vec<f64> = points.iter().map(|p| p.record().unwrap().eta()).collect();
    assert_eq!(eta[0], 0.0);

    let peak = eta
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    assert!(peak > 0 && peak < eta.len() - 1, "eta = {eta:?}");
    assert!(eta[..=peak].windows(2).all(|w| w[1] > w[0]));
    assert!(eta[peak..].windows(2).all(|w| w[1] < w[0]));
    assert!(eta[peak] > 0.5 && eta[peak] < 1.0);
}

#[test]
fn newton_sweep_matches_robust_sweep() {
    let robust = sweep(SolverKind::Robust);
    let newton = sweep(SolverKind::Newton);
    for (a, b) in robust.iter().zip(&newton) {
        let (a, b) = (a.record().unwrap(), b.record().unwrap());
        assert!(common::relative_difference(a.ct(), b.ct()) < 1e-4);
        assert!(common::relative_difference(a.cp(), b.cp()) < 1e-4);
    }
}

#[test]
fn sweep_reports_progress_and_keeps_order() {
    let rotor = scenario_rotor();
    let def = SweepDefinition::new(SweepQuantity::VInf, 0.0, 30.0, 4, RPM).unwrap();
    let seen = Mutex::new(Vec::new());
    let callback: &(dyn Fn(SweepProgress) + Sync) =
        &|p: SweepProgress| seen.lock().unwrap().push(p.completed);
    let points = run_sweep(
        &rotor,
        air(),
        &SolverSettings::default(),
        &def.operating_points(),
        Some(callback),
    );

    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4]);
    let speeds: Vec<f64> = points.iter().map(|p| p.operating_point().v_inf).collect();
    assert_eq!(speeds, vec![0.0, 10.0, 20.0, 30.0]);
}

#[test]
fn failed_points_do_not_abort_the_sweep() {
    let rotor = scenario_rotor();
    let points = [
        rp_solver::OperatingPoint::new(10.0, RPM),
        rp_solver::OperatingPoint::new(10.0, -5.0),
        rp_solver::OperatingPoint::new(20.0, RPM),
    ];
    let results = run_sweep(&rotor, air(), &SolverSettings::default(), &points, None);
    assert!(matches!(results[0], SweepPoint::Solved(_)));
    assert!(matches!(results[1], SweepPoint::Failed { .. }));
    assert!(matches!(results[2], SweepPoint::Solved(_)));
}
