use std::path::Path;

use rp_app::{DEFAULT_FD_STEP, compile_case, compute_sensitivities, load_case};

fn compiled(name: &str) -> rp_app::CompiledCase {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases").join(name);
    compile_case(&load_case(&path).unwrap()).unwrap()
}

#[test]
fn analytic_matches_finite_differences_in_cruise() {
    let case = compiled("clarky_propeller.yaml");
    let report = compute_sensitivities(&case, 20.0, 1100.0, DEFAULT_FD_STEP).unwrap();
    let mismatch = report.max_mismatch.unwrap();
    assert!(mismatch < 1e-3, "mismatch {mismatch}");

    // More airspeed unloads a fixed-pitch propeller; more rpm loads it.
    assert!(report.analytic.thrust.v_inf < 0.0);
    assert!(report.analytic.thrust.rpm > 0.0);
    assert!(report.analytic.power.global_twist_deg > 0.0);
    assert_eq!(report.analytic.thrust.pitch_deg.len(), 7);
    assert_eq!(report.record.sections.len(), 7);
}

#[test]
fn hover_skips_the_finite_difference_check() {
    let case = compiled("hover_rotor.yaml");
    let report = compute_sensitivities(&case, 0.0, 2400.0, DEFAULT_FD_STEP).unwrap();
    assert!(report.finite_difference.is_none());
    assert!(report.max_mismatch.is_none());
    assert!(report.analytic.thrust.rpm > 0.0);
    let pitch_sum: f64 = report.analytic.thrust.pitch_deg.iter().sum();
    assert!((pitch_sum - report.analytic.thrust.global_twist_deg).abs() < 1e-9);
}
