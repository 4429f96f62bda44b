use proptest::prelude::*;
use rp_project::Atmosphere;

proptest! {
    #[test]
    fn density_falls_with_altitude(h in -600.0f64..19_900.0, dh in 1.0f64..100.0) {
        let low = Atmosphere::standard(h, 0.0).unwrap();
        let high = Atmosphere::standard(h + dh, 0.0).unwrap();
        prop_assert!(high.density_kg_m3 < low.density_kg_m3);
        prop_assert!(high.pressure_pa < low.pressure_pa);
    }

    #[test]
    fn state_obeys_ideal_gas(h in -600.0f64..20_000.0, dt in -30.0f64..30.0) {
        let atm = Atmosphere::standard(h, dt).unwrap();
        let p = atm.density_kg_m3 * rp_project::atmosphere::R_AIR * atm.temperature_k;
        prop_assert!((p - atm.pressure_pa).abs() / atm.pressure_pa < 1e-12);
        prop_assert!(atm.viscosity_pa_s > 1.0e-5 && atm.viscosity_pa_s < 2.0e-5);
    }
}
