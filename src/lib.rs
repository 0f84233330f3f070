//! PT-JPL (Priestley-Taylor Jet Propulsion Laboratory) evapotranspiration.
//!
//! Partitions latent heat flux into soil evaporation, canopy transpiration and
//! interception evaporation from net radiation, relative humidity, air temperature and
//! NDVI grids. Missing cells are NaN throughout.

pub mod constraints;
mod error;
pub mod evapotranspiration;
pub mod grid;
mod inputs;
mod outputs;
mod params;
mod ptjpl;
pub mod partition;
pub mod vapor_pressure;
pub mod vegetation;

pub use constraints::{OptimumTemperature, PhenologyWindow};
pub use error::PtJplError;
pub use grid::Grid;
pub use inputs::{KELVIN_OFFSET, PtJplInputs};
pub use outputs::{Diagnostics, PtJplOutputs};
pub use params::{DEFAULT_FLOOR_SATURATION_VAPOR_PRESSURE, PtJplParams};
pub use ptjpl::{PtJpl, ptjpl_area};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_cell(rn: f64, rh: f64, ta_k: f64, ndvi: f64) -> PtJplInputs {
        PtJplInputs::from_columns(vec![rn], vec![rh], vec![ta_k], vec![ndvi]).unwrap()
    }

    // A spread of day, night, frozen, dry, wet, bare and dense cells
    fn mixed_scene() -> PtJplInputs {
        let mut rn = Vec::new();
        let mut rh = Vec::new();
        let mut ta = Vec::new();
        let mut ndvi = Vec::new();
        for i in 0..12 {
            for j in 0..10 {
                rn.push(-80.0 + 70.0 * i as f64);
                rh.push(-5.0 + 11.0 * j as f64);
                ta.push(253.15 + 4.0 * (i + j) as f64);
                ndvi.push(-0.2 + 0.1 * ((i * 3 + j) % 12) as f64);
            }
        }
        PtJplInputs::new(
            Grid::from_row_slice(12, 10, &rn),
            Grid::from_row_slice(12, 10, &rh),
            Grid::from_row_slice(12, 10, &ta),
            Grid::from_row_slice(12, 10, &ndvi),
        )
        .unwrap()
    }

    #[test]
    fn worked_example() {
        let out = PtJpl::default().estimate(&single_cell(400.0, 60.0, 298.15, 0.6));
        let d = &out.diagnostics;

        assert_abs_diff_eq!(d.vapor_pressure.saturation_vapor_pressure[(0, 0)], 3.16, epsilon = 0.01);
        assert_abs_diff_eq!(d.vapor_pressure.water_vapor_pressure[(0, 0)], 1.897, epsilon = 0.01);
        assert_abs_diff_eq!(d.vapor_pressure.vapor_pressure_deficit[(0, 0)], 1.264, epsilon = 0.01);
        assert_abs_diff_eq!(d.vegetation.savi[(0, 0)], 0.402, epsilon = 1e-12);
        assert_abs_diff_eq!(d.vegetation.fapar[(0, 0)], 0.500, epsilon = 1e-3);
        assert_eq!(d.optimum_temperature, 23.5);

        // G capped by 0.35 of the soil net radiation
        assert_abs_diff_eq!(d.partition.soil_heat_flux[(0, 0)], 53.7011, epsilon = 1e-3);
        assert_abs_diff_eq!(out.soil_evaporation[(0, 0)], 54.4562, epsilon = 1e-3);
        assert_abs_diff_eq!(out.canopy_transpiration[(0, 0)], 181.2764, epsilon = 1e-3);
        assert_abs_diff_eq!(out.interception_evaporation[(0, 0)], 29.8115, epsilon = 1e-3);
        assert_abs_diff_eq!(out.evapotranspiration[(0, 0)], 265.5442, epsilon = 1e-3);
        assert_abs_diff_eq!(out.potential_evapotranspiration[(0, 0)], 323.0672, epsilon = 1e-3);

        let et = out.evapotranspiration[(0, 0)];
        assert!((0.0..=400.0).contains(&et));
        assert!(out.potential_evapotranspiration[(0, 0)] <= 400.0);
    }

    #[test]
    fn total_never_exceeds_net_radiation() {
        let inputs = mixed_scene();
        let out = PtJpl::default().estimate(&inputs);
        for (et, rn) in out.evapotranspiration.iter().zip(inputs.net_radiation().iter()) {
            if !et.is_nan() && !rn.is_nan() {
                assert!(et <= rn, "ET {et} above Rn {rn}");
                assert!(*et >= 0.0);
            }
        }
    }

    #[test]
    fn fractions_within_unit_interval() {
        let out = PtJpl::default().estimate(&mixed_scene());
        let d = &out.diagnostics;
        for grid in [
            &d.vegetation.fapar,
            &d.vegetation.green_canopy_fraction,
            &d.vegetation.plant_moisture_constraint,
            &d.soil_moisture_constraint,
            &d.partition.fractional_vegetation_cover,
        ] {
            for v in grid.iter().filter(|v| !v.is_nan()) {
                assert!((0.0..=1.0).contains(v), "{v} outside [0, 1]");
            }
        }
    }

    #[test]
    fn floor_holds_everywhere() {
        let out = PtJpl::default().estimate(&mixed_scene());
        for svp in out.diagnostics.vapor_pressure.saturation_vapor_pressure.iter() {
            assert!(*svp >= 1.0);
        }
    }

    #[test]
    fn frozen_cells_have_no_wetness_or_soil_moisture() {
        let inputs = mixed_scene();
        let out = PtJpl::default().estimate(&inputs);
        let d = &out.diagnostics;
        let mut frozen = 0;
        for (i, t) in d.air_temperature.iter().enumerate() {
            if *t <= 0.0 {
                frozen += 1;
                assert_eq!(d.vapor_pressure.relative_surface_wetness[i], 0.0);
                assert_eq!(d.soil_moisture_constraint[i], 0.0);
            }
        }
        assert!(frozen > 0);

        let freezing = PtJpl::default().estimate(&single_cell(300.0, 80.0, 273.15, 0.5));
        assert_eq!(freezing.diagnostics.vapor_pressure.relative_surface_wetness[(0, 0)], 0.0);
        assert_eq!(freezing.diagnostics.soil_moisture_constraint[(0, 0)], 0.0);
        // no wetness means no interception
        assert_eq!(freezing.interception_evaporation[(0, 0)], 0.0);
    }

    #[test]
    fn deep_cold_pins_temperature_constraint() {
        let out = PtJpl::default().estimate(&single_cell(100.0, 50.0, 263.15, 0.5));
        assert_eq!(out.diagnostics.plant_temperature_constraint[(0, 0)], 0.05);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let inputs = mixed_scene();
        let model = PtJpl::default();
        let first = model.estimate(&inputs).into_array();
        let second = model.estimate(&inputs).into_array();
        for (a, b) in first.iter().zip(second.iter()) {
            let a_bits: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
            let b_bits: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
            assert_eq!(a_bits, b_bits);
        }
    }

    #[test]
    fn inputs_are_not_modified() {
        let inputs = mixed_scene();
        let before = inputs.clone();
        let _ = PtJpl::default().estimate(&inputs);
        let same = |a: &Grid, b: &Grid| a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits());
        assert!(same(inputs.net_radiation(), before.net_radiation()));
        assert!(same(inputs.relative_humidity_percent(), before.relative_humidity_percent()));
        assert!(same(inputs.air_temperature_kelvin(), before.air_temperature_kelvin()));
        assert!(same(inputs.ndvi(), before.ndvi()));
    }

    #[test]
    fn potential_et_ignores_humidity() {
        let dry = PtJpl::default().estimate(&single_cell(400.0, 10.0, 298.15, 0.6));
        let wet = PtJpl::default().estimate(&single_cell(400.0, 95.0, 298.15, 0.6));
        assert_eq!(
            dry.potential_evapotranspiration[(0, 0)],
            wet.potential_evapotranspiration[(0, 0)]
        );
        assert_ne!(dry.evapotranspiration[(0, 0)], wet.evapotranspiration[(0, 0)]);
    }

    #[test]
    fn missing_vegetation_zeroes_transpiration_but_not_soil() {
        // fIPAR >= 1 leaves LAI missing, soil radiation and every component follow
        let out = PtJpl::default().estimate(&single_cell(400.0, 60.0, 298.15, 1.2));
        assert_eq!(out.canopy_transpiration[(0, 0)], 0.0);
        assert!(out.soil_evaporation[(0, 0)].is_nan());
        assert!(out.evapotranspiration[(0, 0)].is_nan());

        // RH above 100 % is missing, transpiration still defaults to zero
        let out = PtJpl::default().estimate(&single_cell(400.0, 120.0, 298.15, 0.6));
        assert_eq!(out.canopy_transpiration[(0, 0)], 0.0);
        assert!(out.soil_evaporation[(0, 0)].is_nan());
    }

    #[test]
    fn night_cells() {
        let out = PtJpl::default().estimate(&single_cell(-60.0, 70.0, 288.15, 0.5));
        assert_eq!(out.canopy_transpiration[(0, 0)], 0.0);
        assert_eq!(out.interception_evaporation[(0, 0)], 0.0);
        assert!(out.soil_evaporation[(0, 0)].is_nan());
        assert!(out.evapotranspiration[(0, 0)].is_nan());
    }

    #[test]
    fn floor_changes_cold_results() {
        let inputs = single_cell(200.0, 50.0, 268.15, 0.5);
        let floored = PtJpl::default().estimate(&inputs);
        let params = PtJplParams { floor_saturation_vapor_pressure: None, ..PtJplParams::new() };
        let unfloored = PtJpl::new(params).unwrap().estimate(&inputs);
        assert_eq!(floored.diagnostics.vapor_pressure.saturation_vapor_pressure[(0, 0)], 1.0);
        assert!(unfloored.diagnostics.vapor_pressure.saturation_vapor_pressure[(0, 0)] < 1.0);
        assert!(
            floored.diagnostics.vapor_pressure.vapor_pressure_deficit[(0, 0)]
                > unfloored.diagnostics.vapor_pressure.vapor_pressure_deficit[(0, 0)]
        );
    }

    #[test]
    fn phenology_strategy_sets_optimum_temperature() {
        let window = PhenologyWindow::new(
            Grid::from_row_slice(1, 3, &[200.0, 450.0, 300.0]),
            Grid::from_row_slice(1, 3, &[12.0, 27.0, 33.0]),
            Grid::from_row_slice(1, 3, &[0.3, 0.4, 0.2]),
            Grid::from_row_slice(1, 3, &[0.4, 1.5, 3.0]),
        )
        .unwrap();
        let model = PtJpl::default().with_phenology(window);
        let out = model.estimate(&single_cell(400.0, 60.0, 298.15, 0.6));
        assert_eq!(out.diagnostics.optimum_temperature, 27.0);
        let fixed = PtJpl::default().estimate(&single_cell(400.0, 60.0, 298.15, 0.6));
        assert_ne!(
            out.canopy_transpiration[(0, 0)],
            fixed.canopy_transpiration[(0, 0)]
        );
    }

    #[test]
    fn supplementary_products() {
        let out = PtJpl::default().estimate(&single_cell(400.0, 60.0, 298.15, 0.6));
        let ef = out.evaporative_fraction();
        assert_abs_diff_eq!(ef[(0, 0)], 265.5442 / (400.0 - 53.7011), epsilon = 1e-4);

        let daily = out.daily_evapotranspiration(&Grid::from_element(1, 1, 150.0)).unwrap();
        assert_abs_diff_eq!(daily[(0, 0)], 150.0 * ef[(0, 0)], epsilon = 1e-9);
        assert!(matches!(
            out.daily_evapotranspiration(&Grid::zeros(2, 1)),
            Err(PtJplError::ShapeMismatch { name: "daily_net_radiation", .. })
        ));

        let pt = out.potential_transpiration();
        let pe = out.potential_soil_evaporation();
        assert_abs_diff_eq!(
            pt[(0, 0)] + pe[(0, 0)],
            out.potential_evapotranspiration[(0, 0)],
            epsilon = 1e-9
        );
    }

    #[test]
    fn area_entry_point_keeps_product_order() {
        let inputs = mixed_scene();
        let products = ptjpl_area(
            inputs.net_radiation(),
            inputs.relative_humidity_percent(),
            inputs.air_temperature_kelvin(),
            inputs.ndvi(),
            true,
            Some(DEFAULT_FLOOR_SATURATION_VAPOR_PRESSURE),
        )
        .unwrap();
        let out = PtJpl::default().estimate(&inputs);
        let expected = [
            &out.evapotranspiration,
            &out.canopy_transpiration,
            &out.interception_evaporation,
            &out.soil_evaporation,
            &out.potential_evapotranspiration,
        ];
        for (got, want) in products.iter().zip(expected) {
            assert_eq!(got.shape(), (12, 10));
            assert!(got.iter().zip(want.iter()).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }

    #[test]
    fn area_entry_point_rejects_bad_shapes() {
        let g = Grid::zeros(3, 3);
        let err = ptjpl_area(&g, &g, &Grid::zeros(3, 2), &g, false, Some(1.0)).unwrap_err();
        assert!(matches!(err, PtJplError::ShapeMismatch { name: "air_temperature", .. }));
    }
}
