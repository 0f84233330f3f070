//! Saturation / actual vapor pressure, vapor pressure deficit and the Priestley-Taylor
//! epsilon term, all from air temperature [°C] and relative humidity [fraction].
//!
//! The Magnus parameterisation below (0.61121, 17.502, 240.97) is the one the model is
//! calibrated with. Do not swap in the FAO-56 set (0.6108, 17.27, 237.3).

use crate::grid::{Grid, bounded_or_missing, from_cells};

const SVP_BASE: f64 = 0.61121; // [kPa]
const SVP_MULT: f64 = 17.502;
const SVP_ADD: f64 = 240.97; // [°C]

// Saturation vapor pressure [kPa] from air temperature [°C]
pub fn saturation_vapor_pressure(air_temperature: f64) -> f64 {
    SVP_BASE * ((air_temperature * SVP_MULT) / (air_temperature + SVP_ADD)).exp()
}

// Slope of the saturation vapor pressure curve [kPa/K], uses the unfloored curve
pub fn delta_from_air_temperature(air_temperature: f64) -> f64 {
    SVP_ADD * SVP_MULT * saturation_vapor_pressure(air_temperature)
        / (air_temperature + SVP_ADD).powi(2)
}

pub fn epsilon(delta: f64, psychrometric_gamma: f64) -> f64 {
    delta / (delta + psychrometric_gamma)
}

pub fn floor_saturation_vapor_pressure(svp: f64, floor: Option<f64>) -> f64 {
    match floor {
        Some(f) if svp < f => f,
        _ => svp,
    }
}

// Negative deficits are not physical and become missing
pub fn vapor_pressure_deficit(svp: f64, water_vapor_pressure: f64) -> f64 {
    let vpd = svp - water_vapor_pressure;
    if vpd < 0.0 { f64::NAN } else { vpd }
}

// RH^4, zero when the air is at or below freezing
pub fn relative_surface_wetness(relative_humidity: f64, air_temperature: f64) -> f64 {
    if air_temperature <= 0.0 {
        0.0
    } else {
        relative_humidity.powi(4)
    }
}

/// Vapor-pressure stage of the pipeline, one grid per quantity.
#[derive(Debug, Clone)]
pub struct VaporPressure {
    pub relative_humidity: Grid,         // RH with out-of-range cells missing [-]
    pub saturation_vapor_pressure: Grid, // Floored when the floor is enabled [kPa]
    pub water_vapor_pressure: Grid,      // Actual vapor pressure [kPa]
    pub vapor_pressure_deficit: Grid,    // [kPa]
    pub relative_surface_wetness: Grid,  // [-]
    pub delta: Grid,                     // [kPa/K]
    pub epsilon: Grid,                   // [-]
}

impl VaporPressure {
    /// `air_temperature` in °C, `relative_humidity` as a fraction. Both grids must share a shape.
    pub fn new(
        air_temperature: &Grid,
        relative_humidity: &Grid,
        psychrometric_gamma: f64,
        floor: Option<f64>,
    ) -> Self {
        let shape = air_temperature.shape();
        let ta = air_temperature.as_slice();
        let rh_in = relative_humidity.as_slice();

        let relative_humidity = from_cells(shape, |i| bounded_or_missing(rh_in[i], 0.0, 1.0));
        let rh = relative_humidity.as_slice();

        let saturation_vapor_pressure = from_cells(shape, |i| {
            floor_saturation_vapor_pressure(saturation_vapor_pressure(ta[i]), floor)
        });
        let svp = saturation_vapor_pressure.as_slice();

        let water_vapor_pressure = from_cells(shape, |i| rh[i] * svp[i]);
        let avp = water_vapor_pressure.as_slice();

        let vapor_pressure_deficit = from_cells(shape, |i| vapor_pressure_deficit(svp[i], avp[i]));
        let relative_surface_wetness =
            from_cells(shape, |i| relative_surface_wetness(rh[i], ta[i]));

        let delta = air_temperature.map(delta_from_air_temperature);
        let epsilon = delta.map(|d| epsilon(d, psychrometric_gamma));

        VaporPressure {
            relative_humidity,
            saturation_vapor_pressure,
            water_vapor_pressure,
            vapor_pressure_deficit,
            relative_surface_wetness,
            delta,
            epsilon,
        }
    }
}
