use crate::error::PtJplError;
use crate::grid::{Grid, bounded_or_missing, check_shape, nanargmax, nanmax};

const COLD_TEMPERATURE_LIMIT: f64 = -5.0; // [°C]
const COLD_TEMPERATURE_CONSTRAINT: f64 = 0.05;
const PHENOLOGY_MIN_VPD: f64 = 0.5; // [kPa]
const PHENOLOGY_FALLBACK_OFFSET: f64 = 5.0; // [°C]

/// Plant temperature constraint fT, a Gaussian around the optimum temperature.
/// Below -5 °C the constraint is pinned to 0.05.
pub fn plant_temperature_constraint(tmax: f64, topt: f64) -> f64 {
    if tmax < COLD_TEMPERATURE_LIMIT {
        return COLD_TEMPERATURE_CONSTRAINT;
    }
    (-((tmax - topt) / topt).powi(2)).exp()
}

// RH^VPD bounded to [0, 1], zero when the air is at or below freezing
pub fn soil_moisture_constraint(
    relative_humidity: f64,
    vapor_pressure_deficit: f64,
    air_temperature: f64,
) -> f64 {
    if air_temperature <= 0.0 {
        return 0.0;
    }
    bounded_or_missing(relative_humidity.powf(vapor_pressure_deficit), 0.0, 1.0)
}

/// Time-averaged conditions from which a phenological optimum temperature is picked.
///
/// All four grids hold the same cells (or time steps). Producing the averages is the
/// caller's business.
#[derive(Debug, Clone)]
pub struct PhenologyWindow {
    net_radiation: Grid,          // [W/m²]
    air_temperature: Grid,        // [°C]
    savi: Grid,                   // [-]
    vapor_pressure_deficit: Grid, // [kPa]
}

impl PhenologyWindow {
    pub fn new(
        net_radiation: Grid,
        air_temperature: Grid,
        savi: Grid,
        vapor_pressure_deficit: Grid,
    ) -> Result<Self, PtJplError> {
        let shape = net_radiation.shape();
        check_shape("phenology net_radiation", &net_radiation, shape)?;
        check_shape("phenology air_temperature", &air_temperature, shape)?;
        check_shape("phenology savi", &savi, shape)?;
        check_shape("phenology vapor_pressure_deficit", &vapor_pressure_deficit, shape)?;
        Ok(PhenologyWindow {
            net_radiation,
            air_temperature,
            savi,
            vapor_pressure_deficit,
        })
    }

    /// Temperature where `Rn * T * SAVI / max(VPD, 0.5)` peaks, i.e. where the canopy is
    /// green, wet, well lit and warm at once. Falls back to the warmest temperature minus
    /// 5 °C when no cell has all four drivers. NaN if the temperature grid is all missing.
    pub fn optimum_temperature(&self) -> f64 {
        let rn = self.net_radiation.as_slice();
        let ta = self.air_temperature.as_slice();
        let savi = self.savi.as_slice();
        let vpd = self.vapor_pressure_deficit.as_slice();

        let phenology: Vec<f64> = (0..ta.len())
            .map(|i| {
                if rn[i].is_nan() || ta[i].is_nan() || savi[i].is_nan() || vpd[i].is_nan() {
                    f64::NAN
                } else {
                    rn[i] * ta[i] * savi[i] / vpd[i].max(PHENOLOGY_MIN_VPD)
                }
            })
            .collect();

        match nanargmax(&phenology) {
            Some(peak) => ta[peak],
            None => nanmax(ta) - PHENOLOGY_FALLBACK_OFFSET,
        }
    }
}

/// Where the optimum temperature used by fT comes from.
#[derive(Debug, Clone)]
pub enum OptimumTemperature {
    Fixed(f64),
    Phenology(PhenologyWindow),
}

impl OptimumTemperature {
    pub fn resolve(&self) -> f64 {
        match self {
            OptimumTemperature::Fixed(topt) => *topt,
            OptimumTemperature::Phenology(window) => window.optimum_temperature(),
        }
    }
}
