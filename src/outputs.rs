use crate::error::PtJplError;
use crate::evapotranspiration::{
    daily_evapotranspiration, evaporative_fraction, potential_soil_evaporation,
    potential_transpiration,
};
use crate::grid::{Grid, check_shape, from_cells};
use crate::partition::RadiationPartition;
use crate::vapor_pressure::VaporPressure;
use crate::vegetation::Vegetation;

/// Intermediate grids of one estimation, kept so the model state can be audited.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub net_radiation: Grid,
    pub air_temperature: Grid, // [°C]
    pub vapor_pressure: VaporPressure,
    pub vegetation: Vegetation,
    pub optimum_temperature: f64,
    pub plant_temperature_constraint: Grid,
    pub soil_moisture_constraint: Grid,
    pub partition: RadiationPartition,
    pub priestley_taylor_alpha: f64,
}

/// The five PT-JPL products [W/m²], all with the input shape.
#[derive(Debug, Clone)]
pub struct PtJplOutputs {
    pub evapotranspiration: Grid,
    pub canopy_transpiration: Grid,
    pub interception_evaporation: Grid,
    pub soil_evaporation: Grid,
    pub potential_evapotranspiration: Grid,
    pub diagnostics: Diagnostics,
}

impl PtJplOutputs {
    /// Products in the fixed order: total ET, canopy transpiration, interception
    /// evaporation, soil evaporation, potential ET.
    pub fn into_array(self) -> [Grid; 5] {
        [
            self.evapotranspiration,
            self.canopy_transpiration,
            self.interception_evaporation,
            self.soil_evaporation,
            self.potential_evapotranspiration,
        ]
    }

    pub fn shape(&self) -> (usize, usize) {
        self.evapotranspiration.shape()
    }

    // alpha * epsilon * canopy Rn
    pub fn potential_transpiration(&self) -> Grid {
        let d = &self.diagnostics;
        let eps = d.vapor_pressure.epsilon.as_slice();
        let rn_canopy = d.partition.canopy_net_radiation.as_slice();
        from_cells(self.shape(), |i| {
            potential_transpiration(d.priestley_taylor_alpha, eps[i], rn_canopy[i])
        })
    }

    // alpha * epsilon * (soil Rn - G)
    pub fn potential_soil_evaporation(&self) -> Grid {
        let d = &self.diagnostics;
        let eps = d.vapor_pressure.epsilon.as_slice();
        let rn_soil = d.partition.soil_net_radiation.as_slice();
        let g = d.partition.soil_heat_flux.as_slice();
        from_cells(self.shape(), |i| {
            potential_soil_evaporation(d.priestley_taylor_alpha, eps[i], rn_soil[i], g[i])
        })
    }

    pub fn evaporative_fraction(&self) -> Grid {
        let le = self.evapotranspiration.as_slice();
        let rn = self.diagnostics.net_radiation.as_slice();
        let g = self.diagnostics.partition.soil_heat_flux.as_slice();
        from_cells(self.shape(), |i| evaporative_fraction(le[i], rn[i], g[i]))
    }

    /// Daily ET from a daily mean net radiation grid, assuming the instantaneous
    /// evaporative fraction holds through the day.
    pub fn daily_evapotranspiration(&self, daily_net_radiation: &Grid) -> Result<Grid, PtJplError> {
        check_shape("daily_net_radiation", daily_net_radiation, self.shape())?;
        let ef = self.evaporative_fraction();
        let ef = ef.as_slice();
        let rn_daily = daily_net_radiation.as_slice();
        Ok(from_cells(self.shape(), |i| daily_evapotranspiration(rn_daily[i], ef[i])))
    }
}
