use crate::constraints::{
    OptimumTemperature, PhenologyWindow, plant_temperature_constraint, soil_moisture_constraint,
};
use crate::error::PtJplError;
use crate::evapotranspiration::{
    canopy_transpiration, interception_evaporation, potential_evapotranspiration,
    soil_evaporation, total_evapotranspiration,
};
use crate::grid::{Grid, count_missing, from_cells};
use crate::inputs::PtJplInputs;
use crate::outputs::{Diagnostics, PtJplOutputs};
use crate::params::PtJplParams;
use crate::partition::RadiationPartition;
use crate::vapor_pressure::VaporPressure;
use crate::vegetation::Vegetation;
use log::{debug, info};

/// Priestley-Taylor Jet Propulsion Laboratory ET estimator.
///
/// Holds only configuration. Each call to [`PtJpl::estimate`] is independent and
/// returns fresh grids; inputs are never modified.
#[derive(Debug, Clone)]
pub struct PtJpl {
    params: PtJplParams,
    optimum_temperature: OptimumTemperature,
}

impl PtJpl {
    pub fn new(params: PtJplParams) -> Result<Self, PtJplError> {
        params.validate()?;
        Ok(PtJpl {
            optimum_temperature: OptimumTemperature::Fixed(params.optimum_temperature),
            params,
        })
    }

    // Take the optimum temperature from phenology instead of the fixed constant
    pub fn with_phenology(mut self, window: PhenologyWindow) -> Self {
        self.optimum_temperature = OptimumTemperature::Phenology(window);
        self
    }

    pub fn params(&self) -> &PtJplParams {
        &self.params
    }

    fn stage(&self, message: &str) {
        if self.params.verbose {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }

    /// Runs the full PT-JPL chain over `inputs`.
    ///
    /// Stages run in order: vapor pressure, vegetation, constraints, radiation partition,
    /// ET components, then total and potential ET. Within a stage every cell is independent.
    pub fn estimate(&self, inputs: &PtJplInputs) -> PtJplOutputs {
        let p = &self.params;
        let alpha = p.priestley_taylor_alpha;
        let shape = inputs.shape();
        let net_radiation = inputs.net_radiation();
        let air_temperature = inputs.air_temperature_celsius();

        self.stage("calculating surface wetness values [%]");
        self.stage("calculating vapor pressure deficit [kPa]");
        let vapor_pressure = VaporPressure::new(
            &air_temperature,
            &inputs.relative_humidity_fraction(),
            p.psychrometric_gamma,
            p.floor_saturation_vapor_pressure,
        );

        self.stage("calculating vegetation values");
        let vegetation = Vegetation::new(inputs.ndvi(), p.kpar);
        debug!("fAPARmax = {}", vegetation.fapar_max);

        let ta = air_temperature.as_slice();
        let rh = vapor_pressure.relative_humidity.as_slice();
        let vpd = vapor_pressure.vapor_pressure_deficit.as_slice();
        let soil_moisture_constraint =
            from_cells(shape, |i| soil_moisture_constraint(rh[i], vpd[i], ta[i]));

        self.stage("calculating plant optimum temperature");
        let optimum_temperature = self.optimum_temperature.resolve();
        if p.verbose {
            info!("{optimum_temperature} C");
        }
        let plant_temperature_constraint =
            air_temperature.map(|t| plant_temperature_constraint(t, optimum_temperature));

        self.stage("calculating soil evaporation");
        let partition = RadiationPartition::new(
            net_radiation,
            &vegetation.leaf_area_index,
            &vegetation.fipar,
            p.krn,
        );

        let rn = net_radiation.as_slice();
        let w = vapor_pressure.relative_surface_wetness.as_slice();
        let eps = vapor_pressure.epsilon.as_slice();
        let smc = soil_moisture_constraint.as_slice();
        let rn_soil = partition.soil_net_radiation.as_slice();
        let rn_canopy = partition.canopy_net_radiation.as_slice();
        let g = partition.soil_heat_flux.as_slice();

        let soil_evaporation = from_cells(shape, |i| {
            soil_evaporation(w[i], smc[i], alpha, eps[i], rn_soil[i], g[i])
        });

        self.stage("calculating canopy transpiration");
        let fg = vegetation.green_canopy_fraction.as_slice();
        let fm = vegetation.plant_moisture_constraint.as_slice();
        let ft = plant_temperature_constraint.as_slice();
        let canopy_transpiration = from_cells(shape, |i| {
            canopy_transpiration(w[i], fg[i], ft[i], fm[i], alpha, eps[i], rn_canopy[i])
        });

        self.stage("calculating interception evaporation");
        let interception_evaporation = from_cells(shape, |i| {
            interception_evaporation(w[i], alpha, eps[i], rn_canopy[i])
        });

        self.stage("combining evapotranspiration");
        let les = soil_evaporation.as_slice();
        let lec = canopy_transpiration.as_slice();
        let lei = interception_evaporation.as_slice();
        let evapotranspiration =
            from_cells(shape, |i| total_evapotranspiration(les[i], lec[i], lei[i], rn[i]));

        self.stage("calculating potential evapotranspiration");
        let potential_evapotranspiration =
            from_cells(shape, |i| potential_evapotranspiration(alpha, eps[i], rn[i], g[i]));

        debug!(
            "{} of {} cells without evapotranspiration",
            count_missing(&evapotranspiration),
            evapotranspiration.len()
        );

        PtJplOutputs {
            evapotranspiration,
            canopy_transpiration,
            interception_evaporation,
            soil_evaporation,
            potential_evapotranspiration,
            diagnostics: Diagnostics {
                net_radiation: net_radiation.clone(),
                air_temperature,
                vapor_pressure,
                vegetation,
                optimum_temperature,
                plant_temperature_constraint,
                soil_moisture_constraint,
                partition,
                priestley_taylor_alpha: alpha,
            },
        }
    }
}

impl Default for PtJpl {
    fn default() -> Self {
        let params = PtJplParams::new();
        PtJpl {
            optimum_temperature: OptimumTemperature::Fixed(params.optimum_temperature),
            params,
        }
    }
}

/// One-shot PT-JPL over raw grids, with the default constants.
///
/// Inputs: net radiation [W/m²], relative humidity [%], air temperature [K], NDVI [-].
/// Returns `[ET, canopy transpiration, interception evaporation, soil evaporation, potential ET]`.
pub fn ptjpl_area(
    net_radiation: &Grid,
    relative_humidity: &Grid,
    air_temperature: &Grid,
    ndvi: &Grid,
    verbose: bool,
    floor_saturation_vapor_pressure: Option<f64>,
) -> Result<[Grid; 5], PtJplError> {
    let inputs = PtJplInputs::new(
        net_radiation.clone(),
        relative_humidity.clone(),
        air_temperature.clone(),
        ndvi.clone(),
    )?;
    let params = PtJplParams {
        verbose,
        floor_saturation_vapor_pressure,
        ..PtJplParams::new()
    };
    let model = PtJpl::new(params)?;
    Ok(model.estimate(&inputs).into_array())
}
