use crate::error::PtJplError;
use crate::grid::{Grid, check_shape};

pub const KELVIN_OFFSET: f64 = 273.15;

// Instantaneous forcing for one PT-JPL run, in the units the source products deliver
#[derive(Debug, Clone)]
pub struct PtJplInputs {
    net_radiation: Grid,     // Net radiation [W/m²]
    relative_humidity: Grid, // Relative humidity [%]
    air_temperature: Grid,   // Near-surface air temperature [K]
    ndvi: Grid,              // Normalized Difference Vegetation Index [-]
}

impl PtJplInputs {
    /// Bundles the four input grids. Fails when a grid is empty or when the shapes differ.
    pub fn new(
        net_radiation: Grid,
        relative_humidity: Grid,
        air_temperature: Grid,
        ndvi: Grid,
    ) -> Result<Self, PtJplError> {
        let shape = net_radiation.shape();
        check_shape("net_radiation", &net_radiation, shape)?;
        check_shape("relative_humidity", &relative_humidity, shape)?;
        check_shape("air_temperature", &air_temperature, shape)?;
        check_shape("ndvi", &ndvi, shape)?;
        Ok(PtJplInputs {
            net_radiation,
            relative_humidity,
            air_temperature,
            ndvi,
        })
    }

    // Columnar records (e.g. one row per tower observation) become n x 1 grids
    pub fn from_columns(
        net_radiation: Vec<f64>,
        relative_humidity: Vec<f64>,
        air_temperature: Vec<f64>,
        ndvi: Vec<f64>,
    ) -> Result<Self, PtJplError> {
        let column = |values: Vec<f64>| Grid::from_vec(values.len(), 1, values);
        Self::new(
            column(net_radiation),
            column(relative_humidity),
            column(air_temperature),
            column(ndvi),
        )
    }

    pub fn shape(&self) -> (usize, usize) {
        self.net_radiation.shape()
    }

    pub fn net_radiation(&self) -> &Grid {
        &self.net_radiation
    }

    pub fn ndvi(&self) -> &Grid {
        &self.ndvi
    }

    pub fn air_temperature_kelvin(&self) -> &Grid {
        &self.air_temperature
    }

    pub fn relative_humidity_percent(&self) -> &Grid {
        &self.relative_humidity
    }

    pub(crate) fn air_temperature_celsius(&self) -> Grid {
        self.air_temperature.map(|t| t - KELVIN_OFFSET)
    }

    pub(crate) fn relative_humidity_fraction(&self) -> Grid {
        self.relative_humidity.map(|rh| rh / 100.0)
    }
}
