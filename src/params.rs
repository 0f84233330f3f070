use crate::error::PtJplError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_FLOOR_SATURATION_VAPOR_PRESSURE: f64 = 1.0; // [kPa]

// Model constants and run options for PT-JPL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtJplParams {
    pub priestley_taylor_alpha: f64, // Priestley-Taylor coefficient [-]
    pub psychrometric_gamma: f64,    // Psychrometric constant [kPa/K]
    pub krn: f64,                    // Net radiation extinction coefficient [-]
    pub kpar: f64,                   // PAR extinction coefficient [-]
    pub optimum_temperature: f64,    // Fixed plant optimum temperature [°C]
    pub floor_saturation_vapor_pressure: Option<f64>, // Lower bound on saturation vapor pressure [kPa], None disables
    pub verbose: bool,               // Announce pipeline stages at info level
}

impl PtJplParams {
    pub fn new() -> Self {
        PtJplParams {
            priestley_taylor_alpha: 1.26,
            psychrometric_gamma: 0.0662,
            krn: 0.6,
            kpar: 0.5,
            optimum_temperature: 23.5,
            floor_saturation_vapor_pressure: Some(DEFAULT_FLOOR_SATURATION_VAPOR_PRESSURE),
            verbose: false,
        }
    }

    /// Parses parameters from a TOML document. Keys that are absent keep their defaults,
    /// and the SVP floor is disabled with `floor_saturation_vapor_pressure = false`.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PtJplError> {
        let raw: RawParams = toml::from_str(toml_str)?;
        let params = raw.into_params();
        params.validate()?;
        Ok(params)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PtJplError> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    // Reject constants that would make the model non-physical
    pub fn validate(&self) -> Result<(), PtJplError> {
        let positive = [
            ("priestley_taylor_alpha", self.priestley_taylor_alpha),
            ("psychrometric_gamma", self.psychrometric_gamma),
            ("krn", self.krn),
            ("kpar", self.kpar),
            ("optimum_temperature", self.optimum_temperature),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(PtJplError::InvalidParameter {
                    name,
                    value,
                    reason: "must be positive and finite",
                });
            }
        }
        if let Some(floor) = self.floor_saturation_vapor_pressure {
            if floor < 0.0 || !floor.is_finite() {
                return Err(PtJplError::InvalidParameter {
                    name: "floor_saturation_vapor_pressure",
                    value: floor,
                    reason: "must be non-negative and finite",
                });
            }
        }
        Ok(())
    }
}

impl Default for PtJplParams {
    fn default() -> Self {
        Self::new()
    }
}

// Parameter file layout. The floor is written either as a threshold or as a switch.
#[derive(Deserialize)]
#[serde(untagged)]
enum FloorSetting {
    Enabled(bool),
    Threshold(f64),
}

#[derive(Deserialize)]
#[serde(default)]
struct RawParams {
    priestley_taylor_alpha: f64,
    psychrometric_gamma: f64,
    krn: f64,
    kpar: f64,
    optimum_temperature: f64,
    floor_saturation_vapor_pressure: Option<FloorSetting>,
    verbose: bool,
}

impl Default for RawParams {
    fn default() -> Self {
        let p = PtJplParams::new();
        RawParams {
            priestley_taylor_alpha: p.priestley_taylor_alpha,
            psychrometric_gamma: p.psychrometric_gamma,
            krn: p.krn,
            kpar: p.kpar,
            optimum_temperature: p.optimum_temperature,
            floor_saturation_vapor_pressure: None,
            verbose: p.verbose,
        }
    }
}

impl RawParams {
    fn into_params(self) -> PtJplParams {
        let floor = match self.floor_saturation_vapor_pressure {
            None | Some(FloorSetting::Enabled(true)) => Some(DEFAULT_FLOOR_SATURATION_VAPOR_PRESSURE),
            Some(FloorSetting::Enabled(false)) => None,
            Some(FloorSetting::Threshold(t)) => Some(t),
        };
        PtJplParams {
            priestley_taylor_alpha: self.priestley_taylor_alpha,
            psychrometric_gamma: self.psychrometric_gamma,
            krn: self.krn,
            kpar: self.kpar,
            optimum_temperature: self.optimum_temperature,
            floor_saturation_vapor_pressure: floor,
            verbose: self.verbose,
        }
    }
}
