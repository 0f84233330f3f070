use crate::grid::{Grid, bounded_or_missing, from_cells};

const G_BASE: f64 = 0.05; // Soil heat flux fraction under full cover [-]
const G_BARE: f64 = 0.265; // Extra fraction for bare soil [-]
const G_SOIL_CAP: f64 = 0.35; // Upper bound as a fraction of soil net radiation [-]

// Net radiation reaching the soil through the canopy [W/m²]
pub fn soil_net_radiation(net_radiation: f64, leaf_area_index: f64, krn: f64) -> f64 {
    net_radiation * (-krn * leaf_area_index).exp()
}

pub fn fractional_vegetation_cover(fipar: f64) -> f64 {
    bounded_or_missing(fipar, 0.0, 1.0)
}

/// Instantaneous soil heat flux G [W/m²].
///
/// Negative G is zeroed first, then G is capped at 0.35 of the soil net radiation. The
/// cap is applied second, so a negative soil net radiation still pulls G below zero.
pub fn soil_heat_flux(net_radiation: f64, fractional_vegetation_cover: f64, soil_net_radiation: f64) -> f64 {
    let mut g = net_radiation * (G_BASE + (1.0 - fractional_vegetation_cover) * G_BARE);
    if g < 0.0 {
        g = 0.0;
    }
    let cap = G_SOIL_CAP * soil_net_radiation;
    if g > cap {
        g = cap;
    }
    g
}

/// Radiation partition of the pipeline.
#[derive(Debug, Clone)]
pub struct RadiationPartition {
    pub soil_net_radiation: Grid,
    pub canopy_net_radiation: Grid,
    pub fractional_vegetation_cover: Grid,
    pub soil_heat_flux: Grid,
}

impl RadiationPartition {
    pub fn new(net_radiation: &Grid, leaf_area_index: &Grid, fipar: &Grid, krn: f64) -> Self {
        let shape = net_radiation.shape();
        let rn = net_radiation.as_slice();
        let lai = leaf_area_index.as_slice();

        let soil_net_radiation = from_cells(shape, |i| soil_net_radiation(rn[i], lai[i], krn));
        let rn_soil = soil_net_radiation.as_slice();
        let canopy_net_radiation = from_cells(shape, |i| rn[i] - rn_soil[i]);

        let fractional_vegetation_cover = fipar.map(fractional_vegetation_cover);
        let fvc = fractional_vegetation_cover.as_slice();
        let soil_heat_flux = from_cells(shape, |i| soil_heat_flux(rn[i], fvc[i], rn_soil[i]));

        RadiationPartition {
            soil_net_radiation,
            canopy_net_radiation,
            fractional_vegetation_cover,
            soil_heat_flux,
        }
    }
}
