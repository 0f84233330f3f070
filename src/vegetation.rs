use crate::grid::{Grid, bounded_or_missing, from_cells, nanmax};

// Linear fits from NDVI
const SAVI_MULT: f64 = 0.45;
const SAVI_ADD: f64 = 0.132;
const FAPAR_MULT: f64 = 1.3632;
const FAPAR_ADD: f64 = -0.048;
const FIPAR_ADD: f64 = -0.05;

// Soil-Adjusted Vegetation Index from NDVI
pub fn savi_from_ndvi(ndvi: f64) -> f64 {
    ndvi * SAVI_MULT + SAVI_ADD
}

// Fraction of absorbed PAR from SAVI, unbounded
pub fn fapar_from_savi(savi: f64) -> f64 {
    savi * FAPAR_MULT + FAPAR_ADD
}

pub fn fapar_from_ndvi(ndvi: f64) -> f64 {
    fapar_from_savi(savi_from_ndvi(ndvi))
}

// Fraction of intercepted PAR. Left unbounded, ratios below rely on it.
pub fn fipar_from_ndvi(ndvi: f64) -> f64 {
    ndvi + FIPAR_ADD
}

/// Green canopy fraction fg = fAPAR / fIPAR, missing when fIPAR is not positive or
/// when the ratio falls outside [0, 1].
pub fn green_canopy_fraction(fapar: f64, fipar: f64) -> f64 {
    if fipar.is_nan() || fipar <= 0.0 {
        return f64::NAN;
    }
    bounded_or_missing(fapar / fipar, 0.0, 1.0)
}

// Plant moisture constraint fM = fAPAR / fAPARmax
pub fn plant_moisture_constraint(fapar: f64, fapar_max: f64) -> f64 {
    bounded_or_missing(fapar / fapar_max, 0.0, 1.0)
}

/// Leaf area index from Beer's law on intercepted PAR, `-ln(1 - fIPAR) / kpar`.
/// Missing where `1 - fIPAR` is not positive.
pub fn leaf_area_index(fipar: f64, kpar: f64) -> f64 {
    let transmitted = 1.0 - fipar;
    if transmitted <= 0.0 {
        return f64::NAN;
    }
    -transmitted.ln() / kpar
}

/// Vegetation stage of the pipeline.
///
/// `fapar_max` is a reduction over the whole grid, so a single unrealistic NDVI cell
/// moves the plant moisture constraint of every other cell. Filter NDVI beforehand.
#[derive(Debug, Clone)]
pub struct Vegetation {
    pub savi: Grid,
    pub fapar: Grid, // bounded to [0, 1]
    pub fapar_max: f64,
    pub fipar: Grid,
    pub green_canopy_fraction: Grid,
    pub plant_moisture_constraint: Grid,
    pub leaf_area_index: Grid,
}

impl Vegetation {
    pub fn new(ndvi: &Grid, kpar: f64) -> Self {
        let shape = ndvi.shape();

        let savi = ndvi.map(savi_from_ndvi);
        let fapar = ndvi.map(|n| bounded_or_missing(fapar_from_ndvi(n), 0.0, 1.0));
        let fipar = ndvi.map(fipar_from_ndvi);

        // every cell of fapar must be known before fM
        let fapar_max = nanmax(fapar.as_slice());

        let fa = fapar.as_slice();
        let fi = fipar.as_slice();
        let green_canopy_fraction = from_cells(shape, |i| green_canopy_fraction(fa[i], fi[i]));
        let plant_moisture_constraint =
            from_cells(shape, |i| plant_moisture_constraint(fa[i], fapar_max));
        let leaf_area_index = fipar.map(|f| leaf_area_index(f, kpar));

        Vegetation {
            savi,
            fapar,
            fapar_max,
            fipar,
            green_canopy_fraction,
            plant_moisture_constraint,
            leaf_area_index,
        }
    }
}
