//! Latent heat flux components of PT-JPL [W/m²].
//!
//! Missing and negative values are handled differently per component: soil evaporation
//! and total ET become missing (not computable) while transpiration and interception are
//! zeroed (known to be absent). Keep the asymmetry.

// Soil evaporation LEs, missing when negative
pub fn soil_evaporation(
    relative_surface_wetness: f64,
    soil_moisture_constraint: f64,
    alpha: f64,
    epsilon: f64,
    soil_net_radiation: f64,
    soil_heat_flux: f64,
) -> f64 {
    let w = relative_surface_wetness;
    let les = (w + soil_moisture_constraint * (1.0 - w))
        * alpha
        * epsilon
        * (soil_net_radiation - soil_heat_flux);
    if les < 0.0 { f64::NAN } else { les }
}

/// Canopy transpiration LEc. A missing driver gives zero transpiration, not a missing cell.
pub fn canopy_transpiration(
    relative_surface_wetness: f64,
    green_canopy_fraction: f64,
    plant_temperature_constraint: f64,
    plant_moisture_constraint: f64,
    alpha: f64,
    epsilon: f64,
    canopy_net_radiation: f64,
) -> f64 {
    let lec = alpha
        * (1.0 - relative_surface_wetness)
        * green_canopy_fraction
        * plant_temperature_constraint
        * plant_moisture_constraint
        * epsilon
        * canopy_net_radiation;
    if lec.is_nan() || lec < 0.0 { 0.0 } else { lec }
}

// Interception evaporation LEi, negatives zeroed, missing kept
pub fn interception_evaporation(
    relative_surface_wetness: f64,
    alpha: f64,
    epsilon: f64,
    canopy_net_radiation: f64,
) -> f64 {
    let lei = relative_surface_wetness * alpha * epsilon * canopy_net_radiation;
    if lei < 0.0 { 0.0 } else { lei }
}

/// Total ET, capped at the available net radiation. The cap is applied before the
/// infinity and sign checks, so an infinite sum under a finite Rn ends up at Rn.
pub fn total_evapotranspiration(
    soil_evaporation: f64,
    canopy_transpiration: f64,
    interception_evaporation: f64,
    net_radiation: f64,
) -> f64 {
    let mut le = soil_evaporation + canopy_transpiration + interception_evaporation;
    if le > net_radiation {
        le = net_radiation;
    }
    if le.is_infinite() || le < 0.0 {
        return f64::NAN;
    }
    le
}

// Energy-limited upper bound, blind to vegetation and soil moisture
pub fn potential_evapotranspiration(alpha: f64, epsilon: f64, net_radiation: f64, soil_heat_flux: f64) -> f64 {
    alpha * epsilon * (net_radiation - soil_heat_flux)
}

pub fn potential_transpiration(alpha: f64, epsilon: f64, canopy_net_radiation: f64) -> f64 {
    alpha * epsilon * canopy_net_radiation
}

pub fn potential_soil_evaporation(alpha: f64, epsilon: f64, soil_net_radiation: f64, soil_heat_flux: f64) -> f64 {
    alpha * epsilon * (soil_net_radiation - soil_heat_flux)
}

// EF = LE / (Rn - G), missing where undefined
pub fn evaporative_fraction(evapotranspiration: f64, net_radiation: f64, soil_heat_flux: f64) -> f64 {
    let ef = evapotranspiration / (net_radiation - soil_heat_flux);
    if ef.is_finite() { ef } else { f64::NAN }
}

// Scale an instantaneous evaporative fraction to daily ET [W/m², daily mean]
pub fn daily_evapotranspiration(daily_net_radiation: f64, evaporative_fraction: f64) -> f64 {
    daily_net_radiation * evaporative_fraction
}
