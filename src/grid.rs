use crate::error::PtJplError;
use nalgebra::DMatrix;
use rayon::prelude::*;

/// A 2-D field of cell values. Storage is column-major, every grid taking part in one
/// estimation shares the same shape, so a flat index addresses the same cell in all of them.
/// Columnar data is carried as an n x 1 grid.
pub type Grid = DMatrix<f64>;

// Build a grid of the given shape by evaluating `f` on every flat cell index in parallel
pub fn from_cells<F>(shape: (usize, usize), f: F) -> Grid
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    let (nrows, ncols) = shape;
    let data: Vec<f64> = (0..nrows * ncols).into_par_iter().map(f).collect();
    Grid::from_vec(nrows, ncols, data)
}

// Value if inside [lower, upper], missing otherwise. Missing stays missing.
pub fn bounded_or_missing(value: f64, lower: f64, upper: f64) -> f64 {
    if value < lower || value > upper {
        f64::NAN
    } else {
        value
    }
}

/// Returns a copy of `grid` where every cell outside `[lower, upper]` is replaced by NaN.
///
/// The input grid is left untouched.
pub fn enforce_boundaries(grid: &Grid, lower: f64, upper: f64) -> Grid {
    let cells = grid.as_slice();
    from_cells(grid.shape(), |i| bounded_or_missing(cells[i], lower, upper))
}

/// Largest non-missing value, or NaN if every cell is missing.
pub fn nanmax(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Index of the largest non-missing value, first occurrence on ties.
pub fn nanargmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn count_missing(grid: &Grid) -> usize {
    grid.iter().filter(|v| v.is_nan()).count()
}

pub(crate) fn check_shape(
    name: &'static str,
    grid: &Grid,
    expected: (usize, usize),
) -> Result<(), PtJplError> {
    if grid.is_empty() {
        return Err(PtJplError::EmptyGrid(name));
    }
    if grid.shape() != expected {
        return Err(PtJplError::ShapeMismatch {
            name,
            expected,
            found: grid.shape(),
        });
    }
    Ok(())
}
