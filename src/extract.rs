//! # Variable Resolution and Materialization
//!
//! Resolution is all-or-nothing: every required variable must be present or
//! the dataset is rejected with the full list of what is missing. Once
//! resolved, each variable is read eagerly and data variables are squeezed to
//! the logical `(time, x, y)` layout.
//!
//! ## Key Components
//!
//! - [`resolve_variables`]: looks up the 19 required variables
//! - [`squeeze_shape`]: drops singleton axes down to rank 3, matching the extents when possible
//! - [`load_wrf_data`]: resolution plus materialization into a [`WrfData`]

use crate::dataset::{Dataset, VariableHandle};
use crate::error::{ConvertError, ConvertResult};
use crate::schema::{MEASUREMENTS, TIME_VARIABLE, VISIBILITY_VARIABLE, X_VARIABLE, Y_VARIABLE};
use log::debug;

/// Handles to every required variable, measurements in output order.
#[derive(Debug)]
pub struct ResolvedVariables<V> {
    pub x: V,
    pub y: V,
    pub time: V,
    pub measurements: Vec<V>,
    pub visibility: V,
}

fn lookup<'d, D: Dataset>(dataset: &'d D, name: &str, missing: &mut Vec<String>) -> Option<D::Variable<'d>> {
    let variable = dataset.variable(name);
    if variable.is_none() {
        missing.push(name.to_string());
    }
    variable
}

/// Looks up every required variable by exact name.
///
/// # Errors
///
/// Returns [`ConvertError::MissingVariables`] naming each absent variable when
/// at least one lookup fails.
pub fn resolve_variables<D: Dataset>(dataset: &D) -> ConvertResult<ResolvedVariables<D::Variable<'_>>> {
    let mut missing = Vec::new();
    let x = lookup(dataset, X_VARIABLE, &mut missing);
    let y = lookup(dataset, Y_VARIABLE, &mut missing);
    let time = lookup(dataset, TIME_VARIABLE, &mut missing);
    let measurements: Vec<_> = MEASUREMENTS
        .iter()
        .map(|m| lookup(dataset, m.source, &mut missing))
        .collect();
    let visibility = lookup(dataset, VISIBILITY_VARIABLE, &mut missing);

    let measurements: Option<Vec<_>> = measurements.into_iter().collect();
    match (x, y, time, measurements, visibility) {
        (Some(x), Some(y), Some(time), Some(measurements), Some(visibility)) => Ok(ResolvedVariables {
            x,
            y,
            time,
            measurements,
            visibility,
        }),
        _ => Err(ConvertError::MissingVariables(missing)),
    }
}

/// Reduces an on-disk shape to rank 3 by removing length-1 axes. Removing a
/// singleton axis never changes row-major element order.
///
/// When some choice of singletons leaves exactly `extents`, that choice wins,
/// so `(time, x=1, y, lev=1)` keeps its `x` axis. Otherwise singletons are
/// removed leftmost first and the caller reports the mismatch.
pub fn squeeze_shape(variable: &str, shape: &[usize], extents: [usize; 3]) -> ConvertResult<[usize; 3]> {
    if aligns_with(shape, extents) {
        return Ok(extents);
    }

    let mut squeezed = shape.to_vec();
    while squeezed.len() > 3 {
        match squeezed.iter().position(|&len| len == 1) {
            Some(axis) => {
                squeezed.remove(axis);
            }
            None => break,
        }
    }

    match squeezed.as_slice() {
        &[t, x, y] => Ok([t, x, y]),
        _ => Err(ConvertError::Rank {
            variable: variable.to_string(),
            found: shape.to_vec(),
        }),
    }
}

/// True when `extents` is a subsequence of `shape` and every skipped axis has
/// length 1.
fn aligns_with(shape: &[usize], extents: [usize; 3]) -> bool {
    let mut matched = 0;
    for &len in shape {
        if matched < extents.len() && len == extents[matched] {
            matched += 1;
        } else if len != 1 {
            return false;
        }
    }
    matched == extents.len()
}

/// A data variable laid out as `(time, x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: [usize; 3],
    values: Vec<f64>,
}

impl Grid {
    pub fn new(shape: [usize; 3], values: Vec<f64>) -> ConvertResult<Self> {
        if shape.iter().product::<usize>() != values.len() {
            return Err(ConvertError::Shape {
                variable: "grid".to_string(),
                expected: shape.to_vec(),
                found: vec![values.len()],
            });
        }
        Ok(Grid { shape, values })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn get(&self, time: usize, x: usize, y: usize) -> f64 {
        let [_, nx, ny] = self.shape;
        self.values[(time * nx + x) * ny + y]
    }
}

/// Every buffer the row writer needs, fully in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct WrfData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub time: Vec<i64>,
    pub measurements: Vec<Grid>,
    pub visibility: Grid,
}

impl WrfData {
    /// `(time, x, y)` extents.
    pub fn extents(&self) -> [usize; 3] {
        [self.time.len(), self.x.len(), self.y.len()]
    }

    pub fn row_count(&self) -> usize {
        self.extents().iter().product()
    }
}

fn read_grid<V: VariableHandle>(variable: &V, extents: [usize; 3]) -> ConvertResult<Grid> {
    let name = variable.name();
    let on_disk = variable.shape();
    let shape = squeeze_shape(&name, &on_disk, extents)?;
    if shape != extents {
        return Err(ConvertError::Shape {
            variable: name,
            expected: extents.to_vec(),
            found: on_disk,
        });
    }

    debug!("Reading {} with shape {:?} as {:?}", name, on_disk, shape);
    let values = variable.read_f64()?;
    Grid::new(shape, values).map_err(|_| ConvertError::Shape {
        variable: name,
        expected: extents.to_vec(),
        found: on_disk,
    })
}

/// Reads every resolved variable into memory.
///
/// The extents come from the lengths of the `x`, `y` and `time` buffers; any
/// data variable whose squeezed shape differs from them is rejected.
pub fn materialize<V: VariableHandle>(resolved: &ResolvedVariables<V>) -> ConvertResult<WrfData> {
    let x = resolved.x.read_f64()?;
    let y = resolved.y.read_f64()?;
    let time = resolved.time.read_i64()?;
    let extents = [time.len(), x.len(), y.len()];
    debug!("Dataset extents (time, x, y): {:?}", extents);

    let measurements = resolved
        .measurements
        .iter()
        .map(|variable| read_grid(variable, extents))
        .collect::<ConvertResult<Vec<_>>>()?;
    let visibility = read_grid(&resolved.visibility, extents)?;

    Ok(WrfData {
        x,
        y,
        time,
        measurements,
        visibility,
    })
}

/// Resolves and materializes every required variable of `dataset`.
pub fn load_wrf_data<D: Dataset>(dataset: &D) -> ConvertResult<WrfData> {
    let resolved = resolve_variables(dataset)?;
    materialize(&resolved)
}
