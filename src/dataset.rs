//! # Dataset Access
//!
//! The converter only needs three things from its input: look a variable up by
//! name, know its on-disk shape and read all of it into memory. [`Dataset`] and
//! [`VariableHandle`] capture exactly that, so the pipeline runs unchanged over
//! a NetCDF file ([`NetcdfDataset`]) or over buffers built in memory
//! ([`MemoryDataset`]).

use crate::error::{ConvertError, ConvertResult};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A named, shaped numeric array exposed by a [`Dataset`].
pub trait VariableHandle {
    fn name(&self) -> String;

    /// Length of each on-disk dimension, outermost first.
    fn shape(&self) -> Vec<usize>;

    /// Reads the whole variable as `f64`, in row-major order.
    fn read_f64(&self) -> ConvertResult<Vec<f64>>;

    /// Reads the whole variable as `i64`, in row-major order.
    fn read_i64(&self) -> ConvertResult<Vec<i64>>;
}

impl<T: VariableHandle + ?Sized> VariableHandle for &T {
    fn name(&self) -> String {
        (**self).name()
    }

    fn shape(&self) -> Vec<usize> {
        (**self).shape()
    }

    fn read_f64(&self) -> ConvertResult<Vec<f64>> {
        (**self).read_f64()
    }

    fn read_i64(&self) -> ConvertResult<Vec<i64>> {
        (**self).read_i64()
    }
}

/// Read-only access to a collection of named variables.
pub trait Dataset {
    type Variable<'a>: VariableHandle
    where
        Self: 'a;

    /// Looks a variable up by its exact name.
    fn variable(&self, name: &str) -> Option<Self::Variable<'_>>;

    /// Names of all variables in the dataset.
    fn variable_names(&self) -> Vec<String>;
}

impl VariableHandle for netcdf::Variable<'_> {
    fn name(&self) -> String {
        netcdf::Variable::name(self)
    }

    fn shape(&self) -> Vec<usize> {
        self.dimensions().iter().map(|d| d.len()).collect()
    }

    fn read_f64(&self) -> ConvertResult<Vec<f64>> {
        Ok(self.get_values::<f64, _>(..)?)
    }

    fn read_i64(&self) -> ConvertResult<Vec<i64>> {
        Ok(self.get_values::<i64, _>(..)?)
    }
}

/// A NetCDF file opened for reading.
pub struct NetcdfDataset {
    file: netcdf::File,
    path: PathBuf,
}

impl NetcdfDataset {
    pub fn open<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening NetCDF file: {}", path.display());
        let file = netcdf::open(&path)?;
        Ok(NetcdfDataset { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dimension names and lengths as declared in the file.
    pub fn dimensions(&self) -> Vec<(String, usize)> {
        self.file
            .dimensions()
            .map(|d| (d.name().to_string(), d.len()))
            .collect()
    }

    pub fn close(self) -> ConvertResult<()> {
        debug!("Closing NetCDF file: {}", self.path.display());
        self.file.close()?;
        Ok(())
    }
}

impl Dataset for NetcdfDataset {
    type Variable<'a> = netcdf::Variable<'a>;

    fn variable(&self, name: &str) -> Option<Self::Variable<'_>> {
        self.file.variable(name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name().to_string()).collect()
    }
}

/// A variable held entirely in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryVariable {
    name: String,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl MemoryVariable {
    /// Fails with [`ConvertError::Shape`] when `values` does not fill `shape`.
    pub fn new(name: &str, shape: Vec<usize>, values: Vec<f64>) -> ConvertResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(ConvertError::Shape {
                variable: name.to_string(),
                expected: shape,
                found: vec![values.len()],
            });
        }
        Ok(MemoryVariable {
            name: name.to_string(),
            shape,
            values,
        })
    }
}

impl VariableHandle for MemoryVariable {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn read_f64(&self) -> ConvertResult<Vec<f64>> {
        Ok(self.values.clone())
    }

    // Truncates toward zero, as NetCDF does when reading floats as integers.
    fn read_i64(&self) -> ConvertResult<Vec<i64>> {
        Ok(self.values.iter().map(|&v| v as i64).collect())
    }
}

/// A [`Dataset`] built from in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    variables: BTreeMap<String, MemoryVariable>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable.
    pub fn insert(&mut self, name: &str, shape: Vec<usize>, values: Vec<f64>) -> ConvertResult<()> {
        let variable = MemoryVariable::new(name, shape, values)?;
        self.variables.insert(name.to_string(), variable);
        Ok(())
    }

    pub fn with_variable(mut self, name: &str, shape: Vec<usize>, values: Vec<f64>) -> ConvertResult<Self> {
        self.insert(name, shape, values)?;
        Ok(self)
    }

    pub fn remove(&mut self, name: &str) -> Option<MemoryVariable> {
        self.variables.remove(name)
    }
}

impl Dataset for MemoryDataset {
    type Variable<'a> = &'a MemoryVariable;

    fn variable(&self, name: &str) -> Option<Self::Variable<'_>> {
        self.variables.get(name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_variable_rejects_mismatched_length() {
        let result = MemoryVariable::new("temp", vec![2, 1, 2], vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ConvertError::Shape { .. })));
    }

    #[test]
    fn test_memory_dataset_lookup() -> ConvertResult<()> {
        let dataset = MemoryDataset::new()
            .with_variable("time", vec![3], vec![0.0, 1.9, -2.5])?
            .with_variable("rh", vec![3, 1, 1, 1], vec![0.5, 0.6, 0.7])?;

        assert!(dataset.variable("missing").is_none());
        assert_eq!(dataset.variable_names(), vec!["rh".to_string(), "time".to_string()]);

        let time = dataset.variable("time").unwrap();
        assert_eq!(time.name(), "time");
        assert_eq!(time.shape(), vec![3]);
        assert_eq!(time.read_i64()?, vec![0, 1, -2]);

        let rh = dataset.variable("rh").unwrap();
        assert_eq!(rh.shape(), vec![3, 1, 1, 1]);
        assert_eq!(rh.read_f64()?, vec![0.5, 0.6, 0.7]);
        Ok(())
    }

    #[test]
    fn test_memory_dataset_remove() -> ConvertResult<()> {
        let mut dataset = MemoryDataset::new().with_variable("x", vec![1], vec![0.0])?;
        assert!(dataset.remove("x").is_some());
        assert!(dataset.variable("x").is_none());
        Ok(())
    }
}
