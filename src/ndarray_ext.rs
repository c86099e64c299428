//! ndarray integration
//!
//! Cell properties in a container are stored with the first grid index
//! varying fastest, so shaped reads and multi-dimensional writes use
//! column-major (Fortran) order.
//!
//! Enable with the `ndarray` feature flag.

use crate::error::{EclError, Result};
use crate::reader::EclFile;
use crate::restart::RestartFile;
use crate::types::Element;
use crate::writer::Writer;
use ndarray::{Array1, ArrayBase, ArrayD, ArrayView1, Data, Dimension, IxDyn, ShapeBuilder};
use std::io::{Read, Seek, Write};

impl<R: Read + Seek> EclFile<R> {
    /// Zero-copy view of a decoded array
    pub fn get_ndarray_view<T: Element>(&self, name: &str) -> Result<ArrayView1<'_, T>> {
        self.get::<T>(name).map(ArrayView1::from)
    }

    /// Owned copy of a decoded array
    pub fn get_ndarray<T: Element>(&self, name: &str) -> Result<Array1<T>> {
        self.get_ndarray_view(name).map(|view| view.to_owned())
    }

    /// Decoded array reshaped to `shape`, first axis fastest
    pub fn get_ndarray_shaped<T: Element>(&self, name: &str, shape: &[usize]) -> Result<ArrayD<T>> {
        shaped(name, self.get::<T>(name)?, shape)
    }
}

impl<R: Read + Seek> RestartFile<R> {
    /// Owned copy of an array at one report step
    pub fn get_rst_ndarray<T: Element>(&self, name: &str, step: i32) -> Result<Array1<T>> {
        self.get_rst::<T>(name, step).map(|values| Array1::from(values.to_vec()))
    }
}

impl<W: Write> Writer<W> {
    /// Append an ndarray of any dimension, first axis fastest
    pub fn write_ndarray<T, S, D>(&mut self, name: &str, values: &ArrayBase<S, D>) -> Result<()>
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let flat: Vec<T> = values.t().iter().cloned().collect();
        self.write(name, &flat)
    }
}

fn shaped<T: Element>(name: &str, values: &[T], shape: &[usize]) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(IxDyn(shape).f(), values.to_vec()).map_err(|_| {
        EclError::InvalidInput(format!(
            "array '{name}' has {} elements, which does not fit shape {shape:?}",
            values.len()
        ))
    })
}
