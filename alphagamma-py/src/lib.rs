//! Python bindings for the alphagamma descriptor distance library.
//!
//! Descriptor collections cross the boundary as `uint8` arrays of shape
//! (D, N), one descriptor per column. Distance matrices come back as
//! `float64` arrays of shape (N2, N1).

use numpy::{IntoPyArray, PyArray2, PyArrayMethods, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use alphagamma::{
    AlphaGammaError, DescriptorLayout, DescriptorSet, DistanceConfig, DistanceEngine,
    DistanceMatrix, Orientation, PackedBits, Weights,
};

/// Convert an AlphaGammaError to a Python exception.
fn to_py_err(err: AlphaGammaError) -> PyErr {
    match err {
        AlphaGammaError::NotImplemented(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Copies a (D, N) array into descriptor-contiguous order.
fn descriptor_columns(array: &PyReadonlyArray2<'_, u8>) -> (Vec<u8>, usize, usize) {
    let shape = array.shape();
    let (rows, cols) = (shape[0], shape[1]);
    let data = array.as_array().t().iter().copied().collect();
    (data, rows, cols)
}

fn matrix_to_numpy<'py>(
    py: Python<'py>,
    matrix: DistanceMatrix,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    matrix.into_vec().into_pyarray(py).reshape([rows, cols])
}

#[derive(Clone, Copy)]
enum KernelChoice {
    Reference,
    Packed,
}

#[allow(clippy::too_many_arguments)]
fn run<'py>(
    py: Python<'py>,
    kernel: KernelChoice,
    desc1: PyReadonlyArray2<'_, u8>,
    desc2: PyReadonlyArray2<'_, u8>,
    num_circles: i64,
    num_rays: i64,
    weights: Weights,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let layout = DescriptorLayout::from_signed(num_circles, num_rays).map_err(to_py_err)?;
    let engine = DistanceEngine::new(layout).with_config(DistanceConfig {
        weights,
        parallel,
        ..DistanceConfig::default()
    });

    let (data1, rows1, cols1) = descriptor_columns(&desc1);
    let (data2, rows2, cols2) = descriptor_columns(&desc2);

    let matrix = py
        .detach(|| {
            let set1 = DescriptorSet::new(&data1, rows1, cols1)?;
            let set2 = DescriptorSet::new(&data2, rows2, cols2)?;
            match kernel {
                KernelChoice::Reference => engine.reference_distances(set1, set2),
                KernelChoice::Packed => engine.packed_distances(set1, set2),
            }
        })
        .map_err(to_py_err)?;
    matrix_to_numpy(py, matrix)
}

/// Weighted distances between two collections of unpacked descriptors.
///
/// Args:
///     desc1: uint8 array (D, N1), one descriptor per column
///     desc2: uint8 array (D, N2)
///     num_circles: number of circles C
///     num_rays: number of rays R
///     weight_a: alpha weight (default: 5.0)
///     weight_b: beta weight (default: 1.0)
///     weight_g: gamma weight (default: 1.0)
///     parallel: compute rows in parallel (default: False)
///
/// Returns:
///     float64 array (N2, N1) where entry (j, i) compares desc2[:, j] with desc1[:, i]
#[pyfunction]
#[pyo3(signature = (
    desc1,
    desc2,
    num_circles,
    num_rays,
    weight_a = 5.0,
    weight_b = 1.0,
    weight_g = 1.0,
    parallel = false
))]
#[allow(clippy::too_many_arguments)]
fn alpha_gamma_distances<'py>(
    py: Python<'py>,
    desc1: PyReadonlyArray2<'_, u8>,
    desc2: PyReadonlyArray2<'_, u8>,
    num_circles: i64,
    num_rays: i64,
    weight_a: f64,
    weight_b: f64,
    weight_g: f64,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    run(
        py,
        KernelChoice::Reference,
        desc1,
        desc2,
        num_circles,
        num_rays,
        Weights::new(weight_a, weight_b, weight_g),
        parallel,
    )
}

/// Popcount distances between two collections of packed descriptors.
///
/// Rows must be `packed_byte_size` (base) or twice that (extended). The beta
/// weight is accepted for signature compatibility and has no effect.
#[pyfunction]
#[pyo3(signature = (
    desc1,
    desc2,
    num_circles,
    num_rays,
    weight_a = 5.0,
    weight_b = 1.0,
    weight_g = 1.0,
    parallel = false
))]
#[allow(clippy::too_many_arguments)]
fn alpha_gamma_distances_fast<'py>(
    py: Python<'py>,
    desc1: PyReadonlyArray2<'_, u8>,
    desc2: PyReadonlyArray2<'_, u8>,
    num_circles: i64,
    num_rays: i64,
    weight_a: f64,
    weight_b: f64,
    weight_g: f64,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    run(
        py,
        KernelChoice::Packed,
        desc1,
        desc2,
        num_circles,
        num_rays,
        Weights::new(weight_a, weight_b, weight_g),
        parallel,
    )
}

/// Pack a row (1, N) or column (N, 1) of bytes into LSB-first bits.
///
/// The result keeps the input orientation: (1, ceil(N/8)) or (ceil(N/8), 1).
#[pyfunction]
fn convert_bytestring_to_bitstring<'py>(
    py: Python<'py>,
    bytestring: PyReadonlyArray2<'_, u8>,
) -> PyResult<Bound<'py, PyArray2<u8>>> {
    let shape = bytestring.shape();
    let orientation = Orientation::from_shape(shape[0], shape[1]).map_err(to_py_err)?;
    let elements: Vec<u8> = bytestring.as_array().iter().copied().collect();
    let packed = PackedBits::pack(&elements, orientation);
    let (rows, cols) = packed.shape();
    packed.into_bytes().into_pyarray(py).reshape([rows, cols])
}

/// Unpacked descriptor length `C + C*R`.
#[pyfunction]
fn descriptor_size(num_circles: i64, num_rays: i64) -> PyResult<usize> {
    let layout = DescriptorLayout::from_signed(num_circles, num_rays).map_err(to_py_err)?;
    Ok(layout.descriptor_size())
}

/// Packed descriptor length in bytes.
#[pyfunction]
fn packed_byte_size(num_circles: i64, num_rays: i64) -> PyResult<usize> {
    let layout = DescriptorLayout::from_signed(num_circles, num_rays).map_err(to_py_err)?;
    Ok(layout.packed_byte_size())
}

/// Python module for alphagamma descriptor distances.
#[pymodule]
fn _alphagamma(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(alpha_gamma_distances, m)?)?;
    m.add_function(wrap_pyfunction!(alpha_gamma_distances_fast, m)?)?;
    m.add_function(wrap_pyfunction!(convert_bytestring_to_bitstring, m)?)?;
    m.add_function(wrap_pyfunction!(descriptor_size, m)?)?;
    m.add_function(wrap_pyfunction!(packed_byte_size, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
