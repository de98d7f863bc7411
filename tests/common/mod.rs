//! Shared helpers for the integration tests.
//!
//! The central finite-difference Jacobian is the correctness oracle for every analytic
//! expectation differential: the differential of a mean map must match its numerical
//! approximation at a probe point.

#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};

use manifold_estimate::models::{StochasticMapping, StochasticProcess};

/// Step used by the central finite-difference approximation.
pub const JACOBIAN_EPS: f64 = 1e-6;

/// Tolerance for comparing analytic and numerical Jacobians.
pub const JACOBIAN_TOL: f64 = 1e-6;

/// Central finite-difference Jacobian of `f` at `at`.
pub fn numeric_jacobian<F>(f: F, at: &DVector<f64>, eps: f64) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let rows = f(at).nrows();
    let cols = at.nrows();
    let mut jacobian = DMatrix::zeros(rows, cols);
    for j in 0..cols {
        let mut forward = at.clone();
        let mut backward = at.clone();
        forward[j] += eps;
        backward[j] -= eps;
        let column = (f(&forward) - f(&backward)) / (2.0 * eps);
        jacobian.column_mut(j).copy_from(&column);
    }
    jacobian
}

/// The process mean map read in the coordinates of the chart at the state-space origin.
///
/// For flat state spaces (including products of flat factors) this is the mean map itself, so its
/// numerical Jacobian is directly comparable with `expectation_differential`.
pub fn mean_in_coordinates<P: StochasticProcess>(
    process: &P,
    coordinates: &DVector<f64>,
    time: f64,
) -> DVector<f64> {
    let space = process.state_space();
    let origin = space.origin();
    let point = space.translate(&origin, coordinates).unwrap();
    let evolved = process.apply(&point, time).unwrap();
    space.difference(&evolved.expectation, &origin).unwrap()
}

/// Asserts that the analytic differential of a mapping mean map matches the finite-difference
/// oracle at the given domain coordinates.
pub fn assert_mapping_differential_consistent<M: StochasticMapping>(
    mapping: &M,
    coordinates: &DVector<f64>,
) {
    let domain = mapping.domain();
    let codomain = mapping.codomain();
    let point = domain.translate(&domain.origin(), coordinates).unwrap();
    let analytic = mapping.expectation_differential(&point).unwrap();
    let numeric = numeric_jacobian(
        |x| {
            let p = domain.translate(&domain.origin(), x).unwrap();
            let image = mapping.apply(&p).unwrap();
            codomain
                .difference(&image.expectation, &codomain.origin())
                .unwrap()
        },
        coordinates,
        JACOBIAN_EPS,
    );
    let deviation = (analytic - numeric).amax();
    assert!(
        deviation < JACOBIAN_TOL,
        "analytic differential deviates from finite differences by {}",
        deviation
    );
}

/// Asserts that the analytic differential of a process mean map matches the finite-difference
/// oracle at the given coordinates.
pub fn assert_differential_consistent<P: StochasticProcess>(
    process: &P,
    coordinates: &DVector<f64>,
    time: f64,
) {
    let space = process.state_space();
    let point = space.translate(&space.origin(), coordinates).unwrap();
    let analytic = process.expectation_differential(&point, time).unwrap();
    let numeric = numeric_jacobian(
        |x| mean_in_coordinates(process, x, time),
        coordinates,
        JACOBIAN_EPS,
    );
    let deviation = (analytic - numeric).amax();
    assert!(
        deviation < JACOBIAN_TOL,
        "analytic differential deviates from finite differences by {}",
        deviation
    );
}
