//! Test the Kalman filter recursion: exact numbers of a reference scenario, covariance
//! invariants, failure atomicity and filtering on a rotation group.

use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector, UnitQuaternion, Vector3};

use manifold_estimate::filter::KalmanFilter;
use manifold_estimate::linalg::SymMatrix;
use manifold_estimate::manifold::{Manifold, Point};
use manifold_estimate::models::{
    AffineTransformation, StochasticMapping, StochasticPoint,
};
use manifold_estimate::processes::{ExtensionProcess, WienerProcess};
use manifold_estimate::{Error, Result};

fn diagonal(entries: &[f64]) -> SymMatrix {
    SymMatrix::from_diagonal(&DVector::from_column_slice(entries))
}

fn scalar_model(h: f64, noise: f64) -> AffineTransformation {
    AffineTransformation::new(
        DMatrix::from_element(1, 1, h),
        DVector::zeros(1),
        diagonal(&[noise]),
    )
    .unwrap()
}

#[test]
fn test_stochastic_point_dimension_check() {
    let bad = StochasticPoint::new(Point::flat(&[0.0, 1.0]), diagonal(&[1.0]));
    assert!(matches!(
        bad,
        Err(Error::DimensionMismatch {
            expected: 2,
            got: 1
        })
    ));
}

#[test]
fn test_affine_transformation_dimension_checks() {
    // Offset length must equal the row count.
    let bad_offset = AffineTransformation::new(
        DMatrix::identity(2, 2),
        DVector::zeros(3),
        diagonal(&[1.0, 1.0]),
    );
    assert!(matches!(bad_offset, Err(Error::DimensionMismatch { .. })));

    // Noise dimension must equal the row count.
    let bad_noise = AffineTransformation::new(
        DMatrix::identity(2, 2),
        DVector::zeros(2),
        diagonal(&[1.0]),
    );
    assert!(matches!(bad_noise, Err(Error::DimensionMismatch { .. })));
}

#[test]
fn test_scalar_wiener_scenario() {
    // 1-D line, driftless Wiener with q = 1, initial estimate (0, 1) at time 0.
    let process = WienerProcess::driftless(Manifold::affine(1), diagonal(&[1.0])).unwrap();
    let initial = StochasticPoint::new(Point::flat(&[0.0]), diagonal(&[1.0])).unwrap();
    let mut filter = KalmanFilter::new(process, 0.0, initial).unwrap();

    filter.predict(1.0).unwrap();
    assert_relative_eq!(filter.time(), 1.0);
    assert_relative_eq!(
        filter.estimate().expectation.as_flat().unwrap()[0],
        0.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(filter.estimate().covariance[(0, 0)], 2.0, epsilon = 1e-12);

    // Identity observation with noise 0.1 of the value 5: gain 2/2.1.
    let model = scalar_model(1.0, 0.1);
    filter.update(&model, &Point::flat(&[5.0]), 1.0).unwrap();
    assert_relative_eq!(
        filter.estimate().expectation.as_flat().unwrap()[0],
        10.0 / 2.1,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        filter.estimate().covariance[(0, 0)],
        0.2 / 2.1,
        epsilon = 1e-12
    );
}

#[test]
fn test_affine_model_observes_extension_state() {
    // An extension state is a product of affine factors; a 1x2 observation matrix reads it as a
    // flat 2-vector.
    let model = AffineTransformation::new(
        DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
        DVector::zeros(1),
        diagonal(&[0.1]),
    )
    .unwrap();
    let state = Point::Product(vec![Point::flat(&[1.5]), Point::flat(&[2.5])]);

    let observed = model.apply(&state).unwrap();
    assert_relative_eq!(observed.expectation.as_flat().unwrap()[0], 1.5, epsilon = 1e-12);
    let differential = model.expectation_differential(&state).unwrap();
    assert_relative_eq!(differential[(0, 0)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(differential[(0, 1)], 0.0, epsilon = 1e-12);

    // Rotation factors carry no flat coordinates.
    let rotation_state = Point::Product(vec![
        Point::Rotation3(UnitQuaternion::identity()),
        Point::flat(&[0.0, 0.0]),
    ]);
    assert!(matches!(
        model.apply(&rotation_state),
        Err(Error::DomainError(_))
    ));
}

#[test]
fn test_covariance_stays_symmetric() {
    // Velocity plus its integral; only the velocity component is observed.
    let base = WienerProcess::new(
        Manifold::affine(1),
        DVector::from_column_slice(&[1.0]),
        diagonal(&[1.0]),
    )
    .unwrap();
    let process = ExtensionProcess::state_integral(base).unwrap();

    let initial = StochasticPoint::new(
        Point::Product(vec![Point::flat(&[0.0]), Point::flat(&[0.0])]),
        diagonal(&[1.0, 1.0]),
    )
    .unwrap();
    let mut filter = KalmanFilter::new(process, 0.0, initial).unwrap();

    let model = AffineTransformation::new(
        DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
        DVector::zeros(1),
        diagonal(&[0.1]),
    )
    .unwrap();

    filter.predict(0.5).unwrap();
    filter.update(&model, &Point::flat(&[1.2]), 1.0).unwrap();
    filter.predict(1.5).unwrap();
    filter.update(&model, &Point::flat(&[2.1]), 2.0).unwrap();

    let x = filter.estimate().covariance.as_matrix();
    assert!((x - x.transpose()).amax() == 0.0, "covariance not symmetric");
    for i in 0..x.nrows() {
        assert!(x[(i, i)] >= 0.0, "negative variance on the diagonal");
    }
}

#[test]
fn test_failing_update_leaves_filter_unchanged() {
    let process = WienerProcess::driftless(Manifold::affine(2), diagonal(&[1.0, 1.0])).unwrap();
    let initial =
        StochasticPoint::new(Point::flat(&[1.0, 2.0]), diagonal(&[0.5, 0.5])).unwrap();
    let mut filter = KalmanFilter::new(process, 0.0, initial).unwrap();
    let before = filter.estimate().clone();

    // Model domain does not match the state dimension.
    let narrow = scalar_model(1.0, 0.1);
    assert!(matches!(
        filter.update(&narrow, &Point::flat(&[0.0]), 1.0),
        Err(Error::DimensionMismatch { .. })
    ));

    // Measurement does not match the model codomain.
    let wide = AffineTransformation::new(
        DMatrix::from_row_slice(1, 2, &[1.0, 1.0]),
        DVector::zeros(1),
        diagonal(&[0.1]),
    )
    .unwrap();
    assert!(matches!(
        filter.update(&wide, &Point::flat(&[0.0, 0.0]), 1.0),
        Err(Error::DimensionMismatch { .. })
    ));

    assert_relative_eq!(filter.time(), 0.0);
    assert_eq!(filter.estimate(), &before);
}

#[test]
fn test_singular_innovation_is_fatal() {
    let process = WienerProcess::driftless(Manifold::affine(1), diagonal(&[1.0])).unwrap();
    let initial = StochasticPoint::new(Point::flat(&[0.0]), diagonal(&[1.0])).unwrap();
    let mut filter = KalmanFilter::new(process, 0.0, initial).unwrap();
    let before = filter.estimate().clone();

    // Zero observation matrix and zero noise: the innovation covariance is singular.
    let degenerate = scalar_model(0.0, 0.0);
    assert!(matches!(
        filter.update(&degenerate, &Point::flat(&[1.0]), 1.0),
        Err(Error::SingularMatrix(_))
    ));
    assert_relative_eq!(filter.time(), 0.0);
    assert_eq!(filter.estimate(), &before);
}

/// Direct observation of an orientation, with isotropic observation noise.
struct OrientationObservation {
    space: Manifold,
    noise: SymMatrix,
}

impl StochasticMapping for OrientationObservation {
    fn domain(&self) -> &Manifold {
        &self.space
    }

    fn codomain(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point) -> Result<StochasticPoint> {
        self.space.contains(point)?;
        StochasticPoint::new(point.clone(), self.noise.clone())
    }

    fn expectation_differential(&self, point: &Point) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        Ok(DMatrix::identity(3, 3))
    }
}

#[test]
fn test_orientation_tracking() {
    let process =
        WienerProcess::driftless(Manifold::Rotation3, diagonal(&[0.01, 0.01, 0.01])).unwrap();
    let initial = StochasticPoint::new(
        Point::Rotation3(UnitQuaternion::identity()),
        diagonal(&[0.04, 0.04, 0.04]),
    )
    .unwrap();
    let mut filter = KalmanFilter::new(process, 0.0, initial).unwrap();

    let model = OrientationObservation {
        space: Manifold::Rotation3,
        noise: diagonal(&[1e-6, 1e-6, 1e-6]),
    };
    let observed = UnitQuaternion::from_scaled_axis(Vector3::new(0.3, 0.0, 0.0));
    filter
        .update(&model, &Point::Rotation3(observed), 1.0)
        .unwrap();

    // A near-exact measurement dominates the prior: the estimate lands on the observation.
    match &filter.estimate().expectation {
        Point::Rotation3(q) => assert!(q.angle_to(&observed) < 1e-4),
        _ => panic!("estimate left the rotation group"),
    }
    for i in 0..3 {
        let variance = filter.estimate().covariance[(i, i)];
        assert!(variance >= 0.0 && variance < 1e-5);
    }
}
