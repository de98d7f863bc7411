//! Diffusion in a co-rotating frame.

use nalgebra::{DMatrix, DVector, UnitQuaternion, Vector3};

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point};
use crate::models::{StochasticPoint, StochasticProcess};

/// Isotropic diffusion of a spatial point in a frame rotating at a fixed angular velocity.
///
/// The mean is the start point rotated by `exp(t·ω)`; the covariance is `t·σ²·I`. The mean map is
/// linear in the start point, so its Jacobian is the rotation matrix itself.
#[derive(Debug, Clone)]
pub struct RotatingWienerProcess {
    space: Manifold,
    angular_velocity: Vector3<f64>,
    diffusion: f64,
}

impl RotatingWienerProcess {
    /// A rotating-frame diffusion with the given angular-velocity vector and scalar diffusion
    /// rate `σ²`.
    pub fn new(angular_velocity: Vector3<f64>, diffusion: f64) -> Result<RotatingWienerProcess> {
        if diffusion < 0.0 {
            return Err(Error::domain(format!(
                "diffusion rate must be non-negative, got {}",
                diffusion
            )));
        }
        Ok(RotatingWienerProcess {
            space: Manifold::affine(3),
            angular_velocity,
            diffusion,
        })
    }

    fn rotation(&self, time: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_scaled_axis(self.angular_velocity * time)
    }
}

impl StochasticProcess for RotatingWienerProcess {
    fn state_space(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint> {
        self.space.contains(point)?;
        let p = point.as_flat()?;
        let rotated = self
            .rotation(time)
            .transform_vector(&Vector3::new(p[0], p[1], p[2]));
        let expectation = Point::Flat(DVector::from_column_slice(rotated.as_slice()));
        let covariance = SymMatrix::identity(3) * (self.diffusion * time);
        StochasticPoint::new(expectation, covariance)
    }

    fn expectation_differential(&self, point: &Point, time: f64) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        let rotation = self.rotation(time).to_rotation_matrix();
        Ok(DMatrix::from_column_slice(3, 3, rotation.matrix().as_slice()))
    }
}
