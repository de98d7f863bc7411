//! Ornstein-Uhlenbeck process: mean-reverting diffusion.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point};
use crate::models::{StochasticPoint, StochasticProcess};

/// Exponential relaxation toward an attractor with diffusion, on flat space.
///
/// With relaxation factor `k = exp(-t/τ)` the mean is `k·p + (1-k)·attractor` and the covariance
/// is `τ·(1-k²)/2` times the diffusion rate. As `t → ∞` the distribution approaches the attractor
/// with the equilibrium covariance, independent of the start point.
#[derive(Debug, Clone)]
pub struct OrnsteinUhlenbeckProcess {
    space: Manifold,
    attractor: DVector<f64>,
    relaxation_time: f64,
    diffusion: SymMatrix,
}

impl OrnsteinUhlenbeckProcess {
    /// A mean-reverting process relaxing toward `attractor` on the time scale `relaxation_time`.
    ///
    /// A relaxation time of zero or below has no meaningful decay and is rejected.
    pub fn new(
        attractor: DVector<f64>,
        relaxation_time: f64,
        diffusion: SymMatrix,
    ) -> Result<OrnsteinUhlenbeckProcess> {
        if !(relaxation_time > 0.0) {
            return Err(Error::domain(format!(
                "relaxation time must be positive, got {}",
                relaxation_time
            )));
        }
        if diffusion.dim() != attractor.nrows() {
            return Err(Error::dimensions(attractor.nrows(), diffusion.dim()));
        }
        let space = Manifold::affine(attractor.nrows());
        Ok(OrnsteinUhlenbeckProcess {
            space,
            attractor,
            relaxation_time,
            diffusion,
        })
    }

    /// The steady-state covariance `(τ/2)·diffusion` reached as `t → ∞`.
    pub fn equilibrium_covariance(&self) -> SymMatrix {
        &self.diffusion * (self.relaxation_time / 2.0)
    }

    fn relaxation_factor(&self, time: f64) -> f64 {
        (-time / self.relaxation_time).exp()
    }
}

impl StochasticProcess for OrnsteinUhlenbeckProcess {
    fn state_space(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint> {
        self.space.contains(point)?;
        let p = point.as_flat()?;
        let k = self.relaxation_factor(time);
        let expectation = p * k + &self.attractor * (1.0 - k);
        let variance_scale = self.relaxation_time * (1.0 - k * k) / 2.0;
        StochasticPoint::new(Point::Flat(expectation), &self.diffusion * variance_scale)
    }

    fn expectation_differential(&self, point: &Point, time: f64) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        let dim = self.space.dimension();
        Ok(DMatrix::identity(dim, dim) * self.relaxation_factor(time))
    }
}
