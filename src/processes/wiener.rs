//! Wiener process: pure diffusion plus drift.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point};
use crate::models::{StochasticPoint, StochasticProcess};

/// Drifting diffusion on an arbitrary manifold.
///
/// The mean translates along the fixed drift tangent vector while the covariance grows linearly
/// with time. The mean map is a pure translation, so its Jacobian with respect to the start point
/// is the identity for all time.
#[derive(Debug, Clone)]
pub struct WienerProcess {
    space: Manifold,
    drift: DVector<f64>,
    diffusion: SymMatrix,
}

impl WienerProcess {
    /// A Wiener process with the given drift tangent vector and diffusion covariance rate.
    pub fn new(space: Manifold, drift: DVector<f64>, diffusion: SymMatrix) -> Result<WienerProcess> {
        if drift.nrows() != space.dimension() {
            return Err(Error::dimensions(space.dimension(), drift.nrows()));
        }
        if diffusion.dim() != space.dimension() {
            return Err(Error::dimensions(space.dimension(), diffusion.dim()));
        }
        Ok(WienerProcess {
            space,
            drift,
            diffusion,
        })
    }

    /// A driftless Wiener process: pure diffusion.
    pub fn driftless(space: Manifold, diffusion: SymMatrix) -> Result<WienerProcess> {
        let drift = DVector::zeros(space.dimension());
        WienerProcess::new(space, drift, diffusion)
    }
}

impl StochasticProcess for WienerProcess {
    fn state_space(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint> {
        let expectation = self.space.translate(point, &(&self.drift * time))?;
        StochasticPoint::new(expectation, &self.diffusion * time)
    }

    fn expectation_differential(&self, point: &Point, _time: f64) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        let dim = self.space.dimension();
        Ok(DMatrix::identity(dim, dim))
    }
}
