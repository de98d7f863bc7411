#![allow(non_snake_case)]

//! Stochastic state representation and model traits.
//!
//! State distributions are represented by their first two moments as structs. Prediction and
//! observation models are traits that propagate a point to a stochastic point and expose the
//! Jacobian of their mean map for linearised covariance propagation.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point};

/// A first/second-moment approximation of a distribution on a manifold.
///
/// The covariance lives in the tangent space at the expectation and must be positive
/// semi-definite; that is a construction discipline of the producing models, not an active check.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticPoint {
    /// Expected point.
    pub expectation: Point,
    /// Covariance of the tangent-space deviation around the expectation.
    pub covariance: SymMatrix,
}

impl StochasticPoint {
    /// Pairs an expectation with its covariance; the dimensions must agree.
    pub fn new(expectation: Point, covariance: SymMatrix) -> Result<StochasticPoint> {
        if covariance.dim() != expectation.dimension() {
            return Err(Error::dimensions(expectation.dimension(), covariance.dim()));
        }
        Ok(StochasticPoint {
            expectation,
            covariance,
        })
    }

    /// A point known exactly: zero covariance.
    pub fn deterministic(expectation: Point) -> StochasticPoint {
        let dim = expectation.dimension();
        StochasticPoint {
            expectation,
            covariance: SymMatrix::zeros(dim),
        }
    }

    pub fn dimension(&self) -> usize {
        self.expectation.dimension()
    }
}

/// A stochastic map between manifolds.
///
/// A pure function object: given a domain point it returns the induced stochastic point on the
/// codomain, deterministically. The expectation differential is the Jacobian of the mean map,
/// with `codomain.dimension()` rows and `domain.dimension()` columns.
pub trait StochasticMapping {
    fn domain(&self) -> &Manifold;

    fn codomain(&self) -> &Manifold;

    /// The stochastic point induced by mapping `point`.
    fn apply(&self, point: &Point) -> Result<StochasticPoint>;

    /// Jacobian of the mean map at `point`.
    fn expectation_differential(&self, point: &Point) -> Result<DMatrix<f64>>;
}

/// A time-parameterised family of stochastic mappings on one state-space manifold.
///
/// `apply(point, time)` evolves a state known exactly at time 0 to its distribution at `time`.
/// At `time == 0` every process is the identity with zero covariance. The expectation
/// differential is the Jacobian of the mean map with respect to the initial point.
pub trait StochasticProcess {
    fn state_space(&self) -> &Manifold;

    /// The state distribution after evolving from `point` for `time`.
    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint>;

    /// Jacobian of the mean map at `point` for the given `time`.
    fn expectation_differential(&self, point: &Point, time: f64) -> Result<DMatrix<f64>>;
}

/// A linear map with additive independent noise between flat spaces.
///
/// `apply(p)` has expectation `A·p + b` and the fixed noise covariance; the expectation
/// differential is the constant matrix `A`.
#[derive(Debug, Clone)]
pub struct AffineTransformation {
    A: DMatrix<f64>,
    b: DVector<f64>,
    noise: SymMatrix,
    domain: Manifold,
    codomain: Manifold,
}

impl AffineTransformation {
    /// The map `p -> A·p + b` plus additive noise with the given covariance.
    ///
    /// The offset length and the noise dimension must both equal the row count of `A`.
    pub fn new(A: DMatrix<f64>, b: DVector<f64>, noise: SymMatrix) -> Result<AffineTransformation> {
        if b.nrows() != A.nrows() {
            return Err(Error::dimensions(A.nrows(), b.nrows()));
        }
        if noise.dim() != A.nrows() {
            return Err(Error::dimensions(A.nrows(), noise.dim()));
        }
        let domain = Manifold::affine(A.ncols());
        let codomain = Manifold::affine(A.nrows());
        Ok(AffineTransformation {
            A,
            b,
            noise,
            domain,
            codomain,
        })
    }

    /// The flat coordinates of a domain point.
    ///
    /// Any point carrying flat coordinates of the domain dimension is accepted, so the map can
    /// observe a product-of-affine state (an extension state, for example) directly.
    fn domain_coordinates(&self, point: &Point) -> Result<DVector<f64>> {
        let p = point.coordinates()?;
        if p.nrows() != self.A.ncols() {
            return Err(Error::dimensions(self.A.ncols(), p.nrows()));
        }
        Ok(p)
    }
}

impl StochasticMapping for AffineTransformation {
    fn domain(&self) -> &Manifold {
        &self.domain
    }

    fn codomain(&self) -> &Manifold {
        &self.codomain
    }

    fn apply(&self, point: &Point) -> Result<StochasticPoint> {
        let p = self.domain_coordinates(point)?;
        StochasticPoint::new(Point::Flat(&self.A * p + &self.b), self.noise.clone())
    }

    fn expectation_differential(&self, point: &Point) -> Result<DMatrix<f64>> {
        self.domain_coordinates(point)?;
        Ok(self.A.clone())
    }
}
