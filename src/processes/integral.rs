#![allow(non_snake_case)]

//! Base/fiber extension processes: appending an integral of the base trajectory.
//!
//! An extension process evolves a base process and, alongside it, a fiber state holding the time
//! integral of a velocity function of the base point. The integral is approximated by the
//! trapezoid rule over the elapsed interval, and the fiber covariance and base/fiber
//! cross-covariance follow from first-order propagation of the base uncertainty through the
//! velocity Jacobian. The propagation is linearised, so it is approximate even when the base
//! dynamics are linear.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point};
use crate::models::{StochasticPoint, StochasticProcess};

/// A fiber evolution rule: the velocity of the fiber state as a function of the base point.
pub trait FiberVelocity {
    /// Dimension of the base point the velocity is evaluated at.
    fn base_dimension(&self) -> usize;

    /// Dimension of the velocity, which is the dimension of the fiber state.
    fn fiber_dimension(&self) -> usize;

    /// Fiber velocity at the given base point.
    fn velocity(&self, base: &DVector<f64>) -> Result<DVector<f64>>;

    /// Jacobian of the velocity with respect to the base point.
    fn differential(&self, base: &DVector<f64>) -> Result<DMatrix<f64>>;
}

/// The affine fiber velocity `v(b) = A·b + c`.
#[derive(Debug, Clone)]
pub struct AffineVelocity {
    A: DMatrix<f64>,
    c: DVector<f64>,
}

impl AffineVelocity {
    pub fn new(A: DMatrix<f64>, c: DVector<f64>) -> Result<AffineVelocity> {
        if c.nrows() != A.nrows() {
            return Err(Error::dimensions(A.nrows(), c.nrows()));
        }
        Ok(AffineVelocity { A, c })
    }

    /// The identity velocity `v(b) = b`: the fiber integrates the base state itself.
    pub fn state_integral(dimension: usize) -> AffineVelocity {
        AffineVelocity {
            A: DMatrix::identity(dimension, dimension),
            c: DVector::zeros(dimension),
        }
    }
}

impl FiberVelocity for AffineVelocity {
    fn base_dimension(&self) -> usize {
        self.A.ncols()
    }

    fn fiber_dimension(&self) -> usize {
        self.A.nrows()
    }

    fn velocity(&self, base: &DVector<f64>) -> Result<DVector<f64>> {
        if base.nrows() != self.A.ncols() {
            return Err(Error::dimensions(self.A.ncols(), base.nrows()));
        }
        Ok(&self.A * base + &self.c)
    }

    fn differential(&self, base: &DVector<f64>) -> Result<DMatrix<f64>> {
        if base.nrows() != self.A.ncols() {
            return Err(Error::dimensions(self.A.ncols(), base.nrows()));
        }
        Ok(self.A.clone())
    }
}

/// Structural split of an extension state into its base and fiber parts.
///
/// Carries the typed coordinate offsets of the two factors so that no call site addresses them by
/// positional index arithmetic.
#[derive(Debug, Clone, Copy)]
struct BaseFiberLayout {
    base_dim: usize,
    fiber_dim: usize,
}

impl BaseFiberLayout {
    fn dimension(&self) -> usize {
        self.base_dim + self.fiber_dim
    }

    fn base_offset(&self) -> usize {
        0
    }

    fn fiber_offset(&self) -> usize {
        self.base_dim
    }

    fn split<'a>(&self, point: &'a Point) -> Result<(&'a Point, &'a DVector<f64>)> {
        let parts = point.as_product()?;
        if parts.len() != 2 {
            return Err(Error::domain(format!(
                "extension state has base and fiber factors, got {} factors",
                parts.len()
            )));
        }
        Ok((&parts[0], parts[1].as_flat()?))
    }

    fn join(&self, base: Point, fiber: DVector<f64>) -> Point {
        Point::Product(vec![base, Point::Flat(fiber)])
    }
}

/// A base process extended by the time integral of a velocity function of its state.
///
/// The base must live on a flat space: the trapezoid average of start and end velocities and the
/// linearised covariance blocks are only meaningful in a fixed coordinate frame.
pub struct ExtensionProcess<P: StochasticProcess, V: FiberVelocity> {
    base: P,
    fiber_velocity: V,
    layout: BaseFiberLayout,
    space: Manifold,
}

impl<P: StochasticProcess, V: FiberVelocity> ExtensionProcess<P, V> {
    pub fn new(base: P, fiber_velocity: V) -> Result<ExtensionProcess<P, V>> {
        if !base.state_space().is_affine() {
            return Err(Error::domain(
                "extension process requires a base process on an affine state space",
            ));
        }
        if fiber_velocity.base_dimension() != base.state_space().dimension() {
            return Err(Error::dimensions(
                base.state_space().dimension(),
                fiber_velocity.base_dimension(),
            ));
        }
        let layout = BaseFiberLayout {
            base_dim: base.state_space().dimension(),
            fiber_dim: fiber_velocity.fiber_dimension(),
        };
        let space = Manifold::product(vec![
            base.state_space().clone(),
            Manifold::affine(layout.fiber_dim),
        ]);
        Ok(ExtensionProcess {
            base,
            fiber_velocity,
            layout,
            space,
        })
    }
}

impl<P: StochasticProcess> ExtensionProcess<P, AffineVelocity> {
    /// Extends `base` by the integral of its own state, tracking for example position as the
    /// integral of velocity.
    pub fn state_integral(base: P) -> Result<ExtensionProcess<P, AffineVelocity>> {
        let dimension = base.state_space().dimension();
        ExtensionProcess::new(base, AffineVelocity::state_integral(dimension))
    }
}

impl<P: StochasticProcess, V: FiberVelocity> StochasticProcess for ExtensionProcess<P, V> {
    fn state_space(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint> {
        self.space.contains(point)?;
        let (base_start, fiber_start) = self.layout.split(point)?;

        let base_evolved = self.base.apply(base_start, time)?;
        let b0 = base_start.as_flat()?;
        let b1 = base_evolved.expectation.as_flat()?;

        // Trapezoid rule: average the fiber velocity at the start and end base expectation.
        let v0 = self.fiber_velocity.velocity(b0)?;
        let v1 = self.fiber_velocity.velocity(b1)?;
        let fiber = fiber_start + (v0 + v1) * (time / 2.0);

        // First-order propagation of the base uncertainty into the fiber: the fiber deviation is
        // J·δb1 with J = (t/2)·V1, giving fiber block J·Pb·Jᵗ and cross block J·Pb.
        let Pb = base_evolved.covariance.as_matrix();
        let V1 = self.fiber_velocity.differential(b1)?;
        let J = V1 * (time / 2.0);
        let Pff = SymMatrix::symmetrize(&J * Pb * J.transpose())?;
        let Pfb = &J * Pb;

        let mut covariance = SymMatrix::zeros(self.layout.dimension());
        covariance.set_block(self.layout.base_offset(), self.layout.base_offset(), Pb)?;
        covariance.set_block(
            self.layout.fiber_offset(),
            self.layout.fiber_offset(),
            Pff.as_matrix(),
        )?;
        covariance.set_block(self.layout.fiber_offset(), self.layout.base_offset(), &Pfb)?;

        StochasticPoint::new(
            self.layout.join(base_evolved.expectation, fiber),
            covariance,
        )
    }

    fn expectation_differential(&self, point: &Point, time: f64) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        let (base_start, _) = self.layout.split(point)?;

        let F = self.base.expectation_differential(base_start, time)?;
        let b0 = base_start.as_flat()?;
        let base_evolved = self.base.apply(base_start, time)?;
        let b1 = base_evolved.expectation.as_flat()?;

        let V0 = self.fiber_velocity.differential(b0)?;
        let V1 = self.fiber_velocity.differential(b1)?;
        // d(fiber)/d(b0) = (t/2)·(V0 + V1·F); d(fiber)/d(f0) = I.
        let G = (V0 + &V1 * &F) * (time / 2.0);

        let (base_dim, fiber_dim) = (self.layout.base_dim, self.layout.fiber_dim);
        let mut differential = DMatrix::zeros(self.layout.dimension(), self.layout.dimension());
        differential
            .slice_mut((self.layout.base_offset(), self.layout.base_offset()), (base_dim, base_dim))
            .copy_from(&F);
        differential
            .slice_mut((self.layout.fiber_offset(), self.layout.base_offset()), (fiber_dim, base_dim))
            .copy_from(&G);
        differential
            .slice_mut((self.layout.fiber_offset(), self.layout.fiber_offset()), (fiber_dim, fiber_dim))
            .copy_from(&DMatrix::identity(fiber_dim, fiber_dim));
        Ok(differential)
    }
}
