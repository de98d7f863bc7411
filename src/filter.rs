#![allow(non_snake_case)]

//! Kalman filtering of manifold-valued state.
//!
//! The filter owns the current time and the current stochastic state estimate and advances them
//! through the two operations of the discrete recursion: `predict` propagates the estimate
//! through the process model, `update` predicts and then fuses a measurement through a stochastic
//! mapping. Both are check-then-commit: every fallible step runs on locals, and a failing call
//! leaves time and estimate unchanged.

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::linalg::SymMatrix;
use crate::manifold::Point;
use crate::models::{StochasticMapping, StochasticPoint, StochasticProcess};

/// A Kalman filter over a stochastic process model.
///
/// The covariance is propagated through the (possibly nonlinear) process and measurement mean
/// maps via their supplied differentials, so the recursion is the linearised (extended) form on
/// whatever manifold the process lives on.
pub struct KalmanFilter<P: StochasticProcess> {
    process: P,
    time: f64,
    estimate: StochasticPoint,
}

impl<P: StochasticProcess> KalmanFilter<P> {
    /// A filter starting from the given initial estimate at the given time.
    pub fn new(process: P, time: f64, estimate: StochasticPoint) -> Result<KalmanFilter<P>> {
        let dim = process.state_space().dimension();
        if estimate.dimension() != dim {
            return Err(Error::dimensions(dim, estimate.dimension()));
        }
        process.state_space().contains(&estimate.expectation)?;
        Ok(KalmanFilter {
            process,
            time,
            estimate,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn estimate(&self) -> &StochasticPoint {
        &self.estimate
    }

    /// Advances the estimate through the process model to `to_time`.
    pub fn predict(&mut self, to_time: f64) -> Result<()> {
        let predicted = self.predicted(to_time)?;
        self.commit(to_time, predicted);
        Ok(())
    }

    /// Predicts to `at_time`, then fuses `measurement` observed through `model`.
    pub fn update<M: StochasticMapping>(
        &mut self,
        model: &M,
        measurement: &Point,
        at_time: f64,
    ) -> Result<()> {
        let state_dim = self.process.state_space().dimension();
        if model.domain().dimension() != state_dim {
            return Err(Error::dimensions(state_dim, model.domain().dimension()));
        }
        if measurement.dimension() != model.codomain().dimension() {
            return Err(Error::dimensions(
                model.codomain().dimension(),
                measurement.dimension(),
            ));
        }

        let prior = self.predicted(at_time)?;
        let X = prior.covariance.as_matrix();

        let Hx = model.expectation_differential(&prior.expectation)?;
        let predicted_measurement = model.apply(&prior.expectation)?;

        // Innovation covariance and Kalman gain, X·Hx'·S⁻¹.
        let XHt = X * Hx.transpose();
        let S = &Hx * &XHt + predicted_measurement.covariance.as_matrix();
        let SI = S
            .cholesky()
            .ok_or(Error::SingularMatrix("innovation covariance is not PD"))?
            .inverse();
        let W = XHt * SI;

        let innovation = model
            .codomain()
            .difference(measurement, &predicted_measurement.expectation)?;

        let expectation = self
            .process
            .state_space()
            .translate(&prior.expectation, &(&W * innovation))?;
        let identity = DMatrix::identity(state_dim, state_dim);
        let covariance = SymMatrix::symmetrize((identity - W * Hx) * X)?;

        self.commit(at_time, StochasticPoint::new(expectation, covariance)?);
        Ok(())
    }

    /// The would-be estimate after propagating to `to_time`, without mutating the filter.
    fn predicted(&self, to_time: f64) -> Result<StochasticPoint> {
        let elapsed = to_time - self.time;
        let x = &self.estimate.expectation;

        let evolved = self.process.apply(x, elapsed)?;
        let Fx = self.process.expectation_differential(x, elapsed)?;

        // Linearised propagation plus the process's own injected covariance.
        let X = &Fx * self.estimate.covariance.as_matrix() * Fx.transpose()
            + evolved.covariance.as_matrix();
        StochasticPoint::new(evolved.expectation, SymMatrix::symmetrize(X)?)
    }

    fn commit(&mut self, time: f64, estimate: StochasticPoint) {
        self.time = time;
        self.estimate = estimate;
    }
}
