//! Bayesian estimation on differential manifolds.
//!
//! Bayesian filtering is a probabilistic technique for data fusion. The technique combines a
//! concise mathematical formulation of a system with observations of that system. Probabilities
//! are used to represent the state of a system, likelihood functions to represent their
//! relationships.
//!
//! Many systems of practical interest do not live on a flat vector space: orientations live on
//! rotation groups, and composite states stack flat and curved factors. This library keeps the
//! discrete predict/observe recursion of a Kalman filter while letting the state take values on a
//! [`Manifold`]: a coordinate space that supports translating a point by a tangent vector and
//! computing the tangent vector between two points.
//!
//! Prediction and observation models are represented by the [`StochasticProcess`] and
//! [`StochasticMapping`] traits, which return a propagated mean together with its covariance and
//! expose the Jacobian of the mean map for linearised covariance propagation. Concrete process
//! models (Wiener, Ornstein-Uhlenbeck, rotating-frame, independent products and integral
//! extensions) live in [`processes`]; the filter recursion itself lives in [`filter`].
//!
//! [`Manifold`]: manifold/enum.Manifold.html
//! [`StochasticProcess`]: models/trait.StochasticProcess.html
//! [`StochasticMapping`]: models/trait.StochasticMapping.html
//! [`processes`]: processes/index.html
//! [`filter`]: filter/index.html

pub mod error;
pub mod filter;
pub mod linalg;
pub mod manifold;
pub mod models;
pub mod processes;

pub use error::{Error, Result};
