//! Concrete stochastic process models.

pub mod integral;
pub mod ornstein_uhlenbeck;
pub mod product;
pub mod rotating;
pub mod wiener;

pub use integral::{AffineVelocity, ExtensionProcess, FiberVelocity};
pub use ornstein_uhlenbeck::OrnsteinUhlenbeckProcess;
pub use product::ProductProcess;
pub use rotating::RotatingWienerProcess;
pub use wiener::WienerProcess;
