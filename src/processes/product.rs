//! Independent joint evolution of factor processes.

use nalgebra::DMatrix;

use crate::error::Result;
use crate::linalg::SymMatrix;
use crate::manifold::{Manifold, Point, ProductManifold};
use crate::models::{StochasticPoint, StochasticProcess};

/// Independent joint process on the product of its factors' state spaces.
///
/// Each factor evolves on its own sub-space at its coordinate offset. The factors being
/// independent, the joint covariance and the joint mean-map Jacobian are block diagonal.
pub struct ProductProcess {
    factors: Vec<Box<dyn StochasticProcess>>,
    space: Manifold,
}

impl ProductProcess {
    pub fn new(factors: Vec<Box<dyn StochasticProcess>>) -> ProductProcess {
        let space = Manifold::product(
            factors
                .iter()
                .map(|factor| factor.state_space().clone())
                .collect(),
        );
        ProductProcess { factors, space }
    }

    fn layout(&self) -> &ProductManifold {
        match &self.space {
            Manifold::Product(product) => product,
            _ => unreachable!("product process state space is a product manifold"),
        }
    }
}

impl StochasticProcess for ProductProcess {
    fn state_space(&self) -> &Manifold {
        &self.space
    }

    fn apply(&self, point: &Point, time: f64) -> Result<StochasticPoint> {
        self.space.contains(point)?;
        let parts = point.as_product()?;
        let layout = self.layout();

        let mut expectations = Vec::with_capacity(self.factors.len());
        let mut covariance = SymMatrix::zeros(self.space.dimension());
        for (i, factor) in self.factors.iter().enumerate() {
            let evolved = factor.apply(&parts[i], time)?;
            let offset = layout.coordinate_index(i);
            covariance.set_block(offset, offset, evolved.covariance.as_matrix())?;
            expectations.push(evolved.expectation);
        }
        StochasticPoint::new(Point::Product(expectations), covariance)
    }

    fn expectation_differential(&self, point: &Point, time: f64) -> Result<DMatrix<f64>> {
        self.space.contains(point)?;
        let parts = point.as_product()?;
        let layout = self.layout();

        let dim = self.space.dimension();
        let mut differential = DMatrix::zeros(dim, dim);
        for (i, factor) in self.factors.iter().enumerate() {
            let block = factor.expectation_differential(&parts[i], time)?;
            let offset = layout.coordinate_index(i);
            let factor_dim = factor.state_space().dimension();
            differential
                .slice_mut((offset, offset), (factor_dim, factor_dim))
                .copy_from(&block);
        }
        Ok(differential)
    }
}
