//! Product manifolds: ordered stacks of factor manifolds.

use nalgebra::DVector;

use crate::error::{Error, Result};
use crate::manifold::{Manifold, Point};

/// An ordered product of factor manifolds.
///
/// The tangent space is the concatenation of the factor tangent spaces; a precomputed prefix-sum
/// table maps each factor to its starting offset in the flattened tangent vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductManifold {
    factors: Vec<Manifold>,
    /// Prefix sums of factor dimensions, length `factors.len() + 1`, starting at 0.
    offsets: Vec<usize>,
}

impl ProductManifold {
    pub fn new(factors: Vec<Manifold>) -> ProductManifold {
        let mut offsets = Vec::with_capacity(factors.len() + 1);
        let mut total = 0;
        offsets.push(0);
        for factor in &factors {
            total += factor.dimension();
            offsets.push(total);
        }
        ProductManifold { factors, offsets }
    }

    pub fn dimension(&self) -> usize {
        *self.offsets.last().unwrap_or(&0)
    }

    pub fn factors(&self) -> &[Manifold] {
        &self.factors
    }

    /// Starting offset of factor `i` in the flattened tangent vector.
    ///
    /// `coordinate_index(0) == 0` and `coordinate_index(factors.len()) == dimension()`.
    pub fn coordinate_index(&self, i: usize) -> usize {
        self.offsets[i]
    }

    pub(crate) fn contains(&self, point: &Point) -> Result<()> {
        let parts = point.as_product()?;
        if parts.len() != self.factors.len() {
            return Err(Error::domain(format!(
                "product point has {} factors, manifold has {}",
                parts.len(),
                self.factors.len()
            )));
        }
        for (factor, part) in self.factors.iter().zip(parts) {
            factor.contains(part)?;
        }
        Ok(())
    }

    pub(crate) fn translate(&self, point: &Point, tangent: &DVector<f64>) -> Result<Point> {
        let parts = point.as_product()?;
        let mut translated = Vec::with_capacity(self.factors.len());
        for (i, (factor, part)) in self.factors.iter().zip(parts).enumerate() {
            let sub = tangent
                .rows(self.offsets[i], factor.dimension())
                .clone_owned();
            translated.push(factor.translate(part, &sub)?);
        }
        Ok(Point::Product(translated))
    }

    pub(crate) fn difference(&self, to: &Point, from: &Point) -> Result<DVector<f64>> {
        let to_parts = to.as_product()?;
        let from_parts = from.as_product()?;
        let mut tangent = DVector::zeros(self.dimension());
        for (i, factor) in self.factors.iter().enumerate() {
            let sub = factor.difference(&to_parts[i], &from_parts[i])?;
            tangent
                .rows_mut(self.offsets[i], factor.dimension())
                .copy_from(&sub);
        }
        Ok(tangent)
    }
}
