//! Differential manifolds: points, tangent-space translation and translation difference.
//!
//! A manifold is an abstract coordinate space with two total operations: translating a point by a
//! tangent vector, and computing the tangent vector between two points. Tangent vectors are plain
//! `DVector`s of the manifold dimension. The operations satisfy the round-trip law
//! `translate(p, difference(q, p)) == q` and `difference(p, p) == 0`.

use nalgebra::{DVector, UnitComplex, UnitQuaternion};

use crate::error::{Error, Result};

pub mod product;
pub mod rotation;

pub use product::ProductManifold;

/// A point on a manifold.
///
/// A closed set of point representations: flat coordinate vectors, planar and spatial rotations,
/// and ordered tuples of factor points for product manifolds.
#[derive(Debug, Clone, PartialEq)]
pub enum Point {
    /// A point of an affine space, a plain coordinate vector.
    Flat(DVector<f64>),
    /// A planar rotation.
    Rotation2(UnitComplex<f64>),
    /// A spatial rotation.
    Rotation3(UnitQuaternion<f64>),
    /// A point of a product manifold, one factor point per factor.
    Product(Vec<Point>),
}

impl Point {
    /// A flat point from coordinates.
    pub fn flat(coordinates: &[f64]) -> Point {
        Point::Flat(DVector::from_column_slice(coordinates))
    }

    /// The dimension of the tangent space at this point.
    pub fn dimension(&self) -> usize {
        match self {
            Point::Flat(v) => v.nrows(),
            Point::Rotation2(_) => 1,
            Point::Rotation3(_) => 3,
            Point::Product(factors) => factors.iter().map(Point::dimension).sum(),
        }
    }

    /// The coordinate vector of a flat point.
    pub fn as_flat(&self) -> Result<&DVector<f64>> {
        match self {
            Point::Flat(v) => Ok(v),
            other => Err(Error::domain(format!(
                "expected a flat point, got {}",
                other.kind()
            ))),
        }
    }

    /// The flat coordinates carried by this point.
    ///
    /// A flat point yields its coordinate vector; a product point yields the concatenated flat
    /// coordinates of its factors. Rotation points carry no flat coordinates and are rejected.
    pub fn coordinates(&self) -> Result<DVector<f64>> {
        match self {
            Point::Flat(v) => Ok(v.clone_owned()),
            Point::Product(factors) => {
                let mut coordinates = DVector::zeros(self.dimension());
                let mut offset = 0;
                for factor in factors {
                    let sub = factor.coordinates()?;
                    coordinates.rows_mut(offset, sub.nrows()).copy_from(&sub);
                    offset += sub.nrows();
                }
                Ok(coordinates)
            }
            other => Err(Error::domain(format!(
                "{} carries no flat coordinates",
                other.kind()
            ))),
        }
    }

    /// The factor points of a product point.
    pub fn as_product(&self) -> Result<&[Point]> {
        match self {
            Point::Product(factors) => Ok(factors),
            other => Err(Error::domain(format!(
                "expected a product point, got {}",
                other.kind()
            ))),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Point::Flat(_) => "a flat point",
            Point::Rotation2(_) => "a planar rotation",
            Point::Rotation3(_) => "a spatial rotation",
            Point::Product(_) => "a product point",
        }
    }
}

/// A differential manifold.
///
/// A closed set of manifold realisations; binary operations between points dispatch on the
/// variant rather than downcasting through an abstract interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifold {
    /// Flat space, `translate` is vector addition.
    Affine(AffineSpace),
    /// The rotation group SO(2), dimension 1.
    Rotation2,
    /// The rotation group SO(3), dimension 3.
    Rotation3,
    /// An ordered product of factor manifolds.
    Product(ProductManifold),
}

impl Manifold {
    /// Flat space of the given dimension.
    pub fn affine(dimension: usize) -> Manifold {
        Manifold::Affine(AffineSpace { dimension })
    }

    /// Product of the given factor manifolds.
    pub fn product(factors: Vec<Manifold>) -> Manifold {
        Manifold::Product(ProductManifold::new(factors))
    }

    pub fn dimension(&self) -> usize {
        match self {
            Manifold::Affine(space) => space.dimension,
            Manifold::Rotation2 => 1,
            Manifold::Rotation3 => 3,
            Manifold::Product(product) => product.dimension(),
        }
    }

    /// Checks that `point` belongs to this manifold's point type and dimension.
    pub fn contains(&self, point: &Point) -> Result<()> {
        match (self, point) {
            (Manifold::Affine(space), Point::Flat(v)) => {
                if v.nrows() != space.dimension {
                    Err(Error::dimensions(space.dimension, v.nrows()))
                } else {
                    Ok(())
                }
            }
            (Manifold::Rotation2, Point::Rotation2(_)) => Ok(()),
            (Manifold::Rotation3, Point::Rotation3(_)) => Ok(()),
            (Manifold::Product(product), Point::Product(_)) => product.contains(point),
            (_, point) => Err(Error::domain(format!(
                "point is {}, not a point of this manifold",
                point.kind()
            ))),
        }
    }

    /// Translates `point` by the tangent vector `tangent`.
    pub fn translate(&self, point: &Point, tangent: &DVector<f64>) -> Result<Point> {
        if tangent.nrows() != self.dimension() {
            return Err(Error::dimensions(self.dimension(), tangent.nrows()));
        }
        self.contains(point)?;
        Ok(match (self, point) {
            (Manifold::Affine(_), Point::Flat(v)) => Point::Flat(v + tangent),
            (Manifold::Rotation2, Point::Rotation2(r)) => {
                Point::Rotation2(rotation::translate2(r, tangent[0]))
            }
            (Manifold::Rotation3, Point::Rotation3(q)) => {
                Point::Rotation3(rotation::translate3(q, tangent))
            }
            (Manifold::Product(product), point) => product.translate(point, tangent)?,
            _ => unreachable!("contains accepted a foreign point"),
        })
    }

    /// The tangent vector carrying `from` to `to`.
    pub fn difference(&self, to: &Point, from: &Point) -> Result<DVector<f64>> {
        self.contains(to)?;
        self.contains(from)?;
        Ok(match (self, to, from) {
            (Manifold::Affine(_), Point::Flat(to), Point::Flat(from)) => to - from,
            (Manifold::Rotation2, Point::Rotation2(to), Point::Rotation2(from)) => {
                DVector::from_element(1, rotation::difference2(to, from))
            }
            (Manifold::Rotation3, Point::Rotation3(to), Point::Rotation3(from)) => {
                rotation::difference3(to, from)
            }
            (Manifold::Product(product), to, from) => product.difference(to, from)?,
            _ => unreachable!("contains accepted a foreign point"),
        })
    }

    /// The origin of a flat manifold, the identity of a rotation manifold, and the tuple of
    /// factor origins of a product manifold.
    pub fn origin(&self) -> Point {
        match self {
            Manifold::Affine(space) => Point::Flat(DVector::zeros(space.dimension)),
            Manifold::Rotation2 => Point::Rotation2(UnitComplex::identity()),
            Manifold::Rotation3 => Point::Rotation3(UnitQuaternion::identity()),
            Manifold::Product(product) => {
                Point::Product(product.factors().iter().map(Manifold::origin).collect())
            }
        }
    }

    /// Whether this manifold is a flat space.
    pub fn is_affine(&self) -> bool {
        matches!(self, Manifold::Affine(_))
    }
}

/// Flat (affine) space of a fixed dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineSpace {
    dimension: usize,
}

impl AffineSpace {
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
