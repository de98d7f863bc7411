//! Rotation-group translate/difference via the group exponential and logarithm.
//!
//! `translate(p, v) = p ∘ exp(v)` and `difference(to, from) = log(from⁻¹ ∘ to)`, realised on
//! nalgebra's unit-complex and unit-quaternion rotation types. The SO(3) logarithm returns the
//! scaled rotation axis, so `difference` lands in the principal branch with angle in `[0, π]`.

use nalgebra::{DVector, UnitComplex, UnitQuaternion, Vector3};

pub(crate) fn translate2(p: &UnitComplex<f64>, angle: f64) -> UnitComplex<f64> {
    p * UnitComplex::new(angle)
}

pub(crate) fn difference2(to: &UnitComplex<f64>, from: &UnitComplex<f64>) -> f64 {
    (from.inverse() * to).angle()
}

pub(crate) fn translate3(p: &UnitQuaternion<f64>, tangent: &DVector<f64>) -> UnitQuaternion<f64> {
    let axis = Vector3::new(tangent[0], tangent[1], tangent[2]);
    p * UnitQuaternion::from_scaled_axis(axis)
}

pub(crate) fn difference3(to: &UnitQuaternion<f64>, from: &UnitQuaternion<f64>) -> DVector<f64> {
    let axis = (from.inverse() * to).scaled_axis();
    DVector::from_column_slice(axis.as_slice())
}
