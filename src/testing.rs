//! Test terms and utilities useful for debugging and smoke testing.
//!
//! [`Quadratic`] plus [`OneNorm`] is the LASSO-style calibration problem:
//! its minimizer is known in closed form (the soft-thresholding of the data
//! vector), which makes it a convenient first test for any solver built on
//! this crate.

#![allow(unused)]

use nalgebra::{
    storage::{Storage, StorageMut},
    DVector, Dyn, Vector,
};

use crate::core::{Differentiable, Error, ExactOptions, Problem, Proximable};

/// The scalar soft-thresholding operator, the proximal operator of
/// `threshold * |x|`.
pub fn soft_threshold(x: f64, threshold: f64) -> f64 {
    x.signum() * (x.abs() - threshold).max(0.0)
}

/// Quadratic misfit `f(x) = 1/2 || x - y ||²` for a fixed data vector `y`.
///
/// The gradient `x - y` is 1-Lipschitz, so `lipschitz = 1` is exact for this
/// term.
pub struct Quadratic {
    y: DVector<f64>,
}

impl Quadratic {
    /// Initializes the term with the given data vector.
    pub fn new(y: DVector<f64>) -> Self {
        Self { y }
    }
}

impl Problem for Quadratic {
    type Field = f64;
}

impl Differentiable for Quadratic {
    fn value<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
    where
        Sx: Storage<Self::Field, Dyn>,
    {
        Ok((x - &self.y).norm_squared() / 2.0)
    }

    fn grad<Sx, Sgx>(
        &self,
        x: &Vector<Self::Field, Dyn, Sx>,
        gx: &mut Vector<Self::Field, Dyn, Sgx>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sgx: StorageMut<Self::Field, Dyn>,
    {
        gx.copy_from(x);
        *gx -= &self.y;
        Ok(())
    }

    // The residual x - y is shared between the value and the gradient, so
    // compute both in one pass.
    fn value_grad<Sx, Sgx>(
        &self,
        x: &Vector<Self::Field, Dyn, Sx>,
        gx: &mut Vector<Self::Field, Dyn, Sgx>,
    ) -> Result<Self::Field, Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sgx: StorageMut<Self::Field, Dyn>,
    {
        self.grad(x, gx)?;
        Ok(gx.norm_squared() / 2.0)
    }
}

/// Linear term `f(x) = cᵀx` with constant gradient `c`.
///
/// Useful for exposing the momentum schedule of accelerated solvers: with a
/// constant gradient and an identity prox, every deviation from a fixed-size
/// step comes from extrapolation.
pub struct Linear {
    c: DVector<f64>,
}

impl Linear {
    /// Initializes the term with the given gradient vector.
    pub fn new(c: DVector<f64>) -> Self {
        Self { c }
    }
}

impl Problem for Linear {
    type Field = f64;
}

impl Differentiable for Linear {
    fn value<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
    where
        Sx: Storage<Self::Field, Dyn>,
    {
        Ok(self.c.dot(x))
    }

    fn grad<Sx, Sgx>(
        &self,
        x: &Vector<Self::Field, Dyn, Sx>,
        gx: &mut Vector<Self::Field, Dyn, Sgx>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sgx: StorageMut<Self::Field, Dyn>,
    {
        gx.copy_from(&self.c);
        Ok(())
    }
}

/// Scaled l1 norm `g(x) = lambda * || x ||₁` with the soft-thresholding
/// proximal operator.
pub struct OneNorm {
    lambda: f64,
}

impl OneNorm {
    /// Initializes the term with the given scale.
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Problem for OneNorm {
    type Field = f64;
}

impl Proximable for OneNorm {
    fn prox_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        x: &Vector<Self::Field, Dyn, Sx>,
        step: Self::Field,
        out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        let threshold = step * self.lambda;
        out.zip_apply(x, |oi, xi| *oi = soft_threshold(xi, threshold));
        Ok(())
    }
}

/// The zero function `g(x) = 0`, whose proximal operator is the identity and
/// whose "projection" (onto the whole space) is the identity as well.
pub struct ZeroFunction;

impl Problem for ZeroFunction {
    type Field = f64;
}

impl Proximable for ZeroFunction {
    fn prox_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        x: &Vector<Self::Field, Dyn, Sx>,
        _step: Self::Field,
        out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        out.copy_from(x);
        Ok(())
    }

    fn proj_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        x: &Vector<Self::Field, Dyn, Sx>,
        out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        out.copy_from(x);
        Ok(())
    }
}

/// Box constraint set `[lower, upper]ⁿ`, expressed as a proximable term
/// whose proximal operator is the (step-independent) projection onto the
/// box.
pub struct BoxSet {
    lower: f64,
    upper: f64,
}

impl BoxSet {
    /// Initializes the set with the given bounds.
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(lower <= upper, "empty box");
        Self { lower, upper }
    }
}

impl Problem for BoxSet {
    type Field = f64;
}

impl Proximable for BoxSet {
    fn prox_exact<Sx, Sout>(
        &self,
        options: &ExactOptions,
        x: &Vector<Self::Field, Dyn, Sx>,
        _step: Self::Field,
        out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        self.proj_exact(options, x, out)
    }

    fn proj_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        x: &Vector<Self::Field, Dyn, Sx>,
        out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        out.zip_apply(x, |oi, xi| *oi = xi.clamp(self.lower, self.upper));
        Ok(())
    }
}

/// A term that overrides none of the generic operators, for exercising the
/// NotImplemented fallback.
pub struct Opaque;

impl Problem for Opaque {
    type Field = f64;
}

impl Proximable for Opaque {}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::dvector;

    use crate::core::{proj_in_place, prox_in_place, MinimizeOptions};

    #[test]
    fn quadratic_value_grad_matches_separate_calls() {
        let f = Quadratic::new(dvector![1.0, -2.0, 0.5]);
        let x = dvector![0.3, 0.7, -1.1];

        let mut gx = x.clone();
        let fused = f.value_grad(&x, &mut gx).unwrap();

        let mut gx_separate = x.clone();
        f.grad(&x, &mut gx_separate).unwrap();

        assert_abs_diff_eq!(fused, f.value(&x).unwrap());
        assert_eq!(gx, gx_separate);
    }

    #[test]
    fn one_norm_prox_soft_thresholds() {
        let g = OneNorm::new(2.0);
        let x = dvector![3.0, -0.5, 1.0, -4.0];
        let mut out = x.clone();

        prox_in_place(&g, &g.prox_options(), &x, 0.5, &mut out).unwrap();

        assert_eq!(out, dvector![2.0, 0.0, 0.0, -3.0]);
    }

    #[test]
    fn box_set_projects() {
        let g = BoxSet::new(-1.0, 1.0);
        let x = dvector![-3.0, 0.5, 2.0];
        let mut out = x.clone();

        proj_in_place(&g, &g.prox_options(), &x, &mut out).unwrap();

        assert_eq!(out, dvector![-1.0, 0.5, 1.0]);
    }

    #[test]
    fn fallback_reports_not_implemented() {
        let g = Opaque;
        let x = dvector![1.0];
        let mut out = x.clone();

        let error = prox_in_place(&g, &g.prox_options(), &x, 1.0, &mut out).unwrap_err();
        assert!(matches!(error, Error::NotImplemented));
        let error = proj_in_place(&g, &g.prox_options(), &x, &mut out).unwrap_err();
        assert!(matches!(error, Error::NotImplemented));

        // Non-exact step options hit the fallback as well, even for terms
        // that do implement the exact operators.
        let fista = MinimizeOptions::from(crate::core::FistaOptions::<f64>::new(Some(1.0)));
        let g = OneNorm::new(1.0);
        let error = prox_in_place(&g, &fista, &x, 1.0, &mut out).unwrap_err();
        assert!(matches!(error, Error::NotImplemented));
    }
}
