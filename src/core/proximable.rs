use nalgebra::{
    storage::{Storage, StorageMut},
    Dyn, Vector,
};

use super::base::{Error, Problem};
use super::options::{ExactOptions, MinimizeOptions};

/// The trait for proximable (nonsmooth) terms of a composite objective.
///
/// Every operator has a default body reporting [`Error::NotImplemented`];
/// concrete function types override only the operators they actually support.
/// A projection is the proximal operator of the indicator function of a set,
/// so constraint sets are expressed as implementors of this trait as well.
///
/// ## Defining a proximable term
///
/// ```rust
/// use proxopt::nalgebra as na;
/// use proxopt::{Error, ExactOptions, Problem, Proximable};
/// use na::{storage::Storage, storage::StorageMut, Dyn};
///
/// // g(x) = lambda * || x ||_1
/// struct OneNorm {
///     lambda: f64,
/// }
///
/// impl Problem for OneNorm {
///     type Field = f64;
/// }
///
/// impl Proximable for OneNorm {
///     // The proximal operator of the l1 norm is soft-thresholding.
///     fn prox_exact<Sx, Sout>(
///         &self,
///         _options: &ExactOptions,
///         x: &na::Vector<Self::Field, Dyn, Sx>,
///         step: Self::Field,
///         out: &mut na::Vector<Self::Field, Dyn, Sout>,
///     ) -> Result<(), Error>
///     where
///         Sx: Storage<Self::Field, Dyn>,
///         Sout: StorageMut<Self::Field, Dyn>,
///     {
///         let threshold = step * self.lambda;
///         out.zip_apply(x, |oi, xi| {
///             *oi = xi.signum() * (xi.abs() - threshold).max(0.0);
///         });
///         Ok(())
///     }
/// }
/// ```
pub trait Proximable: Problem {
    /// Evaluate the exact (closed-form) proximal operator of the term at `x`
    /// with the given step size, writing the result into `out`.
    fn prox_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        _x: &Vector<Self::Field, Dyn, Sx>,
        _step: Self::Field,
        _out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        Err(Error::NotImplemented)
    }

    /// Evaluate the exact projection onto the set described by the term,
    /// writing the result into `out`.
    fn proj_exact<Sx, Sout>(
        &self,
        _options: &ExactOptions,
        _x: &Vector<Self::Field, Dyn, Sx>,
        _out: &mut Vector<Self::Field, Dyn, Sout>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sout: StorageMut<Self::Field, Dyn>,
    {
        Err(Error::NotImplemented)
    }

    /// Options governing the proximal sub-problem of this term.
    ///
    /// The proximal step inside an outer solver always dispatches through
    /// these options, not through the options of the outer iteration. The
    /// default requests the exact proximal operator.
    fn prox_options(&self) -> MinimizeOptions<Self::Field> {
        MinimizeOptions::Exact(ExactOptions)
    }
}

/// Apply the proximal operator of `g` at `x` with the given step size,
/// writing the result into `out`.
///
/// The implementation is selected by the options variant. Variants for which
/// `g` supplies no implementation fall back to [`Error::NotImplemented`].
pub fn prox_in_place<P, Sx, Sout>(
    g: &P,
    options: &MinimizeOptions<P::Field>,
    x: &Vector<P::Field, Dyn, Sx>,
    step: P::Field,
    out: &mut Vector<P::Field, Dyn, Sout>,
) -> Result<(), Error>
where
    P: Proximable + ?Sized,
    Sx: Storage<P::Field, Dyn>,
    Sout: StorageMut<P::Field, Dyn>,
{
    match options {
        MinimizeOptions::Exact(exact) => g.prox_exact(exact, x, step, out),
        _ => Err(Error::NotImplemented),
    }
}

/// Project `x` onto the set described by `g`, writing the result into `out`.
///
/// The implementation is selected by the options variant, with the same
/// fallback behavior as [`prox_in_place`].
pub fn proj_in_place<P, Sx, Sout>(
    g: &P,
    options: &MinimizeOptions<P::Field>,
    x: &Vector<P::Field, Dyn, Sx>,
    out: &mut Vector<P::Field, Dyn, Sout>,
) -> Result<(), Error>
where
    P: Proximable + ?Sized,
    Sx: Storage<P::Field, Dyn>,
    Sout: StorageMut<P::Field, Dyn>,
{
    match options {
        MinimizeOptions::Exact(exact) => g.proj_exact(exact, x, out),
        _ => Err(Error::NotImplemented),
    }
}
