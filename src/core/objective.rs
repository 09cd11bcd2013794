use nalgebra::{storage::StorageMut, Dyn, IsContiguous, Vector};

use crate::algo::fista::{self, FistaError};

use super::base::Error;
use super::function::Differentiable;
use super::options::MinimizeOptions;
use super::proximable::Proximable;

/// A composite objective `f(x) + g(x)` built from a smooth term `f` and a
/// proximable term `g`, together with the options selecting the minimization
/// strategy.
///
/// The two terms can be combined in either order (addition is commutative,
/// see [`flipped`](CombinedObjective::flipped)); the smooth term is tracked
/// first either way. The composite is immutable once constructed, except
/// that a solver writes the objective-value history into the options when
/// recording is requested.
#[derive(Debug, Clone)]
pub struct CombinedObjective<D, P>
where
    D: Differentiable,
    P: Proximable<Field = D::Field>,
{
    smooth: D,
    nonsmooth: P,
    options: MinimizeOptions<D::Field>,
}

impl<D, P> CombinedObjective<D, P>
where
    D: Differentiable,
    P: Proximable<Field = D::Field>,
{
    /// Combines a smooth term and a proximable term into a composite
    /// objective with default ([`ExactOptions`](super::options::ExactOptions))
    /// strategy.
    pub fn new(smooth: D, nonsmooth: P) -> Self {
        Self {
            smooth,
            nonsmooth,
            options: MinimizeOptions::default(),
        }
    }

    /// Same as [`new`](CombinedObjective::new) with the terms given in the
    /// opposite order.
    pub fn flipped(nonsmooth: P, smooth: D) -> Self {
        Self::new(smooth, nonsmooth)
    }

    /// Replaces the minimization options.
    pub fn with_options(mut self, options: impl Into<MinimizeOptions<D::Field>>) -> Self {
        self.options = options.into();
        self
    }

    /// The smooth term.
    pub fn smooth(&self) -> &D {
        &self.smooth
    }

    /// The proximable term.
    pub fn nonsmooth(&self) -> &P {
        &self.nonsmooth
    }

    /// The minimization options.
    pub fn options(&self) -> &MinimizeOptions<D::Field> {
        &self.options
    }

    /// Mutable access to the minimization options, e.g. to bind the
    /// Lipschitz constant once the smooth term is known.
    pub fn options_mut(&mut self) -> &mut MinimizeOptions<D::Field> {
        &mut self.options
    }

    /// Minimizes the composite objective, using `x` as the initial estimate
    /// and mutating it in place towards the minimizer.
    ///
    /// The strategy is selected by the options variant carried by the
    /// objective. No analytic implementation exists for generic combined
    /// objectives, so [`ExactOptions`](super::options::ExactOptions) falls
    /// back to [`Error::NotImplemented`].
    pub fn minimize<Sx>(&mut self, x: &mut Vector<D::Field, Dyn, Sx>) -> Result<(), FistaError>
    where
        Sx: StorageMut<D::Field, Dyn> + IsContiguous,
    {
        match &mut self.options {
            MinimizeOptions::Fista(options) => {
                fista::minimize(&self.smooth, &self.nonsmooth, options, x)
            }
            _ => Err(Error::NotImplemented.into()),
        }
    }
}
