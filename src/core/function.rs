use nalgebra::{
    storage::{Storage, StorageMut},
    Dyn, Vector,
};

use super::base::{Error, Problem};

/// The trait for smooth terms of a composite objective.
///
/// ## Defining a smooth term
///
/// A smooth term is any type that implements [`Differentiable`] and
/// [`Problem`] traits. There is one required associated type (field) and
/// two required methods: [`value`](Differentiable::value) and
/// [`grad`](Differentiable::grad).
///
/// ```rust
/// use proxopt::nalgebra as na;
/// use proxopt::{Differentiable, Error, Problem};
/// use na::{storage::Storage, storage::StorageMut, DVector, Dyn};
///
/// // A term is represented by a type.
/// struct Misfit {
///     y: DVector<f64>,
/// }
///
/// impl Problem for Misfit {
///     // The numeric type. Usually f64 or f32.
///     type Field = f64;
/// }
///
/// impl Differentiable for Misfit {
///     // f(x) = 1/2 || x - y ||^2
///     fn value<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
///     where
///         Sx: Storage<Self::Field, Dyn>,
///     {
///         Ok((x - &self.y).norm_squared() / 2.0)
///     }
///
///     // grad f(x) = x - y, written into a caller-supplied buffer.
///     fn grad<Sx, Sgx>(
///         &self,
///         x: &na::Vector<Self::Field, Dyn, Sx>,
///         gx: &mut na::Vector<Self::Field, Dyn, Sgx>,
///     ) -> Result<(), Error>
///     where
///         Sx: Storage<Self::Field, Dyn>,
///         Sgx: StorageMut<Self::Field, Dyn>,
///     {
///         gx.copy_from(x);
///         *gx -= &self.y;
///         Ok(())
///     }
/// }
/// ```
pub trait Differentiable: Problem {
    /// Calculate the function value given values of the variables.
    fn value<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
    where
        Sx: Storage<Self::Field, Dyn>;

    /// Calculate the gradient given values of the variables, writing it into
    /// `gx`.
    fn grad<Sx, Sgx>(
        &self,
        x: &Vector<Self::Field, Dyn, Sx>,
        gx: &mut Vector<Self::Field, Dyn, Sgx>,
    ) -> Result<(), Error>
    where
        Sx: Storage<Self::Field, Dyn>,
        Sgx: StorageMut<Self::Field, Dyn>;

    /// Calculate the gradient, writing it into `gx`, and return the function
    /// value at the same point.
    ///
    /// The solvers prefer calling this method when they need both quantities
    /// because implementations that share work between the value and the
    /// gradient can override it to do a single pass. The default does two.
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
        self.value(x)
    }
}
