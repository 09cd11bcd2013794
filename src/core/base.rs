use nalgebra::RealField;
use thiserror::Error;

/// The base trait for [`Differentiable`](super::function::Differentiable) and
/// [`Proximable`](super::proximable::Proximable) terms.
pub trait Problem {
    /// Type of the field, usually f32 or f64.
    type Field: RealField + Copy;
}

/// Error encountered while evaluating a term of the objective.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested operation has no implementation for this combination of
    /// function and options. This is the universal fallback reported by every
    /// operator that a concrete function type did not override.
    #[error("this operation is not implemented for this function")]
    NotImplemented,
    /// An invalid value (NaN, positive or negative infinity) of the function
    /// value or a gradient entry occurred.
    #[error("invalid value encountered")]
    InvalidValue,
    /// A custom error specific to the function.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error>),
}
