//! Core abstractions and types for proxopt.
//!
//! *Users* are mainly interested in implementing the [`Differentiable`] and
//! [`Proximable`] traits for their terms and combining them into a
//! [`CombinedObjective`].
//!
//! Algorithm *developers* are interested in the options types and the
//! generic operators [`prox_in_place`] and [`proj_in_place`].

mod base;
mod function;
mod objective;
mod options;
mod proximable;

pub use base::*;
pub use function::*;
pub use objective::*;
pub use options::*;
pub use proximable::*;
