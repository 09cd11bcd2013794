#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Proxopt
//!
//! A pure Rust implementation of accelerated proximal-gradient methods for
//! composite convex optimization.
//!
//! This library minimizes objectives of the form *f(x) + g(x)* where *f* is
//! smooth (its gradient can be evaluated) and *g* is proximable (its
//! proximal or projection operator can be evaluated). Such composites cover
//! common problems like the LASSO (quadratic misfit plus l1 regularization)
//! as well as smooth constrained minimization, because a projection is the
//! proximal operator of a constraint set.
//!
//! The solver is [FISTA](algo::fista) with optional Nesterov acceleration
//! and momentum restarts. It is a single-threaded, in-place numerical loop:
//! it mutates one caller-owned iterate buffer and allocates only its own
//! private scratch.
//!
//! ## Terms
//!
//! The two terms of the objective are types implementing [`Differentiable`]
//! and [`Proximable`] (both on top of the base [`Problem`] trait). Every
//! operator of [`Proximable`] has a default body reporting
//! [`Error::NotImplemented`], so a term only overrides what it actually
//! supports and every unsupported combination fails uniformly.
//!
//! ```rust
//! // Proxopt is based on the `nalgebra` crate.
//! use proxopt::nalgebra as na;
//! use proxopt::{Differentiable, Error, ExactOptions, Problem, Proximable};
//! use na::{storage::Storage, storage::StorageMut, DVector, Dyn};
//!
//! // The smooth term: f(x) = 1/2 || x - y ||^2.
//! struct Misfit {
//!     y: DVector<f64>,
//! }
//!
//! impl Problem for Misfit {
//!     // The numeric type. Usually f64 or f32.
//!     type Field = f64;
//! }
//!
//! impl Differentiable for Misfit {
//!     fn value<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
//!     where
//!         Sx: Storage<Self::Field, Dyn>,
//!     {
//!         Ok((x - &self.y).norm_squared() / 2.0)
//!     }
//!
//!     fn grad<Sx, Sgx>(
//!         &self,
//!         x: &na::Vector<Self::Field, Dyn, Sx>,
//!         gx: &mut na::Vector<Self::Field, Dyn, Sgx>,
//!     ) -> Result<(), Error>
//!     where
//!         Sx: Storage<Self::Field, Dyn>,
//!         Sgx: StorageMut<Self::Field, Dyn>,
//!     {
//!         gx.copy_from(x);
//!         *gx -= &self.y;
//!         Ok(())
//!     }
//! }
//!
//! // The proximable term: g(x) = lambda * || x ||_1.
//! struct OneNorm {
//!     lambda: f64,
//! }
//!
//! impl Problem for OneNorm {
//!     type Field = f64;
//! }
//!
//! impl Proximable for OneNorm {
//!     fn prox_exact<Sx, Sout>(
//!         &self,
//!         _options: &ExactOptions,
//!         x: &na::Vector<Self::Field, Dyn, Sx>,
//!         step: Self::Field,
//!         out: &mut na::Vector<Self::Field, Dyn, Sout>,
//!     ) -> Result<(), Error>
//!     where
//!         Sx: Storage<Self::Field, Dyn>,
//!         Sout: StorageMut<Self::Field, Dyn>,
//!     {
//!         let threshold = step * self.lambda;
//!         out.zip_apply(x, |oi, xi| {
//!             *oi = xi.signum() * (xi.abs() - threshold).max(0.0);
//!         });
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Minimizing
//!
//! The terms are combined into a [`CombinedObjective`] carrying the options
//! that select the minimization strategy. The gradient of the misfit above
//! is 1-Lipschitz, so the step size 1/L = 1 is exact.
//!
//! ```rust
//! # use proxopt::nalgebra as na;
//! # use proxopt::{Differentiable, Error, ExactOptions, Problem, Proximable};
//! # use na::{storage::Storage, storage::StorageMut, DVector, Dyn};
//! #
//! # struct Misfit {
//! #     y: DVector<f64>,
//! # }
//! #
//! # impl Problem for Misfit {
//! #     type Field = f64;
//! # }
//! #
//! # impl Differentiable for Misfit {
//! #     fn value<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Result<Self::Field, Error>
//! #     where
//! #         Sx: Storage<Self::Field, Dyn>,
//! #     {
//! #         Ok((x - &self.y).norm_squared() / 2.0)
//! #     }
//! #
//! #     fn grad<Sx, Sgx>(
//! #         &self,
//! #         x: &na::Vector<Self::Field, Dyn, Sx>,
//! #         gx: &mut na::Vector<Self::Field, Dyn, Sgx>,
//! #     ) -> Result<(), Error>
//! #     where
//! #         Sx: Storage<Self::Field, Dyn>,
//! #         Sgx: StorageMut<Self::Field, Dyn>,
//! #     {
//! #         gx.copy_from(x);
//! #         *gx -= &self.y;
//! #         Ok(())
//! #     }
//! # }
//! #
//! # struct OneNorm {
//! #     lambda: f64,
//! # }
//! #
//! # impl Problem for OneNorm {
//! #     type Field = f64;
//! # }
//! #
//! # impl Proximable for OneNorm {
//! #     fn prox_exact<Sx, Sout>(
//! #         &self,
//! #         _options: &ExactOptions,
//! #         x: &na::Vector<Self::Field, Dyn, Sx>,
//! #         step: Self::Field,
//! #         out: &mut na::Vector<Self::Field, Dyn, Sout>,
//! #     ) -> Result<(), Error>
//! #     where
//! #         Sx: Storage<Self::Field, Dyn>,
//! #         Sout: StorageMut<Self::Field, Dyn>,
//! #     {
//! #         let threshold = step * self.lambda;
//! #         out.zip_apply(x, |oi, xi| {
//! #             *oi = xi.signum() * (xi.abs() - threshold).max(0.0);
//! #         });
//! #         Ok(())
//! #     }
//! # }
//! use proxopt::{CombinedObjective, FistaOptions};
//!
//! let y = na::dvector![3.0, -0.2, 0.7];
//! let lambda = 0.5;
//!
//! let mut options = FistaOptions::new(Some(1.0));
//! options.set_max_iters(Some(100)).set_record_fun_history(true);
//!
//! let mut objective = CombinedObjective::new(Misfit { y: y.clone() }, OneNorm { lambda })
//!     .with_options(options);
//!
//! let mut x = DVector::zeros(3);
//! objective.minimize(&mut x).expect("minimization failed");
//!
//! // The minimizer is the soft-thresholding of y by lambda.
//! assert!((x[0] - 2.5).abs() < 1e-6);
//! assert!(x[1].abs() < 1e-6);
//! assert!((x[2] - 0.2).abs() < 1e-6);
//!
//! // The objective values recorded during the run stay readable.
//! # let proxopt::MinimizeOptions::Fista(options) = objective.options() else {
//! #     unreachable!()
//! # };
//! assert_eq!(options.fun_history().map(|h| h.len()), Some(100));
//! ```

pub mod algo;
mod core;

pub use core::*;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
