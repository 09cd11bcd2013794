//! Fast iterative shrinkage-thresholding algorithm.
//!
//! [FISTA](https://epubs.siam.org/doi/10.1137/080716542) minimizes a
//! composite objective `f(x) + g(x)`, where `f` is smooth with an
//! L-Lipschitz gradient and `g` is proximable, by alternating a gradient
//! step on `f` with the proximal operator of `g`. With Nesterov momentum
//! extrapolation (the default) the method achieves the accelerated `O(1/k²)`
//! convergence rate; without it, it reduces to the plain proximal-gradient
//! iteration. Momentum can optionally be restarted at a fixed interval,
//! which helps on problems where the accelerated sequence starts to ripple.
//!
//! The Lipschitz constant must be known up front; this solver performs no
//! backtracking line search.
//!
//! # References
//!
//! \[1\] [A Fast Iterative Shrinkage-Thresholding Algorithm for Linear
//! Inverse Problems](https://epubs.siam.org/doi/10.1137/080716542)
//!
//! \[2\] [Adaptive Restart for Accelerated Gradient
//! Schemes](https://link.springer.com/article/10.1007/s10208-013-9150-3)

use log::debug;
use nalgebra::{convert, storage::StorageMut, Dyn, IsContiguous, RealField, Vector};
use num_traits::One;
use thiserror::Error;

use crate::core::{prox_in_place, Differentiable, Error, FistaOptions, Proximable};

/// Error returned from the FISTA solver.
#[derive(Debug, Error)]
pub enum FistaError {
    /// The number of iterations is not set in the options. The loop bound is
    /// not optional in this solver; a missing value is a programming error.
    #[error("iteration count is not set")]
    MissingIterationCount,
    /// The Lipschitz constant is not set in the options. It must be bound,
    /// e.g. via [`FistaOptions::with_lipschitz`], before solving.
    #[error("Lipschitz constant is not set")]
    MissingLipschitzConstant,
    /// A term of the objective failed to evaluate.
    #[error(transparent)]
    Function(#[from] Error),
}

/// The Nesterov momentum recurrence `t' = (1 + sqrt(1 + 4t²)) / 2`.
fn next_momentum<F: RealField + Copy>(t: F) -> F {
    let two: F = convert(2.0);
    let four: F = convert(4.0);
    (F::one() + (F::one() + four * t * t).sqrt()) / two
}

/// Minimizes `f(x) + g(x)` with FISTA, using `x` as the initial estimate and
/// mutating it in place towards the minimizer.
///
/// Runs exactly `options.max_iters()` iterations with the fixed step size
/// `1 / options.lipschitz()`; there is no convergence test. When the options
/// request it, the objective value at every iterate is recorded into the
/// options' history buffer and logged at debug level.
///
/// The proximal sub-step dispatches through the options of the proximable
/// term itself ([`Proximable::prox_options`]), not through `options`.
///
/// An evaluation failure in either term aborts the run immediately, leaving
/// `x` at the iterate of the previous iteration.
pub fn minimize<D, P, Sx>(
    f: &D,
    g: &P,
    options: &mut FistaOptions<D::Field>,
    x: &mut Vector<D::Field, Dyn, Sx>,
) -> Result<(), FistaError>
where
    D: Differentiable,
    P: Proximable<Field = D::Field>,
    Sx: StorageMut<D::Field, Dyn> + IsContiguous,
{
    let max_iters = options
        .max_iters()
        .ok_or(FistaError::MissingIterationCount)?;
    let lipschitz = options
        .lipschitz()
        .ok_or(FistaError::MissingLipschitzConstant)?;

    let step = D::Field::one() / lipschitz;
    let restart_every = options.restart_every();
    let verbose = options.verbose();
    let need_value = verbose || options.record_fun_history();

    let prox_options = g.prox_options();

    // Scratch for the gradient, reused as the pre-prox point x - gx / L.
    let mut gx = x.clone_owned();
    // The extrapolation pair (prox result, previous prox result) is only
    // allocated when acceleration is on; otherwise the prox result is
    // written straight into x.
    let mut extrapolation = options
        .nesterov()
        .then(|| (x.clone_owned(), x.clone_owned()));

    let mut t = D::Field::one();
    let mut since_restart = 0usize;

    for iter in 0..max_iters {
        // The function value is only computed when something consumes it.
        if need_value {
            let fx = f.value_grad(x, &mut gx)?;
            if let Some(history) = options.fun_history_mut() {
                history[iter] = fx;
            }
            if verbose {
                debug!("iter = {}\tf(x) = {}", iter, fx);
            }
        } else {
            f.grad(x, &mut gx)?;
        }

        gx.axpy(D::Field::one(), x, -step);

        match extrapolation.as_mut() {
            None => prox_in_place(g, &prox_options, &gx, step, &mut *x)?,
            Some((x_aux, x_prev)) => {
                prox_in_place(g, &prox_options, &gx, step, x_aux)?;

                let t_next = next_momentum(t);
                if iter == 0 {
                    // There is no previous point yet to extrapolate from.
                    x.copy_from(x_aux);
                } else {
                    let beta = (t - D::Field::one()) / t_next;
                    x.zip_zip_apply(x_aux, x_prev, |xi, aux, prev| {
                        *xi = aux + beta * (aux - prev);
                    });
                }

                if restart_every.is_some() {
                    since_restart += 1;
                }
                x_prev.copy_from(x_aux);
                t = t_next;

                if let Some(every) = restart_every {
                    // Only the momentum scalar is restarted; the counter
                    // keeps accumulating.
                    if since_restart >= every {
                        t = D::Field::one();
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::{dvector, DVector};

    use crate::core::{CombinedObjective, MinimizeOptions};
    use crate::testing::{soft_threshold, Linear, OneNorm, Opaque, Quadratic, ZeroFunction};

    fn fista_options(lipschitz: f64, max_iters: usize) -> FistaOptions<f64> {
        let mut options = FistaOptions::new(Some(lipschitz));
        options.set_max_iters(Some(max_iters));
        options
    }

    #[test]
    fn momentum_recurrence() {
        let golden = (1.0 + 5f64.sqrt()) / 2.0;

        let t1 = 1.0;
        let t2 = next_momentum(t1);
        let t3 = next_momentum(t2);

        assert_abs_diff_eq!(t2, golden);
        assert_abs_diff_eq!(t3, (1.0 + (1.0 + 4.0 * golden * golden).sqrt()) / 2.0);
        assert!(t1 < t2 && t2 < t3);
    }

    #[test]
    fn zero_iterations_is_a_no_op() {
        let f = Quadratic::new(dvector![3.0, -2.0]);
        let g = ZeroFunction;

        let x0 = dvector![7.0, 7.0];
        let mut x = x0.clone();
        minimize(&f, &g, &mut fista_options(1.0, 0), &mut x).unwrap();

        assert_eq!(x, x0);
    }

    #[test]
    fn missing_iteration_count() {
        let f = Quadratic::new(dvector![0.0]);
        let mut x = dvector![1.0];

        let mut options = FistaOptions::new(Some(1.0));
        let error = minimize(&f, &ZeroFunction, &mut options, &mut x).unwrap_err();
        assert!(matches!(error, FistaError::MissingIterationCount));
    }

    #[test]
    fn missing_lipschitz_constant() {
        let f = Quadratic::new(dvector![0.0]);
        let mut x = dvector![1.0];

        let mut options = FistaOptions::new(None);
        options.set_max_iters(Some(10));

        let error = minimize(&f, &ZeroFunction, &mut options, &mut x).unwrap_err();
        assert!(matches!(error, FistaError::MissingLipschitzConstant));
    }

    #[test]
    fn unimplemented_prox_is_reported() {
        let f = Quadratic::new(dvector![0.0]);
        let mut x = dvector![1.0];

        let error = minimize(&f, &Opaque, &mut fista_options(1.0, 10), &mut x).unwrap_err();
        assert!(matches!(error, FistaError::Function(Error::NotImplemented)));
    }

    // With acceleration off, each iteration must be exactly the
    // proximal-gradient step x' = prox(x - grad f(x) / L; lambda / L).
    #[test]
    fn plain_proximal_gradient_steps() {
        let y = dvector![4.0, -3.0, 0.5];
        let lambda = 0.5;
        let lipschitz = 2.0;

        let f = Quadratic::new(y.clone());
        let g = OneNorm::new(lambda);

        let mut x = DVector::zeros(3);
        let mut expected = x.clone();

        let mut options = fista_options(lipschitz, 1);
        options.set_nesterov(false);

        for _ in 0..5 {
            // One hand-computed step from the current point.
            let z = &expected - (&expected - &y) / lipschitz;
            expected = z.map(|zi| soft_threshold(zi, lambda / lipschitz));

            minimize(&f, &g, &mut options.clone(), &mut x).unwrap();
            assert_abs_diff_eq!(x, expected, epsilon = 1e-12);
        }
    }

    // On the first accelerated iteration there is no previous point, so the
    // result must coincide with the unaccelerated step.
    #[test]
    fn first_iteration_has_no_extrapolation() {
        let y = dvector![4.0, -3.0, 0.5];
        let f = Quadratic::new(y);
        let g = OneNorm::new(0.5);

        let mut accelerated = dvector![1.0, -1.0, 2.0];
        let mut plain = accelerated.clone();

        minimize(&f, &g, &mut fista_options(2.0, 1), &mut accelerated).unwrap();

        let mut options = fista_options(2.0, 1);
        options.set_nesterov(false);
        minimize(&f, &g, &mut options, &mut plain).unwrap();

        assert_eq!(accelerated, plain);
    }

    // Drive the solver with a constant gradient (linear smooth term) and an
    // identity prox. Each unaccelerated step then subtracts exactly one, and
    // extrapolation contributes beta * (x_aux - x_prev) on top of that, so
    // the iterates expose the momentum coefficient directly.
    fn momentum_trajectory(restart_every: Option<usize>, iters: usize) -> Vec<f64> {
        let f = Linear::new(dvector![1.0]);
        let g = ZeroFunction;

        // Momentum state lives only for the duration of one run, so snapshot
        // iterate n by running a fresh n-iteration prefix.
        (1..=iters)
            .map(|n| {
                let mut options = fista_options(1.0, n);
                options.set_restart_every(restart_every);
                let mut x = dvector![1.0];
                minimize(&f, &g, &mut options, &mut x).unwrap();
                x[0]
            })
            .collect()
    }

    // With restart_every = 3, the fourth iteration must extrapolate with
    // t_old = 1, i.e. not at all: it reduces to the bare gradient step
    // x[3] = x[2] - 1. Without restart the accumulated momentum still
    // contributes.
    #[test]
    fn momentum_restart_forces_t_back_to_one() {
        let free = momentum_trajectory(None, 4);
        let restarted = momentum_trajectory(Some(3), 4);

        // The restart happens at the end of the third iteration, so the
        // first three iterates are identical.
        assert_eq!(free[..3], restarted[..3]);

        assert_abs_diff_eq!(restarted[3], restarted[2] - 1.0, epsilon = 1e-12);
        assert!((free[3] - (free[2] - 1.0)).abs() > 1e-3);
    }

    // The counter of iterations since the last restart is itself never
    // reset, so once it reaches the interval the momentum is forced back to
    // one on every subsequent iteration and the trajectory degenerates to
    // plain gradient steps.
    #[test]
    fn restart_counter_keeps_accumulating() {
        let restarted = momentum_trajectory(Some(3), 6);

        for n in 3..6 {
            assert_abs_diff_eq!(restarted[n], restarted[n - 1] - 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn history_is_filled_with_objective_values() {
        let y = dvector![2.0, -1.0];
        let f = Quadratic::new(y.clone());
        let g = OneNorm::new(0.1);

        let mut options = fista_options(1.0, 5);
        options.set_record_fun_history(true);

        let mut x = DVector::zeros(2);
        minimize(&f, &g, &mut options, &mut x).unwrap();

        let history = options.fun_history().unwrap();
        assert_eq!(history.len(), 5);
        // First entry is the value at the initial estimate x = 0.
        assert_abs_diff_eq!(history[0], y.norm_squared() / 2.0);
        // The objective is monotonically non-increasing on this problem.
        for values in history.windows(2) {
            assert!(values[1] <= values[0] + 1e-12);
        }
    }

    // The calibration problem: the minimizer of 1/2 || x - y ||^2 +
    // lambda || x ||_1 is the soft-thresholding of y by lambda.
    #[test]
    fn lasso_converges_to_soft_threshold() {
        let y = dvector![3.0, -0.2, 0.7, -5.0, 0.05];
        let lambda = 0.5;

        let f = Quadratic::new(y.clone());
        let g = OneNorm::new(lambda);

        let mut x = DVector::zeros(5);
        minimize(&f, &g, &mut fista_options(1.0, 100), &mut x).unwrap();

        let expected = y.map(|yi| soft_threshold(yi, lambda));
        assert_abs_diff_eq!(x, expected, epsilon = 1e-6);
    }

    #[test]
    fn combined_objective_dispatches_to_fista() {
        let y = dvector![1.0, -2.0, 0.3];
        let lambda = 0.25;

        let mut objective = CombinedObjective::new(Quadratic::new(y.clone()), OneNorm::new(lambda))
            .with_options(fista_options(1.0, 100));

        let mut x = DVector::zeros(3);
        objective.minimize(&mut x).unwrap();

        let expected = y.map(|yi| soft_threshold(yi, lambda));
        assert_abs_diff_eq!(x, expected, epsilon = 1e-6);
    }

    #[test]
    fn combined_objective_exact_fallback() {
        let mut objective =
            CombinedObjective::new(Quadratic::new(dvector![1.0]), OneNorm::new(0.1));
        assert!(matches!(
            objective.options(),
            MinimizeOptions::Exact(_)
        ));

        let mut x = dvector![0.0];
        let error = objective.minimize(&mut x).unwrap_err();
        assert!(matches!(error, FistaError::Function(Error::NotImplemented)));
    }
}
