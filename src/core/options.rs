use getset::{CopyGetters, Setters};
use nalgebra::RealField;
use num_traits::Zero;

/// Options selecting the analytic (closed-form) minimization strategy.
///
/// A stateless marker. Concrete closed-form implementations live with the
/// function types themselves; any operator invoked with these options on a
/// type that supplies none falls back to
/// [`Error::NotImplemented`](super::base::Error::NotImplemented).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactOptions;

/// Options for the [FISTA](crate::algo::fista) solver.
///
/// The objective-value history, when requested, is allocated at construction
/// time: the buffer exists if and only if recording is requested while the
/// iteration count is known, and its length always equals the iteration
/// count. Requesting recording without an iteration count is silently a
/// no-op, not an error.
#[derive(Debug, Clone, PartialEq, CopyGetters, Setters)]
pub struct FistaOptions<F: RealField + Copy> {
    /// Lipschitz constant of the gradient of the smooth term. The gradient
    /// step size is its reciprocal. Default: `None` (must be bound via
    /// [`with_lipschitz`](FistaOptions::with_lipschitz) before solving).
    #[getset(get_copy = "pub")]
    lipschitz: Option<F>,
    /// Whether Nesterov momentum extrapolation is applied after each proximal
    /// step. Default: `true`.
    #[getset(get_copy = "pub", set = "pub")]
    nesterov: bool,
    /// Number of accelerated iterations after which the momentum scalar is
    /// forced back to one. Default: `None` (never restart).
    #[getset(get_copy = "pub", set = "pub")]
    restart_every: Option<usize>,
    /// Number of iterations to run. The solver treats a missing value as an
    /// error, not as "iterate forever". Default: `None`.
    #[getset(get_copy = "pub")]
    max_iters: Option<usize>,
    /// Whether the iteration index and objective value are logged on every
    /// iteration. Default: `false`.
    #[getset(get_copy = "pub", set = "pub")]
    verbose: bool,
    /// Whether the objective value at every iterate is recorded into
    /// [`fun_history`](FistaOptions::fun_history). Default: `false`.
    #[getset(get_copy = "pub")]
    record_fun_history: bool,
    #[getset(skip)]
    fun_history: Option<Vec<F>>,
}

impl<F: RealField + Copy> FistaOptions<F> {
    /// Initializes the options with the given Lipschitz constant (pass `None`
    /// to bind it later) and defaults for everything else.
    pub fn new(lipschitz: Option<F>) -> Self {
        Self {
            lipschitz,
            nesterov: true,
            restart_every: None,
            max_iters: None,
            verbose: false,
            record_fun_history: false,
            fun_history: None,
        }
    }

    /// Returns a copy of these options with only the Lipschitz constant
    /// replaced.
    ///
    /// This is how options attached to a combined objective get bound to a
    /// problem-specific constant after construction, without mutating the
    /// original value.
    pub fn with_lipschitz(&self, lipschitz: F) -> Self {
        Self {
            lipschitz: Some(lipschitz),
            ..self.clone()
        }
    }

    /// Sets the number of iterations to run, keeping the history buffer
    /// length in sync when one is allocated.
    pub fn set_max_iters(&mut self, max_iters: Option<usize>) -> &mut Self {
        self.max_iters = max_iters;
        self.sync_history();
        self
    }

    /// Requests (or cancels) recording of the objective value at every
    /// iterate.
    ///
    /// The buffer is only allocated when the iteration count is known;
    /// requesting recording without one is silently a no-op.
    pub fn set_record_fun_history(&mut self, record_fun_history: bool) -> &mut Self {
        self.record_fun_history = record_fun_history;
        self.sync_history();
        self
    }

    /// Objective values recorded during the last run, one entry per
    /// iteration, or `None` when recording is not active.
    pub fn fun_history(&self) -> Option<&[F]> {
        self.fun_history.as_deref()
    }

    pub(crate) fn fun_history_mut(&mut self) -> Option<&mut [F]> {
        self.fun_history.as_deref_mut()
    }

    fn sync_history(&mut self) {
        match (self.record_fun_history, self.max_iters) {
            (true, Some(n)) => match self.fun_history.as_mut() {
                Some(history) => history.resize(n, F::zero()),
                None => self.fun_history = Some(vec![F::zero(); n]),
            },
            _ => self.fun_history = None,
        }
    }
}

impl<F: RealField + Copy> Default for FistaOptions<F> {
    fn default() -> Self {
        Self::new(None)
    }
}

/// The minimization strategy carried by a combined objective.
///
/// Operators dispatch on the variant of this value; the wildcard branch of
/// every dispatch is the
/// [`Error::NotImplemented`](super::base::Error::NotImplemented) fallback.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MinimizeOptions<F: RealField + Copy> {
    /// Use the function's own analytic implementation.
    Exact(ExactOptions),
    /// Run the FISTA solver.
    Fista(FistaOptions<F>),
}

impl<F: RealField + Copy> Default for MinimizeOptions<F> {
    fn default() -> Self {
        MinimizeOptions::Exact(ExactOptions)
    }
}

impl<F: RealField + Copy> From<ExactOptions> for MinimizeOptions<F> {
    fn from(options: ExactOptions) -> Self {
        MinimizeOptions::Exact(options)
    }
}

impl<F: RealField + Copy> From<FistaOptions<F>> for MinimizeOptions<F> {
    fn from(options: FistaOptions<F>) -> Self {
        MinimizeOptions::Fista(options)
    }
}
