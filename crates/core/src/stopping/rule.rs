/// A leaf stopping condition defined by an algorithm or its caller.
///
/// Rules express accuracy or progress conditions (a small gradient, a stalled
/// cost) that need to look at the problem, the algorithm, or the state.
/// Their bookkeeping is the plain trigger marker, so a rule leaf stops exactly
/// while [`is_met`](StoppingRule::is_met) holds.
///
/// Rules are shared between runs and must not rely on interior mutability to
/// track progress; anything a rule needs should live in the state.
/// Rules must not read the state's criterion state: it is detached while the
/// criterion is evaluated.
pub trait StoppingRule<P, A, S> {
    /// Returns `true` if the run should stop at the current iteration.
    fn is_met(&self, problem: &P, algorithm: &A, state: &S) -> bool;

    /// Returns whether stopping because of this rule means the run converged.
    ///
    /// Defaults to `true`; rules that encode resource limits should override.
    fn indicates_convergence(&self) -> bool {
        true
    }

    /// Returns a single-line label, such as `Gradient Norm (< 1e-6)`.
    fn describe(&self) -> String;
}
