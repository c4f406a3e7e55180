use crate::expr::Expr;
use crate::step_collector::StepCollector;

/// A single rewrite: the expression it produced, and the id of the rule (or built-in
/// transformation) that produced it.
///
/// [`replace`](super::replace) records the whole expression after each rewrite.
/// [`Engine`](super::Engine) records the sub-expression that was rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub value: Expr,
    pub because: String,
}

impl Step {
    pub fn new(value: Expr, because: impl Into<String>) -> Self {
        Self { value, because: because.into() }
    }
}

/// The ordered steps of a simplification run, along with the reasons the run stopped early, if
/// any.
///
/// Hitting a limit is not an error: the result of the run is the best expression found so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// The steps taken, in order.
    pub steps: Vec<Step>,

    /// A rewrite produced an expression seen earlier in the run, and the run stopped there.
    pub cycle_detected: bool,

    /// The run stopped after the maximum number of iterations.
    pub iteration_limit_reached: bool,

    /// The run stopped at the deadline.
    pub time_limit_reached: bool,

    /// The run was cancelled.
    pub cancelled: bool,
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the run stopped on its own, without hitting any limit.
    pub fn is_complete(&self) -> bool {
        !(self.iteration_limit_reached || self.time_limit_reached || self.cancelled)
    }

    /// Returns the rule ids of the steps, in order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.because.as_str())
    }
}

impl StepCollector<Step> for Trace {
    fn push(&mut self, step: Step) {
        self.steps.push(step);
    }
}
