/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when you don't
/// want to know the steps taken by an algorithm, which lets the algorithm skip building the
/// intermediate snapshots entirely.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);

    /// Returns true if pushed steps are kept. Callers may skip building steps that would be
    /// discarded.
    fn is_collecting(&self) -> bool {
        true
    }
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}

    #[inline]
    fn is_collecting(&self) -> bool {
        false
    }
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}
