/// Watches an iterative solver and may steer it.
///
/// A solver calls [`Observer::observe`] once per iteration with an event
/// describing the step it just took. Returning `Some(action)` asks the solver
/// to act on it (each solver defines its own action type). Returning `None`
/// lets the iteration continue.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is an
/// observer that never acts.
pub trait Observer<E, A> {
    /// Inspects one solver event.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
