/// Receives execution-loop events.
///
/// Observers let callers watch a run without changing its API, for example to
/// log each iterate or record a history. They cannot steer the run: stopping
/// is expressed only through the algorithm's stopping criterion.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer.
pub trait Observer<E> {
    /// Observes a single event.
    fn observe(&mut self, event: &E);
}

/// Blanket implementation for observer closures.
impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

/// A no-op observer.
impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<O: Observer<usize>>(mut observer: O, events: &[usize]) {
        for event in events {
            observer.observe(event);
        }
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        feed(|event: &usize| seen.push(*event), &[1, 2, 3]);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn unit_is_a_no_op_observer() {
        feed((), &[1, 2, 3]);
    }
}
