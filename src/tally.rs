use std::cell::RefCell;
use std::rc::Rc;

/// Shared counters of a stream stage.
///
/// A stage hands out a `Tally` before it's consumed and keeps updating it
/// while rows flow, so the caller can read the final numbers once the stream
/// is drained.
#[derive(Debug, Default)]
pub struct Tally<T>(Rc<RefCell<T>>);

impl<T> Tally<T> {
    pub(crate) fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut counters = self.0.borrow_mut();

        f(&mut *counters)
    }
}

impl<T: Clone> Tally<T> {
    /// Copy of the counters as they are right now.
    pub fn snapshot(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Tally<T> {
    fn clone(&self) -> Self {
        Tally(Rc::clone(&self.0))
    }
}
