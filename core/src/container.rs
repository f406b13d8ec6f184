//! Host state container seam.
//!
//! The engine never owns the live snapshot. A host supplies a
//! [`StateContainer`] that hands out the current snapshot and accepts a
//! replacement, either literal or computed from the current one. After
//! `replace` returns, `snapshot` must observe the new value.
//!
//! [`LocalContainer`] is the single-threaded implementation used when no
//! reactive runtime is involved (tests, headless hosts, server-side forms).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::state::{FormState, Update};


/// Holds the committed snapshot of one form instance.
pub trait StateContainer {
    /// The latest committed snapshot.
    fn snapshot(&self) -> Rc<FormState>;

    /// Commit a new snapshot. An updater receives the current snapshot.
    fn replace(&self, update: Update<FormState>);
}


/// `RefCell`-backed container with a commit counter.
#[derive(Debug, Default)]
pub struct LocalContainer {
    current: RefCell<Rc<FormState>>,
    revision: Cell<u64>,
}

impl LocalContainer {
    pub fn new(state: FormState) -> Self {
        LocalContainer {
            current: RefCell::new(Rc::new(state)),
            revision: Cell::new(0),
        }
    }

    /// Number of commits so far. Hosts compare it to decide whether to
    /// re-render.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }
}

impl StateContainer for LocalContainer {
    fn snapshot(&self) -> Rc<FormState> {
        Rc::clone(&self.current.borrow())
    }

    fn replace(&self, update: Update<FormState>) {
        // The borrow is released before the updater runs so it may read
        // through this container.
        let current = self.snapshot();
        let next = update.apply(|| Some((*current).clone()));
        *self.current.borrow_mut() = Rc::new(next);
        let revision = self.revision.get() + 1;
        self.revision.set(revision);
        trace!(revision, "snapshot committed");
    }
}
