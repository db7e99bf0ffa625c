//! RAII guard that hands an instance back to its recycler on drop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::recycler::Recycler;
use super::SharedRecycler;

/// Instance checked out of a [`SharedRecycler`], released again on drop.
///
/// Only available for recyclers whose callbacks cannot fail, since `Drop`
/// has nowhere to report an error. The guard holds a weak handle: if the
/// recycler is gone by the time the guard drops, the instance is simply
/// dropped too.
pub struct Pooled<T: 'static, A: 'static = ()> {
    obj: Option<T>,
    home: Weak<RefCell<Recycler<T, A>>>,
}

impl<T: 'static, A: 'static> Pooled<T, A> {
    /// Acquire an instance from `recycler` with `args`.
    ///
    /// # Panics
    ///
    /// Panics if the recycler is already mutably borrowed, e.g. when called
    /// from inside one of its own callbacks.
    pub fn acquire(recycler: &SharedRecycler<T, A>, args: A) -> Self {
        let obj = recycler.borrow_mut().obtain(args);
        Self {
            obj: Some(obj),
            home: Rc::downgrade(recycler),
        }
    }

    /// Take the instance, preventing its return to the recycler.
    pub fn take(mut self) -> T {
        match self.obj.take() {
            Some(obj) => obj,
            None => unreachable!("pooled instance already taken"),
        }
    }
}

impl<T: 'static, A: 'static> std::ops::Deref for Pooled<T, A> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match &self.obj {
            Some(obj) => obj,
            None => unreachable!("pooled instance already taken"),
        }
    }
}

impl<T: 'static, A: 'static> std::ops::DerefMut for Pooled<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.obj {
            Some(obj) => obj,
            None => unreachable!("pooled instance already taken"),
        }
    }
}

impl<T: 'static, A: 'static> Drop for Pooled<T, A> {
    fn drop(&mut self) {
        let Some(obj) = self.obj.take() else {
            return;
        };
        let Some(home) = self.home.upgrade() else {
            debug!("recycler dropped before pooled instance");
            return;
        };
        if let Ok(mut recycler) = home.try_borrow_mut() {
            recycler.recycle(obj);
            return;
        }
        warn!("recycler busy, dropping pooled instance instead of recycling");
    }
}
