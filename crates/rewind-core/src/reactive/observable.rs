#![forbid(unsafe_code)]

//! Observable value wrapper with synchronous change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every mutation replaces the value, bumps the
//! version and then notifies all current subscribers in registration order.
//! There is no equality check: setting the same value notifies again, so a
//! UI shell can rely on every commit producing a refresh.
//!
//! Subscribers are owned by the observable and addressed by the
//! [`SubscriptionHandle`] returned from [`Observable::subscribe`].
//!
//! # Performance
//!
//! | Operation       | Complexity                 |
//! |-----------------|----------------------------|
//! | `get()`         | O(1) + clone of `T`        |
//! | `set()`         | O(S) where S = subscribers |
//! | `subscribe()`   | O(1) amortized             |
//! | `unsubscribe()` | O(S)                       |
//!
//! # Failure Modes
//!
//! - **Re-entrant update**: the closure passed to [`Observable::update`] runs
//!   while the value is mutably borrowed; calling back into the same
//!   observable from inside it panics (RefCell borrow rules). Subscriber
//!   callbacks run after the borrow is released and may freely call
//!   `get`/`set`/`unsubscribe`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

type Callback<T> = Rc<dyn Fn(&T)>;

/// Identifies one registered subscriber.
///
/// Handles are unique across all observables in the process, so a stale
/// handle can never remove somebody else's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<(SubscriptionHandle, Callback<T>)>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner state:
/// both handles see the same value and share subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each mutation.
/// 2. Each mutation notifies every current subscriber exactly once, after the
///    value has been replaced.
/// 3. Subscribers are notified in registration order.
/// 4. A subscriber removed mid-notification is not called again in that pass.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0 and no subscribers are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, bump the version and notify all subscribers with
    /// the new value. Always notifies, even if the value did not change.
    pub fn set(&self, value: T) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            inner.value.clone()
        };
        self.notify(&snapshot);
    }

    /// Modify the value in place via a closure, then notify like [`set`].
    ///
    /// # Panics
    ///
    /// Panics if `f` touches this observable (the value is mutably borrowed
    /// while `f` runs).
    ///
    /// [`set`]: Observable::set
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
            inner.value.clone()
        };
        self.notify(&snapshot);
    }

    /// Subscribe to value changes. The callback is invoked with a reference
    /// to the new value after every mutation.
    ///
    /// Subscribing the same closure twice yields two independent handles.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionHandle {
        let handle = SubscriptionHandle::next();
        self.inner
            .borrow_mut()
            .subscribers
            .push((handle, Rc::new(callback)));
        handle
    }

    /// Remove a subscriber. Unknown or already removed handles are ignored.
    ///
    /// Returns `true` if a callback was removed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(h, _)| *h != handle);
        inner.subscribers.len() != before
    }

    /// Whether `handle` is currently registered on this observable.
    #[must_use]
    pub fn is_subscribed(&self, handle: SubscriptionHandle) -> bool {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .any(|(h, _)| *h == handle)
    }

    /// Current version number. Increments by 1 on each mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Notify subscribers registered at the start of the pass.
    fn notify(&self, value: &T) {
        // Snapshot so callbacks run outside the borrow.
        let callbacks: Vec<(SubscriptionHandle, Callback<T>)> =
            self.inner.borrow().subscribers.clone();

        for (handle, cb) in &callbacks {
            if self.is_subscribed(*handle) {
                cb(value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
