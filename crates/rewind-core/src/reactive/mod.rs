#![forbid(unsafe_code)]

//! Reactive model values.
//!
//! - [`Observable`]: a shared, version-tracked value wrapper that notifies
//!   subscriber callbacks synchronously after every mutation.
//! - [`SubscriptionHandle`]: explicit handle used to unsubscribe.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! The model owns its subscriber list; subscribers never own the model.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation.
//! 2. Subscribers are notified in registration order, after the value changed.
//! 3. Setting a value equal to the current one still notifies.
//! 4. Unsubscribing is idempotent.

pub mod observable;

pub use observable::{Observable, SubscriptionHandle};
