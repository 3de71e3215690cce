#![forbid(unsafe_code)]

//! Counter limited to a closed range.
//!
//! [`BoundedCounter`] keeps its value in an [`Observable<i32>`] so views and
//! increment/decrement actions can subscribe to it. Actions query
//! [`BoundedCounter::can_increment`] / [`BoundedCounter::can_decrement`] from
//! their subscriber callback to refresh their enabled state.
//!
//! Unlike a raw `Observable::set`, a step that hits a bound is a no-op and
//! does not notify.

use std::fmt;

use crate::reactive::{Observable, SubscriptionHandle};

/// Errors from counter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterError {
    /// `min` was greater than `max`.
    InvertedRange { min: i32, max: i32 },
}

impl fmt::Display for CounterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedRange { min, max } => {
                write!(f, "invalid counter range: min {min} exceeds max {max}")
            }
        }
    }
}

impl std::error::Error for CounterError {}

/// A counter that counts from `min` to `max`.
#[derive(Debug, Clone)]
pub struct BoundedCounter {
    value: Observable<i32>,
    min: i32,
    max: i32,
}

impl BoundedCounter {
    /// Create a counter over `[min, max]`, starting at 0 clamped into range.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvertedRange`] if `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, CounterError> {
        if min > max {
            return Err(CounterError::InvertedRange { min, max });
        }
        Ok(Self {
            value: Observable::new(0_i32.clamp(min, max)),
            min,
            max,
        })
    }

    /// Step up by one. Returns `false` (and does not notify) at the bound.
    pub fn increment(&self) -> bool {
        if !self.can_increment() {
            return false;
        }
        self.value.update(|v| *v += 1);
        true
    }

    /// Step down by one. Returns `false` (and does not notify) at the bound.
    pub fn decrement(&self) -> bool {
        if !self.can_decrement() {
            return false;
        }
        self.value.update(|v| *v -= 1);
        true
    }

    #[must_use]
    pub fn can_increment(&self) -> bool {
        self.value() < self.max
    }

    #[must_use]
    pub fn can_decrement(&self) -> bool {
        self.value() > self.min
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        self.value.get()
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Subscribe to value changes.
    pub fn subscribe(&self, callback: impl Fn(&i32) + 'static) -> SubscriptionHandle {
        self.value.subscribe(callback)
    }

    /// Remove a subscriber. Idempotent.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.value.unsubscribe(handle)
    }

    /// The underlying observable.
    #[must_use]
    pub fn observable(&self) -> &Observable<i32> {
        &self.value
    }
}
