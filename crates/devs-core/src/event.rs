//! Immutable, shared message payloads.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One value travelling through the coupling graph.
///
/// An `Event` is a reference-counted handle: cloning it never copies the
/// payload, so a broadcast coupling can put the same event in many ports.
/// Payloads are never mutated after creation.
#[derive(Clone)]
pub struct Event(Arc<dyn Any + Send + Sync>);

impl Event {
    /// Wrap a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Event(Arc::new(value))
    }

    /// An event carrying `()`, for pure signals.
    pub fn unit() -> Self {
        Event::new(())
    }

    /// Borrow the payload as `T`, or `None` if it holds another type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// `true` if the payload is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// `true` if both handles point at the same payload allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Event) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this payload.
    #[inline]
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({:p})", Arc::as_ptr(&self.0))
    }
}
