//! Bounded admission gate for outbound tile fetches.
//!
//! Every network download passes through a [`FetchGate`] that caps the
//! number of simultaneous requests. The gate is a fixed-capacity counting
//! semaphore with FIFO fairness: waiters are granted permits in strict
//! arrival order, and a freed permit is handed directly to the earliest
//! waiter rather than returned to the pool where a newcomer could race it
//! away.
//!
//! Permits are RAII tokens. Dropping a [`GatePermit`] releases it on every
//! exit path, including early returns and panics within the fetch.
//!
//! There is no cancellation, timeout, or resize: a caller suspended in
//! [`FetchGate::acquire`] stays suspended until a permit is released.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission gate limiting concurrent outbound fetches.
///
/// Capacity is fixed at construction time. `tokio`'s semaphore queues
/// waiters fairly, which gives the strict arrival-order grant the gate
/// promises.
#[derive(Debug)]
pub struct FetchGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
}

impl FetchGate {
    /// Creates a gate admitting at most `capacity` concurrent holders.
    ///
    /// A capacity of zero is legal: every `acquire` suspends forever.
    pub fn new(capacity: usize) -> Self {
        tracing::debug!(capacity, "Created fetch gate");
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Acquires a permit, suspending until one is free.
    ///
    /// Waiters are granted permits in the order they called `acquire`.
    /// The returned [`GatePermit`] releases on drop.
    pub async fn acquire(&self) -> GatePermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("fetch gate semaphore is never closed");

        self.in_flight.fetch_add(1, Ordering::Relaxed);
        GatePermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// The fixed capacity this gate was constructed with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }
}

/// A permit granted by a [`FetchGate`].
///
/// While held, counts against the gate's capacity. Automatically released
/// when dropped.
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
