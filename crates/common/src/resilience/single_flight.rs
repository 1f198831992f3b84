//! Single-flight latch.
//!
//! The first caller of [`SingleFlight::run`] becomes the leader: its future
//! is boxed, made `Shared`, and parked in the slot. Callers arriving while it
//! is still pending clone the shared handle and observe the same output. Once
//! the leader's future completes the slot is cleared and the next call starts
//! a fresh flight.
//!
//! The slot lock is a `parking_lot::Mutex` and is never held across an
//! `.await`.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::trace;

type Flight<T> = Shared<BoxFuture<'static, T>>;

struct Slot<T: Clone> {
    generation: u64,
    flight: Option<Flight<T>>,
}

/// Coalesces concurrent invocations of an async operation.
pub struct SingleFlight<T: Clone> {
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("SingleFlight")
            .field("generation", &slot.generation)
            .field("in_flight", &slot.flight.as_ref().is_some_and(|flight| flight.peek().is_none()))
            .finish()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self { slot: Mutex::new(Slot { generation: 0, flight: None }) }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the in-progress flight, or start one with `start` if none is
    /// pending.
    ///
    /// `start` is only called by the leader, while the slot lock is held, so
    /// it must only construct the future and not do any work itself.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (flight, leader_generation) = {
            let mut slot = self.slot.lock();
            match slot.flight.as_ref() {
                Some(flight) if flight.peek().is_none() => {
                    trace!(generation = slot.generation, "joining in-flight operation");
                    (flight.clone(), None)
                }
                _ => {
                    slot.generation = slot.generation.wrapping_add(1);
                    let flight = start().boxed().shared();
                    slot.flight = Some(flight.clone());
                    trace!(generation = slot.generation, "starting new flight");
                    (flight, Some(slot.generation))
                }
            }
        };

        let output = flight.await;

        if let Some(generation) = leader_generation {
            let mut slot = self.slot.lock();
            if slot.generation == generation {
                slot.flight = None;
            }
        }

        output
    }

    /// Whether a flight is currently pending.
    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().flight.as_ref().is_some_and(|flight| flight.peek().is_none())
    }
}
