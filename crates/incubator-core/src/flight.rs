//! Keyed single-flight coordination.
//!
//! The first caller to [`SingleFlight::join`] a key becomes the leader and
//! receives a [`FlightSlot`]; everyone who joins the same key before the
//! leader finishes receives a [`FlightTicket`] and waits for the leader's
//! value. Keys are independent: flights for different keys never block each
//! other, and the map is sharded so there is no global lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;

struct Flight<T> {
    id: u64,
    rx: watch::Receiver<Option<T>>,
}

/// Registry of in-flight work keyed by string.
pub struct SingleFlight<T> {
    flights: Arc<DashMap<String, Flight<T>>>,
    next_id: AtomicU64,
}

/// Outcome of joining a key.
pub enum Join<T> {
    /// No flight was running; the caller must do the work and complete the slot.
    Leader(FlightSlot<T>),
    /// A flight was already running; wait on the ticket for its value.
    Follower(FlightTicket<T>),
}

impl<T> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Atomically join the flight for `key`, starting one if none is running.
    pub fn join(&self, key: &str) -> Join<T> {
        match self.flights.entry(key.to_string()) {
            Entry::Occupied(entry) => Join::Follower(FlightTicket {
                rx: entry.get().rx.clone(),
            }),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = watch::channel(None);
                entry.insert(Flight { id, rx });
                Join::Leader(FlightSlot {
                    key: key.to_string(),
                    id,
                    tx,
                    flights: Arc::clone(&self.flights),
                })
            }
        }
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.flights.contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.flights.len()
    }
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Leadership of one flight. Dropping the slot ends the flight; if it is
/// dropped without [`FlightSlot::complete`], waiters observe `None`.
pub struct FlightSlot<T> {
    key: String,
    id: u64,
    tx: watch::Sender<Option<T>>,
    flights: Arc<DashMap<String, Flight<T>>>,
}

impl<T> FlightSlot<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// A ticket on this slot's own flight, for a leader that hands the work
    /// to a spawned task and waits like everyone else.
    pub fn ticket(&self) -> FlightTicket<T> {
        FlightTicket {
            rx: self.tx.subscribe(),
        }
    }

    /// End the flight and publish the result to every waiter.
    ///
    /// The key is released before the value is visible, so a join made
    /// after any waiter returns always starts a new flight.
    pub fn complete(self, value: T) {
        self.release();
        self.tx.send_replace(Some(value));
    }

    fn release(&self) {
        // Only remove our own flight; a newer one may already own the key.
        let id = self.id;
        self.flights.remove_if(&self.key, |_, flight| flight.id == id);
    }
}

impl<T> Drop for FlightSlot<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A claim on the result of someone else's flight.
pub struct FlightTicket<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> FlightTicket<T> {
    /// Wait for the flight's value. `None` means the leader went away without
    /// completing.
    pub async fn wait(mut self) -> Option<T> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        }
    }
}
