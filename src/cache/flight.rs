//! Singleflight Coordinator Module
//!
//! Collapses concurrent populations of the same key into one factory
//! execution. The first caller for an absent key becomes the leader and
//! registers a watch channel; everyone else arriving before completion gets a
//! receiver clone and suspends on it. Completion removes the marker first and
//! then broadcasts, so every waiter observes the identical outcome and a
//! late arrival starts a fresh flight.
//!
//! The map lock is held only to register or remove a marker; populations for
//! distinct keys never block each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::error::{CacheError, Result};

/// Broadcast slot for one population: `None` until the flight completes.
pub type FlightOutcome<V> = Option<Result<V>>;

// == Flight Ticket ==
/// Role handed to a caller entering a flight for a key.
pub enum FlightTicket<V> {
    /// This caller must run the population and broadcast the outcome.
    Leader {
        /// Broadcast side, to be passed to [`FlightGroup::finish`]
        tx: watch::Sender<FlightOutcome<V>>,
        /// The leader waits on the channel like everyone else
        rx: watch::Receiver<FlightOutcome<V>>,
    },
    /// A population is already in flight; await its outcome.
    Waiter(watch::Receiver<FlightOutcome<V>>),
}

// == Flight Group ==
/// Per-key in-flight population markers.
#[derive(Debug)]
pub struct FlightGroup<V> {
    /// Live flights by key; presence means a population is in progress
    flights: Arc<Mutex<HashMap<String, watch::Receiver<FlightOutcome<V>>>>>,
}

impl<V> Clone for FlightGroup<V> {
    fn clone(&self) -> Self {
        Self {
            flights: Arc::clone(&self.flights),
        }
    }
}

impl<V> Default for FlightGroup<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FlightGroup<V> {
    // == Constructor ==
    /// Creates a group with no flights in progress.
    pub fn new() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // == In Flight ==
    /// Returns the number of populations currently in progress.
    pub async fn in_flight(&self) -> usize {
        self.flights.lock().await.len()
    }
}

impl<V: Clone> FlightGroup<V> {
    // == Begin ==
    /// Joins the flight for a key, or atomically registers a new one.
    ///
    /// A marker whose sender is gone without an outcome belongs to a leader
    /// that was cancelled before it could finish; such an abandoned flight is
    /// replaced, so the key is never permanently stuck.
    pub async fn begin(&self, key: &str) -> FlightTicket<V> {
        let mut flights = self.flights.lock().await;

        if let Some(rx) = flights.get(key) {
            if rx.has_changed().is_ok() {
                return FlightTicket::Waiter(rx.clone());
            }
        }

        let (tx, rx) = watch::channel(None);
        flights.insert(key.to_string(), rx.clone());
        FlightTicket::Leader { tx, rx }
    }

    // == Finish ==
    /// Completes a flight: removes the marker, then releases every waiter
    /// with the outcome.
    ///
    /// The marker must be gone before the broadcast so that a caller arriving
    /// after the outcome starts a fresh flight instead of observing a stale
    /// one.
    pub async fn finish(&self, key: &str, tx: watch::Sender<FlightOutcome<V>>, outcome: Result<V>) {
        self.flights.lock().await.remove(key);
        // Waiters may all have gone away; that is fine
        let _ = tx.send(Some(outcome));
    }

    // == Wait ==
    /// Suspends until the flight delivers its outcome.
    ///
    /// A channel that closes without an outcome means the population was
    /// abandoned; the caller gets `WaitCancelled` and may simply retry.
    pub async fn wait(&self, key: &str, mut rx: watch::Receiver<FlightOutcome<V>>) -> Result<V> {
        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                return Err(CacheError::WaitCancelled(key.to_string()));
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_caller_leads() {
        let group: FlightGroup<String> = FlightGroup::new();

        let ticket = group.begin("key").await;
        assert!(matches!(ticket, FlightTicket::Leader { .. }));
        assert_eq!(group.in_flight().await, 1);
    }

    #[tokio::test]
    async fn test_second_caller_waits() {
        let group: FlightGroup<String> = FlightGroup::new();

        let _leader = group.begin("key").await;
        let ticket = group.begin("key").await;

        assert!(matches!(ticket, FlightTicket::Waiter(_)));
        assert_eq!(group.in_flight().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_flights() {
        let group: FlightGroup<String> = FlightGroup::new();

        assert!(matches!(
            group.begin("a").await,
            FlightTicket::Leader { .. }
        ));
        assert!(matches!(
            group.begin("b").await,
            FlightTicket::Leader { .. }
        ));
        assert_eq!(group.in_flight().await, 2);
    }

    #[tokio::test]
    async fn test_finish_releases_waiter_with_value() {
        let group: FlightGroup<String> = FlightGroup::new();

        let (tx, _leader_rx) = match group.begin("key").await {
            FlightTicket::Leader { tx, rx } => (tx, rx),
            FlightTicket::Waiter(_) => panic!("expected leader"),
        };
        let waiter_rx = match group.begin("key").await {
            FlightTicket::Waiter(rx) => rx,
            FlightTicket::Leader { .. } => panic!("expected waiter"),
        };

        let waiter = {
            let group = group.clone();
            tokio::spawn(async move { group.wait("key", waiter_rx).await })
        };

        group.finish("key", tx, Ok("value".to_string())).await;

        let outcome = waiter.await.unwrap();
        assert_eq!(outcome.unwrap(), "value");
        assert_eq!(group.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_finish_fans_out_same_error() {
        let group: FlightGroup<String> = FlightGroup::new();

        let tx = match group.begin("key").await {
            FlightTicket::Leader { tx, .. } => tx,
            FlightTicket::Waiter(_) => panic!("expected leader"),
        };

        let mut waiters = Vec::new();
        for _ in 0..3 {
            let rx = match group.begin("key").await {
                FlightTicket::Waiter(rx) => rx,
                FlightTicket::Leader { .. } => panic!("expected waiter"),
            };
            let group = group.clone();
            waiters.push(tokio::spawn(
                async move { group.wait("key", rx).await },
            ));
        }

        let err = CacheError::factory("key", anyhow::anyhow!("backend down"));
        group.finish("key", tx, Err(err)).await;

        for waiter in waiters {
            let outcome = waiter.await.unwrap();
            assert!(matches!(outcome, Err(CacheError::Factory { .. })));
        }
    }

    #[tokio::test]
    async fn test_outcome_available_to_receiver_obtained_before_finish() {
        let group: FlightGroup<String> = FlightGroup::new();

        let (tx, rx) = match group.begin("key").await {
            FlightTicket::Leader { tx, rx } => (tx, rx),
            FlightTicket::Waiter(_) => panic!("expected leader"),
        };

        // Finish before anyone waits; the outcome must still be observable
        group.finish("key", tx, Ok("value".to_string())).await;

        let outcome = group.wait("key", rx).await;
        assert_eq!(outcome.unwrap(), "value");
    }

    #[tokio::test]
    async fn test_dropped_sender_without_outcome_is_cancelled_wait() {
        let group: FlightGroup<String> = FlightGroup::new();

        let rx = match group.begin("key").await {
            FlightTicket::Leader { tx, rx } => {
                drop(tx);
                rx
            }
            FlightTicket::Waiter(_) => panic!("expected leader"),
        };

        let outcome = group.wait("key", rx).await;
        assert!(matches!(outcome, Err(CacheError::WaitCancelled(_))));
    }

    #[tokio::test]
    async fn test_abandoned_flight_is_replaced_by_new_leader() {
        let group: FlightGroup<String> = FlightGroup::new();

        // A cancelled leader drops its sender without ever finishing
        match group.begin("key").await {
            FlightTicket::Leader { tx, rx } => {
                drop(tx);
                drop(rx);
            }
            FlightTicket::Waiter(_) => panic!("expected leader"),
        }
        assert_eq!(group.in_flight().await, 1);

        // The stale marker must not trap later callers as waiters
        let tx = match group.begin("key").await {
            FlightTicket::Leader { tx, .. } => tx,
            FlightTicket::Waiter(_) => panic!("stale marker should be replaced"),
        };
        group.finish("key", tx, Ok("value".to_string())).await;
        assert_eq!(group.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_key_is_free_again_after_finish() {
        let group: FlightGroup<String> = FlightGroup::new();

        let tx = match group.begin("key").await {
            FlightTicket::Leader { tx, .. } => tx,
            FlightTicket::Waiter(_) => panic!("expected leader"),
        };
        group.finish("key", tx, Ok("v1".to_string())).await;

        // A new flight for the same key starts from scratch
        assert!(matches!(
            group.begin("key").await,
            FlightTicket::Leader { .. }
        ));
    }
}
