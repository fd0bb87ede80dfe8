//! Reservation worker: consumes warehouse events and persists them under
//! the retry + escalation policy.

use broker::Subscription;
use common::OrderId;
use domain::WarehouseReservationEvent;
use resilience::{Completion, RetryWithFallback};
use stores::WarehouseStore;

use crate::error::WorkerError;
use crate::services::EscalationNotifier;

/// Broker channel the reservation events travel on.
pub const RESERVATIONS_CHANNEL: &str = "warehouse-reservations";

/// Returns the warehouse key for an order's reservation record.
///
/// The key is deterministic from the order id, so repeated writes for the
/// same order are idempotent overwrites. That is what makes at-least-once
/// delivery safe.
pub fn reservation_key(order_id: OrderId) -> String {
    format!("Order - {order_id}.json")
}

/// Terminal outcome of one successfully handled event.
///
/// Both variants acknowledge the message from the broker's point of view;
/// a fatal failure is reported as an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The reservation record was written to the warehouse store.
    Persisted,
    /// Persistence was exhausted and the escalation endpoint was notified.
    Escalated,
}

/// Consumes one warehouse reservation event at a time.
///
/// The primary action writes the serialized event to the warehouse store;
/// on exhaustion the escalation endpoint is notified with the order id
/// only. Duplicate deliveries for the same order are tolerated through the
/// idempotent record key, not through locking.
#[derive(Debug, Clone)]
pub struct ReservationWorker<W, N>
where
    W: WarehouseStore,
    N: EscalationNotifier,
{
    warehouse: W,
    escalation: N,
    policy: RetryWithFallback,
}

impl<W, N> ReservationWorker<W, N>
where
    W: WarehouseStore,
    N: EscalationNotifier,
{
    /// Creates a worker with the default policy (3 total attempts,
    /// immediate retry).
    pub fn new(warehouse: W, escalation: N) -> Self {
        Self {
            warehouse,
            escalation,
            policy: RetryWithFallback::default(),
        }
    }

    /// Creates a worker with a custom policy.
    pub fn with_policy(warehouse: W, escalation: N, policy: RetryWithFallback) -> Self {
        Self {
            warehouse,
            escalation,
            policy,
        }
    }

    /// Handles one inbound event.
    #[tracing::instrument(skip(self, event), fields(order_id = %event.order_id))]
    pub async fn handle(
        &self,
        event: &WarehouseReservationEvent,
    ) -> Result<Disposition, WorkerError> {
        let order_id = event.order_id;
        let key = reservation_key(order_id);
        let bytes = serde_json::to_vec(event)
            .map_err(|source| WorkerError::Serialization { order_id, source })?;

        let warehouse = &self.warehouse;
        let escalation = &self.escalation;
        let key_ref = key.as_str();
        let bytes_ref = &bytes;

        let outcome = self
            .policy
            .execute(
                || async move {
                    warehouse.ensure_container_exists().await?;
                    warehouse.put(key_ref, bytes_ref.clone()).await?;
                    Ok::<(), WorkerError>(())
                },
                || async move {
                    escalation
                        .notify(order_id)
                        .await
                        .map_err(WorkerError::Escalation)
                },
            )
            .await;

        match outcome {
            Ok(Completion::Primary { attempts, .. }) => {
                metrics::counter!("reservations_persisted_total").increment(1);
                tracing::info!(%order_id, attempts, key = %key, "reservation persisted");
                Ok(Disposition::Persisted)
            }
            Ok(Completion::Fallback) => {
                metrics::counter!("reservations_escalated_total").increment(1);
                tracing::warn!(%order_id, "reservation persistence exhausted, escalation notified");
                Ok(Disposition::Escalated)
            }
            Err(err) => {
                metrics::counter!("reservations_fatal_total").increment(1);
                tracing::error!(%order_id, error = %err, "reservation and escalation both failed");
                Err(WorkerError::Fatal {
                    order_id,
                    persist: err.primary.to_string(),
                    escalation: err.fallback.to_string(),
                })
            }
        }
    }
}

/// Drains a broker subscription, handling each delivery on its own task.
///
/// Worker invocations for different orders run concurrently. A fatal
/// failure is logged and the message is left to broker-level dead-letter
/// or redelivery policy; malformed payloads are logged and dropped.
pub async fn run<W, N>(mut subscription: Subscription, worker: ReservationWorker<W, N>)
where
    W: WarehouseStore + Clone + 'static,
    N: EscalationNotifier + Clone + 'static,
{
    while let Some(delivery) = subscription.recv().await {
        let worker = worker.clone();
        tokio::spawn(async move {
            let event: WarehouseReservationEvent = match serde_json::from_slice(&delivery.body) {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(
                        message_id = %delivery.message_id,
                        error = %e,
                        "dropping malformed reservation event"
                    );
                    return;
                }
            };

            if let Err(e) = worker.handle(&event).await {
                tracing::error!(
                    message_id = %delivery.message_id,
                    error = %e,
                    "reservation invocation failed, leaving message to redelivery policy"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CatalogItemId;
    use domain::ReservedItem;
    use stores::InMemoryWarehouseStore;

    use crate::services::InMemoryEscalationNotifier;

    fn event(order_id: i64) -> WarehouseReservationEvent {
        WarehouseReservationEvent {
            order_id: OrderId::new(order_id),
            items: vec![ReservedItem {
                id: CatalogItemId::new(7),
                name: "Widget".to_string(),
                units: 2,
            }],
        }
    }

    fn setup() -> (
        ReservationWorker<InMemoryWarehouseStore, InMemoryEscalationNotifier>,
        InMemoryWarehouseStore,
        InMemoryEscalationNotifier,
    ) {
        let warehouse = InMemoryWarehouseStore::new();
        let escalation = InMemoryEscalationNotifier::new();
        let worker = ReservationWorker::new(warehouse.clone(), escalation.clone());
        (worker, warehouse, escalation)
    }

    #[tokio::test]
    async fn persists_event_under_order_key() {
        let (worker, warehouse, escalation) = setup();
        let event = event(42);

        let disposition = worker.handle(&event).await.unwrap();

        assert_eq!(disposition, Disposition::Persisted);
        assert!(warehouse.container_created());
        let stored = warehouse.get("Order - 42.json").unwrap();
        let expected = serde_json::to_vec(&event).unwrap();
        assert_eq!(stored, expected);
        assert_eq!(escalation.notified_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_delivery_is_idempotent() {
        let (worker, warehouse, _) = setup();
        let event = event(42);

        worker.handle(&event).await.unwrap();
        let first = warehouse.get("Order - 42.json").unwrap();

        worker.handle(&event).await.unwrap();
        let second = warehouse.get("Order - 42.json").unwrap();

        assert_eq!(warehouse.record_count(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let (worker, warehouse, escalation) = setup();
        warehouse.set_fail_next_puts(2);

        let disposition = worker.handle(&event(7)).await.unwrap();

        assert_eq!(disposition, Disposition::Persisted);
        assert_eq!(warehouse.put_count(), 3);
        assert_eq!(warehouse.record_count(), 1);
        assert_eq!(escalation.notified_count(), 0);
    }

    #[tokio::test]
    async fn exhaustion_escalates_with_order_id_only() {
        let (worker, warehouse, escalation) = setup();
        warehouse.set_fail_next_puts(3);

        let disposition = worker.handle(&event(7)).await.unwrap();

        assert_eq!(disposition, Disposition::Escalated);
        assert_eq!(warehouse.put_count(), 3);
        assert_eq!(warehouse.record_count(), 0);
        assert_eq!(escalation.notified(), vec![OrderId::new(7)]);
    }

    #[tokio::test]
    async fn escalation_failure_is_fatal() {
        let (worker, warehouse, escalation) = setup();
        warehouse.set_fail_next_puts(3);
        escalation.set_fail_on_notify(true);

        let result = worker.handle(&event(7)).await;

        match result {
            Err(WorkerError::Fatal { order_id, .. }) => {
                assert_eq!(order_id, OrderId::new(7));
            }
            other => panic!("expected fatal error, got {other:?}"),
        }
        assert_eq!(warehouse.record_count(), 0);
    }

    #[tokio::test]
    async fn distinct_orders_get_distinct_keys() {
        let (worker, warehouse, _) = setup();

        worker.handle(&event(1)).await.unwrap();
        worker.handle(&event(2)).await.unwrap();

        assert_eq!(warehouse.record_count(), 2);
        assert!(warehouse.get("Order - 1.json").is_some());
        assert!(warehouse.get("Order - 2.json").is_some());
    }
}
