//! Order fan-out and resilient reservation pipeline.
//!
//! The [`OrderCoordinator`] turns a basket into a persisted order and
//! dispatches two downstream calls in strict sequence: an asynchronous
//! warehouse reservation event published to the broker, then a synchronous
//! delivery-intake call. The [`ReservationWorker`] consumes warehouse
//! events and persists them under a composed retry + escalation policy.
//!
//! There is deliberately no distributed transaction across the order
//! write, the publish, and the delivery call: failures after the order
//! write surface as partial success and are reconciled out of band.

pub mod coordinator;
pub mod error;
pub mod services;
pub mod worker;

pub use coordinator::OrderCoordinator;
pub use error::{CheckoutError, OutboundError, WorkerError};
pub use services::{
    DeliveryIntake, EscalationNotifier, HttpDeliveryIntake, HttpEscalationNotifier,
    InMemoryDeliveryIntake, InMemoryEscalationNotifier,
};
pub use worker::{Disposition, RESERVATIONS_CHANNEL, ReservationWorker, reservation_key};
