//! Outbound service contracts: delivery intake and escalation endpoint.

pub mod delivery;
pub mod escalation;

pub use delivery::{DeliveryIntake, HttpDeliveryIntake, InMemoryDeliveryIntake};
pub use escalation::{EscalationNotifier, HttpEscalationNotifier, InMemoryEscalationNotifier};
