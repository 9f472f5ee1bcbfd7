//! Notification decision engine.
//!
//! Matching ([`evaluate`]) decides whether an event is interesting; gating
//! ([`gate`]) decides whether the operator currently wants to be interrupted.
//! The two layers are independent.

pub mod event;
pub mod gating;
pub mod rules;

pub use {
    event::{ChatEvent, NotificationRequest},
    gating::{Suppressed, gate},
    rules::evaluate,
};
