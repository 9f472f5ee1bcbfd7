//! Event handling glue: configuration, policy engine and signed publisher
//! behind one owner.

pub mod monitor;
pub mod sink;

pub use {
    monitor::{HallMonitor, Outcome},
    sink::OperatorSink,
};
