//! Orchestrator domain: lifecycle phases, events and the view-model.

pub mod events;
pub mod phase;
pub mod snapshot;
