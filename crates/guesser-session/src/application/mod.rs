//! Orchestration of the question lifecycle.

mod gate;
pub mod orchestrator;
mod state;
