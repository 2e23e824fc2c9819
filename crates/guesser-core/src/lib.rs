//! Music Guesser Core — shared domain types.
//!
//! This crate defines the questions, answers and session records that every
//! other crate exchanges, together with the `SessionClient` contract the
//! orchestrator consumes. It contains no I/O.

pub mod answer;
pub mod catalog;
pub mod client;
pub mod clock;
pub mod error;
pub mod question;
pub mod session;
pub mod summary;
