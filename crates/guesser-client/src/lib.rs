//! Music Guesser — HTTP session client.
//!
//! Implements [`SessionClient`](guesser_core::client::SessionClient) against
//! the game service's JSON API.

mod dto;
pub mod http;

pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpSessionClient};
