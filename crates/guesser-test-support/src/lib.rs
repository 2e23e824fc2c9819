//! Shared test doubles for Music Guesser.

mod clock;
mod device;
mod fixtures;
mod session_client;

pub use clock::ManualClock;
pub use device::FakeAudioDevice;
pub use fixtures::{fixed_now, sample_question, sample_questions};
pub use session_client::{FailingSessionClient, ScriptedSessionClient};
