//! Test doubles for the backend and chat seams

pub mod mock_backend;
pub mod mock_chat;

#[allow(unused_imports)]
pub use mock_backend::{accepted, failed, primary_result, reused, state, transport_error, MockBackend, Reply};
#[allow(unused_imports)]
pub use mock_chat::{ChatCall, RecordingChat};
