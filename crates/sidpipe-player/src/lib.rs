//! Helper-side request dispatch for the sidpipe protocol.
//!
//! A [`Dispatcher`] owns one request and one response [`Message`] and an
//! [`Engine`]. It receives a request, performs the single engine operation
//! the request names, answers with exactly one response and waits for the
//! next request. The controlling application talks to it through a
//! [`Client`].
//!
//! [`Message`]: sidpipe_frame::Message

pub mod client;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod psid;
pub mod rom;

pub use client::Client;
pub use dispatch::{Dispatcher, State, CHANNEL_COUNT, VOICES_PER_SID};
pub use engine::{Engine, EngineError, Roms};
pub use error::{ClientError, DispatchError};
pub use psid::{PsidEngine, PsidTune, TuneFormatError, TuneKind};
