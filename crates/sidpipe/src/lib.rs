//! Helper process for SID tune playback, driven over a binary message
//! protocol on standard input and output.
//!
//! # Crate Structure
//!
//! - [`frame`]: fixed-capacity message buffer and stream transfer
//! - [`proto`]: message identifiers and request/response payloads
//! - [`player`]: dispatch loop, engine interface and client

/// Re-export frame types.
pub mod frame {
    pub use sidpipe_frame::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use sidpipe_proto::*;
}

/// Re-export player types.
pub mod player {
    pub use sidpipe_player::*;
}
