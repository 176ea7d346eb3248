//! Typed payloads for the sidpipe helper protocol.
//!
//! Seven request kinds, each answered by exactly one response kind. Every
//! payload starts with a fixed block of little-endian u32 fields; three
//! responses (load file, read audio, song info) append a variable trailer
//! whose item counts are carried in the fixed block.
//!
//! Both directions are covered: the helper decodes requests and encodes
//! responses, the controlling application does the reverse.

pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod types;
mod wire;

pub use error::{ProtoError, Result};
pub use id::{message_name, MessageId};
pub use request::{
    LoadFileRequest, LoadRomsRequest, MuteChannelsRequest, PlaySongRequest, PlayerConfig,
    ReadAudioRequest, Request, SongInfoRequest, MAX_PATH_LENGTH, PATH_FIELD_SIZE,
};
pub use response::{
    LoadFileResponse, LoadedTune, ReadAudioResponse, SidInfo, SongInfo, SongInfoResponse,
    StatusResponse, write_failure, MAX_SAMPLES,
};
pub use types::{
    C64Model, ClockSpeed, Compatibility, PlaybackMode, SamplingMethod, SidEmulator, SidModel,
    SongSpeed,
};
