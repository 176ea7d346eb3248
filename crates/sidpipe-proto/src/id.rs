//! Message identifiers.
//!
//! Requests carry odd identifiers; each response is its request's
//! identifier plus one.

use std::fmt;

/// The fourteen message kinds of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageId {
    LoadFileRequest = 1,
    LoadFileResponse = 2,
    SetConfigRequest = 3,
    SetConfigResponse = 4,
    ReadAudioRequest = 5,
    ReadAudioResponse = 6,
    SongInfoRequest = 7,
    SongInfoResponse = 8,
    PlaySongRequest = 9,
    PlaySongResponse = 10,
    LoadRomsRequest = 11,
    LoadRomsResponse = 12,
    MuteChannelsRequest = 13,
    MuteChannelsResponse = 14,
}

impl MessageId {
    /// Look up a wire identifier.
    pub const fn from_wire(raw: u32) -> Option<Self> {
        Some(match raw {
            1 => Self::LoadFileRequest,
            2 => Self::LoadFileResponse,
            3 => Self::SetConfigRequest,
            4 => Self::SetConfigResponse,
            5 => Self::ReadAudioRequest,
            6 => Self::ReadAudioResponse,
            7 => Self::SongInfoRequest,
            8 => Self::SongInfoResponse,
            9 => Self::PlaySongRequest,
            10 => Self::PlaySongResponse,
            11 => Self::LoadRomsRequest,
            12 => Self::LoadRomsResponse,
            13 => Self::MuteChannelsRequest,
            14 => Self::MuteChannelsResponse,
            _ => return None,
        })
    }

    pub const fn as_wire(self) -> u32 {
        self as u32
    }

    /// Returns true for the seven request kinds.
    pub const fn is_request(self) -> bool {
        self.as_wire() % 2 == 1
    }

    /// The response kind answering this request. Responses map to themselves.
    pub const fn response(self) -> Self {
        match self {
            Self::LoadFileRequest => Self::LoadFileResponse,
            Self::SetConfigRequest => Self::SetConfigResponse,
            Self::ReadAudioRequest => Self::ReadAudioResponse,
            Self::SongInfoRequest => Self::SongInfoResponse,
            Self::PlaySongRequest => Self::PlaySongResponse,
            Self::LoadRomsRequest => Self::LoadRomsResponse,
            Self::MuteChannelsRequest => Self::MuteChannelsResponse,
            response => response,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadFileRequest => "LOAD_FILE_REQUEST",
            Self::LoadFileResponse => "LOAD_FILE_RESPONSE",
            Self::SetConfigRequest => "SET_CONFIG_REQUEST",
            Self::SetConfigResponse => "SET_CONFIG_RESPONSE",
            Self::ReadAudioRequest => "READ_AUDIO_REQUEST",
            Self::ReadAudioResponse => "READ_AUDIO_RESPONSE",
            Self::SongInfoRequest => "SONG_INFO_REQUEST",
            Self::SongInfoResponse => "SONG_INFO_RESPONSE",
            Self::PlaySongRequest => "PLAY_SONG_REQUEST",
            Self::PlaySongResponse => "PLAY_SONG_RESPONSE",
            Self::LoadRomsRequest => "LOAD_ROMS_REQUEST",
            Self::LoadRomsResponse => "LOAD_ROMS_RESPONSE",
            Self::MuteChannelsRequest => "MUTE_CHANNELS_REQUEST",
            Self::MuteChannelsResponse => "MUTE_CHANNELS_RESPONSE",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns a human-readable name for a raw identifier.
pub fn message_name(raw: u32) -> &'static str {
    MessageId::from_wire(raw).map_or("UNKNOWN", MessageId::name)
}
