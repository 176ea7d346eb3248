//! Request payloads, sent by the controlling application to the helper.

use std::path::PathBuf;

use bytes::{Buf, BufMut};
use sidpipe_frame::Message;

use crate::error::{ProtoError, Result};
use crate::id::MessageId;
use crate::types::{C64Model, PlaybackMode, SamplingMethod, SidEmulator, SidModel};
use crate::wire::{bool_from_wire, bool_to_wire, path_from_bytes, path_to_bytes};

/// Size of the fixed path field in a load-file request.
pub const PATH_FIELD_SIZE: usize = 256;

/// Longest path a load-file request can carry.
pub const MAX_PATH_LENGTH: usize = PATH_FIELD_SIZE - 1;

/// Load a tune file. The path travels in a zero-padded 256-byte field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFileRequest {
    pub path: PathBuf,
}

impl LoadFileRequest {
    pub const ID: MessageId = MessageId::LoadFileRequest;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        let bytes = path_to_bytes(&self.path);
        if bytes.len() > MAX_PATH_LENGTH {
            return Err(ProtoError::PathTooLong {
                len: bytes.len(),
                max: MAX_PATH_LENGTH,
            });
        }
        if let Some(offset) = bytes.iter().position(|&b| b == 0) {
            return Err(sidpipe_frame::FrameError::InteriorNul { offset }.into());
        }

        let mut field = [0u8; PATH_FIELD_SIZE];
        field[..bytes.len()].copy_from_slice(&bytes);
        msg.write_blob(&field)?;
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let field = msg.read_blob(PATH_FIELD_SIZE)?;
        let len = field
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtoError::UnterminatedPath)?;
        Ok(Self {
            path: path_from_bytes(&field[..len]),
        })
    }
}

/// Engine configuration carried by a set-config request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    pub c64_model: C64Model,
    pub force_c64_model: bool,
    pub sid_model: SidModel,
    pub force_sid_model: bool,
    pub playback: PlaybackMode,
    pub sample_rate: u32,
    pub emulator: SidEmulator,
    pub sampling: SamplingMethod,
    pub fast_sampling: bool,
}

impl PlayerConfig {
    pub const ID: MessageId = MessageId::SetConfigRequest;

    /// Nine u32 fields.
    pub const SIZE: usize = 36;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        let mut fixed = [0u8; Self::SIZE];
        let mut out = &mut fixed[..];
        out.put_u32_le(self.c64_model.as_wire());
        out.put_u32_le(bool_to_wire(self.force_c64_model));
        out.put_u32_le(self.sid_model.as_wire());
        out.put_u32_le(bool_to_wire(self.force_sid_model));
        out.put_u32_le(self.playback.as_wire());
        out.put_u32_le(self.sample_rate);
        out.put_u32_le(self.emulator.as_wire());
        out.put_u32_le(self.sampling.as_wire());
        out.put_u32_le(bool_to_wire(self.fast_sampling));
        msg.write_blob(&fixed)?;
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let mut fixed = msg.read_blob(Self::SIZE)?;
        Ok(Self {
            c64_model: C64Model::from_wire(fixed.get_u32_le())?,
            force_c64_model: bool_from_wire(fixed.get_u32_le()),
            sid_model: SidModel::from_wire(fixed.get_u32_le())?,
            force_sid_model: bool_from_wire(fixed.get_u32_le()),
            playback: PlaybackMode::from_wire(fixed.get_u32_le())?,
            sample_rate: fixed.get_u32_le(),
            emulator: SidEmulator::from_wire(fixed.get_u32_le())?,
            sampling: SamplingMethod::from_wire(fixed.get_u32_le())?,
            fast_sampling: bool_from_wire(fixed.get_u32_le()),
        })
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            c64_model: C64Model::Pal,
            force_c64_model: false,
            sid_model: SidModel::Mos6581,
            force_sid_model: false,
            playback: PlaybackMode::Mono,
            sample_rate: 44_100,
            emulator: SidEmulator::ReSidFp,
            sampling: SamplingMethod::Interpolate,
            fast_sampling: false,
        }
    }
}

/// Render up to `sample_count` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadAudioRequest {
    pub sample_count: u32,
}

impl ReadAudioRequest {
    pub const ID: MessageId = MessageId::ReadAudioRequest;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Ok(msg.write_u32(self.sample_count)?)
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        Ok(Self {
            sample_count: msg.read_u32()?,
        })
    }
}

/// Query metadata of one subsong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongInfoRequest {
    pub subsong: u32,
}

impl SongInfoRequest {
    pub const ID: MessageId = MessageId::SongInfoRequest;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Ok(msg.write_u32(self.subsong)?)
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        Ok(Self {
            subsong: msg.read_u32()?,
        })
    }
}

/// Select a subsong and load it into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySongRequest {
    pub subsong: u32,
}

impl PlaySongRequest {
    pub const ID: MessageId = MessageId::PlaySongRequest;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Ok(msg.write_u32(self.subsong)?)
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        Ok(Self {
            subsong: msg.read_u32()?,
        })
    }
}

/// Paths of the three C64 ROM images, as consecutive strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRomsRequest {
    pub kernal: PathBuf,
    pub basic: PathBuf,
    pub chargen: PathBuf,
}

impl LoadRomsRequest {
    pub const ID: MessageId = MessageId::LoadRomsRequest;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        msg.write_string(path_to_bytes(&self.kernal))?;
        msg.write_string(path_to_bytes(&self.basic))?;
        msg.write_string(path_to_bytes(&self.chargen))?;
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let kernal = path_from_bytes(msg.read_string()?);
        let basic = path_from_bytes(msg.read_string()?);
        let chargen = path_from_bytes(msg.read_string()?);
        Ok(Self {
            kernal,
            basic,
            chargen,
        })
    }
}

/// Bit `i` set mutes channel `i` (SID `i / 3`, voice `i % 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteChannelsRequest {
    pub muted_channels: u32,
}

impl MuteChannelsRequest {
    pub const ID: MessageId = MessageId::MuteChannelsRequest;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Ok(msg.write_u32(self.muted_channels)?)
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        Ok(Self {
            muted_channels: msg.read_u32()?,
        })
    }
}

/// Any of the seven requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadFile(LoadFileRequest),
    SetConfig(PlayerConfig),
    ReadAudio(ReadAudioRequest),
    SongInfo(SongInfoRequest),
    PlaySong(PlaySongRequest),
    LoadRoms(LoadRomsRequest),
    MuteChannels(MuteChannelsRequest),
}

impl Request {
    pub fn id(&self) -> MessageId {
        match self {
            Self::LoadFile(_) => LoadFileRequest::ID,
            Self::SetConfig(_) => PlayerConfig::ID,
            Self::ReadAudio(_) => ReadAudioRequest::ID,
            Self::SongInfo(_) => SongInfoRequest::ID,
            Self::PlaySong(_) => PlaySongRequest::ID,
            Self::LoadRoms(_) => LoadRomsRequest::ID,
            Self::MuteChannels(_) => MuteChannelsRequest::ID,
        }
    }

    /// Replace the contents of `msg` with this request.
    pub fn encode(&self, msg: &mut Message) -> Result<()> {
        msg.clear();
        msg.set_id(self.id().as_wire());
        match self {
            Self::LoadFile(req) => req.write(msg),
            Self::SetConfig(req) => req.write(msg),
            Self::ReadAudio(req) => req.write(msg),
            Self::SongInfo(req) => req.write(msg),
            Self::PlaySong(req) => req.write(msg),
            Self::LoadRoms(req) => req.write(msg),
            Self::MuteChannels(req) => req.write(msg),
        }
    }

    /// Decode a received message, looking up its kind from the header.
    pub fn decode(msg: &mut Message) -> Result<Self> {
        let raw = msg.id();
        let id = MessageId::from_wire(raw).ok_or(ProtoError::UnknownMessage(raw))?;
        Self::read(id, msg)
    }

    /// Decode the payload of `msg` as a request of kind `id`.
    pub fn read(id: MessageId, msg: &mut Message) -> Result<Self> {
        Ok(match id {
            MessageId::LoadFileRequest => Self::LoadFile(LoadFileRequest::read(msg)?),
            MessageId::SetConfigRequest => Self::SetConfig(PlayerConfig::read(msg)?),
            MessageId::ReadAudioRequest => Self::ReadAudio(ReadAudioRequest::read(msg)?),
            MessageId::SongInfoRequest => Self::SongInfo(SongInfoRequest::read(msg)?),
            MessageId::PlaySongRequest => Self::PlaySong(PlaySongRequest::read(msg)?),
            MessageId::LoadRomsRequest => Self::LoadRoms(LoadRomsRequest::read(msg)?),
            MessageId::MuteChannelsRequest => {
                Self::MuteChannels(MuteChannelsRequest::read(msg)?)
            }
            response => return Err(ProtoError::UnknownMessage(response.as_wire())),
        })
    }
}
