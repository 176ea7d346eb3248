//! Response payloads, sent by the helper back to the controlling application.

use bytes::{Buf, BufMut};
use sidpipe_frame::{Message, MAX_CONTENT_LENGTH};
use tracing::warn;

use crate::error::{ProtoError, Result};
use crate::id::MessageId;
use crate::types::{ClockSpeed, Compatibility, SidModel, SongSpeed};
use crate::wire::{bool_from_wire, bool_to_wire, string_from_bytes};

/// Most samples a single read-audio response can carry.
pub const MAX_SAMPLES: usize = (MAX_CONTENT_LENGTH - ReadAudioResponse::FIXED_SIZE) / 2;

/// A bare success flag. Answers set-config, play-song, load-ROMs and
/// mute-channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponse {
    pub success: bool,
}

impl StatusResponse {
    pub const SIZE: usize = 4;

    pub fn new(success: bool) -> Self {
        Self { success }
    }

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Ok(msg.write_u32(bool_to_wire(self.success))?)
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        Ok(Self {
            success: bool_from_wire(msg.read_u32()?),
        })
    }
}

/// What a successful tune load reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTune {
    pub song_count: u32,
    pub first_subsong: u32,
    pub md5: String,
}

/// Answer to a load-file request. `None` means the load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFileResponse {
    pub tune: Option<LoadedTune>,
}

impl LoadFileResponse {
    pub const FIXED_SIZE: usize = 12;

    /// Append this response to `msg`.
    ///
    /// A fingerprint that cannot be written turns the response into a
    /// failure block.
    pub fn write(&self, msg: &mut Message) -> Result<()> {
        let start = msg.content_length();
        let Some(tune) = &self.tune else {
            msg.write_blob(&[0u8; Self::FIXED_SIZE])?;
            return Ok(());
        };

        if let Err(err) = Self::write_tune(tune, msg) {
            warn!(error = %err, "tune fingerprint does not fit, reporting failure");
            msg.set_content_length(start)?;
            msg.write_blob(&[0u8; Self::FIXED_SIZE])?;
        }
        Ok(())
    }

    fn write_tune(tune: &LoadedTune, msg: &mut Message) -> Result<()> {
        let mut fixed = [0u8; Self::FIXED_SIZE];
        let mut out = &mut fixed[..];
        out.put_u32_le(1);
        out.put_u32_le(tune.song_count);
        out.put_u32_le(tune.first_subsong);
        msg.write_blob(&fixed)?;
        msg.write_string(tune.md5.as_bytes())?;
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let mut fixed = msg.read_blob(Self::FIXED_SIZE)?;
        let success = bool_from_wire(fixed.get_u32_le());
        let song_count = fixed.get_u32_le();
        let first_subsong = fixed.get_u32_le();
        if !success {
            return Ok(Self { tune: None });
        }

        let md5 = string_from_bytes(msg.read_string()?);
        Ok(Self {
            tune: Some(LoadedTune {
                song_count,
                first_subsong,
                md5,
            }),
        })
    }
}

/// Rendered 16-bit signed PCM samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAudioResponse {
    pub success: bool,
    pub samples: Vec<i16>,
}

impl ReadAudioResponse {
    pub const FIXED_SIZE: usize = 8;

    pub fn write(&self, msg: &mut Message) -> Result<()> {
        Self::write_samples(self.success, &self.samples, msg)
    }

    /// Write a response straight from a borrowed sample slice.
    pub fn write_samples(success: bool, samples: &[i16], msg: &mut Message) -> Result<()> {
        if samples.len() > MAX_SAMPLES {
            return Err(ProtoError::TooManySamples {
                count: samples.len(),
                max: MAX_SAMPLES,
            });
        }

        let mut fixed = [0u8; Self::FIXED_SIZE];
        let mut out = &mut fixed[..];
        out.put_u32_le(bool_to_wire(success));
        out.put_u32_le(samples.len() as u32);
        msg.write_blob(&fixed)?;

        let mut chunk = [0u8; 512];
        for block in samples.chunks(chunk.len() / 2) {
            let mut out = &mut chunk[..];
            for sample in block {
                out.put_i16_le(*sample);
            }
            msg.write_blob(&chunk[..block.len() * 2])?;
        }
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let mut fixed = msg.read_blob(Self::FIXED_SIZE)?;
        let success = bool_from_wire(fixed.get_u32_le());
        let count = fixed.get_u32_le() as usize;

        let size = count.checked_mul(2).unwrap_or(usize::MAX);
        let mut raw = msg.read_blob(size)?;
        let mut samples = Vec::with_capacity(count);
        while raw.has_remaining() {
            samples.push(raw.get_i16_le());
        }
        Ok(Self { success, samples })
    }
}

/// One SID chip used by a tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidInfo {
    pub base_address: u32,
    pub model: SidModel,
}

impl SidInfo {
    pub const SIZE: usize = 8;
}

/// Metadata of one subsong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongInfo {
    pub load_address: u32,
    pub init_address: u32,
    pub play_address: u32,
    pub compatibility: Compatibility,
    pub song_speed: SongSpeed,
    pub clock_speed: ClockSpeed,
    pub sids: Vec<SidInfo>,
    /// Sent as UTF-8. Latin-1 header text is transcoded, so a byte above
    /// 0x7F takes two bytes on the wire.
    pub info_strings: Vec<String>,
    pub comment_strings: Vec<String>,
    pub format: String,
}

/// Answer to a song-info request. `None` means no info was available.
///
/// Layout: ten u32 fields, then `sid_count` SID records, the info strings,
/// the comment strings and finally the format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongInfoResponse {
    pub info: Option<SongInfo>,
}

impl SongInfoResponse {
    pub const FIXED_SIZE: usize = 40;

    /// Append this response to `msg`.
    ///
    /// If the trailer does not fit, everything written by this call is
    /// dropped and a failure response is written in its place.
    pub fn write(&self, msg: &mut Message) -> Result<()> {
        let start = msg.content_length();
        let Some(info) = &self.info else {
            msg.write_blob(&[0u8; Self::FIXED_SIZE])?;
            return Ok(());
        };

        if let Err(err) = Self::write_info(info, msg) {
            warn!(error = %err, "song info does not fit, reporting failure");
            msg.set_content_length(start)?;
            msg.write_blob(&[0u8; Self::FIXED_SIZE])?;
        }
        Ok(())
    }

    fn write_info(info: &SongInfo, msg: &mut Message) -> Result<()> {
        let mut fixed = [0u8; Self::FIXED_SIZE];
        let mut out = &mut fixed[..];
        out.put_u32_le(1);
        out.put_u32_le(info.load_address);
        out.put_u32_le(info.init_address);
        out.put_u32_le(info.play_address);
        out.put_u32_le(info.compatibility.as_wire());
        out.put_u32_le(info.song_speed.as_wire());
        out.put_u32_le(info.clock_speed.as_wire());
        out.put_u32_le(info.sids.len() as u32);
        out.put_u32_le(info.info_strings.len() as u32);
        out.put_u32_le(info.comment_strings.len() as u32);
        msg.write_blob(&fixed)?;

        for sid in &info.sids {
            let mut record = [0u8; SidInfo::SIZE];
            let mut out = &mut record[..];
            out.put_u32_le(sid.base_address);
            out.put_u32_le(sid.model.as_wire());
            msg.write_blob(&record)?;
        }
        for line in &info.info_strings {
            msg.write_string(line.as_bytes())?;
        }
        for line in &info.comment_strings {
            msg.write_string(line.as_bytes())?;
        }
        msg.write_string(info.format.as_bytes())?;
        Ok(())
    }

    pub fn read(msg: &mut Message) -> Result<Self> {
        let mut fixed = msg.read_blob(Self::FIXED_SIZE)?;
        if !bool_from_wire(fixed.get_u32_le()) {
            return Ok(Self { info: None });
        }

        let load_address = fixed.get_u32_le();
        let init_address = fixed.get_u32_le();
        let play_address = fixed.get_u32_le();
        let compatibility = fixed.get_u32_le();
        let song_speed = fixed.get_u32_le();
        let clock_speed = fixed.get_u32_le();
        let sid_count = fixed.get_u32_le();
        let info_count = fixed.get_u32_le();
        let comment_count = fixed.get_u32_le();

        let mut sids = Vec::new();
        for _ in 0..sid_count {
            let mut record = msg.read_blob(SidInfo::SIZE)?;
            let base_address = record.get_u32_le();
            let model = SidModel::from_wire(record.get_u32_le())?;
            sids.push(SidInfo {
                base_address,
                model,
            });
        }

        let info_strings = read_strings(msg, info_count)?;
        let comment_strings = read_strings(msg, comment_count)?;
        let format = string_from_bytes(msg.read_string()?);

        Ok(Self {
            info: Some(SongInfo {
                load_address,
                init_address,
                play_address,
                compatibility: Compatibility::from_wire(compatibility)?,
                song_speed: SongSpeed::from_wire(song_speed)?,
                clock_speed: ClockSpeed::from_wire(clock_speed)?,
                sids,
                info_strings,
                comment_strings,
                format,
            }),
        })
    }
}

/// Append the `success=0` payload of response kind `id`.
///
/// Used when a request could not even be decoded.
pub fn write_failure(id: MessageId, msg: &mut Message) -> Result<()> {
    match id {
        MessageId::LoadFileResponse => LoadFileResponse { tune: None }.write(msg),
        MessageId::ReadAudioResponse => ReadAudioResponse::write_samples(false, &[], msg),
        MessageId::SongInfoResponse => SongInfoResponse { info: None }.write(msg),
        MessageId::SetConfigResponse
        | MessageId::PlaySongResponse
        | MessageId::LoadRomsResponse
        | MessageId::MuteChannelsResponse => StatusResponse::new(false).write(msg),
        other => Err(ProtoError::UnknownMessage(other.as_wire())),
    }
}

fn read_strings(msg: &mut Message, count: u32) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    for _ in 0..count {
        strings.push(string_from_bytes(msg.read_string()?));
    }
    Ok(strings)
}
