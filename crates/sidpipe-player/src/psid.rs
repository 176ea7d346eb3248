//! PSID/RSID tune files and an engine that works from their headers.
//!
//! [`PsidEngine`] answers every metadata request from the parsed header and
//! renders silence for the selected song. It stands in for a full SID
//! emulator wherever only the protocol needs exercising.

use std::path::Path;

use bytes::Buf;
use md5::{Digest, Md5};
use sidpipe_proto::{
    ClockSpeed, Compatibility, LoadedTune, PlayerConfig, SidEmulator, SidInfo, SidModel,
    SongInfo, SongSpeed,
};
use tracing::{debug, warn};

use crate::dispatch::VOICES_PER_SID;
use crate::engine::{Engine, EngineError, Roms};

const V1_HEADER_SIZE: usize = 0x76;
const V2_HEADER_SIZE: usize = 0x7C;
const TEXT_FIELD_SIZE: usize = 32;
const PRIMARY_SID_ADDRESS: u32 = 0xD400;
const MAX_SIDS: usize = 3;

const FLAG_PSID_SPECIFIC: u16 = 1 << 1;

/// Reasons a file is not a usable PSID/RSID tune.
#[derive(Debug, thiserror::Error)]
pub enum TuneFormatError {
    #[error("file too short: {len} bytes, need {needed}")]
    TooShort { len: usize, needed: usize },

    #[error("bad magic {0:02X?}")]
    BadMagic([u8; 4]),

    #[error("unsupported header version {0}")]
    UnsupportedVersion(u16),

    #[error("tune declares no songs")]
    NoSongs,

    #[error("embedded load address missing")]
    MissingLoadAddress,
}

/// Which of the two container variants a tune uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuneKind {
    Psid,
    Rsid,
}

/// A parsed PSID or RSID file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsidTune {
    kind: TuneKind,
    version: u16,
    load_address: u16,
    init_address: u16,
    play_address: u16,
    songs: u16,
    start_song: u16,
    speed: u32,
    flags: u16,
    name: String,
    author: String,
    released: String,
    extra_sids: Vec<SidInfo>,
    data: Vec<u8>,
}

impl PsidTune {
    pub fn parse(file: &[u8]) -> Result<Self, TuneFormatError> {
        if file.len() < V1_HEADER_SIZE {
            return Err(TuneFormatError::TooShort {
                len: file.len(),
                needed: V1_HEADER_SIZE,
            });
        }

        let mut header = file;
        let mut magic = [0u8; 4];
        header.copy_to_slice(&mut magic);
        let kind = match &magic {
            b"PSID" => TuneKind::Psid,
            b"RSID" => TuneKind::Rsid,
            _ => return Err(TuneFormatError::BadMagic(magic)),
        };

        let version = header.get_u16();
        let valid_version = match kind {
            TuneKind::Psid => (1..=4).contains(&version),
            TuneKind::Rsid => (2..=4).contains(&version),
        };
        if !valid_version {
            return Err(TuneFormatError::UnsupportedVersion(version));
        }

        let data_offset = header.get_u16() as usize;
        let mut load_address = header.get_u16();
        let mut init_address = header.get_u16();
        let play_address = header.get_u16();
        let songs = header.get_u16();
        let mut start_song = header.get_u16();
        let speed = header.get_u32();
        let name = latin1_field(&file[0x16..0x16 + TEXT_FIELD_SIZE]);
        let author = latin1_field(&file[0x36..0x36 + TEXT_FIELD_SIZE]);
        let released = latin1_field(&file[0x56..0x56 + TEXT_FIELD_SIZE]);

        let mut flags = 0;
        let mut extra_sids = Vec::new();
        if version >= 2 {
            if file.len() < V2_HEADER_SIZE {
                return Err(TuneFormatError::TooShort {
                    len: file.len(),
                    needed: V2_HEADER_SIZE,
                });
            }
            let mut extended = &file[0x76..V2_HEADER_SIZE];
            flags = extended.get_u16();
            let _relocation = extended.get_u16();
            let second = extended.get_u8();
            let third = extended.get_u8();

            if version >= 3 {
                if let Some(base_address) = extra_sid_address(second) {
                    extra_sids.push(SidInfo {
                        base_address,
                        model: sid_model_bits(flags >> 6),
                    });
                    if version >= 4 {
                        if let Some(base_address) = extra_sid_address(third) {
                            extra_sids.push(SidInfo {
                                base_address,
                                model: sid_model_bits(flags >> 8),
                            });
                        }
                    }
                }
            }
        }

        if songs == 0 {
            return Err(TuneFormatError::NoSongs);
        }
        if start_song == 0 || start_song > songs {
            start_song = 1;
        }

        if data_offset > file.len() {
            return Err(TuneFormatError::TooShort {
                len: file.len(),
                needed: data_offset,
            });
        }
        let mut data = &file[data_offset..];
        if load_address == 0 {
            if data.len() < 2 {
                return Err(TuneFormatError::MissingLoadAddress);
            }
            load_address = data.get_u16_le();
        }
        if init_address == 0 && kind == TuneKind::Psid {
            init_address = load_address;
        }

        Ok(Self {
            kind,
            version,
            load_address,
            init_address,
            play_address,
            songs,
            start_song,
            speed,
            flags,
            name,
            author,
            released,
            extra_sids,
            data: data.to_vec(),
        })
    }

    pub fn kind(&self) -> TuneKind {
        self.kind
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn songs(&self) -> u32 {
        u32::from(self.songs)
    }

    pub fn start_song(&self) -> u32 {
        u32::from(self.start_song)
    }

    /// The C64 program image, without any embedded load address.
    pub fn c64_data(&self) -> &[u8] {
        &self.data
    }

    /// Speed of subsong `song` (1-based). Songs past 32 share bit 31.
    pub fn song_speed(&self, song: u32) -> SongSpeed {
        if self.kind == TuneKind::Rsid {
            return SongSpeed::Cia;
        }
        let bit = song.saturating_sub(1).min(31);
        if self.speed & (1 << bit) != 0 {
            SongSpeed::Cia
        } else {
            SongSpeed::VerticalBlank
        }
    }

    pub fn clock_speed(&self) -> ClockSpeed {
        match (self.flags >> 2) & 0b11 {
            1 => ClockSpeed::Pal,
            2 => ClockSpeed::Ntsc,
            3 => ClockSpeed::Any,
            _ => ClockSpeed::Unknown,
        }
    }

    pub fn compatibility(&self) -> Compatibility {
        let specific = self.flags & FLAG_PSID_SPECIFIC != 0;
        match (self.kind, specific) {
            (TuneKind::Psid, true) => Compatibility::Psid,
            (TuneKind::Psid, false) => Compatibility::C64,
            (TuneKind::Rsid, true) => Compatibility::Basic,
            (TuneKind::Rsid, false) => Compatibility::R64,
        }
    }

    /// All SID chips the tune uses, primary first.
    pub fn sids(&self) -> Vec<SidInfo> {
        let mut sids = Vec::with_capacity(1 + self.extra_sids.len());
        sids.push(SidInfo {
            base_address: PRIMARY_SID_ADDRESS,
            model: sid_model_bits(self.flags >> 4),
        });
        sids.extend_from_slice(&self.extra_sids);
        sids
    }

    pub fn format(&self) -> &'static str {
        match self.kind {
            TuneKind::Psid => "PlaySID one-file format (PSID)",
            TuneKind::Rsid => "Real C64 one-file format (RSID)",
        }
    }

    /// Name, author and release, in header order.
    pub fn info_strings(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.author.clone(),
            self.released.clone(),
        ]
    }

    /// HVSC song-length database fingerprint, as lowercase hex.
    pub fn md5(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(&self.data);
        hasher.update(self.init_address.to_le_bytes());
        hasher.update(self.play_address.to_le_bytes());
        hasher.update(self.songs.to_le_bytes());
        for song in 1..=self.songs() {
            let marker: u8 = match self.song_speed(song) {
                SongSpeed::Cia => 60,
                SongSpeed::VerticalBlank => 0,
            };
            hasher.update([marker]);
        }
        if self.clock_speed() == ClockSpeed::Ntsc {
            hasher.update([2u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Metadata of `subsong`; 0 selects the start song.
    pub fn song_info(&self, subsong: u32) -> Option<SongInfo> {
        let song = if subsong == 0 {
            self.start_song()
        } else {
            subsong
        };
        if song > self.songs() {
            return None;
        }

        Some(SongInfo {
            load_address: u32::from(self.load_address),
            init_address: u32::from(self.init_address),
            play_address: u32::from(self.play_address),
            compatibility: self.compatibility(),
            song_speed: self.song_speed(song),
            clock_speed: self.clock_speed(),
            sids: self.sids(),
            info_strings: self.info_strings(),
            comment_strings: Vec::new(),
            format: self.format().to_string(),
        })
    }
}

/// Decode a NUL-padded Latin-1 field. Every byte maps to the code point of
/// the same value.
fn latin1_field(field: &[u8]) -> String {
    field
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

fn sid_model_bits(bits: u16) -> SidModel {
    match bits & 0b11 {
        1 => SidModel::Mos6581,
        2 => SidModel::Mos8580,
        3 => SidModel::Any,
        _ => SidModel::Unknown,
    }
}

/// Decode a `$Dxx0` SID address byte. Odd values and the I/O areas outside
/// `$D420-$D7F0` and `$DE00-$DFE0` are invalid.
fn extra_sid_address(byte: u8) -> Option<u32> {
    let valid = byte & 1 == 0 && ((0x42..=0x7F).contains(&byte) || byte >= 0xE0);
    valid.then_some(0xD000 | (u32::from(byte) << 4))
}

/// Header-level [`Engine`]: metadata from the parsed tune, silence as audio.
#[derive(Debug, Default)]
pub struct PsidEngine {
    tune: Option<PsidTune>,
    selected: Option<u32>,
    config: PlayerConfig,
    roms: Option<Roms>,
    muted: [[bool; VOICES_PER_SID as usize]; MAX_SIDS],
}

impl PsidEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tune(&self) -> Option<&PsidTune> {
        self.tune.as_ref()
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn has_roms(&self) -> bool {
        self.roms.is_some()
    }

    pub fn is_muted(&self, sid: usize, voice: usize) -> bool {
        self.muted
            .get(sid)
            .and_then(|voices| voices.get(voice))
            .copied()
            .unwrap_or(false)
    }
}

impl Engine for PsidEngine {
    fn set_roms(&mut self, roms: &Roms) {
        self.roms = Some(roms.clone());
    }

    fn load_tune(&mut self, path: &Path) -> Result<LoadedTune, EngineError> {
        self.tune = None;
        self.selected = None;

        let bytes = std::fs::read(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tune = PsidTune::parse(&bytes).map_err(|source| EngineError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        let loaded = LoadedTune {
            song_count: tune.songs(),
            first_subsong: tune.start_song(),
            md5: tune.md5(),
        };
        debug!(songs = loaded.song_count, md5 = %loaded.md5, "tune parsed");
        self.tune = Some(tune);
        Ok(loaded)
    }

    fn configure(&mut self, config: &PlayerConfig) -> Result<(), EngineError> {
        if config.emulator == SidEmulator::HardSid {
            return Err(EngineError::Unsupported("HardSID output".to_string()));
        }
        if matches!(config.sid_model, SidModel::Unknown | SidModel::Any) {
            return Err(EngineError::Unsupported(format!(
                "default SID model {}",
                config.sid_model
            )));
        }
        if config.sample_rate == 0 {
            return Err(EngineError::Unsupported("sample rate 0".to_string()));
        }
        self.config = *config;
        Ok(())
    }

    fn render(&mut self, out: &mut [i16]) -> Result<usize, EngineError> {
        if self.tune.is_none() {
            return Err(EngineError::NoTune);
        }
        if self.selected.is_none() {
            return Err(EngineError::NoSong);
        }
        out.fill(0);
        Ok(out.len())
    }

    fn tune_info(&self, subsong: u32) -> Option<SongInfo> {
        self.tune.as_ref()?.song_info(subsong)
    }

    fn select_song(&mut self, subsong: u32) -> Result<(), EngineError> {
        let tune = self.tune.as_ref().ok_or(EngineError::NoTune)?;
        if subsong == 0 || subsong > tune.songs() {
            return Err(EngineError::InvalidSubsong {
                requested: subsong,
                songs: tune.songs(),
            });
        }
        if tune.compatibility() == Compatibility::Basic && self.roms.is_none() {
            return Err(EngineError::Unsupported(
                "BASIC tune needs ROM images".to_string(),
            ));
        }
        self.selected = Some(subsong);
        Ok(())
    }

    fn mute(&mut self, sid: usize, voice: usize, muted: bool) {
        match self.muted.get_mut(sid).and_then(|voices| voices.get_mut(voice)) {
            Some(slot) => *slot = muted,
            None => warn!(sid, voice, "mute target out of range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    struct Header {
        magic: &'static [u8; 4],
        version: u16,
        load: u16,
        init: u16,
        play: u16,
        songs: u16,
        start: u16,
        speed: u32,
        flags: u16,
        second_sid: u8,
        third_sid: u8,
    }

    impl Default for Header {
        fn default() -> Self {
            Self {
                magic: b"PSID",
                version: 2,
                load: 0x1000,
                init: 0x1000,
                play: 0x1003,
                songs: 3,
                start: 2,
                speed: 0,
                flags: 0b01_0100,
                second_sid: 0,
                third_sid: 0,
            }
        }
    }

    impl Header {
        fn build(&self, data: &[u8]) -> Vec<u8> {
            let header_size = if self.version == 1 {
                V1_HEADER_SIZE
            } else {
                V2_HEADER_SIZE
            };
            let mut out = Vec::new();
            out.extend_from_slice(self.magic);
            out.extend_from_slice(&self.version.to_be_bytes());
            out.extend_from_slice(&(header_size as u16).to_be_bytes());
            out.extend_from_slice(&self.load.to_be_bytes());
            out.extend_from_slice(&self.init.to_be_bytes());
            out.extend_from_slice(&self.play.to_be_bytes());
            out.extend_from_slice(&self.songs.to_be_bytes());
            out.extend_from_slice(&self.start.to_be_bytes());
            out.extend_from_slice(&self.speed.to_be_bytes());
            for text in ["Commando", "Rob Hubbard", "1985 Elite"] {
                let mut field = [0u8; TEXT_FIELD_SIZE];
                field[..text.len()].copy_from_slice(text.as_bytes());
                out.extend_from_slice(&field);
            }
            if self.version >= 2 {
                out.extend_from_slice(&self.flags.to_be_bytes());
                out.extend_from_slice(&[0, 0, self.second_sid, self.third_sid]);
            }
            assert_eq!(out.len(), header_size);
            out.extend_from_slice(data);
            out
        }
    }

    #[test]
    fn parses_v2_header() {
        let tune = PsidTune::parse(&Header::default().build(&[0xA9, 0x00, 0x60])).unwrap();
        assert_eq!(tune.kind(), TuneKind::Psid);
        assert_eq!(tune.songs(), 3);
        assert_eq!(tune.start_song(), 2);
        assert_eq!(tune.clock_speed(), ClockSpeed::Pal);
        assert_eq!(tune.compatibility(), Compatibility::C64);
        assert_eq!(tune.c64_data(), &[0xA9, 0x00, 0x60]);
        assert_eq!(
            tune.sids(),
            vec![SidInfo {
                base_address: 0xD400,
                model: SidModel::Mos6581
            }]
        );

        let info = tune.song_info(0).unwrap();
        assert_eq!(info.load_address, 0x1000);
        assert_eq!(info.play_address, 0x1003);
        assert_eq!(info.info_strings, vec!["Commando", "Rob Hubbard", "1985 Elite"]);
        assert_eq!(info.format, "PlaySID one-file format (PSID)");
        assert!(tune.song_info(4).is_none());
    }

    #[test]
    fn embedded_load_address() {
        let header = Header {
            load: 0,
            init: 0,
            ..Header::default()
        };
        let tune = PsidTune::parse(&header.build(&[0x00, 0x20, 0xEA])).unwrap();
        let info = tune.song_info(1).unwrap();
        assert_eq!(info.load_address, 0x2000);
        assert_eq!(info.init_address, 0x2000);
        assert_eq!(tune.c64_data(), &[0xEA]);

        let err = PsidTune::parse(&header.build(&[0x00])).unwrap_err();
        assert!(matches!(err, TuneFormatError::MissingLoadAddress));
    }

    #[test]
    fn speed_bits_per_song() {
        let header = Header {
            songs: 40,
            speed: 0b10 | (1 << 31),
            ..Header::default()
        };
        let tune = PsidTune::parse(&header.build(&[0])).unwrap();
        assert_eq!(tune.song_speed(1), SongSpeed::VerticalBlank);
        assert_eq!(tune.song_speed(2), SongSpeed::Cia);
        assert_eq!(tune.song_speed(31), SongSpeed::VerticalBlank);
        assert_eq!(tune.song_speed(32), SongSpeed::Cia);
        assert_eq!(tune.song_speed(40), SongSpeed::Cia);
    }

    #[test]
    fn rsid_is_always_cia() {
        let header = Header {
            magic: b"RSID",
            init: 0x1000,
            flags: FLAG_PSID_SPECIFIC,
            ..Header::default()
        };
        let tune = PsidTune::parse(&header.build(&[0])).unwrap();
        assert_eq!(tune.song_speed(1), SongSpeed::Cia);
        assert_eq!(tune.compatibility(), Compatibility::Basic);
        assert_eq!(tune.format(), "Real C64 one-file format (RSID)");
    }

    #[test]
    fn extra_sids_from_v3_and_v4() {
        let header = Header {
            version: 4,
            flags: (2 << 8) | (1 << 6) | (2 << 4),
            second_sid: 0x42,
            third_sid: 0xE0,
            ..Header::default()
        };
        let tune = PsidTune::parse(&header.build(&[0])).unwrap();
        let addresses: Vec<(u32, SidModel)> = tune
            .sids()
            .iter()
            .map(|sid| (sid.base_address, sid.model))
            .collect();
        assert_eq!(
            addresses,
            vec![
                (0xD400, SidModel::Mos8580),
                (0xD420, SidModel::Mos6581),
                (0xDE00, SidModel::Mos8580),
            ]
        );

        let odd = Header {
            version: 3,
            second_sid: 0x43,
            ..Header::default()
        };
        assert_eq!(PsidTune::parse(&odd.build(&[0])).unwrap().sids().len(), 1);
    }

    #[test]
    fn rejects_bad_files() {
        assert!(matches!(
            PsidTune::parse(&[0u8; 10]),
            Err(TuneFormatError::TooShort { len: 10, .. })
        ));

        let bad_magic = Header {
            magic: b"MUS!",
            ..Header::default()
        };
        assert!(matches!(
            PsidTune::parse(&bad_magic.build(&[0])),
            Err(TuneFormatError::BadMagic(_))
        ));

        let no_songs = Header {
            songs: 0,
            ..Header::default()
        };
        assert!(matches!(
            PsidTune::parse(&no_songs.build(&[0])),
            Err(TuneFormatError::NoSongs)
        ));

        let future = Header {
            version: 9,
            ..Header::default()
        };
        assert!(matches!(
            PsidTune::parse(&future.build(&[0])),
            Err(TuneFormatError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn start_song_out_of_range_defaults_to_first() {
        let header = Header {
            start: 7,
            ..Header::default()
        };
        assert_eq!(PsidTune::parse(&header.build(&[0])).unwrap().start_song(), 1);
    }

    #[test]
    fn md5_depends_on_speed_and_clock() {
        let base = PsidTune::parse(&Header::default().build(&[1, 2, 3])).unwrap();
        let digest = base.md5();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let cia = Header {
            speed: 1,
            ..Header::default()
        };
        let ntsc = Header {
            flags: 0b10_1000,
            ..Header::default()
        };
        assert_ne!(PsidTune::parse(&cia.build(&[1, 2, 3])).unwrap().md5(), digest);
        assert_ne!(PsidTune::parse(&ntsc.build(&[1, 2, 3])).unwrap().md5(), digest);
        assert_eq!(base.md5(), digest);
    }

    fn tune_file(header: &Header) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&header.build(&[0x60])).unwrap();
        file
    }

    #[test]
    fn engine_needs_selection_before_render() {
        let file = tune_file(&Header::default());
        let mut engine = PsidEngine::new();
        let mut out = [1i16; 16];
        assert!(matches!(engine.render(&mut out), Err(EngineError::NoTune)));

        let loaded = engine.load_tune(file.path()).unwrap();
        assert_eq!(loaded.song_count, 3);
        assert_eq!(loaded.first_subsong, 2);
        assert!(matches!(engine.render(&mut out), Err(EngineError::NoSong)));

        engine.select_song(3).unwrap();
        assert_eq!(engine.render(&mut out).unwrap(), 16);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn engine_subsong_range() {
        let file = tune_file(&Header::default());
        let mut engine = PsidEngine::new();
        assert!(matches!(engine.select_song(1), Err(EngineError::NoTune)));
        engine.load_tune(file.path()).unwrap();
        assert!(matches!(
            engine.select_song(0),
            Err(EngineError::InvalidSubsong { requested: 0, songs: 3 })
        ));
        assert!(engine.select_song(4).is_err());
        assert!(engine.tune_info(4).is_none());
        assert!(engine.tune_info(3).is_some());
    }

    #[test]
    fn engine_reports_unreadable_and_malformed_files() {
        let mut engine = PsidEngine::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            engine.load_tune(&dir.path().join("missing.sid")),
            Err(EngineError::Read { .. })
        ));

        let mut junk = tempfile::NamedTempFile::new().unwrap();
        junk.write_all(b"not a tune").unwrap();
        assert!(matches!(
            engine.load_tune(junk.path()),
            Err(EngineError::Format { .. })
        ));
        assert!(engine.tune().is_none());
    }

    #[test]
    fn latin1_text_becomes_utf8() {
        let mut bytes = Header::default().build(&[0]);
        bytes[0x56..0x56 + 6].copy_from_slice(b"\xA9 1985");
        bytes[0x5C..0x76].fill(0);
        let tune = PsidTune::parse(&bytes).unwrap();
        let released = &tune.info_strings()[2];
        assert_eq!(released, "\u{a9} 1985");
        assert_eq!(released.len(), 7);
    }

    #[test]
    fn failed_load_unloads_previous_tune() {
        let file = tune_file(&Header::default());
        let mut engine = PsidEngine::new();
        engine.load_tune(file.path()).unwrap();
        engine.select_song(1).unwrap();

        let dir = tempfile::tempdir().unwrap();
        assert!(engine.load_tune(&dir.path().join("gone.sid")).is_err());

        assert!(engine.tune().is_none());
        assert_eq!(engine.selected(), None);
        assert!(engine.tune_info(1).is_none());
        let mut out = [0i16; 8];
        assert!(matches!(engine.render(&mut out), Err(EngineError::NoTune)));
    }

    #[test]
    fn engine_configuration_checks() {
        let mut engine = PsidEngine::new();
        let config = PlayerConfig {
            sample_rate: 48_000,
            ..PlayerConfig::default()
        };
        engine.configure(&config).unwrap();
        assert_eq!(engine.config().sample_rate, 48_000);

        for bad in [
            PlayerConfig {
                emulator: SidEmulator::HardSid,
                ..config
            },
            PlayerConfig {
                sid_model: SidModel::Any,
                ..config
            },
            PlayerConfig {
                sample_rate: 0,
                ..config
            },
        ] {
            assert!(matches!(
                engine.configure(&bad),
                Err(EngineError::Unsupported(_))
            ));
        }
        assert_eq!(engine.config().sample_rate, 48_000);
    }

    #[test]
    fn basic_tune_requires_roms() {
        let file = tune_file(&Header {
            magic: b"RSID",
            flags: FLAG_PSID_SPECIFIC,
            ..Header::default()
        });
        let mut engine = PsidEngine::new();
        engine.load_tune(file.path()).unwrap();
        assert!(engine.select_song(1).is_err());

        engine.set_roms(&Roms {
            kernal: vec![0; 8192],
            basic: vec![0; 8192],
            chargen: vec![0; 4096],
        });
        assert!(engine.has_roms());
        engine.select_song(1).unwrap();
    }

    #[test]
    fn mute_state_tracked_per_voice() {
        let mut engine = PsidEngine::new();
        engine.mute(1, 2, true);
        assert!(engine.is_muted(1, 2));
        assert!(!engine.is_muted(0, 2));
        engine.mute(5, 0, true);
        assert!(!engine.is_muted(5, 0));
    }
}
