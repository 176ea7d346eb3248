//! The playback capabilities the dispatch loop drives.

use std::path::{Path, PathBuf};

use sidpipe_proto::{LoadedTune, PlayerConfig, SongInfo};

use crate::psid::TuneFormatError;

/// Errors reported by an [`Engine`]. They are answered with `success=0`
/// and never end the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An operation needs a tune but none is loaded.
    #[error("no tune loaded")]
    NoTune,

    /// Rendering needs a selected song.
    #[error("no song selected")]
    NoSong,

    /// The subsong is outside the tune's range.
    #[error("subsong {requested} out of range (1..={songs})")]
    InvalidSubsong { requested: u32, songs: u32 },

    /// A configuration value the engine cannot honour.
    #[error("unsupported configuration: {0}")]
    Unsupported(String),

    /// The tune file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tune file is not in a recognised format.
    #[error("failed to parse {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: TuneFormatError,
    },
}

/// The three C64 ROM images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roms {
    pub kernal: Vec<u8>,
    pub basic: Vec<u8>,
    pub chargen: Vec<u8>,
}

/// An audio-synthesis backend.
///
/// Each request kind maps onto exactly one of these methods; the dispatch
/// loop is the only caller.
pub trait Engine {
    /// Install ROM images for tunes that need the real C64 environment.
    fn set_roms(&mut self, roms: &Roms);

    /// Load a tune file, replacing any previous tune.
    fn load_tune(&mut self, path: &Path) -> Result<LoadedTune, EngineError>;

    /// Apply a new engine configuration.
    fn configure(&mut self, config: &PlayerConfig) -> Result<(), EngineError>;

    /// Render up to `out.len()` samples and return how many were produced.
    fn render(&mut self, out: &mut [i16]) -> Result<usize, EngineError>;

    /// Metadata of `subsong`, if a tune is loaded and the subsong exists.
    fn tune_info(&self, subsong: u32) -> Option<SongInfo>;

    /// Select `subsong` and load it for playback.
    fn select_song(&mut self, subsong: u32) -> Result<(), EngineError>;

    /// Mute or unmute one voice of one SID chip.
    fn mute(&mut self, sid: usize, voice: usize, muted: bool);
}
