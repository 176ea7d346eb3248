//! Loading of C64 ROM images from disk.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sidpipe_proto::LoadRomsRequest;

use crate::engine::Roms;

pub const KERNAL_SIZE: usize = 8192;
pub const BASIC_SIZE: usize = 8192;
pub const CHARGEN_SIZE: usize = 4096;

/// Read the first `size` bytes of `path`. Shorter files are an error.
pub fn load_rom(path: &Path, size: usize) -> io::Result<Vec<u8>> {
    let mut rom = vec![0u8; size];
    File::open(path)?.read_exact(&mut rom)?;
    Ok(rom)
}

/// Read all three ROM images named by `request`.
pub fn load_roms(request: &LoadRomsRequest) -> io::Result<Roms> {
    Ok(Roms {
        kernal: load_rom(&request.kernal, KERNAL_SIZE)?,
        basic: load_rom(&request.basic, BASIC_SIZE)?,
        chargen: load_rom(&request.chargen, CHARGEN_SIZE)?,
    })
}
