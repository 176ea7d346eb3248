use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sidpipe_player::PsidTune;
use sidpipe_proto::SongInfo;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SidOutput {
    base_address: String,
    model: String,
}

#[derive(Serialize)]
pub struct TuneOutput {
    path: String,
    format: String,
    version: u16,
    md5: String,
    songs: u32,
    start_song: u32,
    subsong: u32,
    load_address: String,
    init_address: String,
    play_address: String,
    compatibility: String,
    song_speed: String,
    clock_speed: String,
    sids: Vec<SidOutput>,
    name: String,
    author: String,
    released: String,
}

impl TuneOutput {
    pub fn new(path: &Path, tune: &PsidTune, subsong: u32, info: &SongInfo) -> Self {
        let text = |i: usize| info.info_strings.get(i).cloned().unwrap_or_default();
        Self {
            path: path.display().to_string(),
            format: info.format.clone(),
            version: tune.version(),
            md5: tune.md5(),
            songs: tune.songs(),
            start_song: tune.start_song(),
            subsong,
            load_address: address(info.load_address),
            init_address: address(info.init_address),
            play_address: address(info.play_address),
            compatibility: info.compatibility.to_string(),
            song_speed: info.song_speed.to_string(),
            clock_speed: info.clock_speed.to_string(),
            sids: info
                .sids
                .iter()
                .map(|sid| SidOutput {
                    base_address: address(sid.base_address),
                    model: sid.model.to_string(),
                })
                .collect(),
            name: text(0),
            author: text(1),
            released: text(2),
        }
    }
}

pub fn print_tune(out: &TuneOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let sids = out
                .sids
                .iter()
                .map(|sid| format!("{} {}", sid.base_address, sid.model))
                .collect::<Vec<_>>()
                .join(", ");
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in [
                ("Name", out.name.clone()),
                ("Author", out.author.clone()),
                ("Released", out.released.clone()),
                ("Format", out.format.clone()),
                ("Songs", format!("{} (start {})", out.songs, out.start_song)),
                ("Subsong", out.subsong.to_string()),
                ("Load", out.load_address.clone()),
                ("Init", out.init_address.clone()),
                ("Play", out.play_address.clone()),
                ("Speed", out.song_speed.clone()),
                ("Clock", out.clock_speed.clone()),
                ("Compatibility", out.compatibility.clone()),
                ("SIDs", sids),
                ("MD5", out.md5.clone()),
            ] {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} by {} ({})", out.name, out.author, out.released);
            println!(
                "  {} v{}, song {}/{} ({}, {})",
                out.format, out.version, out.subsong, out.songs, out.song_speed, out.clock_speed
            );
            println!(
                "  load={} init={} play={}",
                out.load_address, out.init_address, out.play_address
            );
            for sid in &out.sids {
                println!("  sid {} {}", sid.base_address, sid.model);
            }
            println!("  md5 {}", out.md5);
        }
    }
}

fn address(value: u32) -> String {
    format!("${value:04X}")
}
