use std::io::{Read, Write};
use std::path::Path;

use sidpipe_frame::Message;
use sidpipe_proto::{
    LoadFileRequest, LoadFileResponse, LoadRomsRequest, LoadedTune, MuteChannelsRequest,
    PlaySongRequest, PlayerConfig, ProtoError, ReadAudioRequest, ReadAudioResponse, Request,
    SongInfo, SongInfoRequest, SongInfoResponse, StatusResponse,
};
use tracing::debug;

use crate::error::ClientError;

type Result<T> = std::result::Result<T, ClientError>;

/// The controlling side of the protocol.
///
/// Every call sends one request and blocks until its response arrives.
pub struct Client<R, W> {
    reader: R,
    writer: W,
    request: Message,
    response: Message,
}

impl<R: Read, W: Write> Client<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            request: Message::new(),
            response: Message::new(),
        }
    }

    /// Load a tune. `None` means the helper could not load it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Option<LoadedTune>> {
        let request = Request::LoadFile(LoadFileRequest::new(path.as_ref()));
        self.call(&request)?;
        Ok(LoadFileResponse::read(&mut self.response)?.tune)
    }

    pub fn set_config(&mut self, config: PlayerConfig) -> Result<bool> {
        self.call(&Request::SetConfig(config))?;
        self.status()
    }

    pub fn read_audio(&mut self, sample_count: u32) -> Result<ReadAudioResponse> {
        self.call(&Request::ReadAudio(ReadAudioRequest { sample_count }))?;
        Ok(ReadAudioResponse::read(&mut self.response)?)
    }

    pub fn song_info(&mut self, subsong: u32) -> Result<Option<SongInfo>> {
        self.call(&Request::SongInfo(SongInfoRequest { subsong }))?;
        Ok(SongInfoResponse::read(&mut self.response)?.info)
    }

    pub fn play_song(&mut self, subsong: u32) -> Result<bool> {
        self.call(&Request::PlaySong(PlaySongRequest { subsong }))?;
        self.status()
    }

    pub fn load_roms(
        &mut self,
        kernal: impl AsRef<Path>,
        basic: impl AsRef<Path>,
        chargen: impl AsRef<Path>,
    ) -> Result<bool> {
        let request = LoadRomsRequest {
            kernal: kernal.as_ref().to_path_buf(),
            basic: basic.as_ref().to_path_buf(),
            chargen: chargen.as_ref().to_path_buf(),
        };
        self.call(&Request::LoadRoms(request))?;
        self.status()
    }

    pub fn mute_channels(&mut self, muted_channels: u32) -> Result<bool> {
        self.call(&Request::MuteChannels(MuteChannelsRequest { muted_channels }))?;
        self.status()
    }

    /// Send a frame with an arbitrary id and payload.
    pub fn send_raw(&mut self, id: u32, content: &[u8]) -> Result<()> {
        self.request.clear();
        self.request.set_id(id);
        self.request.write_blob(content)?;
        self.request.send(&mut self.writer)?;
        Ok(())
    }

    /// Receive the next frame without interpreting it.
    pub fn recv_raw(&mut self) -> Result<&mut Message> {
        self.response.receive(&mut self.reader)?;
        Ok(&mut self.response)
    }

    pub fn get_ref(&self) -> (&R, &W) {
        (&self.reader, &self.writer)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn call(&mut self, request: &Request) -> Result<()> {
        let id = request.id();
        request.encode(&mut self.request)?;
        self.request.send(&mut self.writer)?;
        debug!(request = %id, "request sent");

        self.response.receive(&mut self.reader)?;
        let expected = id.response();
        if self.response.id() != expected.as_wire() {
            return Err(ProtoError::UnexpectedMessage {
                expected,
                actual: self.response.id(),
            }
            .into());
        }
        Ok(())
    }

    fn status(&mut self) -> Result<bool> {
        Ok(StatusResponse::read(&mut self.response)?.success)
    }
}

impl<R, W> std::fmt::Debug for Client<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("request", &self.request)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}
