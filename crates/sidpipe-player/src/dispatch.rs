use std::io::{Read, Write};

use sidpipe_frame::{FrameError, Message};
use sidpipe_proto::{
    write_failure, LoadFileResponse, MessageId, ReadAudioResponse, Request, SongInfoResponse,
    StatusResponse, MAX_SAMPLES,
};
use tracing::{debug, error, info, warn};

use crate::engine::Engine;
use crate::error::{DispatchError, Result};
use crate::rom::load_roms;

/// Channels addressable by the mute mask.
pub const CHANNEL_COUNT: u32 = 6;

/// Voices per SID chip; channel `i` is voice `i % 3` of SID `i / 3`.
pub const VOICES_PER_SID: u32 = 3;

/// Where the dispatch loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Blocked on the next request.
    AwaitingRequest,
    /// Handling a received request.
    Processing,
    /// The loop has ended; no further requests are served.
    Terminated,
}

/// Pairs each incoming request with exactly one outgoing response.
///
/// Single-threaded and synchronous: a request is received, handled and
/// answered before the next one is read.
pub struct Dispatcher<E> {
    engine: E,
    request: Message,
    response: Message,
    samples: Vec<i16>,
    muted_channels: u32,
    state: State,
}

impl<E: Engine> Dispatcher<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            request: Message::new(),
            response: Message::new(),
            samples: vec![0; MAX_SAMPLES],
            muted_channels: 0,
            state: State::AwaitingRequest,
        }
    }

    /// Serve requests until the input closes or a fatal error occurs.
    ///
    /// A clean close between frames returns `Ok(())`.
    pub fn run<R: Read + ?Sized, W: Write + ?Sized>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        info!("dispatch loop started");
        while self.state != State::Terminated {
            self.step(input, output)?;
        }
        Ok(())
    }

    /// Receive, handle and answer one request.
    pub fn step<R: Read + ?Sized, W: Write + ?Sized>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<State> {
        self.state = State::AwaitingRequest;
        match self.request.receive(input) {
            Ok(()) => {}
            Err(FrameError::ConnectionClosed) => {
                info!("input closed, stopping");
                return Ok(self.terminate());
            }
            Err(err) => {
                error!(error = %err, "receive failed");
                self.terminate();
                return Err(DispatchError::Receive(err));
            }
        }

        self.state = State::Processing;
        let raw = self.request.id();
        let Some(id) = MessageId::from_wire(raw).filter(|id| id.is_request()) else {
            error!(id = raw, "unknown request id");
            self.terminate();
            return Err(DispatchError::UnknownRequest(raw));
        };
        debug!(
            request = %id,
            length = self.request.content_length(),
            "processing request"
        );

        let response_id = id.response();
        self.response.clear();
        self.response.set_id(response_id.as_wire());

        let encoded = match Request::read(id, &mut self.request) {
            Ok(request) => self.handle(request),
            Err(err) => {
                warn!(request = %id, error = %err, "malformed request");
                write_failure(response_id, &mut self.response)
            }
        };
        if let Err(source) = encoded {
            self.terminate();
            return Err(DispatchError::Encode {
                id: response_id,
                source,
            });
        }

        if let Err(err) = self.response.send(output) {
            error!(error = %err, "send failed");
            self.terminate();
            return Err(DispatchError::Send(err));
        }

        self.state = State::AwaitingRequest;
        Ok(self.state)
    }

    fn handle(&mut self, request: Request) -> sidpipe_proto::Result<()> {
        match request {
            Request::LoadFile(req) => {
                info!(path = %req.path.display(), "loading tune");
                let tune = match self.engine.load_tune(&req.path) {
                    Ok(tune) => Some(tune),
                    Err(err) => {
                        warn!(error = %err, "tune load failed");
                        None
                    }
                };
                LoadFileResponse { tune }.write(&mut self.response)
            }
            Request::SetConfig(config) => {
                let success = match self.engine.configure(&config) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "configuration rejected");
                        false
                    }
                };
                StatusResponse::new(success).write(&mut self.response)
            }
            Request::ReadAudio(req) => {
                let count = (req.sample_count as usize).min(MAX_SAMPLES);
                match self.engine.render(&mut self.samples[..count]) {
                    Ok(rendered) => {
                        let rendered = rendered.min(count);
                        ReadAudioResponse::write_samples(
                            true,
                            &self.samples[..rendered],
                            &mut self.response,
                        )
                    }
                    Err(err) => {
                        warn!(error = %err, "render failed");
                        ReadAudioResponse::write_samples(false, &[], &mut self.response)
                    }
                }
            }
            Request::SongInfo(req) => {
                let info = self.engine.tune_info(req.subsong);
                if info.is_none() {
                    warn!(subsong = req.subsong, "no song info available");
                }
                SongInfoResponse { info }.write(&mut self.response)
            }
            Request::PlaySong(req) => {
                let success = match self.engine.select_song(req.subsong) {
                    Ok(()) => {
                        self.apply_mute();
                        true
                    }
                    Err(err) => {
                        warn!(subsong = req.subsong, error = %err, "song selection failed");
                        false
                    }
                };
                StatusResponse::new(success).write(&mut self.response)
            }
            Request::LoadRoms(req) => {
                let success = match load_roms(&req) {
                    Ok(roms) => {
                        self.engine.set_roms(&roms);
                        true
                    }
                    Err(err) => {
                        warn!(error = %err, "ROM load failed");
                        false
                    }
                };
                StatusResponse::new(success).write(&mut self.response)
            }
            Request::MuteChannels(req) => {
                self.muted_channels = req.muted_channels;
                self.apply_mute();
                StatusResponse::new(true).write(&mut self.response)
            }
        }
    }

    fn apply_mute(&mut self) {
        for channel in 0..CHANNEL_COUNT {
            let muted = self.muted_channels & (1 << channel) != 0;
            self.engine.mute(
                (channel / VOICES_PER_SID) as usize,
                (channel % VOICES_PER_SID) as usize,
                muted,
            );
        }
    }

    fn terminate(&mut self) -> State {
        self.state = State::Terminated;
        self.state
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The most recent mute mask.
    pub fn muted_channels(&self) -> u32 {
        self.muted_channels
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use sidpipe_proto::{
        LoadedTune, MuteChannelsRequest, PlaySongRequest, PlayerConfig, ReadAudioRequest,
        SongInfo, SongInfoRequest,
    };

    use super::*;
    use crate::engine::{EngineError, Roms};

    #[derive(Default)]
    struct RecordingEngine {
        mutes: Vec<(usize, usize, bool)>,
        rendered: usize,
        selected: Option<u32>,
        songs: Option<u32>,
    }

    impl Engine for RecordingEngine {
        fn set_roms(&mut self, _roms: &Roms) {}

        fn load_tune(&mut self, path: &Path) -> std::result::Result<LoadedTune, EngineError> {
            Err(EngineError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        fn configure(&mut self, _config: &PlayerConfig) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn render(&mut self, out: &mut [i16]) -> std::result::Result<usize, EngineError> {
            out.fill(7);
            self.rendered += out.len();
            Ok(out.len())
        }

        fn tune_info(&self, _subsong: u32) -> Option<SongInfo> {
            None
        }

        fn select_song(&mut self, subsong: u32) -> std::result::Result<(), EngineError> {
            if let Some(songs) = self.songs {
                if subsong == 0 || subsong > songs {
                    return Err(EngineError::InvalidSubsong {
                        requested: subsong,
                        songs,
                    });
                }
            }
            self.selected = Some(subsong);
            Ok(())
        }

        fn mute(&mut self, sid: usize, voice: usize, muted: bool) {
            self.mutes.push((sid, voice, muted));
        }
    }

    fn wire(requests: &[Request]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut msg = Message::new();
        for request in requests {
            request.encode(&mut msg).unwrap();
            msg.send(&mut bytes).unwrap();
        }
        bytes
    }

    fn responses(bytes: Vec<u8>) -> Vec<Message> {
        let mut stream = Cursor::new(bytes);
        let mut out = Vec::new();
        loop {
            let mut msg = Message::new();
            match msg.receive(&mut stream) {
                Ok(()) => out.push(msg),
                Err(FrameError::ConnectionClosed) => return out,
                Err(err) => panic!("bad response stream: {err}"),
            }
        }
    }

    #[test]
    fn one_response_per_request() {
        let input = wire(&[
            Request::ReadAudio(ReadAudioRequest { sample_count: 10 }),
            Request::SongInfo(SongInfoRequest { subsong: 1 }),
            Request::SetConfig(PlayerConfig::default()),
        ]);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());

        dispatcher.run(&mut Cursor::new(input), &mut output).unwrap();

        let ids: Vec<u32> = responses(output).iter().map(Message::id).collect();
        assert_eq!(ids, vec![6, 8, 4]);
        assert_eq!(dispatcher.state(), State::Terminated);
    }

    #[test]
    fn render_is_capped_to_capacity() {
        let input = wire(&[Request::ReadAudio(ReadAudioRequest {
            sample_count: (MAX_SAMPLES * 2) as u32,
        })]);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        dispatcher.run(&mut Cursor::new(input), &mut output).unwrap();

        let mut response = responses(output).remove(0);
        let audio = ReadAudioResponse::read(&mut response).unwrap();
        assert!(audio.success);
        assert_eq!(audio.samples.len(), MAX_SAMPLES);
        assert_eq!(dispatcher.engine().rendered, MAX_SAMPLES);
    }

    #[test]
    fn mute_mask_maps_to_sid_and_voice() {
        let input = wire(&[Request::MuteChannels(MuteChannelsRequest {
            muted_channels: 0b10_0101,
        })]);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        dispatcher.run(&mut Cursor::new(input), &mut output).unwrap();

        assert_eq!(dispatcher.muted_channels(), 0b10_0101);
        assert_eq!(
            dispatcher.engine().mutes,
            vec![
                (0, 0, true),
                (0, 1, false),
                (0, 2, true),
                (1, 0, false),
                (1, 1, false),
                (1, 2, true),
            ]
        );
    }

    #[test]
    fn play_song_reapplies_mute_mask() {
        let input = wire(&[
            Request::MuteChannels(MuteChannelsRequest { muted_channels: 0b1 }),
            Request::PlaySong(PlaySongRequest { subsong: 1 }),
        ]);
        let mut input = Cursor::new(input);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());

        dispatcher.step(&mut input, &mut output).unwrap();
        dispatcher.engine_mut().mutes.clear();
        dispatcher.step(&mut input, &mut output).unwrap();

        let mutes = &dispatcher.engine().mutes;
        assert_eq!(mutes.len(), CHANNEL_COUNT as usize);
        assert_eq!(mutes[0], (0, 0, true));
        assert!(mutes[1..].iter().all(|&(_, _, muted)| !muted));
        assert_eq!(dispatcher.engine().selected, Some(1));
    }

    #[test]
    fn failed_play_song_leaves_mutes_alone() {
        let input = wire(&[
            Request::MuteChannels(MuteChannelsRequest { muted_channels: 0b1 }),
            Request::PlaySong(PlaySongRequest { subsong: 9 }),
        ]);
        let mut input = Cursor::new(input);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine {
            songs: Some(3),
            ..RecordingEngine::default()
        });

        dispatcher.step(&mut input, &mut output).unwrap();
        dispatcher.engine_mut().mutes.clear();
        dispatcher.step(&mut input, &mut output).unwrap();

        assert!(dispatcher.engine().mutes.is_empty());
        assert_eq!(dispatcher.engine().selected, None);
        let mut replies = responses(output);
        assert!(!StatusResponse::read(&mut replies[1]).unwrap().success);
    }

    #[test]
    fn malformed_request_gets_failure_and_loop_continues() {
        let mut input = Vec::new();
        let mut msg = Message::new();
        msg.set_id(MessageId::SetConfigRequest.as_wire());
        msg.write_u32(1).unwrap();
        msg.send(&mut input).unwrap();
        input.extend(wire(&[Request::MuteChannels(MuteChannelsRequest {
            muted_channels: 0,
        })]));

        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        dispatcher.run(&mut Cursor::new(input), &mut output).unwrap();

        let mut replies = responses(output);
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].id(), 4);
        assert!(!StatusResponse::read(&mut replies[0]).unwrap().success);
        assert!(StatusResponse::read(&mut replies[1]).unwrap().success);
    }

    #[test]
    fn unknown_id_terminates_without_response() {
        let mut input = Vec::new();
        let mut msg = Message::new();
        msg.set_id(999);
        msg.send(&mut input).unwrap();
        input.extend(wire(&[Request::ReadAudio(ReadAudioRequest { sample_count: 1 })]));

        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        let err = dispatcher
            .run(&mut Cursor::new(input), &mut output)
            .unwrap_err();

        assert!(matches!(err, DispatchError::UnknownRequest(999)));
        assert!(output.is_empty());
        assert_eq!(dispatcher.state(), State::Terminated);
        assert_eq!(dispatcher.engine().rendered, 0);
    }

    #[test]
    fn response_id_as_request_terminates() {
        let mut input = Vec::new();
        let mut msg = Message::new();
        msg.set_id(MessageId::LoadFileResponse.as_wire());
        msg.send(&mut input).unwrap();

        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        let err = dispatcher
            .run(&mut Cursor::new(input), &mut output)
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownRequest(2)));
        assert!(output.is_empty());
    }

    #[test]
    fn truncated_frame_is_receive_error() {
        let mut input = wire(&[Request::SongInfo(SongInfoRequest { subsong: 1 })]);
        input.pop();

        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        let err = dispatcher
            .run(&mut Cursor::new(input), &mut output)
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Receive(FrameError::Truncated { .. })
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn step_reports_state() {
        let input = wire(&[Request::SongInfo(SongInfoRequest { subsong: 2 })]);
        let mut input = Cursor::new(input);
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());

        assert_eq!(
            dispatcher.step(&mut input, &mut output).unwrap(),
            State::AwaitingRequest
        );
        assert_eq!(
            dispatcher.step(&mut input, &mut output).unwrap(),
            State::Terminated
        );
    }

    #[test]
    fn failed_send_is_fatal() {
        let input = wire(&[Request::SongInfo(SongInfoRequest { subsong: 1 })]);
        let mut dispatcher = Dispatcher::new(RecordingEngine::default());
        let err = dispatcher
            .run(&mut Cursor::new(input), &mut ClosedWriter)
            .unwrap_err();
        assert!(matches!(err, DispatchError::Send(FrameError::ConnectionClosed)));
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
