//! RTMP playback session.
//!
//! A session consumes one stream descriptor and drives one connection
//! through the platform's fixed sequence: handshake, `connect` carrying the
//! player SWF URL, the usher token, `createStream`, then `play`. The
//! packaged client session of the RTMP crate has no hook for the platform
//! connect-object properties or the token command, so the sequence is
//! driven over its public handshake, message, and chunk layers instead.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use rml_rtmp::chunk_io::{ChunkDeserializer, ChunkSerializer, Packet};
use rml_rtmp::handshake::{Handshake, HandshakeProcessResult, PeerType};
use rml_rtmp::messages::{MessagePayload, RtmpMessage, UserControlEventType};
use rml_rtmp::rml_amf0::Amf0Value;
use rml_rtmp::time::RtmpTimestamp;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::time::timeout;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use jtv_resolver::StreamDescriptor;

use crate::error::{connect_error, ConnectStage, TransportError};
use crate::flv::FlvStream;
use crate::state::SessionState;
use crate::{TransportResult, DEFAULT_RTMP_PORT, FLASH_VERSION, PLAYER_SWF_URL};

const CONNECT_TRANSACTION_ID: f64 = 1.0;
const CREATE_STREAM_TRANSACTION_ID: f64 = 2.0;

/// AMF0 command delivering the resolver token after connect acceptance.
const USHER_TOKEN_COMMAND: &str = "NetStream.Authenticate.UsherToken";

/// `play` start argument: live if available, recorded otherwise.
const PLAY_START_LIVE: f64 = -2000.0;

/// Buffer length announced to the server once playback is requested.
const PLAYBACK_BUFFER_MS: u32 = 30_000;

/// Bound on each wait for a command response during connect.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

const READ_BUFFER_LEN: usize = 4096;

/// Platform handshake options applied during the connect sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Player SWF URL sent in the connect command object.
    pub swf_url: String,

    /// Playback authorization token from the stream descriptor.
    pub token: String,
}

impl PlaybackOptions {
    /// Options carrying the platform player SWF and the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            swf_url: PLAYER_SWF_URL.to_string(),
            token: token.into(),
        }
    }
}

/// An RTMP playback session for one live stream.
///
/// The playback URL is derived as `connect + "/" + play` from the
/// descriptor. Media is pulled on demand with [`read`](Self::read); nothing
/// is read ahead beyond the remainder of the message currently being
/// delivered.
pub struct RtmpSession {
    playback_url: String,
    tc_url: String,
    host: String,
    port: u16,
    app: String,
    stream_key: String,
    options: PlaybackOptions,
    state: SessionState,
    runtime: Option<Runtime>,
    conn: Option<Connection>,
    flv: FlvStream,
    end_of_stream: bool,
}

impl RtmpSession {
    /// Build a session from a descriptor, with the platform player SWF.
    pub fn new(descriptor: StreamDescriptor) -> TransportResult<Self> {
        Self::with_swf_url(descriptor, PLAYER_SWF_URL)
    }

    /// Build a session from a descriptor with an alternate player SWF URL.
    ///
    /// The descriptor is consumed here; it has no further use once the
    /// playback URL and handshake options are derived.
    pub fn with_swf_url(
        descriptor: StreamDescriptor,
        swf_url: impl Into<String>,
    ) -> TransportResult<Self> {
        let playback_url = format!("{}/{}", descriptor.connect, descriptor.play);
        let endpoint = RtmpEndpoint::parse(&descriptor.connect)?;

        let options = PlaybackOptions {
            swf_url: swf_url.into(),
            token: descriptor.token,
        };
        if options.swf_url.is_empty() {
            return Err(connect_error(ConnectStage::Options, "Empty player SWF URL"));
        }
        if options.token.is_empty() {
            return Err(connect_error(ConnectStage::Options, "Empty playback token"));
        }

        Ok(Self {
            playback_url,
            tc_url: descriptor.connect,
            host: endpoint.host,
            port: endpoint.port,
            app: endpoint.app,
            stream_key: descriptor.play,
            options,
            state: SessionState::Unconnected,
            runtime: None,
            conn: None,
            flv: FlvStream::new(),
            end_of_stream: false,
        })
    }

    /// The derived playback URL.
    pub fn playback_url(&self) -> &str {
        &self.playback_url
    }

    /// The handshake options applied at connect time.
    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Connect to the server and start the stream.
    ///
    /// Runs the RTMP handshake, the application-level connect carrying the
    /// handshake options, the usher token, and the stream-connect
    /// (`createStream` + `play`). Any failure moves the session to
    /// `Failed` with everything already allocated released.
    #[instrument(name = "rtmp_connect", skip(self), fields(url = %self.playback_url))]
    pub fn connect(&mut self) -> TransportResult<()> {
        if !self.state.is_unconnected() {
            return Err(TransportError::AlreadyConnected);
        }

        info!(host = %self.host, port = self.port, app = %self.app, "Connecting to RTMP server");

        let runtime = Runtime::new().map_err(TransportError::Io)?;
        let result = runtime.block_on(establish(
            &self.host,
            self.port,
            &self.app,
            &self.stream_key,
            &self.tc_url,
            &self.options,
            &mut self.flv,
        ));

        match result {
            Ok(conn) => {
                self.conn = Some(conn);
                self.runtime = Some(runtime);
                self.state = SessionState::Connected;
                info!("RTMP session established");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                self.flv.clear();
                Err(e)
            }
        }
    }

    /// Read up to `max_len` bytes of FLV-framed media.
    ///
    /// Blocks until media is available. `Ok(None)` signals clean end of
    /// stream and is not an error; callers must stop reading. Any error is
    /// fatal for the session — there is no partial recovery.
    pub fn read(&mut self, max_len: usize) -> TransportResult<Option<Bytes>> {
        match self.state {
            SessionState::Connected => {
                debug!("First read; session is now streaming");
                self.state = SessionState::Streaming;
            }
            SessionState::Streaming => {}
            _ => return Err(TransportError::NotConnected),
        }

        while self.flv.is_empty() && !self.end_of_stream {
            let outcome = {
                let runtime = self.runtime.as_ref().ok_or(TransportError::NotConnected)?;
                let conn = self.conn.as_mut().ok_or(TransportError::NotConnected)?;
                runtime.block_on(conn.pump(&mut self.flv))
            };

            match outcome {
                Ok(false) => {}
                Ok(true) => {
                    debug!("End of stream reached");
                    self.end_of_stream = true;
                }
                Err(e) => {
                    warn!("Read failed, session is dead: {}", e);
                    self.state = SessionState::Failed;
                    self.conn = None;
                    self.runtime = None;
                    return Err(e);
                }
            }
        }

        if self.flv.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.flv.take(max_len)))
    }

    /// Close the session and release the connection.
    ///
    /// Idempotent; closing an unconnected or already-closed session is a
    /// no-op, never an error.
    #[instrument(name = "rtmp_close", skip(self))]
    pub fn close(&mut self) {
        if !matches!(
            self.state,
            SessionState::Connected | SessionState::Streaming | SessionState::Failed
        ) {
            return;
        }

        debug!("Closing RTMP session");
        self.conn = None;
        self.runtime = None;
        self.flv.clear();
        self.end_of_stream = false;
        self.state = SessionState::Closed;
    }
}

impl Drop for RtmpSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Host, port, and application name from a connect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RtmpEndpoint {
    host: String,
    port: u16,
    app: String,
}

impl RtmpEndpoint {
    fn parse(connect_url: &str) -> TransportResult<Self> {
        let parsed = Url::parse(connect_url).map_err(|e| {
            connect_error(ConnectStage::UrlSetup, format!("Invalid connect URL: {e}"))
        })?;

        if parsed.scheme() != "rtmp" {
            return Err(connect_error(
                ConnectStage::UrlSetup,
                "Connect URL must start with rtmp://",
            ));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| connect_error(ConnectStage::UrlSetup, "Connect URL is missing a host"))?
            .to_string();
        let port = parsed.port().unwrap_or(DEFAULT_RTMP_PORT);
        let app = parsed.path().trim_start_matches('/').to_string();

        if app.is_empty() {
            return Err(connect_error(
                ConnectStage::UrlSetup,
                "Connect URL is missing an application name",
            ));
        }

        Ok(Self { host, port, app })
    }
}

/// Server-driven occurrences surfaced while pumping the connection.
#[derive(Debug)]
enum ServerEvent {
    /// `_result` for a pending transaction.
    CommandResult {
        transaction_id: f64,
        additional_arguments: Vec<Amf0Value>,
    },

    /// `_error` for a pending transaction.
    CommandError { code: Option<String> },

    /// `onStatus` notification.
    Status {
        level: Option<String>,
        code: Option<String>,
    },

    /// The server closed the connection or signalled end of stream.
    EndOfStream,
}

/// One live RTMP connection with its chunk-stream state.
struct Connection {
    stream: TcpStream,
    serializer: ChunkSerializer,
    deserializer: ChunkDeserializer,
    outbox: Vec<Packet>,
    ack_window: Option<u32>,
    received_bytes: u64,
    acked_bytes: u64,
}

impl Connection {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            serializer: ChunkSerializer::new(),
            deserializer: ChunkDeserializer::new(),
            outbox: Vec::new(),
            ack_window: None,
            received_bytes: 0,
            acked_bytes: 0,
        }
    }

    /// Serialize and send one outbound message.
    async fn send(&mut self, message: RtmpMessage, stream_id: u32) -> TransportResult<()> {
        let packet = self.serialize(message, stream_id)?;
        self.stream
            .write_all(&packet.bytes)
            .await
            .map_err(|e| TransportError::Read(format!("Socket write failed: {e}")))?;
        Ok(())
    }

    fn serialize(&mut self, message: RtmpMessage, stream_id: u32) -> TransportResult<Packet> {
        let payload = message
            .into_message_payload(RtmpTimestamp::new(0), stream_id)
            .map_err(|e| TransportError::Read(format!("Message serialization failed: {:?}", e)))?;
        self.serializer
            .serialize(&payload, false, false)
            .map_err(|e| TransportError::Read(format!("Chunk serialization failed: {:?}", e)))
    }

    /// One blocking socket read, demuxed into events; media goes into `flv`.
    async fn recv(&mut self, flv: &mut FlvStream) -> TransportResult<Vec<ServerEvent>> {
        let mut buf = vec![0u8; READ_BUFFER_LEN];
        let n = self
            .stream
            .read(&mut buf)
            .await
            .map_err(|e| TransportError::Read(format!("Socket read failed: {e}")))?;

        if n == 0 {
            return Ok(vec![ServerEvent::EndOfStream]);
        }

        self.received_bytes += n as u64;
        let events = self.ingest(&buf[..n], flv)?;
        self.flush().await?;
        Ok(events)
    }

    /// Feed raw bytes through the chunk deserializer.
    fn ingest(&mut self, bytes: &[u8], flv: &mut FlvStream) -> TransportResult<Vec<ServerEvent>> {
        let mut events = Vec::new();
        let mut input = bytes;

        loop {
            let payload = self
                .deserializer
                .get_next_message(input)
                .map_err(|e| TransportError::Read(format!("Chunk parse failed: {:?}", e)))?;
            match payload {
                Some(payload) => {
                    self.process(&payload, flv, &mut events)?;
                    input = &[];
                }
                None => break,
            }
        }

        self.queue_acknowledgement()?;
        Ok(events)
    }

    /// Write out any queued control responses.
    async fn flush(&mut self) -> TransportResult<()> {
        for packet in std::mem::take(&mut self.outbox) {
            self.stream
                .write_all(&packet.bytes)
                .await
                .map_err(|e| TransportError::Read(format!("Socket write failed: {e}")))?;
        }
        Ok(())
    }

    fn process(
        &mut self,
        payload: &MessagePayload,
        flv: &mut FlvStream,
        events: &mut Vec<ServerEvent>,
    ) -> TransportResult<()> {
        let message = payload
            .to_rtmp_message()
            .map_err(|e| TransportError::Read(format!("Message parse failed: {:?}", e)))?;

        match message {
            RtmpMessage::AudioData { data } => flv.append_audio(&data, payload.timestamp.value),
            RtmpMessage::VideoData { data } => flv.append_video(&data, payload.timestamp.value),
            RtmpMessage::Amf0Data { values } => flv.append_script(values, payload.timestamp.value)?,
            RtmpMessage::Amf0Command {
                command_name,
                transaction_id,
                additional_arguments,
                ..
            } => match command_name.as_str() {
                "_result" => events.push(ServerEvent::CommandResult {
                    transaction_id,
                    additional_arguments,
                }),
                "_error" => events.push(ServerEvent::CommandError {
                    code: info_field(&additional_arguments, "code"),
                }),
                "onStatus" => events.push(ServerEvent::Status {
                    level: info_field(&additional_arguments, "level"),
                    code: info_field(&additional_arguments, "code"),
                }),
                other => debug!(command = %other, "Ignoring server command"),
            },
            RtmpMessage::SetChunkSize { size } => {
                trace!(size, "Server changed chunk size");
                self.deserializer
                    .set_max_chunk_size(size as usize)
                    .map_err(|e| TransportError::Read(format!("Invalid chunk size: {:?}", e)))?;
            }
            RtmpMessage::WindowAcknowledgement { size } => {
                trace!(size, "Server set acknowledgement window");
                self.ack_window = Some(size);
            }
            RtmpMessage::UserControl {
                event_type,
                timestamp,
                ..
            } => match event_type {
                UserControlEventType::PingRequest => {
                    let pong = RtmpMessage::UserControl {
                        event_type: UserControlEventType::PingResponse,
                        stream_id: None,
                        buffer_length: None,
                        timestamp,
                    };
                    let packet = self.serialize(pong, 0)?;
                    self.outbox.push(packet);
                }
                UserControlEventType::StreamEof => events.push(ServerEvent::EndOfStream),
                other => trace!(event = ?other, "Ignoring user control event"),
            },
            other => trace!(message = ?other, "Ignoring protocol message"),
        }

        Ok(())
    }

    /// Acknowledge received bytes once the server's window is exceeded.
    fn queue_acknowledgement(&mut self) -> TransportResult<()> {
        let Some(window) = self.ack_window else {
            return Ok(());
        };
        if window == 0 || self.received_bytes - self.acked_bytes < u64::from(window) {
            return Ok(());
        }

        self.acked_bytes = self.received_bytes;
        let ack = RtmpMessage::Acknowledgement {
            sequence_number: self.received_bytes as u32,
        };
        let packet = self.serialize(ack, 0)?;
        self.outbox.push(packet);
        Ok(())
    }

    /// Pump the connection once during streaming.
    ///
    /// Returns `true` at end of stream.
    async fn pump(&mut self, flv: &mut FlvStream) -> TransportResult<bool> {
        let events = self.recv(flv).await?;
        for event in events {
            match event {
                ServerEvent::EndOfStream => return Ok(true),
                ServerEvent::Status { level, code } => {
                    let code = code.unwrap_or_default();
                    if is_end_of_stream_code(&code) {
                        return Ok(true);
                    }
                    if level.as_deref() == Some("error") {
                        return Err(TransportError::Read(format!("Server reported {code}")));
                    }
                    debug!(code = %code, "Stream status");
                }
                ServerEvent::CommandResult { .. } | ServerEvent::CommandError { .. } => {
                    trace!("Ignoring late command response");
                }
            }
        }
        Ok(false)
    }
}

/// Run the full connect sequence and hand back the live connection.
async fn establish(
    host: &str,
    port: u16,
    app: &str,
    stream_key: &str,
    tc_url: &str,
    options: &PlaybackOptions,
    flv: &mut FlvStream,
) -> TransportResult<Connection> {
    let addr = format!("{host}:{port}");
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| connect_error(ConnectStage::Connect, format!("TCP connect failed: {e}")))?;

    debug!("TCP connection established, starting handshake");
    let (stream, leftover) = perform_handshake(stream).await?;

    debug!("Handshake complete, requesting connection");
    let mut conn = Connection::new(stream);
    if !leftover.is_empty() {
        conn.ingest(&leftover, flv)
            .map_err(|e| e.into_connect(ConnectStage::Connect))?;
        conn.flush()
            .await
            .map_err(|e| e.into_connect(ConnectStage::Connect))?;
    }

    conn.send(connect_command(app, tc_url, options), 0)
        .await
        .map_err(|e| e.into_connect(ConnectStage::Connect))?;
    await_connect_accepted(&mut conn, flv).await?;

    debug!("Connection accepted, requesting stream");
    conn.send(usher_token_command(&options.token), 0)
        .await
        .map_err(|e| e.into_connect(ConnectStage::StreamConnect))?;
    conn.send(create_stream_command(), 0)
        .await
        .map_err(|e| e.into_connect(ConnectStage::StreamConnect))?;
    let stream_id = await_stream_created(&mut conn, flv).await?;

    debug!(stream_id, "Stream created, requesting playback");
    conn.send(play_command(stream_key), stream_id)
        .await
        .map_err(|e| e.into_connect(ConnectStage::StreamConnect))?;

    let buffer_length = RtmpMessage::UserControl {
        event_type: UserControlEventType::SetBufferLength,
        stream_id: Some(stream_id),
        buffer_length: Some(PLAYBACK_BUFFER_MS),
        timestamp: None,
    };
    conn.send(buffer_length, 0)
        .await
        .map_err(|e| e.into_connect(ConnectStage::StreamConnect))?;

    await_play_started(&mut conn, flv).await?;

    Ok(conn)
}

/// Drive the RTMP handshake to completion.
async fn perform_handshake(mut stream: TcpStream) -> TransportResult<(TcpStream, Vec<u8>)> {
    let stage = ConnectStage::Connect;
    let mut handshake = Handshake::new(PeerType::Client);

    let p0_p1 = handshake
        .generate_outbound_p0_and_p1()
        .map_err(|e| connect_error(stage, format!("Handshake generation failed: {:?}", e)))?;
    stream
        .write_all(&p0_p1)
        .await
        .map_err(|e| connect_error(stage, format!("Handshake write failed: {e}")))?;

    let mut buf = vec![0u8; 4096];
    loop {
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| connect_error(stage, format!("Handshake read failed: {e}")))?;
        if n == 0 {
            return Err(connect_error(stage, "Connection closed during handshake"));
        }

        match handshake.process_bytes(&buf[..n]) {
            Ok(HandshakeProcessResult::InProgress { response_bytes }) => {
                if !response_bytes.is_empty() {
                    stream
                        .write_all(&response_bytes)
                        .await
                        .map_err(|e| connect_error(stage, format!("Handshake write failed: {e}")))?;
                }
            }
            Ok(HandshakeProcessResult::Completed {
                response_bytes,
                remaining_bytes,
            }) => {
                if !response_bytes.is_empty() {
                    stream
                        .write_all(&response_bytes)
                        .await
                        .map_err(|e| connect_error(stage, format!("Handshake write failed: {e}")))?;
                }
                return Ok((stream, remaining_bytes));
            }
            Err(e) => {
                return Err(connect_error(stage, format!("Handshake failed: {:?}", e)));
            }
        }
    }
}

/// Wait for the `_result` of the connect transaction.
async fn await_connect_accepted(conn: &mut Connection, flv: &mut FlvStream) -> TransportResult<()> {
    let stage = ConnectStage::Connect;
    let wait = timeout(RESPONSE_TIMEOUT, async {
        loop {
            for event in conn.recv(flv).await? {
                match event {
                    ServerEvent::CommandResult {
                        transaction_id,
                        additional_arguments,
                    } if transaction_id == CONNECT_TRANSACTION_ID => {
                        let code = info_field(&additional_arguments, "code");
                        return match code.as_deref() {
                            None | Some("NetConnection.Connect.Success") => Ok(()),
                            Some(other) => Err(connect_error(
                                stage,
                                format!("Connection rejected: {other}"),
                            )),
                        };
                    }
                    ServerEvent::CommandError { code } => {
                        return Err(connect_error(
                            stage,
                            format!(
                                "Connection rejected: {}",
                                code.unwrap_or_else(|| "unknown error".to_string())
                            ),
                        ));
                    }
                    ServerEvent::EndOfStream => {
                        return Err(connect_error(stage, "Connection closed by server"));
                    }
                    _ => {}
                }
            }
        }
    })
    .await;

    match wait {
        Ok(result) => result.map_err(|e| e.into_connect(stage)),
        Err(_) => Err(connect_error(
            stage,
            "Timed out waiting for connect response",
        )),
    }
}

/// Wait for the `_result` of `createStream` and pull out the stream id.
async fn await_stream_created(conn: &mut Connection, flv: &mut FlvStream) -> TransportResult<u32> {
    let stage = ConnectStage::StreamConnect;
    let wait = timeout(RESPONSE_TIMEOUT, async {
        loop {
            for event in conn.recv(flv).await? {
                match event {
                    ServerEvent::CommandResult {
                        transaction_id,
                        additional_arguments,
                    } if transaction_id == CREATE_STREAM_TRANSACTION_ID => {
                        return match additional_arguments.first() {
                            Some(Amf0Value::Number(id)) => Ok(*id as u32),
                            _ => Err(connect_error(
                                stage,
                                "createStream result carried no stream id",
                            )),
                        };
                    }
                    ServerEvent::CommandError { code } => {
                        return Err(connect_error(
                            stage,
                            format!(
                                "createStream rejected: {}",
                                code.unwrap_or_else(|| "unknown error".to_string())
                            ),
                        ));
                    }
                    ServerEvent::EndOfStream => {
                        return Err(connect_error(stage, "Connection closed by server"));
                    }
                    _ => {}
                }
            }
        }
    })
    .await;

    match wait {
        Ok(result) => result.map_err(|e| e.into_connect(stage)),
        Err(_) => Err(connect_error(
            stage,
            "Timed out waiting for createStream response",
        )),
    }
}

/// Wait for `NetStream.Play.Start`.
async fn await_play_started(conn: &mut Connection, flv: &mut FlvStream) -> TransportResult<()> {
    let stage = ConnectStage::StreamConnect;
    let wait = timeout(RESPONSE_TIMEOUT, async {
        loop {
            for event in conn.recv(flv).await? {
                match event {
                    ServerEvent::Status { level, code } => {
                        let code = code.unwrap_or_default();
                        match code.as_str() {
                            "NetStream.Play.Start" => return Ok(()),
                            "NetStream.Play.Reset" => debug!("Play list reset"),
                            _ if level.as_deref() == Some("error") => {
                                return Err(connect_error(
                                    stage,
                                    format!("Play rejected: {code}"),
                                ));
                            }
                            other => debug!(code = %other, "Stream status"),
                        }
                    }
                    ServerEvent::EndOfStream => {
                        return Err(connect_error(stage, "Connection closed by server"));
                    }
                    _ => {}
                }
            }
        }
    })
    .await;

    match wait {
        Ok(result) => result.map_err(|e| e.into_connect(stage)),
        Err(_) => Err(connect_error(
            stage,
            "Timed out waiting for playback to start",
        )),
    }
}

/// Build the application-level connect command carrying the handshake
/// options.
fn connect_command(app: &str, tc_url: &str, options: &PlaybackOptions) -> RtmpMessage {
    let mut properties = HashMap::new();
    properties.insert("app".to_string(), Amf0Value::Utf8String(app.to_string()));
    properties.insert(
        "flashVer".to_string(),
        Amf0Value::Utf8String(FLASH_VERSION.to_string()),
    );
    properties.insert(
        "swfUrl".to_string(),
        Amf0Value::Utf8String(options.swf_url.clone()),
    );
    properties.insert(
        "tcUrl".to_string(),
        Amf0Value::Utf8String(tc_url.to_string()),
    );
    properties.insert("fpad".to_string(), Amf0Value::Boolean(false));
    properties.insert("objectEncoding".to_string(), Amf0Value::Number(0.0));

    RtmpMessage::Amf0Command {
        command_name: "connect".to_string(),
        transaction_id: CONNECT_TRANSACTION_ID,
        command_object: Amf0Value::Object(properties),
        additional_arguments: Vec::new(),
    }
}

/// Build the platform token command sent after connect acceptance.
fn usher_token_command(token: &str) -> RtmpMessage {
    RtmpMessage::Amf0Command {
        command_name: USHER_TOKEN_COMMAND.to_string(),
        transaction_id: 0.0,
        command_object: Amf0Value::Null,
        additional_arguments: vec![Amf0Value::Utf8String(token.to_string())],
    }
}

fn create_stream_command() -> RtmpMessage {
    RtmpMessage::Amf0Command {
        command_name: "createStream".to_string(),
        transaction_id: CREATE_STREAM_TRANSACTION_ID,
        command_object: Amf0Value::Null,
        additional_arguments: Vec::new(),
    }
}

fn play_command(stream_key: &str) -> RtmpMessage {
    RtmpMessage::Amf0Command {
        command_name: "play".to_string(),
        transaction_id: 0.0,
        command_object: Amf0Value::Null,
        additional_arguments: vec![
            Amf0Value::Utf8String(stream_key.to_string()),
            Amf0Value::Number(PLAY_START_LIVE),
        ],
    }
}

/// Pull a string field out of a command's info object.
fn info_field(arguments: &[Amf0Value], field: &str) -> Option<String> {
    for value in arguments {
        if let Amf0Value::Object(properties) = value {
            if let Some(Amf0Value::Utf8String(s)) = properties.get(field) {
                return Some(s.clone());
            }
        }
    }
    None
}

fn is_end_of_stream_code(code: &str) -> bool {
    matches!(
        code,
        "NetStream.Play.Stop" | "NetStream.Play.Complete" | "NetStream.Play.UnpublishNotify"
    )
}
