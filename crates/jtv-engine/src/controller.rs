//! Stream controller.

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use jtv_resolver::{ChannelUri, DescriptorFetcher, StreamDescriptor};
use jtv_transport::RtmpSession;

use crate::config::SourceConfig;
use crate::error::EngineError;
use crate::state::SourceState;
use crate::EngineResult;

/// Drives one live playback at a time: resolve, connect, read, stop.
///
/// Exactly one session may be open per controller. Concurrent `start`,
/// `read`, and `stop` calls from host threads are serialized by a single
/// mutex around the state machine; there is no finer-grained locking
/// because exactly one caller drives one controller at a time.
pub struct StreamController {
    config: SourceConfig,
    inner: Mutex<ControllerInner>,
}

#[derive(Default)]
struct ControllerInner {
    state: SourceState,
    channel: Option<ChannelUri>,
    session: Option<RtmpSession>,
}

impl StreamController {
    /// Create a controller with the platform defaults.
    pub fn new() -> Self {
        Self::with_config(SourceConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(config: SourceConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(ControllerInner::default()),
        }
    }

    /// Resolve a channel URI and open its playback session.
    ///
    /// Sequences URI parsing, descriptor fetch, descriptor parse, and the
    /// RTMP connect; the first failure aborts the rest and leaves the
    /// controller idle with no session open. Fails with `AlreadyStarted`
    /// while a session is open — the existing session is left untouched.
    #[instrument(name = "source_start", skip(self))]
    pub fn start(&self, uri: &str) -> EngineResult<()> {
        let mut inner = self.inner.lock();

        if !inner.state.is_idle() {
            warn!(state = inner.state.name(), "Refusing start while active");
            return Err(EngineError::AlreadyStarted);
        }

        inner.state = SourceState::Resolving;
        match open_session(&self.config, uri) {
            Ok((channel, session)) => {
                info!(url = session.playback_url(), "Stream started");
                inner.channel = Some(channel);
                inner.session = Some(session);
                inner.state = SourceState::Streaming;
                Ok(())
            }
            Err(e) => {
                inner.channel = None;
                inner.session = None;
                inner.state = SourceState::Idle;
                Err(e)
            }
        }
    }

    /// Read the next media chunk, at most `max_len` bytes.
    ///
    /// Blocks until media is available. `Ok(None)` signals clean end of
    /// stream. A transport failure is terminal: the session is torn down
    /// and the controller returns to idle, eligible for a fresh `start`.
    pub fn read(&self, max_len: usize) -> EngineResult<Option<Bytes>> {
        let mut inner = self.inner.lock();

        if !inner.state.is_streaming() {
            return Err(EngineError::NotStarted);
        }
        let Some(session) = inner.session.as_mut() else {
            return Err(EngineError::NotStarted);
        };

        match session.read(max_len) {
            Ok(chunk) => Ok(chunk),
            Err(e) => {
                warn!("Read failed, tearing down session: {}", e);
                if let Some(mut session) = inner.session.take() {
                    session.close();
                }
                inner.channel = None;
                inner.state = SourceState::Idle;
                Err(EngineError::Transport(e))
            }
        }
    }

    /// Stop playback and release the session.
    ///
    /// Idempotent; safe to call at any point. Clears the resolved channel
    /// so the controller is eligible for a fresh `start`.
    #[instrument(name = "source_stop", skip(self))]
    pub fn stop(&self) -> EngineResult<()> {
        let mut inner = self.inner.lock();

        if let Some(mut session) = inner.session.take() {
            debug!("Closing open session");
            session.close();
        }
        inner.channel = None;
        inner.state = SourceState::Idle;

        Ok(())
    }

    /// Current controller state.
    pub fn state(&self) -> SourceState {
        self.inner.lock().state
    }

    /// Playback URL of the open session, if any.
    pub fn playback_url(&self) -> Option<String> {
        self.inner
            .lock()
            .session
            .as_ref()
            .map(|session| session.playback_url().to_string())
    }

    /// The channel URI of the open session, if any.
    pub fn channel_uri(&self) -> Option<String> {
        self.inner
            .lock()
            .channel
            .as_ref()
            .map(|channel| channel.as_str().to_string())
    }
}

impl Default for StreamController {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the start sequence up to a connected session.
fn open_session(
    config: &SourceConfig,
    uri: &str,
) -> EngineResult<(ChannelUri, RtmpSession)> {
    let channel = ChannelUri::parse(uri)?;
    info!(channel = channel.channel(), "Resolving channel");

    let fetcher = DescriptorFetcher::with_base_url(&config.resolver_base_url);
    let body = fetcher.fetch(channel.channel())?;
    let descriptor = StreamDescriptor::parse(&body)?;
    debug!(
        connect = %descriptor.connect,
        play = %descriptor.play,
        "Resolved stream descriptor"
    );

    let mut session = RtmpSession::with_swf_url(descriptor, &config.swf_url)?;
    session.connect()?;

    Ok((channel, session))
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = "<nodes><n><token>abc</token>\
        <connect>rtmp://cdn/live</connect>\
        <play>channelA_1</play></n></nodes>";

    fn config_for(server_uri: &str) -> SourceConfig {
        SourceConfig {
            resolver_base_url: server_uri.to_string(),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_read_before_start_fails() {
        let controller = StreamController::new();
        assert!(matches!(
            controller.read(4096),
            Err(EngineError::NotStarted)
        ));
    }

    #[test]
    fn test_stop_before_start_is_a_no_op() {
        let controller = StreamController::new();
        controller.stop().unwrap();
        controller.stop().unwrap();
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_start_with_invalid_uri_leaves_controller_idle() {
        let controller = StreamController::new();
        assert!(matches!(
            controller.start("http://notjtv"),
            Err(EngineError::Resolve(_))
        ));
        assert!(controller.state().is_idle());
        assert!(matches!(
            controller.read(4096),
            Err(EngineError::NotStarted)
        ));
    }

    #[test]
    fn test_start_while_started_is_refused() {
        let controller = StreamController::new();
        controller.inner.lock().state = SourceState::Streaming;

        assert!(matches!(
            controller.start("jtv://other"),
            Err(EngineError::AlreadyStarted)
        ));
        // The active state is untouched.
        assert!(controller.state().is_streaming());
    }

    #[tokio::test]
    async fn test_resolution_yields_session_with_playback_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/channelA.xml"))
            .and(query_param("type", "any"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/xml"))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let (channel, session) = tokio::task::spawn_blocking(move || {
            let channel = ChannelUri::parse("jtv://channelA")?;
            let fetcher = DescriptorFetcher::with_base_url(&config.resolver_base_url);
            let body = fetcher.fetch(channel.channel())?;
            let descriptor = StreamDescriptor::parse(&body)?;
            let session = RtmpSession::with_swf_url(descriptor, &config.swf_url)?;
            Ok::<_, EngineError>((channel, session))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(channel.channel(), "channelA");
        assert_eq!(session.playback_url(), "rtmp://cdn/live/channelA_1");
        assert_eq!(session.options().token, "abc");
    }

    #[tokio::test]
    async fn test_start_surfaces_resolution_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let controller = StreamController::with_config(config);
        let controller = tokio::task::spawn_blocking(move || {
            let result = controller.start("jtv://missing");
            assert!(matches!(
                result,
                Err(EngineError::Resolve(
                    jtv_resolver::ResolverError::HttpStatus(404)
                ))
            ));
            controller
        })
        .await
        .unwrap();

        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_start_surfaces_connect_failure_and_stays_idle() {
        let server = MockServer::start().await;
        // Descriptor points at a port nothing listens on.
        let body = "<nodes><n><token>abc</token>\
            <connect>rtmp://127.0.0.1:9/live</connect>\
            <play>channelA_1</play></n></nodes>";
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let controller = StreamController::with_config(config);
        let controller = tokio::task::spawn_blocking(move || {
            let result = controller.start("jtv://channelA");
            assert!(matches!(result, Err(EngineError::Transport(_))));
            controller
        })
        .await
        .unwrap();

        assert!(controller.state().is_idle());
        assert!(controller.playback_url().is_none());
    }

    #[tokio::test]
    async fn test_start_surfaces_incomplete_descriptor() {
        let server = MockServer::start().await;
        let body = "<nodes><n><token>abc</token></n></nodes>";
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
            .mount(&server)
            .await;

        let config = config_for(&server.uri());
        let controller = StreamController::with_config(config);
        tokio::task::spawn_blocking(move || {
            assert!(matches!(
                controller.start("jtv://channelA"),
                Err(EngineError::Resolve(
                    jtv_resolver::ResolverError::IncompleteDescriptor(_)
                ))
            ));
            assert!(controller.state().is_idle());
        })
        .await
        .unwrap();
    }
}
