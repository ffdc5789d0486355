//! Connection lifecycle around the event stream.
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──ok──▶ Streaming
//!      ▲                        │                  │
//!      └──── backoff ◀── error ─┘◀─── EOF / error ─┘
//! ```
//!
//! Every connection gets a fresh [`Session`]; nothing survives a
//! reconnect.  No failure here is fatal: [`Supervisor::run`] retries
//! forever.

use crate::config::{ConfigError, LayoutConfig, ThemeConfig};
use crate::session::{Session, SessionStats};
use crate::traits::{EventSource, RenderTarget};
use log::{error, info, warn};
use std::time::Duration;

/// Where the supervisor is in its connect/stream loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Streaming,
}

/// How a stream that did open came to an end.
#[derive(Debug)]
pub enum StreamEnd {
    /// The subscriber closed its output.
    Eof,
    /// Reading the next line failed.
    ReadError(std::io::Error),
}

/// Summary of one finished session.
#[derive(Debug)]
pub struct SessionReport {
    pub end: StreamEnd,
    pub stats: SessionStats,
}

/// Reasons a session could not start.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError<E: std::error::Error + 'static> {
    #[error("cannot open event stream: {0}")]
    Connect(#[source] E),
    #[error(transparent)]
    Theme(#[from] ConfigError),
}

/// Owns the event source and render target and keeps them connected.
pub struct Supervisor<S: EventSource, R: RenderTarget> {
    source: S,
    target: R,
    layout: LayoutConfig,
    theme: ThemeConfig,
    backoff: Duration,
    state: ConnectionState,
}

impl<S: EventSource, R: RenderTarget> Supervisor<S, R> {
    pub fn new(
        source: S,
        target: R,
        layout: LayoutConfig,
        theme: ThemeConfig,
        backoff: Duration,
    ) -> Self {
        Self {
            source,
            target,
            layout,
            theme,
            backoff,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    /// Connect once and stream until the connection ends.
    ///
    /// **Blocks** for as long as the event source keeps producing lines.
    /// On return the supervisor is back in
    /// [`Disconnected`](ConnectionState::Disconnected) and every element
    /// the session created has been removed.
    pub fn run_once(&mut self) -> Result<SessionReport, SupervisorError<S::Error>> {
        self.state = ConnectionState::Connecting;
        let palette = match self.theme.palette() {
            Ok(palette) => palette,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e.into());
            }
        };
        let lines = match self.source.connect() {
            Ok(lines) => lines,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(SupervisorError::Connect(e));
            }
        };

        self.state = ConnectionState::Streaming;
        let mut session = Session::new(&self.target, &self.layout, palette);
        let mut end = StreamEnd::Eof;
        for line in lines {
            match line {
                Ok(line) => session.handle_line(&line),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    session.skip_undecodable(&e)
                }
                Err(e) => {
                    end = StreamEnd::ReadError(e);
                    break;
                }
            }
        }
        let stats = session.finish();
        self.state = ConnectionState::Disconnected;
        Ok(SessionReport { end, stats })
    }

    /// Run one connection attempt and log how it ended.
    fn cycle(&mut self) {
        match self.run_once() {
            Ok(SessionReport {
                end: StreamEnd::Eof,
                stats,
            }) => warn!(
                "event stream ended ({} applied, {} ignored, {} malformed), reconnecting in {:?}",
                stats.applied, stats.ignored, stats.malformed, self.backoff
            ),
            Ok(SessionReport {
                end: StreamEnd::ReadError(e),
                ..
            }) => warn!("event stream read failed: {}, reconnecting in {:?}", e, self.backoff),
            Err(e) => error!("{}, retrying in {:?}", e, self.backoff),
        }
    }

    /// Stream forever, reconnecting after every lost connection.
    pub fn run(&mut self) -> ! {
        info!("supervisor started");
        loop {
            self.cycle();
            std::thread::sleep(self.backoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderCommand;
    use crate::traits::testing::{RecordingTarget, ScriptedError, ScriptedSource};

    const SNAPSHOT: &str = r#"{"type":"snapshot",
        "displays":[{"id":1,"visible_tags":1},{"id":2,"visible_tags":2}],
        "windows":[],
        "focused_display_id":1}"#;

    fn supervisor(source: ScriptedSource) -> Supervisor<ScriptedSource, RecordingTarget> {
        let layout = LayoutConfig {
            num_tags: 3,
            ..LayoutConfig::default()
        };
        Supervisor::new(
            source,
            RecordingTarget::default(),
            layout,
            ThemeConfig::default(),
            Duration::ZERO,
        )
    }

    fn adds(log: &[RenderCommand]) -> usize {
        log.iter()
            .filter(|c| matches!(c, RenderCommand::Add { .. }))
            .count()
    }

    #[test]
    fn starts_disconnected() {
        let sup = supervisor(ScriptedSource::default());
        assert_eq!(sup.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn session_streams_until_eof_then_tears_down() {
        let mut sup = supervisor(ScriptedSource::new(vec![Some(vec![
            SNAPSHOT,
            "garbage",
            r#"{"type":"display_focused","display_id":2}"#,
        ])]));
        let report = sup.run_once().unwrap();
        assert!(matches!(report.end, StreamEnd::Eof));
        assert_eq!(report.stats.applied, 2);
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(sup.state(), ConnectionState::Disconnected);

        let log = sup.target().drain();
        assert_eq!(adds(&log), 2 * 4);
        let tail = &log[log.len() - 2 * 4..];
        assert!(tail.iter().all(|c| matches!(c, RenderCommand::Remove { .. })));
    }

    #[test]
    fn connect_failure_is_reported_and_recoverable() {
        let mut sup = supervisor(ScriptedSource::new(vec![None, Some(vec![SNAPSHOT])]));
        let err = sup.run_once().unwrap_err();
        assert!(matches!(err, SupervisorError::Connect(ScriptedError)));
        assert_eq!(sup.state(), ConnectionState::Disconnected);
        assert!(sup.target().drain().is_empty());

        let report = sup.run_once().unwrap();
        assert_eq!(report.stats.applied, 1);
    }

    #[test]
    fn reconnect_starts_from_a_fresh_model() {
        let mut sup = supervisor(ScriptedSource::new(vec![
            Some(vec![SNAPSHOT]),
            Some(vec![r#"{"type":"tags_changed","display_id":1,"visible_tags":4}"#]),
        ]));
        sup.run_once().unwrap();
        sup.target().drain();

        // Display 1 is unknown to the new session until a snapshot arrives.
        let report = sup.run_once().unwrap();
        assert_eq!(report.stats.applied, 1);
        assert!(sup.target().drain().is_empty());
    }

    #[test]
    fn bad_theme_fails_the_attempt_without_connecting() {
        let mut sup = supervisor(ScriptedSource::new(vec![Some(vec![SNAPSHOT])]));
        sup.theme.accent = Some("not-a-color".into());
        assert!(matches!(sup.run_once(), Err(SupervisorError::Theme(_))));
        assert_eq!(sup.source.attempts, 0);
    }

    /// Yields one good line, then a read error.
    struct BrokenSource;

    impl EventSource for BrokenSource {
        type Error = ScriptedError;
        type Lines = std::vec::IntoIter<std::io::Result<String>>;

        fn connect(&mut self) -> Result<Self::Lines, ScriptedError> {
            Ok(vec![
                Ok(SNAPSHOT.to_string()),
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe")),
                Ok(r#"{"type":"display_removed","display_id":1}"#.to_string()),
            ]
            .into_iter())
        }
    }

    #[test]
    fn read_error_ends_the_session() {
        let mut sup = Supervisor::new(
            BrokenSource,
            RecordingTarget::default(),
            LayoutConfig::default(),
            ThemeConfig::default(),
            Duration::ZERO,
        );
        let report = sup.run_once().unwrap();
        assert!(matches!(report.end, StreamEnd::ReadError(_)));
        assert_eq!(report.stats.applied, 1);
    }

    #[test]
    fn invalid_utf8_line_is_skipped_and_stream_continues() {
        use crate::yashiki::subscribe::YashikiSubscription;

        let script = r#"printf '\377\376bad\n%s\n' '{"type":"snapshot","displays":[{"id":1,"visible_tags":1}],"windows":[],"focused_display_id":1}'"#;
        let mut sup = Supervisor::new(
            YashikiSubscription::new("sh", ["-c", script]),
            RecordingTarget::default(),
            LayoutConfig::default(),
            ThemeConfig::default(),
            Duration::ZERO,
        );
        let report = sup.run_once().unwrap();
        assert!(matches!(report.end, StreamEnd::Eof));
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(report.stats.applied, 1);
        assert!(adds(&sup.target().drain()) > 0);
    }
}
