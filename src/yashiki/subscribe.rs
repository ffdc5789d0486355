//! Subprocess [`EventSource`] implementation.
//!
//! Spawns `yashiki subscribe` and reads its standard output line by line.
//! Every line is one JSON-encoded event:
//!
//! ```json
//! {"type":"snapshot","displays":[{"id":1,"visible_tags":1}],"windows":[],"focused_display_id":1}
//! {"type":"tags_changed","display_id":1,"visible_tags":4}
//! {"type":"display_focused","display_id":2}
//! ```
//!
//! The subscriber's stderr is discarded.  A line that is not valid UTF-8
//! is yielded as an [`InvalidData`](std::io::ErrorKind::InvalidData) error
//! and reading continues with the next line.  Dropping the line iterator
//! kills and reaps the child.

use crate::traits::EventSource;
use log::{debug, info};
use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

/// An [`EventSource`] that runs a subscriber program per connection.
pub struct YashikiSubscription {
    program: String,
    args: Vec<String>,
}

/// Errors produced when starting the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum YashikiError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} has no stdout")]
    NoStdout(String),
}

impl YashikiSubscription {
    /// Create a source that runs `program args...` on every connect.
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lines of one running subscriber.
pub struct SubscriptionLines {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl Iterator for SubscriptionLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                // The bad bytes are already consumed, so the next call
                // resumes at the following line.
                Some(
                    String::from_utf8(buf)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
                )
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl Drop for SubscriptionLines {
    fn drop(&mut self) {
        // Already exited on EOF; kill only matters if we stop reading early.
        let _ = self.child.kill();
        match self.child.wait() {
            Ok(status) => debug!("subscriber exited with {}", status),
            Err(e) => debug!("failed to reap subscriber: {}", e),
        }
    }
}

impl EventSource for YashikiSubscription {
    type Error = YashikiError;
    type Lines = SubscriptionLines;

    fn connect(&mut self) -> Result<SubscriptionLines, YashikiError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| YashikiError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(YashikiError::NoStdout(self.program.clone()));
        };
        info!("subscribed via {} (pid {})", self.program, child.id());
        Ok(SubscriptionLines {
            child,
            reader: BufReader::new(stdout),
        })
    }
}

//  Tests
