//! Core traits that decouple the bridge from a specific bar or window
//! manager.
//!
//! The [`Session`](crate::session::Session) and
//! [`Supervisor`](crate::supervisor::Supervisor) depend only on these
//! abstractions; concrete backends live in [`ranma`](crate::ranma) and
//! [`yashiki`](crate::yashiki).

use crate::render::RenderCommand;

/// Something that draws bar elements.
///
/// Commands are fire-and-forget: the caller never reads anything back, and
/// an error only means this one command was lost.  The bridge is the only
/// writer, so it tracks what exists itself.
pub trait RenderTarget {
    /// The error type produced by this target.
    type Error: std::error::Error + Send + 'static;

    /// Deliver one command.  Nothing is read back from the bar.
    fn send(&self, command: &RenderCommand) -> Result<(), Self::Error>;
}

/// A (re)connectable source of event lines.
///
/// Every call to [`connect`](EventSource::connect) opens a fresh stream;
/// the returned iterator yields raw lines until the window manager's
/// output ends.
///
/// # Contract
///
/// * `connect` fails only when the stream cannot be opened at all (e.g.
///   the subscriber binary is missing).
/// * Iteration **blocks** until the next line is available.
/// * An [`InvalidData`](std::io::ErrorKind::InvalidData) item stands for
///   one undecodable line; iteration continues after it.
/// * Any other `Err` item, or the end of iteration, ends the stream.
pub trait EventSource {
    /// The error type produced when connecting.
    type Error: std::error::Error + Send + 'static;

    /// Iterator over the lines of one connection.
    type Lines: Iterator<Item = std::io::Result<String>>;

    /// Open a new stream.
    fn connect(&mut self) -> Result<Self::Lines, Self::Error>;
}
