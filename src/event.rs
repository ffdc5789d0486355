//! Wire vocabulary of the window-manager event stream.
//!
//! The subscriber prints one JSON object per line.  Every object carries a
//! `"type"` discriminator; [`decode_line`] turns a line into an [`Event`]
//! or a [`DecodeError`].  Unknown discriminators decode to
//! [`Event::Unknown`] so a newer window manager never breaks the stream.
//!
//! Display and window ids are opaque.  The window manager may print them as
//! numbers or strings; both decode to the same [`DisplayId`] /
//! [`WindowId`].

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Bitmask of workspace tags.  Bit `k` (0-indexed) is tag number `k + 1`.
pub type TagMask = u32;

/// Highest tag number representable in a [`TagMask`].
pub const MAX_TAGS: u8 = 32;

/// Bit for 1-based `tag` in a [`TagMask`].  Tags outside `1..=MAX_TAGS`
/// have no bit and map to an empty mask.
pub fn tag_bit(tag: u8) -> TagMask {
    match tag.checked_sub(1) {
        Some(shift) => (1 as TagMask).checked_shl(u32::from(shift)).unwrap_or(0),
        None => 0,
    }
}

/// Deserialize a JSON number or string into its string form.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct V;
    impl<'de> Visitor<'de> for V {
        type Value = String;
        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "integer or string id")
        }
        fn visit_u64<E>(self, n: u64) -> Result<String, E> {
            Ok(n.to_string())
        }
        fn visit_i64<E>(self, n: i64) -> Result<String, E> {
            Ok(n.to_string())
        }
        fn visit_str<E>(self, s: &str) -> Result<String, E>
        where
            E: DeError,
        {
            Ok(s.to_string())
        }
    }
    deserializer.deserialize_any(V)
}

macro_rules! opaque_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                opaque_id(deserializer).map(Self)
            }
        }
    };
}

opaque_id_type!(
    /// Identity of a physical display as reported by the window manager.
    ///
    /// Ordering is plain string ordering; slot assignment relies on it for
    /// determinism.
    DisplayId
);

opaque_id_type!(
    /// Identity of a window.
    WindowId
);

/// A display as it appears in snapshots and `display_*` events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayRecord {
    pub id: DisplayId,
    pub visible_tags: TagMask,
    /// Only meaningful on `display_added` / `display_updated`.
    #[serde(default)]
    pub is_focused: bool,
}

/// A window as it appears in snapshots and `window_*` events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub tags: TagMask,
    pub output_id: DisplayId,
}

/// Full-state payload of a `snapshot` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub displays: Vec<DisplayRecord>,
    pub windows: Vec<WindowRecord>,
    pub focused_display_id: DisplayId,
}

/// One decoded line of the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Replace all tracked state.
    Snapshot(Snapshot),

    /// A display now shows a different set of tags.
    TagsChanged {
        display_id: DisplayId,
        visible_tags: TagMask,
    },

    /// Keyboard focus moved to another display.
    DisplayFocused { display_id: DisplayId },

    WindowCreated { window: WindowRecord },

    /// Tags or output of a window changed.  Handled exactly like
    /// [`WindowCreated`](Event::WindowCreated).
    WindowUpdated { window: WindowRecord },

    WindowDestroyed { window_id: WindowId },

    DisplayAdded { display: DisplayRecord },

    DisplayUpdated { display: DisplayRecord },

    DisplayRemoved { display_id: DisplayId },

    /// Any discriminator this bridge does not know about.
    #[serde(other)]
    Unknown,
}

impl Event {
    /// Whether applying this event can change the set of live displays,
    /// and therefore the slot assignment.
    pub fn changes_topology(&self) -> bool {
        matches!(
            self,
            Event::Snapshot(_)
                | Event::DisplayAdded { .. }
                | Event::DisplayUpdated { .. }
                | Event::DisplayRemoved { .. }
        )
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Snapshot(_) => "snapshot",
            Event::TagsChanged { .. } => "tags_changed",
            Event::DisplayFocused { .. } => "display_focused",
            Event::WindowCreated { .. } => "window_created",
            Event::WindowUpdated { .. } => "window_updated",
            Event::WindowDestroyed { .. } => "window_destroyed",
            Event::DisplayAdded { .. } => "display_added",
            Event::DisplayUpdated { .. } => "display_updated",
            Event::DisplayRemoved { .. } => "display_removed",
            Event::Unknown => "unknown",
        }
    }
}

/// A line that could not be decoded into an [`Event`].
#[derive(Debug, thiserror::Error)]
#[error("undecodable event line: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decode one line of the event stream.
pub fn decode_line(line: &str) -> Result<Event, DecodeError> {
    Ok(serde_json::from_str(line.trim())?)
}
