//! In-memory model of displays, windows and focus.
//!
//! [`WorldModel`] is rebuilt from scratch for every connection to the window
//! manager: a [`Snapshot`] seeds it, incremental [`Event`]s mutate it.  It
//! knows nothing about slots or rendering.

use crate::event::{DisplayId, DisplayRecord, Event, Snapshot, TagMask, WindowId, WindowRecord};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Per-display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Display {
    /// Tags currently shown on the display.
    pub visible_tags: TagMask,
}

/// Per-window state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Tags the window belongs to (zero, one or many).
    pub tags: TagMask,
    /// Display the window is rendered on.
    pub output_id: DisplayId,
}

fn window_entry(w: WindowRecord) -> (WindowId, Window) {
    (
        w.id,
        Window {
            tags: w.tags,
            output_id: w.output_id,
        },
    )
}

fn display_entry(d: DisplayRecord) -> (DisplayId, Display) {
    (
        d.id,
        Display {
            visible_tags: d.visible_tags,
        },
    )
}

/// Authoritative view of window-manager state.
///
/// Displays are kept in a [`BTreeMap`] so iteration (and therefore the
/// focus fallback on display removal) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorldModel {
    displays: BTreeMap<DisplayId, Display>,
    windows: HashMap<WindowId, Window>,
    focused: Option<DisplayId>,
}

impl WorldModel {
    /// An empty model: no displays, no windows, no focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model directly from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut model = Self::new();
        model.apply_snapshot(snapshot);
        model
    }

    //  Accessors

    /// The focused display, if any.
    ///
    /// Focus may name a display the model does not track (the window
    /// manager is free to focus before announcing); renderers simply find
    /// no match in that case.
    pub fn focused(&self) -> Option<&DisplayId> {
        self.focused.as_ref()
    }

    pub fn display(&self, id: &DisplayId) -> Option<&Display> {
        self.displays.get(id)
    }

    pub fn window(&self, id: &WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// Iterator over live display ids in ascending order.
    pub fn live_displays(&self) -> impl Iterator<Item = &DisplayId> {
        self.displays.keys()
    }

    pub fn display_count(&self) -> usize {
        self.displays.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Iterator over the windows rendered on `display`.
    pub fn windows_on<'a>(&'a self, display: &'a DisplayId) -> impl Iterator<Item = &'a Window> {
        self.windows.values().filter(move |w| &w.output_id == display)
    }

    /// Union of the tag masks of every window on `display`.
    pub fn occupied_tags(&self, display: &DisplayId) -> TagMask {
        self.windows_on(display).fold(0, |acc, w| acc | w.tags)
    }

    //  Mutation

    /// Replace every display, window and the focus wholesale.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.displays = snapshot.displays.into_iter().map(display_entry).collect();
        self.windows = snapshot.windows.into_iter().map(window_entry).collect();
        self.focused = Some(snapshot.focused_display_id);
        debug!(
            "snapshot: {} display(s), {} window(s), focus {:?}",
            self.displays.len(),
            self.windows.len(),
            self.focused
        );
    }

    /// Apply one event.  Returns `false` when the event carries nothing the
    /// model tracks, so the caller can skip a render pass.
    ///
    /// A snapshot passed here is applied as a full replace.
    pub fn apply_event(&mut self, event: Event) -> bool {
        match event {
            Event::Snapshot(snapshot) => {
                self.apply_snapshot(snapshot);
            }

            Event::TagsChanged {
                display_id,
                visible_tags,
            } => match self.displays.get_mut(&display_id) {
                Some(display) => display.visible_tags = visible_tags,
                // Usually races a pending display_removed.
                None => debug!("tags_changed for unknown display {}", display_id),
            },

            Event::DisplayFocused { display_id } => {
                self.focused = Some(display_id);
            }

            Event::WindowCreated { window } | Event::WindowUpdated { window } => {
                let (id, window) = window_entry(window);
                self.windows.insert(id, window);
            }

            Event::WindowDestroyed { window_id } => {
                if self.windows.remove(&window_id).is_none() {
                    debug!("window_destroyed for unknown window {}", window_id);
                }
            }

            Event::DisplayAdded { display } | Event::DisplayUpdated { display } => {
                let focus = display.is_focused;
                let (id, display) = display_entry(display);
                if focus {
                    self.focused = Some(id.clone());
                }
                self.displays.insert(id, display);
            }

            Event::DisplayRemoved { display_id } => {
                self.displays.remove(&display_id);
                if self.focused.as_ref() == Some(&display_id) {
                    self.focused = self.displays.keys().next().cloned();
                    debug!(
                        "focused display {} removed, focus falls back to {:?}",
                        display_id, self.focused
                    );
                }
            }

            Event::Unknown => return false,
        }
        true
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::decode_line;

    fn display(id: &str, visible_tags: TagMask) -> DisplayRecord {
        DisplayRecord {
            id: id.into(),
            visible_tags,
            is_focused: false,
        }
    }

    fn window(id: &str, tags: TagMask, output: &str) -> WindowRecord {
        WindowRecord {
            id: id.into(),
            tags,
            output_id: output.into(),
        }
    }

    fn two_display_model() -> WorldModel {
        WorldModel::from_snapshot(Snapshot {
            displays: vec![display("A", 0b1), display("B", 0b100)],
            windows: vec![window("w1", 0b10, "A"), window("w2", 0b1000, "B")],
            focused_display_id: "A".into(),
        })
    }

    #[test]
    fn snapshot_replaces_everything() {
        let mut model = two_display_model();
        model.apply_snapshot(Snapshot {
            displays: vec![display("C", 0b1)],
            windows: vec![],
            focused_display_id: "C".into(),
        });
        assert_eq!(model.display_count(), 1);
        assert_eq!(model.window_count(), 0);
        assert!(model.display(&"A".into()).is_none());
        assert_eq!(model.focused(), Some(&DisplayId::from("C")));
    }

    #[test]
    fn tags_changed_updates_known_display() {
        let mut model = two_display_model();
        assert!(model.apply_event(Event::TagsChanged {
            display_id: "A".into(),
            visible_tags: 0b110,
        }));
        assert_eq!(model.display(&"A".into()).unwrap().visible_tags, 0b110);
    }

    #[test]
    fn tags_changed_for_unknown_display_is_ignored() {
        let mut model = two_display_model();
        let before = model.clone();
        model.apply_event(Event::TagsChanged {
            display_id: "Z".into(),
            visible_tags: 0b1,
        });
        assert_eq!(model, before);
        assert!(model.display(&"Z".into()).is_none());
    }

    #[test]
    fn display_focused_is_unconditional() {
        let mut model = two_display_model();
        model.apply_event(Event::DisplayFocused {
            display_id: "not-yet-known".into(),
        });
        assert_eq!(model.focused(), Some(&DisplayId::from("not-yet-known")));
    }

    #[test]
    fn window_created_and_updated_upsert() {
        let mut model = two_display_model();
        model.apply_event(Event::WindowCreated {
            window: window("w3", 0b1, "A"),
        });
        assert_eq!(model.window_count(), 3);
        model.apply_event(Event::WindowUpdated {
            window: window("w3", 0b100, "B"),
        });
        assert_eq!(model.window_count(), 3);
        let w = model.window(&"w3".into()).unwrap();
        assert_eq!(w.tags, 0b100);
        assert_eq!(w.output_id, DisplayId::from("B"));

        // window_updated for an unseen window behaves like window_created.
        model.apply_event(Event::WindowUpdated {
            window: window("w4", 0b1, "A"),
        });
        assert_eq!(model.window_count(), 4);
    }

    #[test]
    fn window_destroyed_absent_is_not_an_error() {
        let mut model = two_display_model();
        assert!(model.apply_event(Event::WindowDestroyed {
            window_id: "w1".into()
        }));
        assert!(model.window(&"w1".into()).is_none());
        assert!(model.apply_event(Event::WindowDestroyed {
            window_id: "w1".into()
        }));
        assert_eq!(model.window_count(), 1);
    }

    #[test]
    fn display_added_with_focus_moves_focus() {
        let mut model = two_display_model();
        model.apply_event(Event::DisplayAdded {
            display: DisplayRecord {
                id: "C".into(),
                visible_tags: 0b1,
                is_focused: true,
            },
        });
        assert_eq!(model.display_count(), 3);
        assert_eq!(model.focused(), Some(&DisplayId::from("C")));
    }

    #[test]
    fn display_updated_without_focus_keeps_focus() {
        let mut model = two_display_model();
        model.apply_event(Event::DisplayUpdated {
            display: display("B", 0b11),
        });
        assert_eq!(model.display(&"B".into()).unwrap().visible_tags, 0b11);
        assert_eq!(model.focused(), Some(&DisplayId::from("A")));
    }

    #[test]
    fn removing_focused_display_falls_back_to_remaining() {
        let mut model = two_display_model();
        model.apply_event(Event::DisplayRemoved {
            display_id: "A".into(),
        });
        assert_eq!(model.focused(), Some(&DisplayId::from("B")));
    }

    #[test]
    fn removing_last_display_clears_focus() {
        let mut model = WorldModel::from_snapshot(Snapshot {
            displays: vec![display("A", 0b1)],
            windows: vec![],
            focused_display_id: "A".into(),
        });
        model.apply_event(Event::DisplayRemoved {
            display_id: "A".into(),
        });
        assert_eq!(model.focused(), None);
        assert_eq!(model.display_count(), 0);
    }

    #[test]
    fn removing_unfocused_display_keeps_focus() {
        let mut model = two_display_model();
        model.apply_event(Event::DisplayRemoved {
            display_id: "B".into(),
        });
        assert_eq!(model.focused(), Some(&DisplayId::from("A")));
    }

    #[test]
    fn unknown_event_reports_no_change() {
        let mut model = two_display_model();
        let before = model.clone();
        assert!(!model.apply_event(Event::Unknown));
        assert_eq!(model, before);
    }

    #[test]
    fn occupied_tags_is_union_per_display() {
        let mut model = two_display_model();
        model.apply_event(Event::WindowCreated {
            window: window("w3", 0b100000, "A"),
        });
        assert_eq!(model.occupied_tags(&"A".into()), 0b100010);
        assert_eq!(model.occupied_tags(&"B".into()), 0b1000);
        assert_eq!(model.occupied_tags(&"nowhere".into()), 0);
    }

    #[test]
    fn incremental_events_reconstruct_second_snapshot() {
        let second = Snapshot {
            displays: vec![display("B", 0b10), display("C", 0b1)],
            windows: vec![window("w2", 0b1, "C"), window("w5", 0b110, "B")],
            focused_display_id: "C".into(),
        };

        let mut incremental = two_display_model();
        let lines = [
            r#"{"type":"display_added","display":{"id":"C","visible_tags":1}}"#,
            r#"{"type":"window_destroyed","window_id":"w1"}"#,
            r#"{"type":"display_removed","display_id":"A"}"#,
            r#"{"type":"tags_changed","display_id":"B","visible_tags":2}"#,
            r#"{"type":"window_updated","window":{"id":"w2","tags":1,"output_id":"C"}}"#,
            r#"{"type":"window_created","window":{"id":"w5","tags":6,"output_id":"B"}}"#,
            r#"{"type":"display_focused","display_id":"C"}"#,
        ];
        for line in lines {
            incremental.apply_event(decode_line(line).unwrap());
        }

        let direct = WorldModel::from_snapshot(second);
        assert_eq!(incremental, direct);
    }
}
