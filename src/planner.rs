//! Decides how every tag of every rendered slot should look.
//!
//! Classification is a pure function of three bitmasks and a tag number;
//! styling is a pure function of the [`TagState`], whether the slot's
//! display holds focus, and the session [`Palette`].  [`plan`] combines
//! both over the current model and slot assignment.

use crate::event::{tag_bit, DisplayId, TagMask};
use crate::model::WorldModel;
use crate::palette::{Color, Palette};
use crate::render::{Attr, Paint};
use crate::slots::{Slot, SlotAssignment};

/// Mutually exclusive visual state of one tag on one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagState {
    /// Shown on the display right now.
    Active,
    /// Not shown, but at least one window on the display carries it.
    Occupied,
    /// Neither.
    Vacant,
}

/// Classify `tag` (1-based).  `Active` wins over `Occupied`.
pub fn classify(visible_tags: TagMask, occupied_tags: TagMask, tag: u8) -> TagState {
    let bit = tag_bit(tag);
    if visible_tags & bit != 0 {
        TagState::Active
    } else if occupied_tags & bit != 0 {
        TagState::Occupied
    } else {
        TagState::Vacant
    }
}

/// Border treatment of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// The palette has no indicator; border properties are left alone.
    Unstyled,
    /// Border cleared.
    Hidden,
    /// One-pixel border in the given color.
    Border(Color),
}

/// Full visual treatment of one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagStyle {
    pub label_color: Color,
    pub background: Paint,
    pub indicator: Indicator,
}

impl TagStyle {
    /// Properties to `set` on the tag element.
    pub fn attrs(&self) -> Vec<Attr> {
        let mut attrs = vec![
            Attr::LabelColor(Paint::Color(self.label_color)),
            Attr::BackgroundColor(self.background),
        ];
        match self.indicator {
            Indicator::Unstyled => {}
            Indicator::Hidden => {
                attrs.push(Attr::BorderColor(Paint::Clear));
                attrs.push(Attr::BorderWidth(0));
            }
            Indicator::Border(color) => {
                attrs.push(Attr::BorderColor(Paint::Color(color)));
                attrs.push(Attr::BorderWidth(1));
            }
        }
        attrs
    }
}

/// Map a tag state and focus flag to its style under `palette`.
pub fn style_for(state: TagState, focused: bool, palette: &Palette) -> TagStyle {
    let indicator = match (palette.indicator, state, focused) {
        (None, _, _) => Indicator::Unstyled,
        (Some(color), TagState::Active, true) => Indicator::Border(color),
        (Some(_), _, _) => Indicator::Hidden,
    };
    match state {
        TagState::Active => TagStyle {
            label_color: palette.active_label.pick(focused),
            background: Paint::Color(palette.active_background.pick(focused)),
            indicator,
        },
        TagState::Occupied => TagStyle {
            label_color: palette.occupied_label.pick(focused),
            background: Paint::Clear,
            indicator,
        },
        TagState::Vacant => TagStyle {
            label_color: palette.vacant_label.pick(focused),
            background: Paint::Clear,
            indicator,
        },
    }
}

/// Planned state of one tag element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPlan {
    pub tag: u8,
    pub state: TagState,
    pub style: TagStyle,
}

/// Planned state of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPlan {
    pub slot: Slot,
    pub display: DisplayId,
    pub focused: bool,
    pub tags: Vec<TagPlan>,
}

/// Plan every tag of every occupied slot, in ascending slot order.
pub fn plan(
    model: &WorldModel,
    slots: &SlotAssignment,
    palette: &Palette,
    num_tags: u8,
) -> Vec<SlotPlan> {
    slots
        .iter()
        .map(|(slot, display)| {
            let visible = model.display(display).map_or(0, |d| d.visible_tags);
            let occupied = model.occupied_tags(display);
            let focused = model.focused() == Some(display);
            let tags = (1..=num_tags)
                .map(|tag| {
                    let state = classify(visible, occupied, tag);
                    TagPlan {
                        tag,
                        state,
                        style: style_for(state, focused, palette),
                    }
                })
                .collect();
            SlotPlan {
                slot,
                display: display.clone(),
                focused,
                tags,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DisplayRecord, Event, Snapshot, WindowRecord};

    #[test]
    fn classification_is_total_and_exclusive() {
        // Exhaustive over 4-bit masks and the first 4 tags.
        for visible in 0..16u32 {
            for occupied in 0..16u32 {
                for tag in 1..=4u8 {
                    let bit = tag_bit(tag);
                    let expected = if visible & bit != 0 {
                        TagState::Active
                    } else if occupied & bit != 0 {
                        TagState::Occupied
                    } else {
                        TagState::Vacant
                    };
                    assert_eq!(classify(visible, occupied, tag), expected);
                }
            }
        }
    }

    #[test]
    fn active_wins_over_occupied() {
        assert_eq!(classify(0b1, 0b1, 1), TagState::Active);
    }

    #[test]
    fn style_table_default_palette() {
        let p = Palette::default();
        let table = [
            (TagState::Active, true, "#ffffff", "#ffffff40"),
            (TagState::Active, false, "#ffffff80", "#ffffff20"),
            (TagState::Occupied, true, "#ffffff", ""),
            (TagState::Occupied, false, "#ffffff80", ""),
            (TagState::Vacant, true, "#888888", ""),
            (TagState::Vacant, false, "#88888840", ""),
        ];
        for (state, focused, label, bg) in table {
            let style = style_for(state, focused, &p);
            assert_eq!(style.label_color.to_string(), label, "{:?}/{}", state, focused);
            assert_eq!(style.background.to_string(), bg, "{:?}/{}", state, focused);
            assert_eq!(style.indicator, Indicator::Unstyled);
        }
    }

    #[test]
    fn style_is_pure() {
        let p = Palette::from_accent(Color::rgb(0x30, 0x90, 0xf0), 0.5);
        for state in [TagState::Active, TagState::Occupied, TagState::Vacant] {
            for focused in [true, false] {
                assert_eq!(style_for(state, focused, &p), style_for(state, focused, &p));
            }
        }
    }

    #[test]
    fn accent_indicator_only_on_focused_active() {
        let accent = Color::rgb(0xff, 0x00, 0x80);
        let p = Palette::from_accent(accent, 0.35);
        assert_eq!(
            style_for(TagState::Active, true, &p).indicator,
            Indicator::Border(accent)
        );
        assert_eq!(style_for(TagState::Active, false, &p).indicator, Indicator::Hidden);
        assert_eq!(style_for(TagState::Occupied, true, &p).indicator, Indicator::Hidden);
        assert_eq!(style_for(TagState::Vacant, true, &p).indicator, Indicator::Hidden);
    }

    #[test]
    fn six_visual_classes_are_distinct() {
        let p = Palette::default();
        let mut seen = Vec::new();
        for state in [TagState::Active, TagState::Occupied, TagState::Vacant] {
            for focused in [true, false] {
                let s = style_for(state, focused, &p);
                assert!(!seen.contains(&s), "{:?}/{} duplicates", state, focused);
                seen.push(s);
            }
        }
    }

    #[test]
    fn style_attrs_carry_border_only_when_styled() {
        let plain = style_for(TagState::Vacant, true, &Palette::default()).attrs();
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[1], Attr::BackgroundColor(Paint::Clear));

        let accent = Palette::from_accent(Color::rgb(0, 0, 0xff), 0.35);
        let bordered = style_for(TagState::Active, true, &accent).attrs();
        assert!(bordered.contains(&Attr::BorderWidth(1)));
    }

    fn scenario_model() -> WorldModel {
        WorldModel::from_snapshot(Snapshot {
            displays: vec![DisplayRecord {
                id: "A".into(),
                visible_tags: 0b0001,
                is_focused: false,
            }],
            windows: vec![WindowRecord {
                id: "w1".into(),
                tags: 0b0010,
                output_id: "A".into(),
            }],
            focused_display_id: "A".into(),
        })
    }

    #[test]
    fn snapshot_scenario_renders_active_occupied_vacant() {
        let model = scenario_model();
        let mut slots = SlotAssignment::new(3);
        slots.reassign(model.live_displays());
        let plans = plan(&model, &slots, &Palette::default(), 10);

        assert_eq!(plans.len(), 1);
        let p = &plans[0];
        assert_eq!(p.slot, Slot(1));
        assert!(p.focused);
        assert_eq!(p.tags.len(), 10);
        assert_eq!(p.tags[0].state, TagState::Active);
        assert_eq!(p.tags[1].state, TagState::Occupied);
        assert!(p.tags[2..].iter().all(|t| t.state == TagState::Vacant));
        assert_eq!(p.tags[0].style, style_for(TagState::Active, true, &Palette::default()));
    }

    #[test]
    fn occupancy_only_counts_windows_on_the_same_display() {
        let mut model = scenario_model();
        model.apply_event(Event::DisplayAdded {
            display: DisplayRecord {
                id: "B".into(),
                visible_tags: 0b1,
                is_focused: false,
            },
        });
        model.apply_event(Event::WindowCreated {
            window: WindowRecord {
                id: "w2".into(),
                tags: 0b100,
                output_id: "B".into(),
            },
        });
        let mut slots = SlotAssignment::new(3);
        slots.reassign(model.live_displays());
        let plans = plan(&model, &slots, &Palette::default(), 4);

        assert_eq!(plans[0].tags[2].state, TagState::Vacant);
        assert_eq!(plans[1].display, DisplayId::from("B"));
        assert!(!plans[1].focused);
        assert_eq!(plans[1].tags[1].state, TagState::Vacant);
        assert_eq!(plans[1].tags[2].state, TagState::Occupied);
    }

    #[test]
    fn destroying_last_window_makes_tag_vacant() {
        let mut model = scenario_model();
        let mut slots = SlotAssignment::new(3);
        slots.reassign(model.live_displays());
        model.apply_event(Event::WindowDestroyed {
            window_id: "w1".into(),
        });
        let plans = plan(&model, &slots, &Palette::default(), 4);
        assert_eq!(plans[0].tags[1].state, TagState::Vacant);
    }
}
