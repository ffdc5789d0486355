//! Stable mapping of live displays onto a fixed number of render slots.
//!
//! The bar has room for `max_slots` workspace indicators.  Displays come
//! and go at arbitrary times, so each display is pinned to a [`Slot`] for
//! as long as it stays connected.  [`SlotAssignment::reassign`] is the only
//! mutation:
//!
//! 1. slots whose display vanished are freed,
//! 2. live displays without a slot are sorted by id,
//! 3. they take the free slots lowest-first until either list runs out.
//!
//! Displays beyond capacity stay unassigned until a slot frees up.

use crate::event::DisplayId;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A 1-based render slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(pub u8);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Injective `slot -> display` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    max_slots: u8,
    slots: BTreeMap<Slot, DisplayId>,
    /// Displays left without a slot by the last reassignment.
    overflow: BTreeSet<DisplayId>,
}

impl SlotAssignment {
    /// An empty assignment with room for `max_slots` displays.
    pub fn new(max_slots: u8) -> Self {
        Self {
            max_slots,
            slots: BTreeMap::new(),
            overflow: BTreeSet::new(),
        }
    }

    pub fn max_slots(&self) -> u8 {
        self.max_slots
    }

    /// Display pinned to `slot`, if any.
    pub fn display_for(&self, slot: Slot) -> Option<&DisplayId> {
        self.slots.get(&slot)
    }

    /// Slot a display is pinned to, if any.
    pub fn slot_of(&self, display: &DisplayId) -> Option<Slot> {
        self.slots
            .iter()
            .find(|(_, d)| *d == display)
            .map(|(s, _)| *s)
    }

    /// Occupied slots with their displays, in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &DisplayId)> {
        self.slots.iter().map(|(s, d)| (*s, d))
    }

    /// Occupied slot numbers in ascending order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live displays that did not fit into any slot.
    pub fn overflow(&self) -> impl Iterator<Item = &DisplayId> {
        self.overflow.iter()
    }

    /// Bring the assignment in line with the set of `live` displays.
    ///
    /// Returns `true` if any mapping changed.  Calling it again with the
    /// same `live` set is a no-op.
    pub fn reassign<'a>(&mut self, live: impl IntoIterator<Item = &'a DisplayId>) -> bool {
        let live: BTreeSet<&DisplayId> = live.into_iter().collect();
        let before = self.slots.len();

        self.slots.retain(|slot, display| {
            let keep = live.contains(&*display);
            if !keep {
                debug!("slot {} freed (display {} gone)", slot, display);
            }
            keep
        });
        let mut changed = self.slots.len() != before;

        let assigned: BTreeSet<&DisplayId> = self.slots.values().collect();
        let unassigned: Vec<DisplayId> = live
            .iter()
            .filter(|d| !assigned.contains(*d))
            .map(|d| (*d).clone())
            .collect();
        let free: Vec<Slot> = (1..=self.max_slots)
            .map(Slot)
            .filter(|s| !self.slots.contains_key(s))
            .collect();

        let mut pending = unassigned.into_iter();
        for slot in free {
            let Some(display) = pending.next() else {
                break;
            };
            debug!("slot {} -> display {}", slot, display);
            self.slots.insert(slot, display);
            changed = true;
        }

        let overflow: BTreeSet<DisplayId> = pending.collect();
        if overflow != self.overflow {
            if !overflow.is_empty() {
                warn!(
                    "{} display(s) exceed the {} available slot(s) and will not be rendered: {:?}",
                    overflow.len(),
                    self.max_slots,
                    overflow
                );
            }
            self.overflow = overflow;
        }

        changed
    }
}

//  Tests
